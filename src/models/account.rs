//! Login account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// Role string for administrator accounts.
pub const ROLE_ADMIN: &str = "admin";

/// Role string for employee accounts.
pub const ROLE_EMPLOYEE: &str = "employee";

/// A login account.
///
/// Accounts are never deleted by the engine; only login attempts and the
/// administrative unlock mutate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier.
    pub id: u64,
    /// Unique username, case-sensitive as stored.
    pub username: String,
    /// Password hash in PHC string format.
    pub password_hash: String,
    /// Salt used for the hash.
    pub salt: String,
    /// Role: `admin`, `employee`, or any other free-text role.
    pub role: String,
    /// Linked employee record, if any.
    pub employee_id: Option<EmployeeId>,
    /// Time of the last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Consecutive failed login attempts.
    pub failed_login_attempts: u32,
    /// Set once the failure threshold is reached; cleared only by an unlock.
    pub is_locked: bool,
}

impl Account {
    /// Returns true when the role is `employee` (any case).
    pub fn is_employee_role(&self) -> bool {
        self.role.eq_ignore_ascii_case(ROLE_EMPLOYEE)
    }

    /// Returns the mutable login bookkeeping of this account.
    pub fn login_state(&self) -> LoginState {
        LoginState {
            last_login: self.last_login,
            failed_attempts: self.failed_login_attempts,
            is_locked: self.is_locked,
        }
    }
}

/// The login bookkeeping written back after every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginState {
    /// Time of the last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Consecutive failed attempts.
    pub failed_attempts: u32,
    /// Lock flag.
    pub is_locked: bool,
}

impl LoginState {
    /// State after a successful login at `now`.
    pub fn succeeded(now: DateTime<Utc>) -> Self {
        Self {
            last_login: Some(now),
            failed_attempts: 0,
            is_locked: false,
        }
    }

    /// State after one more failed attempt; locks at `max_attempts`.
    pub fn failed(self, max_attempts: u32) -> Self {
        let failed_attempts = self.failed_attempts.saturating_add(1);
        Self {
            last_login: self.last_login,
            failed_attempts,
            is_locked: self.is_locked || failed_attempts >= max_attempts,
        }
    }

    /// State after an administrative unlock.
    pub fn unlocked(self) -> Self {
        Self {
            last_login: self.last_login,
            failed_attempts: 0,
            is_locked: false,
        }
    }
}

/// Input for inserting a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Unique username.
    pub username: String,
    /// Password hash in PHC string format.
    pub password_hash: String,
    /// Salt used for the hash.
    pub salt: String,
    /// Account role.
    pub role: String,
    /// Linked employee record, if any.
    pub employee_id: Option<EmployeeId>,
}
