//! Policy configuration types.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from `policy.yaml`. Every field has a default, so a partial
//! file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::models::PayrollStatus;

/// Working days per month used to derive the daily rate.
pub const DEFAULT_WORKING_DAYS_PER_MONTH: u32 = 22;

/// Earliest payroll year accepted.
pub const DEFAULT_MIN_YEAR: i32 = 2020;

/// Largest number of present days a monthly payroll may carry.
pub const DEFAULT_MAX_PRESENT_DAYS: u32 = 31;

/// Consecutive failed logins that lock an account.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;

/// Minimum trimmed username length.
pub const DEFAULT_MIN_USERNAME_LENGTH: usize = 3;

/// Minimum password length.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Payroll calculation and validation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Fixed divisor for the daily rate; not derived from the calendar.
    pub working_days_per_month: u32,
    /// Earliest accepted payroll year.
    pub min_year: i32,
    /// Upper bound (inclusive) for present days.
    pub max_present_days: u32,
    /// Status given to records created without an explicit status.
    pub default_status: PayrollStatus,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            working_days_per_month: DEFAULT_WORKING_DAYS_PER_MONTH,
            min_year: DEFAULT_MIN_YEAR,
            max_present_days: DEFAULT_MAX_PRESENT_DAYS,
            default_status: PayrollStatus::Pending,
        }
    }
}

/// Authentication and credential policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPolicy {
    /// Failed attempts after which the account is locked.
    pub max_failed_attempts: u32,
    /// Minimum username length after trimming.
    pub min_username_length: usize,
    /// Minimum password length, enforced at format check and hash time.
    pub min_password_length: usize,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            min_username_length: DEFAULT_MIN_USERNAME_LENGTH,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// The complete policy configuration.
///
/// # Example
///
/// ```
/// use payease_engine::config::PolicyConfig;
///
/// let policy = PolicyConfig::default();
/// assert_eq!(policy.payroll.working_days_per_month, 22);
/// assert_eq!(policy.auth.max_failed_attempts, 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Payroll policy section.
    pub payroll: PayrollPolicy,
    /// Authentication policy section.
    pub auth: AuthPolicy,
}

impl PolicyConfig {
    /// Checks values that would make the engines misbehave.
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.payroll.working_days_per_month == 0 {
            return Err("payroll.working_days_per_month must be greater than zero".to_string());
        }
        if self.auth.max_failed_attempts == 0 {
            return Err("auth.max_failed_attempts must be greater than zero".to_string());
        }
        if self.auth.min_password_length == 0 {
            return Err("auth.min_password_length must be greater than zero".to_string());
        }
        Ok(())
    }
}
