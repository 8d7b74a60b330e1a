//! Login and lockout.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::credentials::{resolve_dashboard, validate_credential_format};
use super::password::{HashedPassword, PasswordStore};
use crate::config::AuthPolicy;
use crate::error::{EngineError, EngineResult};
use crate::locks::KeyedLocks;
use crate::models::{Account, Dashboard, LoginState, SessionInfo};
use crate::store::{AccountRepository, EmployeeRepository};

const DECOY_PASSWORD: &str = "payease-decoy-password";

/// Authenticates accounts and enforces the failed-login lockout.
///
/// Every login attempt for one account runs its read, verify and write
/// under that account's lock, so concurrent wrong passwords are each
/// counted.
pub struct AuthEngine {
    accounts: Arc<dyn AccountRepository>,
    employees: Arc<dyn EmployeeRepository>,
    passwords: Arc<dyn PasswordStore>,
    policy: AuthPolicy,
    locks: KeyedLocks<String>,
    decoy: Option<HashedPassword>,
}

impl AuthEngine {
    /// Creates an engine over the given repositories and password store.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        employees: Arc<dyn EmployeeRepository>,
        passwords: Arc<dyn PasswordStore>,
        policy: AuthPolicy,
    ) -> Self {
        let decoy = passwords.hash(DECOY_PASSWORD).ok();
        Self {
            accounts,
            employees,
            passwords,
            policy,
            locks: KeyedLocks::new(),
            decoy,
        }
    }

    /// Returns the policy this engine enforces.
    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Logs in with a username, or with the email of the linked employee.
    ///
    /// Unknown identifiers and wrong passwords fail with the same
    /// [`EngineError::InvalidCredentials`]. A locked account fails with
    /// [`EngineError::AccountLocked`] before the password is checked; it
    /// renders the same text as `InvalidCredentials`. An
    /// `employee` account whose employee record is archived fails with
    /// `InvalidCredentials` even when the password is right.
    #[instrument(skip(self, password))]
    pub fn login(&self, identifier: &str, password: &str) -> EngineResult<SessionInfo> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            info!("login rejected: missing username or password");
            return Err(EngineError::InvalidInput {
                message: "Username and password required".to_string(),
            });
        }

        let Some(username) = self.resolve_username(identifier)? else {
            self.burn_decoy(password);
            info!("login failed: unknown identifier");
            return Err(EngineError::InvalidCredentials);
        };

        self.locks
            .with_lock(username.clone(), || self.attempt(&username, password))
    }

    /// Clears the failed-attempt counter and lock flag of an account.
    ///
    /// This is the administrative unlock; nothing on the login path calls it.
    #[instrument(skip(self))]
    pub fn unlock_account(&self, username: &str) -> EngineResult<()> {
        self.locks.with_lock(username.to_string(), || {
            let account = self
                .accounts
                .find_account_by_username(username)?
                .ok_or_else(|| EngineError::not_found("Account", username))?;
            self.accounts
                .update_login_state(account.id, account.login_state().unlocked())?;
            info!(account_id = account.id, "account unlocked");
            Ok(())
        })
    }

    /// Checks username and password shape against this engine's policy.
    pub fn validate_credential_format(&self, username: &str, password: &str) -> EngineResult<()> {
        validate_credential_format(username, password, &self.policy)
    }

    /// Picks the dashboard for a session.
    pub fn resolve_dashboard(&self, session: &SessionInfo) -> Dashboard {
        resolve_dashboard(session)
    }

    fn resolve_username(&self, identifier: &str) -> EngineResult<Option<String>> {
        if let Some(account) = self.accounts.find_account_by_username(identifier)? {
            return Ok(Some(account.username));
        }
        if !identifier.contains('@') {
            return Ok(None);
        }

        let Some(employee) = self.employees.find_employee_by_email(identifier)? else {
            return Ok(None);
        };
        debug!(employee_id = %employee.id, "identifier matched an employee email");
        Ok(self
            .accounts
            .find_account_by_employee(&employee.id)?
            .map(|account| account.username))
    }

    // Runs under the account lock.
    fn attempt(&self, username: &str, password: &str) -> EngineResult<SessionInfo> {
        let Some(account) = self.accounts.find_account_by_username(username)? else {
            return Err(EngineError::InvalidCredentials);
        };

        if account.is_locked {
            warn!(account_id = account.id, "login refused: account is locked");
            return Err(EngineError::AccountLocked);
        }

        if !self
            .passwords
            .verify(password, &account.password_hash, &account.salt)?
        {
            return self.record_failure(&account);
        }

        let employee = match &account.employee_id {
            Some(employee_id) => self.employees.find_employee_by_id(employee_id)?,
            None => None,
        };
        if account.is_employee_role() && employee.as_ref().is_some_and(|e| e.is_archived) {
            info!(account_id = account.id, "login failed: employee is archived");
            return Err(EngineError::InvalidCredentials);
        }

        let now = Utc::now();
        self.accounts
            .update_login_state(account.id, LoginState::succeeded(now))?;

        let session = SessionInfo::open(&account, employee.as_ref(), now);
        info!(
            account_id = account.id,
            dashboard = %session.dashboard(),
            "login succeeded"
        );
        Ok(session)
    }

    fn record_failure(&self, account: &Account) -> EngineResult<SessionInfo> {
        let state = account
            .login_state()
            .failed(self.policy.max_failed_attempts);
        self.accounts.update_login_state(account.id, state)?;

        if state.is_locked {
            warn!(
                account_id = account.id,
                failed_attempts = state.failed_attempts,
                "account locked after repeated failed logins"
            );
        } else {
            info!(
                account_id = account.id,
                failed_attempts = state.failed_attempts,
                "login failed: wrong password"
            );
        }
        Err(EngineError::InvalidCredentials)
    }

    // Spends one verification on unknown identifiers so their timing
    // matches a wrong password.
    fn burn_decoy(&self, password: &str) {
        if let Some(decoy) = &self.decoy {
            let _ = self.passwords.verify(password, &decoy.hash, &decoy.salt);
        }
    }
}
