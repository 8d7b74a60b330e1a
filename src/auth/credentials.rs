//! Credential format checks and dashboard routing.

use crate::config::AuthPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Dashboard, SessionInfo};

/// Checks the shape of a username and password without touching a store.
///
/// The username is measured after trimming; the password as given.
///
/// # Example
///
/// ```
/// use payease_engine::auth::validate_credential_format;
/// use payease_engine::config::AuthPolicy;
///
/// let policy = AuthPolicy::default();
/// assert!(validate_credential_format("jdoe", "secret1", &policy).is_ok());
/// assert_eq!(
///     validate_credential_format(" jd ", "secret1", &policy).unwrap_err().to_string(),
///     "Username must be at least 3 characters"
/// );
/// ```
pub fn validate_credential_format(
    username: &str,
    password: &str,
    policy: &AuthPolicy,
) -> EngineResult<()> {
    if username.trim().chars().count() < policy.min_username_length {
        return Err(EngineError::validation(
            "username",
            format!(
                "Username must be at least {} characters",
                policy.min_username_length
            ),
        ));
    }
    if password.chars().count() < policy.min_password_length {
        return Err(EngineError::validation(
            "password",
            format!(
                "Password must be at least {} characters",
                policy.min_password_length
            ),
        ));
    }
    Ok(())
}

/// Picks the dashboard for a session from its role.
pub fn resolve_dashboard(session: &SessionInfo) -> Dashboard {
    Dashboard::for_role(&session.role)
}
