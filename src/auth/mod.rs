//! Authentication: password hashing, credential checks and login.
//!
//! [`AuthEngine`] is the entry point. It depends on a [`PasswordStore`] for
//! hashing and on the account and employee repositories for state.

mod credentials;
mod engine;
mod password;

pub use credentials::{resolve_dashboard, validate_credential_format};
pub use engine::AuthEngine;
pub use password::{Argon2PasswordStore, HashedPassword, PasswordStore};
