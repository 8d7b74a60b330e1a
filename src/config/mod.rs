//! Policy configuration for the PayEase engine.
//!
//! This module provides functionality to load the payroll and authentication
//! policy from a YAML file. The engines receive the policy at construction;
//! there is no global configuration state.
//!
//! # Example
//!
//! ```no_run
//! use payease_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/payease").unwrap();
//! println!("Lockout after {} attempts", loader.auth().max_failed_attempts);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, POLICY_FILE};
pub use types::{
    AuthPolicy, DEFAULT_MAX_FAILED_ATTEMPTS, DEFAULT_MAX_PRESENT_DAYS, DEFAULT_MIN_PASSWORD_LENGTH,
    DEFAULT_MIN_USERNAME_LENGTH, DEFAULT_MIN_YEAR, DEFAULT_WORKING_DAYS_PER_MONTH, PayrollPolicy,
    PolicyConfig,
};
