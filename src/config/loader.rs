//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the policy
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AuthPolicy, PayrollPolicy, PolicyConfig};

/// The policy file name expected inside a configuration directory.
pub const POLICY_FILE: &str = "policy.yaml";

/// Loads and provides access to the policy configuration.
///
/// # Directory Structure
///
/// ```text
/// config/payease/
/// └── policy.yaml   # payroll and auth policy
/// ```
///
/// # Example
///
/// ```no_run
/// use payease_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payease")?;
/// println!("Working days: {}", loader.payroll().working_days_per_month);
/// # Ok::<(), payease_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `policy.yaml` is missing, is not valid YAML, or
    /// holds values the engines cannot work with (e.g. zero working days).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let policy_path = path.as_ref().join(POLICY_FILE);
        let path_str = policy_path.display().to_string();

        let content = fs::read_to_string(&policy_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml(&content, &path_str)
    }

    /// Parses configuration from YAML text; `origin` names the source in errors.
    pub fn from_yaml(content: &str, origin: &str) -> EngineResult<Self> {
        let config: PolicyConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        config
            .check()
            .map_err(|message| EngineError::ConfigParseError {
                path: origin.to_string(),
                message,
            })?;

        tracing::debug!(origin, "Loaded policy configuration");
        Ok(Self { config })
    }

    /// Returns the underlying policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the payroll policy section.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.config.payroll
    }

    /// Returns the auth policy section.
    pub fn auth(&self) -> &AuthPolicy {
        &self.config.auth
    }
}
