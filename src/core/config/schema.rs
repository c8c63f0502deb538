//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$LFSGATE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/lfsgate/config.toml`
//! 3. `~/.lfsgate/config.toml`
//!
//! # Repo Config
//!
//! Located at `.git/lfsgate/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the registry URL must be
//! http(s), concurrency must be at least one).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// trace = false
///
/// [locks]
/// token_env = "MY_LFS_TOKEN"
///
/// [transfer]
/// concurrency = 4
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Print debug diagnostics for every hook run
    pub trace: Option<bool>,

    /// Lock registry settings
    pub locks: Option<LocksConfig>,

    /// Upload settings
    pub transfer: Option<TransferConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(locks) = &self.locks {
            locks.validate()?;
        }
        if let Some(transfer) = &self.transfer {
            transfer.validate()?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// [locks]
/// url = "https://lfs.example.com/team/repo.git/info/lfs"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Lock registry settings
    pub locks: Option<LocksConfig>,

    /// Upload settings
    pub transfer: Option<TransferConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(locks) = &self.locks {
            locks.validate()?;
        }
        if let Some(transfer) = &self.transfer {
            transfer.validate()?;
        }
        Ok(())
    }
}

/// Lock registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LocksConfig {
    /// Registry endpoint; `/locks` is appended
    pub url: Option<String>,

    /// Environment variable holding a bearer token
    pub token_env: Option<String>,
}

impl LocksConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "locks.url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }
        if let Some(var) = &self.token_env {
            if var.is_empty() || var.contains('=') {
                return Err(ConfigError::InvalidValue(format!(
                    "locks.token_env is not a valid variable name: '{}'",
                    var
                )));
            }
        }
        Ok(())
    }
}

/// Upload settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TransferConfig {
    /// Maximum number of concurrent upload processes
    pub concurrency: Option<usize>,

    /// Program invoked as `<program> lfs push ...`
    pub program: Option<String>,
}

impl TransferConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::InvalidValue(
                "transfer.concurrency must be at least 1".into(),
            ));
        }
        if let Some(program) = &self.program {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "transfer.program cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
