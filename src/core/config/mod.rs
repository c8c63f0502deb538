//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! lfsgate has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! The lock registry endpoint additionally falls back to git configuration
//! and the remote URL; that resolution lives in [`crate::git`].
//!
//! # Example
//!
//! ```no_run
//! use lfsgate::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! let config = result.config;
//!
//! println!("Concurrency: {}", config.transfer_concurrency());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LocksConfig, RepoConfig, TransferConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default bearer-token environment variable.
pub const DEFAULT_TOKEN_ENV: &str = "LFSGATE_TOKEN";

/// Default number of concurrent uploads.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Files that were read, in precedence order.
    pub sources: Vec<PathBuf>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically. Repo config overrides
/// global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads repo-specific config from
    /// `<git_dir>/lfsgate/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut sources = Vec::new();

        let global = match Self::global_config_path() {
            Some(path) => {
                let config: GlobalConfig = read_toml(&path)?;
                sources.push(path);
                config
            }
            None => GlobalConfig::default(),
        };

        let repo = match git_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => {
                let config: RepoConfig = read_toml(&path)?;
                sources.push(path);
                Some(config)
            }
            _ => None,
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config { global, repo },
            sources,
        })
    }

    /// Find the global config file, if one exists.
    fn global_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LFSGATE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("lfsgate/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".lfsgate/config.toml"))
            .filter(|path| path.exists())
    }

    /// Path of the repo config file for a git directory.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("lfsgate/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Configured lock registry endpoint, if any.
    pub fn locks_url(&self) -> Option<&str> {
        self.repo
            .as_ref()
            .and_then(|r| r.locks.as_ref())
            .and_then(|l| l.url.as_deref())
            .or_else(|| self.global.locks.as_ref().and_then(|l| l.url.as_deref()))
    }

    /// Environment variable holding the registry bearer token.
    ///
    /// Defaults to `LFSGATE_TOKEN`.
    pub fn token_env(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.locks.as_ref())
            .and_then(|l| l.token_env.as_deref())
            .or_else(|| {
                self.global
                    .locks
                    .as_ref()
                    .and_then(|l| l.token_env.as_deref())
            })
            .unwrap_or(DEFAULT_TOKEN_ENV)
    }

    /// Maximum concurrent uploads.
    ///
    /// Defaults to 8.
    pub fn transfer_concurrency(&self) -> usize {
        self.transfer_setting(|t| t.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY)
    }

    /// Program used for uploads.
    ///
    /// Defaults to `git`.
    pub fn transfer_program(&self) -> String {
        self.transfer_setting(|t| t.program.clone())
            .unwrap_or_else(|| "git".to_string())
    }

    /// Whether debug tracing is enabled by config.
    pub fn trace(&self) -> bool {
        self.global.trace.unwrap_or(false)
    }

    fn transfer_setting<T>(&self, get: impl Fn(&TransferConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|r| r.transfer.as_ref())
            .and_then(&get)
            .or_else(|| self.global.transfer.as_ref().and_then(&get))
    }
}

/// Read and parse a TOML config file.
fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_repo() {
        let config = Config::default();

        assert!(config.locks_url().is_none());
        assert_eq!(config.token_env(), DEFAULT_TOKEN_ENV);
        assert_eq!(config.transfer_concurrency(), DEFAULT_CONCURRENCY);
        assert_eq!(config.transfer_program(), "git");
        assert!(!config.trace());
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("lfsgate");
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("config.toml"),
            r#"
            [locks]
            url = "https://lfs.example.com/repo.git/info/lfs"

            [transfer]
            concurrency = 3
            "#,
        )
        .unwrap();

        let result = Config::load(Some(temp.path())).unwrap();
        let config = result.config;

        assert_eq!(
            config.locks_url(),
            Some("https://lfs.example.com/repo.git/info/lfs")
        );
        assert_eq!(config.transfer_concurrency(), 3);
        assert!(result
            .sources
            .contains(&Config::repo_config_path(temp.path())));
    }

    #[test]
    fn invalid_repo_value_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("lfsgate");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[transfer]\nconcurrency = 0\n").unwrap();

        assert!(Config::load(Some(temp.path())).is_err());
    }

    #[test]
    fn unparseable_repo_config_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("lfsgate");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[locks\n").unwrap();

        let err = Config::load(Some(temp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn precedence_repo_overrides_global() {
        let config = Config {
            global: GlobalConfig {
                locks: Some(LocksConfig {
                    url: Some("https://global.example.com".into()),
                    token_env: Some("GLOBAL_TOKEN".into()),
                }),
                transfer: Some(TransferConfig {
                    concurrency: Some(2),
                    program: Some("git".into()),
                }),
                ..Default::default()
            },
            repo: Some(RepoConfig {
                locks: Some(LocksConfig {
                    url: Some("https://repo.example.com".into()),
                    token_env: None,
                }),
                transfer: Some(TransferConfig {
                    concurrency: None,
                    program: Some("/usr/local/bin/git".into()),
                }),
            }),
        };

        assert_eq!(config.locks_url(), Some("https://repo.example.com"));
        // Falls through to global when repo leaves it unset
        assert_eq!(config.token_env(), "GLOBAL_TOKEN");
        assert_eq!(config.transfer_concurrency(), 2);
        assert_eq!(config.transfer_program(), "/usr/local/bin/git");
    }
}
