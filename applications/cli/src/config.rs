//! CLI configuration

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use soundkit_playback::EngineConfig;
use soundkit_transfer::TransferConfig;
use std::path::{Path, PathBuf};

/// Environment variable prefix (`SOUNDKIT_DATABASE_URL`, `SOUNDKIT_ENGINE__VOLUME`)
pub const ENV_PREFIX: &str = "SOUNDKIT";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "soundkit.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub transfer: TransferConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            engine: EngineConfig::default(),
            transfer: TransferConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `soundkit.toml` is read if
    /// present. `SOUNDKIT_*` variables override file values, with `__`
    /// separating nested keys.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    /// Load configuration with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        let config = settings
            .add_source(env)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(CliError::Config("database_url must not be empty".to_string()));
        }

        if !(0.0..=1.0).contains(&self.engine.volume) {
            return Err(CliError::Config(format!(
                "engine.volume must be between 0.0 and 1.0, got {}",
                self.engine.volume
            )));
        }

        if self.engine.download_dir.as_os_str().is_empty() {
            return Err(CliError::Config(
                "engine.download_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Filesystem path of the `SQLite` database, if it lives in a file
    pub fn database_path(&self) -> Option<PathBuf> {
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or_default();

        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn default_database_url() -> String {
    "sqlite://./data/soundkit.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path() {
        let mut config = CliConfig::default();
        assert_eq!(config.database_path(), Some(PathBuf::from("./data/soundkit.db")));

        config.database_url = "sqlite:library.db?mode=rwc".to_string();
        assert_eq!(config.database_path(), Some(PathBuf::from("library.db")));

        config.database_url = "sqlite::memory:".to_string();
        assert_eq!(config.database_path(), None);
    }

    #[test]
    fn test_validate_rejects_bad_volume() {
        let mut config = CliConfig::default();
        config.engine.volume = 1.5;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_database_url() {
        let config = CliConfig {
            database_url: "  ".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
