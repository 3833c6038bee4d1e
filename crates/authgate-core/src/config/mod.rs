//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `AUTHGATE__`-prefixed environment variables.
//! Every field carries a serde default, so an empty source set yields the
//! reference configuration.

pub mod app;
pub mod auth;
pub mod directory;
pub mod dispatch;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, RebindFailurePolicy};
pub use self::directory::{AccountConfig, DirectoryConfig};
pub use self::dispatch::DispatchConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "AUTHGATE";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Admission and shutdown settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Login policy settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// The fixed account directory.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml`, and environment
    /// variables such as `AUTHGATE__DISPATCH__MAX_STREAMS`. Missing files are
    /// skipped.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Load configuration from a single TOML file plus environment overrides.
    ///
    /// Unlike [`AppConfig::load`], the file is required.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from(std::path::Path::new(path)).required(true))
            .add_source(env_source())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to read '{path}': {e}")))?;

        Self::finish(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.dispatch.max_streams == 0 {
            return Err(AppError::configuration(
                "dispatch.max_streams must be at least 1",
            ));
        }
        if self.auth.lockout_threshold == 0 {
            return Err(AppError::configuration(
                "auth.lockout_threshold must be at least 1",
            ));
        }
        if self.directory.accounts.is_empty() {
            return Err(AppError::configuration(
                "directory.accounts must contain at least one account",
            ));
        }
        if let Some(blank) = self
            .directory
            .accounts
            .iter()
            .position(|a| a.name.trim().is_empty())
        {
            return Err(AppError::configuration(format!(
                "directory.accounts[{blank}] has an empty name"
            )));
        }
        Ok(())
    }

    fn finish(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_match_reference_configuration() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.dispatch.max_streams, 50);
        assert_eq!(config.dispatch.timeout_seconds, 30 * 60);
        assert_eq!(config.auth.lockout_threshold, 3);
        assert_eq!(
            config.auth.rebind_failure_policy,
            RebindFailurePolicy::KeepPrior
        );
        assert_eq!(config.directory.accounts.len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides_selected_fields() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(
            file,
            r#"
[dispatch]
max_streams = 2

[auth]
rebind_failure_policy = "drop_tracking"

[[directory.accounts]]
name = "dev_user"
secret = "d3v3l0p3r"
"#
        )
        .expect("write");

        let path = file.path().to_str().expect("utf8 path");
        let config = AppConfig::from_file(path).expect("load");

        assert_eq!(config.dispatch.max_streams, 2);
        assert_eq!(config.dispatch.timeout_seconds, 1800);
        assert_eq!(
            config.auth.rebind_failure_policy,
            RebindFailurePolicy::DropTracking
        );
        assert_eq!(config.directory.accounts.len(), 1);
        assert_eq!(config.directory.accounts[0].name, "dev_user");
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = AppConfig::default();
        config.dispatch.max_streams = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_directory() {
        let mut config = AppConfig::default();
        config.directory.accounts.clear();
        assert!(config.validate().is_err());
    }
}
