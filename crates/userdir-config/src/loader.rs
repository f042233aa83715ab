//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::path::Path;
use userdir_core::DirectoryError;
use tracing::{debug, info};

/// Environment variable selecting the environment-specific config file.
pub const ENVIRONMENT_VAR: &str = "USERDIR_ENVIRONMENT";

/// Bare environment variables honoured for compatibility with existing
/// deployments, mapped to their configuration keys.
pub const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("REDIS_HOST", "redis.host"),
    ("BUCKET_NAME", "storage.bucket"),
];

/// Configuration loader; the configuration is read once at startup.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `USERDIR__` prefix
    /// 5. Legacy bare variables (`DB_HOST`, `REDIS_HOST`, ...)
    pub fn new(config_dir: impl AsRef<str>) -> Result<Self, DirectoryError> {
        let config = Self::load_config(config_dir.as_ref())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, DirectoryError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, DirectoryError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Self::file_sources(config_dir, &environment);

        builder = builder.add_source(
            Environment::with_prefix("USERDIR")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENV_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            if value.is_some() {
                debug!("Applying legacy override {} -> {}", var, key);
            }
            builder = builder
                .set_override_option(*key, value)
                .map_err(config_error_to_directory_error)?;
        }

        builder = builder
            .set_override("app.environment", environment)
            .map_err(config_error_to_directory_error)?;

        Self::finish(builder)
    }

    fn file_sources(config_dir: &str, environment: &str) -> ConfigBuilder<DefaultState> {
        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = format!("{config_dir}/{name}.toml");
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, DirectoryError> {
        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_directory_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            DirectoryError::Configuration(message)
        })?;

        Ok(app_config)
    }
}

fn config_error_to_directory_error(err: ConfigError) -> DirectoryError {
    DirectoryError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load_files(dir: &TempDir, environment: &str) -> Result<AppConfig, DirectoryError> {
        let path = dir.path().to_string_lossy().to_string();
        ConfigLoader::finish(ConfigLoader::file_sources(&path, environment))
    }

    #[test]
    fn test_empty_directory_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_files(&dir, "development").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.user_ttl_secs, 1800);
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\n\n[storage]\nbucket = \"base\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("staging.toml"), "[storage]\nbucket = \"staging-avatars\"\n").unwrap();

        let config = load_files(&dir, "staging").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.bucket, "staging-avatars");
    }

    #[test]
    fn test_local_file_wins_over_environment_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("development.toml"), "[cache]\nuser_ttl_secs = 60\n").unwrap();
        fs::write(dir.path().join("local.toml"), "[cache]\nuser_ttl_secs = 90\n").unwrap();

        let config = load_files(&dir, "development").unwrap();
        assert_eq!(config.cache.user_ttl_secs, 90);
    }

    #[test]
    fn test_invalid_file_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), "[jobs]\ncache_refresh_cron = \"nope\"\n").unwrap();

        let err = load_files(&dir, "development").unwrap_err();
        assert!(matches!(err, DirectoryError::Configuration(msg) if msg.contains("cron")));
    }

    #[test]
    fn test_legacy_overrides_cover_expected_variables() {
        let vars: Vec<&str> = LEGACY_ENV_OVERRIDES.iter().map(|(v, _)| *v).collect();
        assert_eq!(
            vars,
            vec!["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_NAME", "REDIS_HOST", "BUCKET_NAME"]
        );
    }

    #[test]
    fn test_missing_directory_loads_defaults() {
        let loader = ConfigLoader::new("./does-not-exist").unwrap();
        assert_eq!(loader.get().server.port, 8080);
    }
}
