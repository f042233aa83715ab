//! Configuration validation module.
//!
//! Validation runs at load time so a bad setting fails startup instead of
//! the first request that touches it.

use crate::AppConfig;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Neither a database URL nor a host is configured.
    MissingDatabaseHost,
    /// Storage is enabled without a bucket.
    MissingBucket,
    /// Timeout or TTL value must be positive.
    NonPositiveValue { name: String },
    /// Cron expression does not parse.
    InvalidCron { expression: String, message: String },
    /// Password hash cost is invalid.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Log format is invalid.
    InvalidLogFormat { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {name}: {value} (must be 1-65535)")
            }
            Self::InvalidPoolSize { min, max } => {
                write!(f, "Invalid pool size: min ({min}) cannot be greater than max ({max})")
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {value} exceeds maximum allowed ({maximum})")
            }
            Self::InvalidUrl { url_type, message } => write!(f, "Invalid {url_type} URL: {message}"),
            Self::MissingDatabaseHost => write!(f, "Database URL or host is required"),
            Self::MissingBucket => write!(f, "Storage bucket is required when storage is enabled"),
            Self::NonPositiveValue { name } => write!(f, "'{name}' must be positive"),
            Self::InvalidCron { expression, message } => {
                write!(f, "Invalid cron expression '{expression}': {message}")
            }
            Self::InvalidHashCost { value, minimum, maximum } => write!(
                f,
                "Invalid password hash cost: {value} (must be between {minimum} and {maximum})"
            ),
            Self::InvalidLogLevel { value } => write!(
                f,
                "Invalid log level: '{value}' (valid: trace, debug, info, warn, error)"
            ),
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{value}' (valid: pretty, json)")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Collects every validation error found in one pass.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn require_positive(&mut self, name: &str, value: u64) {
        if value == 0 {
            self.add_error(ConfigValidationError::NonPositiveValue { name: name.to_string() });
        }
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Argon2 memory cost bounds in MiB.
    const MIN_HASH_COST: u32 = 1;
    const MAX_HASH_COST: u32 = 1024;
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
    const VALID_LOG_FORMATS: &'static [&'static str] = &["pretty", "json"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(&config.server, &mut result);
        Self::validate_database(&config.database, &mut result);
        Self::validate_redis(&config.redis, &mut result);
        Self::validate_storage(&config.storage, &mut result);
        Self::validate_timings(config, &mut result);
        Self::validate_jobs(&config.jobs, &mut result);
        Self::validate_security(&config.security, &mut result);
        Self::validate_observability(&config.observability, &mut result);

        result.into_result()
    }

    fn validate_server(config: &crate::ServerConfig, result: &mut ValidationResult) {
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        result.require_positive("server.request_timeout_secs", config.request_timeout_secs);
        result.require_positive("server.max_avatar_bytes", config.max_avatar_bytes as u64);
    }

    fn validate_database(config: &crate::DatabaseConfig, result: &mut ValidationResult) {
        match config.url() {
            Some(url) if !url.starts_with("postgres://") && !url.starts_with("postgresql://") => {
                result.add_error(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: "URL must start with postgres:// or postgresql://".to_string(),
                });
            }
            Some(_) => {}
            None if config.host.trim().is_empty() => {
                result.add_error(ConfigValidationError::MissingDatabaseHost);
            }
            None => {
                if config.port == 0 {
                    result.add_error(ConfigValidationError::InvalidPort {
                        name: "database.port".to_string(),
                        value: 0,
                    });
                }
            }
        }

        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        result.require_positive("database.connect_timeout_secs", config.connect_timeout_secs);
        result.require_positive("database.idle_timeout_secs", config.idle_timeout_secs);
    }

    fn validate_redis(config: &crate::RedisConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        let url = config.connection_url();
        if !url.starts_with("redis://") && !url.starts_with("rediss://") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }

        if config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_storage(config: &crate::StorageConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        if config.bucket.trim().is_empty() {
            result.add_error(ConfigValidationError::MissingBucket);
        }
        if let Err(e) = Url::parse(&config.endpoint) {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "storage endpoint".to_string(),
                message: e.to_string(),
            });
        }
    }

    fn validate_timings(config: &AppConfig, result: &mut ValidationResult) {
        result.require_positive("cache.user_ttl_secs", config.cache.user_ttl_secs);
        result.require_positive("service.store_timeout_ms", config.service.store_timeout_ms);
        result.require_positive("service.cache_timeout_ms", config.service.cache_timeout_ms);
        result.require_positive("service.storage_timeout_ms", config.service.storage_timeout_ms);
    }

    fn validate_jobs(config: &crate::JobsConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        if let Err(e) = cron::Schedule::from_str(&config.cache_refresh_cron) {
            result.add_error(ConfigValidationError::InvalidCron {
                expression: config.cache_refresh_cron.clone(),
                message: e.to_string(),
            });
        }
        if config.run_lock_enabled {
            result.require_positive("jobs.run_lock_ttl_secs", config.run_lock_ttl_secs);
        }
    }

    fn validate_security(config: &crate::SecurityConfig, result: &mut ValidationResult) {
        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&config.password_hash_cost) {
            result.add_error(ConfigValidationError::InvalidHashCost {
                value: config.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }
    }

    fn validate_observability(config: &crate::ObservabilityConfig, result: &mut ValidationResult) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        let format = config.log_format.to_lowercase();
        if !Self::VALID_LOG_FORMATS.contains(&format.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }
    }
}
