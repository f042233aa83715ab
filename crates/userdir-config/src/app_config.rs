//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Redis configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Avatar blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cache entry configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Per-call deadlines used by the directory service.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Background job configuration.
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Password hashing configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "userdir".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Maximum decoded avatar size in bytes.
    pub max_avatar_bytes: usize,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_body_size: 10 * 1024 * 1024,
            max_avatar_bytes: 5 * 1024 * 1024,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Returns the bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Record store configuration.
///
/// Either `url` is set, or the connection is assembled from the discrete
/// fields (which is what the legacy `DB_*` variables populate).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the discrete fields.
    pub url: Option<String>,
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub name: String,
    /// libpq-style SSL mode.
    pub sslmode: String,
    /// Minimum connection pool size.
    pub min_connections: u32,
    /// Maximum connection pool size.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds.
    pub idle_timeout_secs: u64,
    /// Total time spent retrying the initial connection.
    pub connect_retry_secs: u64,
    /// Run embedded migrations at startup.
    pub run_migrations: bool,
    /// Enable SQL query logging.
    pub log_queries: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "userdir".to_string(),
            sslmode: "require".to_string(),
            min_connections: 2,
            max_connections: 20,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            connect_retry_secs: 60,
            run_migrations: true,
            log_queries: false,
        }
    }
}

impl DatabaseConfig {
    /// Returns the configured URL, ignoring blank values.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Key/value connection string with the password masked, for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.url().is_some() {
            return "url=<configured>".to_string();
        }
        format!(
            "host={} user={} password=*** dbname={} port={} sslmode={}",
            self.host, self.user, self.name, self.port, self.sslmode
        )
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the idle timeout as a Duration.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Returns the connect retry window as a Duration.
    #[must_use]
    pub const fn connect_retry(&self) -> Duration {
        Duration::from_secs(self.connect_retry_secs)
    }
}

/// Redis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL.
    pub url: String,
    /// Bare host (optionally `host:port`). Overrides `url` when set.
    pub host: Option<String>,
    /// Connection pool size.
    pub pool_size: u32,
    /// Enable Redis (can be disabled for local development).
    pub enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            host: None,
            pool_size: 10,
            enabled: true,
        }
    }
}

impl RedisConfig {
    /// Returns the effective connection URL.
    #[must_use]
    pub fn connection_url(&self) -> String {
        match self.host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => format!("redis://{host}"),
            _ => self.url.clone(),
        }
    }
}

/// Avatar blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Enable remote blob storage. When disabled an in-process store is used.
    pub enabled: bool,
    /// Object store endpoint, e.g. `https://storage.example.com`.
    pub endpoint: String,
    /// Bucket that receives avatar objects.
    pub bucket: String,
    /// Static bearer token sent with each upload.
    pub access_token: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:9000".to_string(),
            bucket: "userdir-avatars".to_string(),
            access_token: None,
        }
    }
}

/// Cache entry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a user snapshot in seconds.
    pub user_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { user_ttl_secs: 1800 }
    }
}

impl CacheConfig {
    /// Returns the user snapshot TTL as a Duration.
    #[must_use]
    pub const fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_ttl_secs)
    }
}

/// Per-call deadlines used by the directory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub store_timeout_ms: u64,
    pub cache_timeout_ms: u64,
    pub storage_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5000,
            cache_timeout_ms: 500,
            storage_timeout_ms: 10_000,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    #[must_use]
    pub const fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    #[must_use]
    pub const fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

/// Background job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Run the in-process scheduler.
    pub enabled: bool,
    /// Cron expression (with seconds) for the cache refresh.
    pub cache_refresh_cron: String,
    /// Guard each refresh run with a Redis lock so one replica runs it.
    pub run_lock_enabled: bool,
    /// Lifetime of the run lock in seconds.
    pub run_lock_ttl_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_refresh_cron: "0 */30 * * * *".to_string(),
            run_lock_enabled: true,
            run_lock_ttl_secs: 600,
        }
    }
}

impl JobsConfig {
    /// Returns the run lock TTL as a Duration.
    #[must_use]
    pub const fn run_lock_ttl(&self) -> Duration {
        Duration::from_secs(self.run_lock_ttl_secs)
    }
}

/// Password hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in MiB.
    pub password_hash_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            password_hash_cost: 19,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
    /// Enable metrics.
    pub metrics_enabled: bool,
    /// Metrics endpoint path.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_path: "/metrics".to_string(),
        }
    }
}
