//! Database connection pool management.

use async_trait::async_trait;
use shaku::Component;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use tracing::{info, warn};
use userdir_config::DatabaseConfig;
use userdir_core::{DirectoryError, DirectoryResult, HealthCheck, HealthStatus, Interface};
use userdir_resilience::RetryPolicy;

/// Interface for database pool operations.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns a reference to the underlying PostgreSQL pool.
    fn inner(&self) -> &PgPool;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> DirectoryResult<()>;

    /// Runs database migrations.
    async fn run_migrations(&self) -> DirectoryResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Connects once using the configuration.
    pub async fn new(config: &DatabaseConfig) -> DirectoryResult<Self> {
        info!("Connecting to PostgreSQL ({})", config.describe());

        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect_with(options)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                DirectoryError::Database(format!("Failed to connect: {e}"))
            })?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Connects with exponential backoff, for startup while the database
    /// may still be coming up.
    pub async fn connect(config: &DatabaseConfig) -> DirectoryResult<Self> {
        RetryPolicy::with_max_elapsed(config.connect_retry())
            .execute("database connect", || Self::new(config))
            .await
    }

    /// Creates a `DatabasePool` around an existing pool (for Shaku injection).
    #[must_use]
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &PgPool {
        &self.pool
    }
}

/// Builds connection options from either the URL or the discrete fields.
pub fn connect_options(config: &DatabaseConfig) -> DirectoryResult<PgConnectOptions> {
    let options = if let Some(url) = config.url() {
        PgConnectOptions::from_str(url)
            .map_err(|e| DirectoryError::Configuration(format!("Invalid database URL: {e}")))?
    } else {
        let ssl_mode = PgSslMode::from_str(&config.sslmode)
            .map_err(|e| DirectoryError::Configuration(format!("Invalid sslmode '{}': {e}", config.sslmode)))?;
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(ssl_mode)
    };

    Ok(if config.log_queries {
        options
    } else {
        sqlx::ConnectOptions::disable_statement_logging(options)
    })
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &PgPool {
        &self.pool
    }

    async fn health_check(&self) -> DirectoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DirectoryError::Database(format!("Health check failed: {e}")))?;
        Ok(())
    }

    async fn run_migrations(&self) -> DirectoryResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DirectoryError::Database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match DatabasePoolInterface::health_check(self).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_fields() {
        let config = DatabaseConfig {
            host: "db.internal".to_string(),
            port: 6543,
            user: "svc".to_string(),
            name: "directory".to_string(),
            sslmode: "disable".to_string(),
            ..DatabaseConfig::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "svc");
        assert_eq!(options.get_database(), Some("directory"));
    }

    #[test]
    fn test_connect_options_prefer_url() {
        let config = DatabaseConfig {
            url: Some("postgres://u:p@from-url:5433/other".to_string()),
            host: "ignored".to_string(),
            ..DatabaseConfig::default()
        };

        let options = connect_options(&config).unwrap();
        assert_eq!(options.get_host(), "from-url");
        assert_eq!(options.get_port(), 5433);
    }

    #[test]
    fn test_invalid_sslmode_is_configuration_error() {
        let config = DatabaseConfig {
            sslmode: "sometimes".to_string(),
            ..DatabaseConfig::default()
        };

        assert!(matches!(
            connect_options(&config),
            Err(DirectoryError::Configuration(_))
        ));
    }
}
