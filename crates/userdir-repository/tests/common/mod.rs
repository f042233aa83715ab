//! Common test infrastructure for database integration tests.

use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use userdir_config::DatabaseConfig;
use userdir_repository::{DatabasePool, DatabasePoolInterface, PgUserDaoImpl, UserRepositoryImpl};

/// Test database container wrapper.
///
/// Manages a PostgreSQL testcontainer lifecycle and provides a database pool.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a new test database with a fresh PostgreSQL container.
    ///
    /// Runs migrations automatically after container startup.
    pub async fn new() -> Self {
        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get PostgreSQL port");

        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "postgres".to_string(),
            sslmode: "disable".to_string(),
            min_connections: 1,
            max_connections: 5,
            connect_retry_secs: 30,
            log_queries: true,
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to PostgreSQL");

        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self {
            _container: container,
            pool: Arc::new(pool),
        }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }

    /// Builds the full repository stack over this database.
    pub fn repository(&self) -> UserRepositoryImpl {
        UserRepositoryImpl::new(Arc::new(PgUserDaoImpl::new(self.pool())))
    }
}
