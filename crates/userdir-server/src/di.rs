//! Dependency injection module using Shaku.
//!
//! [`AppModule`] wires the whole directory in one process: the Postgres
//! pool and DAO, the repository, password hashing, the Redis cache, the
//! avatar blob store and the two services on top.

use deadpool_redis::{Pool, PoolConfig, Runtime};
use std::sync::Arc;
use tracing::info;
use userdir_config::{AppConfig, JobsConfig, RedisConfig};
use userdir_core::{module, DirectoryError, DirectoryResult, HealthCheck};
use userdir_jobs::{RedisRunLock, RunLock};
use userdir_repository::{DatabasePool, DatabasePoolParameters, PgUserDaoImpl, UserRepositoryImpl};
use userdir_security::{PasswordHasher, PasswordHasherParameters};
use userdir_service::{
    BlobStore, CacheRefresherComponent, CacheRefresherComponentParameters, HttpBlobStore, InMemoryBlobStore,
    RedisCacheService, RedisCacheServiceParameters, ServiceSettings, UserServiceComponent,
    UserServiceComponentParameters,
};

module! {
    pub AppModule {
        components = [
            DatabasePool,
            PgUserDaoImpl,
            UserRepositoryImpl,
            PasswordHasher,
            RedisCacheService,
            HttpBlobStore,
            UserServiceComponent,
            CacheRefresherComponent,
        ],
        providers = [],
    }
}

/// The built module plus the shared pools the server needs outside it.
pub struct Infrastructure {
    pub module: Arc<AppModule>,
    pub database: Arc<DatabasePool>,
    pub redis_pool: Option<Arc<Pool>>,
}

impl Infrastructure {
    /// Connects to Postgres (with retry) and builds the module.
    pub async fn connect(config: &AppConfig) -> DirectoryResult<Self> {
        let database = DatabasePool::connect(&config.database).await?;
        Self::with_database(config, database)
    }

    /// Builds the module around an already opened database pool.
    pub fn with_database(config: &AppConfig, database: DatabasePool) -> DirectoryResult<Self> {
        let redis_pool = build_redis_pool(&config.redis)?;
        let module = build_app_module(config, &database, redis_pool.clone())?;

        Ok(Self {
            module: Arc::new(module),
            database: Arc::new(database),
            redis_pool,
        })
    }

    /// Checks probed by `/ready`.
    #[must_use]
    pub fn health_checks(&self) -> Vec<Arc<dyn HealthCheck>> {
        let cache = match &self.redis_pool {
            Some(pool) => RedisCacheService::new(pool.clone()),
            None => RedisCacheService::disabled(),
        };
        let database: Arc<dyn HealthCheck> = self.database.clone();
        vec![database, Arc::new(cache)]
    }

    /// Redis run lock for the refresh job, when Redis is up and locking is on.
    #[must_use]
    pub fn run_lock(&self, config: &JobsConfig) -> Option<Arc<dyn RunLock>> {
        if !config.run_lock_enabled {
            return None;
        }
        self.redis_pool
            .as_ref()
            .map(|pool| Arc::new(RedisRunLock::new(Pool::clone(pool), config.run_lock_ttl())) as Arc<dyn RunLock>)
    }
}

/// Creates the Redis pool, or `None` when the cache is disabled.
///
/// Pool creation does not open a connection.
pub fn build_redis_pool(config: &RedisConfig) -> DirectoryResult<Option<Arc<Pool>>> {
    if !config.enabled {
        info!("Redis disabled; user cache runs as a no-op");
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(config.connection_url());
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size as usize));
    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| DirectoryError::Cache(format!("Failed to create Redis pool: {e}")))?;

    Ok(Some(Arc::new(pool)))
}

/// Builds the application module.
pub fn build_app_module(
    config: &AppConfig,
    database: &DatabasePool,
    redis_pool: Option<Arc<Pool>>,
) -> DirectoryResult<AppModule> {
    let password_hasher = PasswordHasher::with_cost(config.security.password_hash_cost);
    let settings = ServiceSettings::from_config(config);

    let mut builder = AppModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: database.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters { pool: redis_pool })
        .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<UserServiceComponent>(UserServiceComponentParameters { settings })
        .with_component_parameters::<CacheRefresherComponent>(CacheRefresherComponentParameters { settings });

    if config.storage.enabled {
        let store = HttpBlobStore::new(&config.storage)?;
        info!(endpoint = %config.storage.endpoint, bucket = %config.storage.bucket, "Avatar storage enabled");
        builder = builder.with_component_parameters::<HttpBlobStore>(store.into());
    } else {
        info!("Avatar storage disabled; uploads are kept in memory");
        builder = builder.with_component_override::<dyn BlobStore>(Box::new(InMemoryBlobStore::default()));
    }

    Ok(builder.build())
}
