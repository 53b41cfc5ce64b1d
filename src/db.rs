use crate::config::AppConfig;
use crate::errors::ServiceError;
use migrations::Migrator;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            url: config.database_url.clone(),
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            connect_timeout: Duration::from_secs(config.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(config.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(config.db_acquire_timeout_secs),
        }
    }
}

/// Establishes a connection pool to the database
pub async fn establish_connection(database_url: &str) -> Result<DbPool, ServiceError> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool to the database with custom configuration
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());

    // An in-memory SQLite database lives and dies with a single connection.
    let max_connections = if config.url.contains(":memory:") {
        1
    } else {
        config.max_connections
    };

    opt.max_connections(max_connections)
        .min_connections(config.min_connections.min(max_connections))
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    info!(max_connections, "Connecting to database");

    let db_pool = Database::connect(opt).await.map_err(|e| {
        error!(error = %e, "Failed to connect to database");
        ServiceError::DatabaseError(e)
    })?;

    if db_pool.get_database_backend() == sea_orm::DbBackend::Sqlite {
        db_pool
            .execute(Statement::from_string(
                sea_orm::DbBackend::Sqlite,
                "PRAGMA foreign_keys = ON".to_string(),
            ))
            .await?;
    }

    Ok(db_pool)
}

/// Applies every pending migration from the `migrations` crate.
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    info!("Running database migrations");
    Migrator::up(db, None).await.map_err(|e| {
        error!(error = %e, "Database migration failed");
        e
    })?;
    info!("Database migrations complete");
    Ok(())
}

/// Cheap round trip used by the health endpoint.
pub async fn ping(db: &DbPool) -> bool {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "SELECT 1".to_string(),
    ))
    .await
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_and_migrates_in_memory_sqlite() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        assert!(ping(&db).await);
    }

    #[test]
    fn db_config_from_app_config() {
        let mut app = AppConfig::new(
            "postgres://localhost/glazier".into(),
            "a_test_secret_that_is_long_enough_for_hs256_signing".into(),
            "127.0.0.1".into(),
            8080,
        );
        app.db_max_connections = 25;
        let cfg = DbConfig::from(&app);
        assert_eq!(cfg.max_connections, 25);
        assert_eq!(cfg.url, "postgres://localhost/glazier");
    }
}
