use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Configuration for the connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(30),
            sqlx_logging: false,
        }
    }

    /// A private in-memory SQLite database.
    ///
    /// The pool is pinned to one long-lived connection because every SQLite
    /// memory connection opens its own empty database.
    pub fn sqlite_memory() -> Self {
        Self {
            max_connections: 1,
            min_connections: 1,
            idle_timeout: Duration::from_secs(3600),
            ..Self::new("sqlite::memory:")
        }
    }

    /// Backend name without credentials, safe to log.
    pub fn backend(&self) -> &str {
        self.url.split(':').next().unwrap_or("unknown")
    }
}

/// Open the bounded connection pool.
///
/// Callers queue on the pool when all connections are busy.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    tracing::info!(backend = config.backend(), "Initializing database connection pool...");

    let opts = ConnectOptions::new(&config.url)
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(config.sqlx_logging)
        .to_owned();

    let db = Database::connect(opts).await?;
    tracing::info!(
        "Database connected (pool: {}..={})",
        config.min_connections,
        config.max_connections
    );

    Ok(db)
}
