//! `SQLite` connection pool and configuration.
//!
//! The machine database is produced offline and served read-only. The
//! pool opens the file with `SQLITE_OPEN_READONLY` so a misbehaving query
//! can never modify it.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! to avoid requiring a live database at build time. All queries are
//! parameterized to prevent SQL injection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::DbError;
use crate::listing_store::ListingStore;
use crate::machine_store::MachineStore;
use crate::sourcefile_store::SourceFileStore;

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Default connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Time to wait for a free connection.
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Create a new configuration for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Connection pool handle to the machine database.
///
/// Cheap to clone; every clone shares the same underlying pool. Each
/// query acquires a connection for its own duration only.
#[derive(Clone, Debug)]
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Open the database file described by `config` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the file does not exist, or
    /// [`DbError::Sqlite`] if it cannot be opened.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        if !config.path.is_file() {
            return Err(DbError::Config(format!(
                "database file not found: {}",
                config.path.display()
            )));
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Opened machine database"
        );

        Ok(Self { pool })
    }

    /// Open the database file at `path` with default pool settings.
    ///
    /// Convenience wrapper around [`DatabasePool::connect`] with
    /// [`DatabaseConfig::new`].
    pub async fn open(path: &Path) -> Result<Self, DbError> {
        Self::connect(&DatabaseConfig::new(path)).await
    }

    /// Create an empty in-memory database with the schema applied.
    ///
    /// The pool is limited to a single long-lived connection because every
    /// `SQLite` in-memory connection sees its own private database.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        let connect_options: SqliteConnectOptions = "sqlite::memory:"
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("invalid in-memory URL: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(connect_options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Apply all pending migrations from the `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Database migrations completed");
        Ok(())
    }

    /// Machine detail and device reference queries.
    pub const fn machines(&self) -> MachineStore<'_> {
        MachineStore::new(&self.pool)
    }

    /// Source file lookup and listing queries.
    pub const fn sourcefiles(&self) -> SourceFileStore<'_> {
        SourceFileStore::new(&self.pool)
    }

    /// Pattern queries backing the command-line listings.
    pub const fn listings(&self) -> ListingStore<'_> {
        ListingStore::new(&self.pool)
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Machine database closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = DatabaseConfig::new("mame.sqlite3")
            .with_max_connections(2)
            .with_connect_timeout(Duration::from_secs(1));
        assert_eq!(config.path, PathBuf::from("mame.sqlite3"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let result = DatabasePool::open(Path::new("/nonexistent/minimaws.sqlite3")).await;
        assert!(matches!(result, Err(DbError::Config(_))));
    }
}
