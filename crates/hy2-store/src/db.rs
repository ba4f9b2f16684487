//! SQLite pool construction and schema bootstrap.

use std::time::Duration;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use hy2_core::Error;

use crate::schema;

/// Handle to the panel database.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open a pooled connection to `url` (e.g. `sqlite:panel.db`).
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(Error::store)?;
        Ok(Self { pool })
    }

    /// In-memory database on a single connection, so every query sees the
    /// same `:memory:` instance. Used by tests.
    pub async fn connect_in_memory() -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(Error::store)?;
        Ok(Self { pool })
    }

    /// Create tables and indexes and seed the default settings rows.
    /// Idempotent; runs on every startup.
    pub async fn init_schema(&self) -> Result<(), Error> {
        for statement in schema::INIT_STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(Error::store)?;
        }
        info!("database schema initialized");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
