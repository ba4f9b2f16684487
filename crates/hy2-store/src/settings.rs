//! SQLite-backed settings persistence.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use hy2_core::{Error, Setting, SettingsStore};

use crate::db::Db;

/// Production [`SettingsStore`] over the `config` table.
#[derive(Debug, Clone)]
pub struct SqlSettingsStore {
    pool: SqlitePool,
}

impl SqlSettingsStore {
    pub fn new(db: &Db) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

#[async_trait]
impl SettingsStore for SqlSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Setting>, Error> {
        let row = sqlx::query("SELECT key, value, remark FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?;
        row.map(|row| {
            Ok(Setting {
                key: row.try_get("key").map_err(Error::store)?,
                value: row.try_get("value").map_err(Error::store)?,
                remark: row.try_get("remark").map_err(Error::store)?,
            })
        })
        .transpose()
    }
}
