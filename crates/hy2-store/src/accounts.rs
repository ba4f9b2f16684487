//! SQLite-backed account persistence.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use hy2_core::{now_millis, Account, AccountStore, Error, Role};

use crate::db::Db;
use crate::filter::Filter;

const COLUMNS: &str = "id, username, pass, con_pass, quota, download, upload, \
     expire_time, kick_until_time, device_no, role, deleted, login_at, con_at, \
     create_time, update_time";

/// Production [`AccountStore`] over the `account` table.
#[derive(Debug, Clone)]
pub struct SqlAccountStore {
    pool: SqlitePool,
}

impl SqlAccountStore {
    pub fn new(db: &Db) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    async fn find_one(&self, filter: Filter) -> Result<Option<Account>, Error> {
        let sql = format!("SELECT {COLUMNS} FROM account WHERE {}", filter.sql());
        let row = filter
            .bind_to(sqlx::query(&sql))
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::store)?;
        row.map(parse_row).transpose()
    }

    async fn find_all(&self, filter: Filter) -> Result<Vec<Account>, Error> {
        let sql = format!("SELECT {COLUMNS} FROM account WHERE {}", filter.sql());
        let rows = filter
            .bind_to(sqlx::query(&sql))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store)?;
        rows.into_iter().map(parse_row).collect()
    }
}

#[async_trait]
impl AccountStore for SqlAccountStore {
    async fn find_eligible(
        &self,
        con_pass: &str,
        now_ms: i64,
    ) -> Result<Option<Account>, Error> {
        // The whole eligibility invariant in one row read.
        let filter = Filter::new()
            .eq("con_pass", con_pass)
            .eq("deleted", 0)
            .or_group(Filter::new().lt("quota", 0).gt_expr("quota", "download + upload"))
            .gt("expire_time", now_ms)
            .lt("kick_until_time", now_ms);
        self.find_one(filter).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error> {
        self.find_one(Filter::new().eq("id", id).eq("deleted", 0))
            .await
    }

    async fn find_by_con_pass(&self, con_pass: &str) -> Result<Option<Account>, Error> {
        self.find_one(Filter::new().eq("con_pass", con_pass).eq("deleted", 0))
            .await
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>, Error> {
        self.find_all(Filter::new().in_ids("id", ids).eq("deleted", 0))
            .await
    }

    async fn set_kick_until(&self, ids: &[i64], until_ms: i64) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let filter = Filter::new().in_ids("id", ids);
        let sql = format!(
            "UPDATE account SET kick_until_time = ?, update_time = ? WHERE {}",
            filter.sql()
        );
        let query = sqlx::query(&sql).bind(until_ms).bind(now_millis());
        filter
            .bind_to(query)
            .execute(&self.pool)
            .await
            .map_err(Error::store)?;
        Ok(())
    }
}

fn parse_row(row: SqliteRow) -> Result<Account, Error> {
    let role: String = row.try_get("role").map_err(Error::store)?;
    Ok(Account {
        id: row.try_get("id").map_err(Error::store)?,
        username: row.try_get("username").map_err(Error::store)?,
        pass: row.try_get("pass").map_err(Error::store)?,
        con_pass: row.try_get("con_pass").map_err(Error::store)?,
        quota: row.try_get("quota").map_err(Error::store)?,
        download: row.try_get("download").map_err(Error::store)?,
        upload: row.try_get("upload").map_err(Error::store)?,
        expire_time: row.try_get("expire_time").map_err(Error::store)?,
        kick_until_time: row.try_get("kick_until_time").map_err(Error::store)?,
        device_no: row.try_get("device_no").map_err(Error::store)?,
        role: Role::from_db(&role),
        deleted: row.try_get("deleted").map_err(Error::store)?,
        login_at: row.try_get("login_at").map_err(Error::store)?,
        con_at: row.try_get("con_at").map_err(Error::store)?,
        create_time: row.try_get("create_time").map_err(Error::store)?,
        update_time: row.try_get("update_time").map_err(Error::store)?,
    })
}
