//! Collaborator seams: persistence and the engine management API.
//!
//! The enclosing service owns the concrete implementations (`hy2-store`,
//! `hy2-engine`) and injects them as `Arc<dyn ...>`; tests substitute
//! in-memory fakes. Implementations must be thread-safe, as authorization
//! runs concurrently across connections.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::account::Account;
use crate::error::Error;
use crate::setting::Setting;

/// Persisted account records. All lookups exclude soft-deleted rows.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch the single account whose proxy credential matches and whose
    /// eligibility invariant holds at `now_ms`. All four conditions are
    /// evaluated against one atomic read of one row.
    async fn find_eligible(&self, con_pass: &str, now_ms: i64)
        -> Result<Option<Account>, Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error>;

    async fn find_by_con_pass(&self, con_pass: &str) -> Result<Option<Account>, Error>;

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>, Error>;

    /// Bulk-set the kick deadline for every listed account. This is the
    /// durable half of a kick: it must complete before live eviction is
    /// attempted.
    async fn set_kick_until(&self, ids: &[i64], until_ms: i64) -> Result<(), Error>;
}

/// Flat key-value settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` means the key is absent, which callers treat as distinct
    /// from a present-but-empty value.
    async fn get(&self, key: &str) -> Result<Option<Setting>, Error>;
}

/// Management surface of the external proxy engine process.
///
/// The engine's data plane is opaque; this trait covers only the liveness
/// flag and the two authenticated API calls the panel issues.
#[async_trait]
pub trait ProxyEngine: Send + Sync {
    /// Whether a live engine process is currently active.
    fn is_running(&self) -> bool;

    /// Current open-session count per identity label.
    async fn online_users(&self, port: u16, secret: &str)
        -> Result<HashMap<String, i64>, Error>;

    /// Drop any open sessions for the given identity labels.
    async fn kick_users(&self, port: u16, usernames: &[String], secret: &str)
        -> Result<(), Error>;
}

/// Blanket implementation for `Arc<A>`, so a shared handle can be passed
/// directly to functions expecting `impl AccountStore`.
#[async_trait]
impl<A: AccountStore + ?Sized> AccountStore for Arc<A> {
    #[inline]
    async fn find_eligible(
        &self,
        con_pass: &str,
        now_ms: i64,
    ) -> Result<Option<Account>, Error> {
        (**self).find_eligible(con_pass, now_ms).await
    }

    #[inline]
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error> {
        (**self).find_by_id(id).await
    }

    #[inline]
    async fn find_by_con_pass(&self, con_pass: &str) -> Result<Option<Account>, Error> {
        (**self).find_by_con_pass(con_pass).await
    }

    #[inline]
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>, Error> {
        (**self).list_by_ids(ids).await
    }

    #[inline]
    async fn set_kick_until(&self, ids: &[i64], until_ms: i64) -> Result<(), Error> {
        (**self).set_kick_until(ids, until_ms).await
    }
}

/// Blanket implementation for `Box<A>` where `A: AccountStore`.
#[async_trait]
impl<A: AccountStore + ?Sized> AccountStore for Box<A> {
    #[inline]
    async fn find_eligible(
        &self,
        con_pass: &str,
        now_ms: i64,
    ) -> Result<Option<Account>, Error> {
        (**self).find_eligible(con_pass, now_ms).await
    }

    #[inline]
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, Error> {
        (**self).find_by_id(id).await
    }

    #[inline]
    async fn find_by_con_pass(&self, con_pass: &str) -> Result<Option<Account>, Error> {
        (**self).find_by_con_pass(con_pass).await
    }

    #[inline]
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Account>, Error> {
        (**self).list_by_ids(ids).await
    }

    #[inline]
    async fn set_kick_until(&self, ids: &[i64], until_ms: i64) -> Result<(), Error> {
        (**self).set_kick_until(ids, until_ms).await
    }
}

/// Blanket implementation for `Arc<S>` where `S: SettingsStore`.
#[async_trait]
impl<S: SettingsStore + ?Sized> SettingsStore for Arc<S> {
    #[inline]
    async fn get(&self, key: &str) -> Result<Option<Setting>, Error> {
        (**self).get(key).await
    }
}

/// Blanket implementation for `Box<S>` where `S: SettingsStore`.
#[async_trait]
impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    #[inline]
    async fn get(&self, key: &str) -> Result<Option<Setting>, Error> {
        (**self).get(key).await
    }
}

/// Blanket implementation for `Arc<E>` where `E: ProxyEngine`.
#[async_trait]
impl<E: ProxyEngine + ?Sized> ProxyEngine for Arc<E> {
    #[inline]
    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    #[inline]
    async fn online_users(
        &self,
        port: u16,
        secret: &str,
    ) -> Result<HashMap<String, i64>, Error> {
        (**self).online_users(port, secret).await
    }

    #[inline]
    async fn kick_users(
        &self,
        port: u16,
        usernames: &[String],
        secret: &str,
    ) -> Result<(), Error> {
        (**self).kick_users(port, usernames, secret).await
    }
}

/// Blanket implementation for `Box<E>` where `E: ProxyEngine`.
#[async_trait]
impl<E: ProxyEngine + ?Sized> ProxyEngine for Box<E> {
    #[inline]
    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    #[inline]
    async fn online_users(
        &self,
        port: u16,
        secret: &str,
    ) -> Result<HashMap<String, i64>, Error> {
        (**self).online_users(port, secret).await
    }

    #[inline]
    async fn kick_users(
        &self,
        port: u16,
        usernames: &[String],
        secret: &str,
    ) -> Result<(), Error> {
        (**self).kick_users(port, usernames, secret).await
    }
}
