//! Forced-disconnect coordination.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Error;
use crate::online::OnlineRegistry;
use crate::traits::{AccountStore, ProxyEngine, SettingsStore};

/// Outcome of a kick request.
///
/// The persisted deadline is the durable source of truth; dropping sessions
/// already in flight is best-effort on top of it.
#[derive(Debug)]
pub enum KickOutcome {
    /// Deadline persisted and live sessions dropped.
    Completed,
    /// Deadline persisted, so future authorizations fail until it elapses,
    /// but evicting already-open sessions failed. Callers should surface
    /// this as a warning, not silently succeed.
    DeadlinePersisted { error: Error },
}

/// Applies an administrative disconnect decision: persist a kick-until
/// deadline, then tell the engine to drop the targets' open sessions.
pub struct KickCoordinator {
    accounts: Arc<dyn AccountStore>,
    engine: Arc<dyn ProxyEngine>,
    online: OnlineRegistry,
}

impl KickCoordinator {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        settings: Arc<dyn SettingsStore>,
        engine: Arc<dyn ProxyEngine>,
    ) -> Self {
        let online = OnlineRegistry::new(settings, Arc::clone(&engine));
        Self {
            accounts,
            engine,
            online,
        }
    }

    /// Lock the given accounts out until `kick_until_ms` and evict their
    /// live sessions.
    ///
    /// Idempotent: repeating with the same or a later deadline leaves the
    /// same state. Concurrent kicks with different deadlines race
    /// last-write-wins on the stored value, so callers should not issue
    /// them for the same account.
    pub async fn kick(&self, ids: &[i64], kick_until_ms: i64) -> Result<KickOutcome, Error> {
        if !self.engine.is_running() {
            return Err(Error::EngineNotRunning);
        }

        // Durable half first. Once this lands, future authorization attempts
        // fail until the deadline elapses even if live eviction below fails.
        self.accounts.set_kick_until(ids, kick_until_ms).await?;

        match self.evict_live(ids).await {
            Ok(()) => {
                info!(accounts = ids.len(), until = kick_until_ms, "kick applied");
                Ok(KickOutcome::Completed)
            }
            Err(error) => {
                warn!(%error, "kick deadline persisted but live eviction failed");
                Ok(KickOutcome::DeadlinePersisted { error })
            }
        }
    }

    async fn evict_live(&self, ids: &[i64]) -> Result<(), Error> {
        // Resolve the API access first so a broken engine config surfaces
        // even when no target resolves to a live account.
        let (port, secret) = self.online.api_access().await?;
        let accounts = self.accounts.list_by_ids(ids).await?;
        let usernames: Vec<String> = accounts.into_iter().map(|a| a.username).collect();
        if usernames.is_empty() {
            return Ok(());
        }
        self.engine.kick_users(port, &usernames, &secret).await
    }
}
