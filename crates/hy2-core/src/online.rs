//! Live-session queries against the engine management API.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::engine::load_engine_config;
use crate::error::Error;
use crate::setting::keys;
use crate::traits::{ProxyEngine, SettingsStore};

/// Read-only view of who is currently connected.
///
/// The engine's session state is the single source of truth and is queried
/// fresh on every call, never cached.
#[derive(Clone)]
pub struct OnlineRegistry {
    settings: Arc<dyn SettingsStore>,
    engine: Arc<dyn ProxyEngine>,
}

impl OnlineRegistry {
    pub fn new(settings: Arc<dyn SettingsStore>, engine: Arc<dyn ProxyEngine>) -> Self {
        Self { settings, engine }
    }

    /// Open-session counts per identity.
    ///
    /// An inactive engine means nobody is online, so this returns an empty
    /// map rather than an error. With the engine active, a missing API port
    /// or shared secret is a hard configuration error, and a failed engine
    /// call propagates.
    pub async fn list_online(&self) -> Result<HashMap<String, i64>, Error> {
        if !self.engine.is_running() {
            return Ok(HashMap::new());
        }
        let (port, secret) = self.api_access().await?;
        let online = self.engine.online_users(port, &secret).await?;
        debug!(identities = online.len(), "fetched online sessions");
        Ok(online)
    }

    /// Resolve the management-API port and shared secret for a live engine.
    pub(crate) async fn api_access(&self) -> Result<(u16, String), Error> {
        let cfg = load_engine_config(self.settings.as_ref()).await?;
        let port = cfg.api_port()?;
        let secret = self
            .settings
            .get(keys::JWT_SECRET)
            .await?
            .map(|s| s.value)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config("shared engine secret is not set"))?;
        Ok((port, secret))
    }
}
