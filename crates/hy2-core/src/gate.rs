//! The per-connection authorization decision.

use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::now_millis;
use crate::online::OnlineRegistry;
use crate::traits::{AccountStore, ProxyEngine, SettingsStore};

/// Decides, per connection attempt, whether a presented proxy credential may
/// open a session. The engine calls this synchronously and blocks the
/// handshake on the result.
pub struct AuthGate {
    accounts: Arc<dyn AccountStore>,
    engine: Arc<dyn ProxyEngine>,
    online: OnlineRegistry,
}

impl AuthGate {
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

    /// Accept or reject a presented credential, returning the owning
    /// account's username on success. That label is what the engine reports
    /// in online listings and accepts in kick requests.
    ///
    /// Read-only; errors are terminal per call, the engine decides whether
    /// to retry the handshake.
    pub async fn authorize(&self, con_pass: &str) -> Result<String, Error> {
        // Authorization is only meaningful while a live engine can enforce it.
        if !self.engine.is_running() {
            return Err(Error::EngineNotRunning);
        }

        let now = now_millis();
        let account = self
            .accounts
            .find_eligible(con_pass, now)
            .await?
            .ok_or(Error::NotFound)?;

        let online = self.online.list_online().await?;
        if let Some(&open) = online.get(&account.username) {
            // Reject only once already-open sessions strictly exceed the
            // ceiling: the Nth concurrent device is still admitted when
            // open == device_no.
            if account.device_no < open {
                debug!(
                    username = %account.username,
                    open,
                    device_no = account.device_no,
                    "device limit exceeded"
                );
                return Err(Error::DeviceLimited);
            }
        }

        debug!(username = %account.username, "session authorized");
        Ok(account.username)
    }
}
