//! Management-API client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use hy2_core::{Error, ProxyEngine};

/// Request timeout for management-API calls. The engine blocks a connection
/// handshake on the online-session query, so the bound must stay short; both
/// calls are a single round trip on loopback.
const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the engine's traffic-stats management endpoint.
///
/// The `running` flag mirrors whether a live engine process is active. The
/// process itself is managed elsewhere; whoever starts and stops it calls
/// [`set_running`](Self::set_running).
#[derive(Debug)]
pub struct Hysteria2Api {
    client: Client,
    running: AtomicBool,
}

impl Hysteria2Api {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Flip the engine-active flag.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    fn url(port: u16, path: &str) -> String {
        format!("http://127.0.0.1:{port}{path}")
    }
}

impl Default for Hysteria2Api {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProxyEngine for Hysteria2Api {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn online_users(
        &self,
        port: u16,
        secret: &str,
    ) -> Result<HashMap<String, i64>, Error> {
        let response = self
            .client
            .post(Self::url(port, "/online"))
            .header("Authorization", secret)
            .timeout(API_TIMEOUT)
            .send()
            .await
            .map_err(Error::engine)?;
        if !response.status().is_success() {
            return Err(Error::Engine(format!(
                "online query: HTTP {}",
                response.status().as_u16()
            )));
        }
        let online: HashMap<String, i64> = response.json().await.map_err(Error::engine)?;
        debug!(port, identities = online.len(), "online query succeeded");
        Ok(online)
    }

    async fn kick_users(
        &self,
        port: u16,
        usernames: &[String],
        secret: &str,
    ) -> Result<(), Error> {
        let response = self
            .client
            .post(Self::url(port, "/kick"))
            .header("Authorization", secret)
            .timeout(API_TIMEOUT)
            .json(&usernames)
            .send()
            .await
            .map_err(Error::engine)?;
        if !response.status().is_success() {
            return Err(Error::Engine(format!(
                "kick: HTTP {}",
                response.status().as_u16()
            )));
        }
        debug!(port, count = usernames.len(), "kick request accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_flag_starts_false_and_toggles() {
        let api = Hysteria2Api::new();
        assert!(!api.is_running());
        api.set_running(true);
        assert!(api.is_running());
        api.set_running(false);
        assert!(!api.is_running());
    }

    #[test]
    fn urls_target_loopback() {
        assert_eq!(Hysteria2Api::url(9999, "/online"), "http://127.0.0.1:9999/online");
        assert_eq!(Hysteria2Api::url(9999, "/kick"), "http://127.0.0.1:9999/kick");
    }

    #[test]
    fn online_payload_shape_decodes() {
        // The engine returns a flat identity-to-count object.
        let online: HashMap<String, i64> =
            serde_json::from_str(r#"{"alice": 2, "bob": 1}"#).unwrap();
        assert_eq!(online.get("alice"), Some(&2));
        assert_eq!(online.get("bob"), Some(&1));
    }
}
