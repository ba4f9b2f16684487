//! Parsed view of the proxy engine's YAML configuration.
//!
//! The engine config is persisted as an opaque YAML document in the settings
//! store; this module extracts the subset the panel cares about. Every
//! nested section is optional, and each accessor spells out the full guard
//! chain so a half-configured section never leaks a partial value.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::setting::keys;
use crate::traits::SettingsStore;

/// Subset of the engine's server configuration. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Data-plane listen address, e.g. `0.0.0.0:443` or `:443`.
    pub listen: Option<String>,
    pub obfs: Option<ObfsConfig>,
    pub tls: Option<TlsConfig>,
    pub acme: Option<AcmeConfig>,
    pub bandwidth: Option<BandwidthConfig>,
    #[serde(rename = "trafficStats")]
    pub traffic_stats: Option<TrafficStatsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObfsConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub salamander: Option<SalamanderConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalamanderConfig {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub cert: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmeConfig {
    pub domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BandwidthConfig {
    /// Upstream figure as configured, e.g. `"100 mbps"`.
    pub up: Option<String>,
    pub down: Option<String>,
}

/// The traffic-stats section doubles as the management-API endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficStatsConfig {
    pub listen: Option<String>,
}

impl EngineConfig {
    /// Parse the stored YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self, Error> {
        serde_yaml::from_str(raw).map_err(|e| Error::config(format!("engine config: {e}")))
    }

    /// Obfuscation password, only when the `salamander` variant is fully
    /// configured with a non-empty password.
    pub fn salamander_password(&self) -> Option<&str> {
        let obfs = self.obfs.as_ref()?;
        if obfs.kind.as_deref() != Some("salamander") {
            return None;
        }
        obfs.salamander
            .as_ref()?
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
    }

    /// Whether the engine serves a self-issued certificate (explicit cert
    /// and key paths, no ACME), meaning clients must skip verification.
    pub fn self_issued_tls(&self) -> bool {
        self.tls.as_ref().is_some_and(|t| {
            t.cert.as_deref().is_some_and(|c| !c.is_empty())
                && t.key.as_deref().is_some_and(|k| !k.is_empty())
        })
    }

    /// First configured ACME domain, used as the SNI/peer hint.
    pub fn first_acme_domain(&self) -> Option<&str> {
        self.acme
            .as_ref()?
            .domains
            .as_ref()?
            .first()
            .map(String::as_str)
    }

    /// Data-plane port parsed from the listen address.
    pub fn listen_port(&self) -> Result<u16, Error> {
        port_of(self.listen.as_deref())
            .ok_or_else(|| Error::config("engine listen address has no parseable port"))
    }

    /// Management-API port parsed from the traffic-stats listen address.
    pub fn api_port(&self) -> Result<u16, Error> {
        port_of(self.traffic_stats.as_ref().and_then(|t| t.listen.as_deref()))
            .ok_or_else(|| Error::config("engine traffic-stats listen address has no parseable port"))
    }
}

fn port_of(listen: Option<&str>) -> Option<u16> {
    listen?.rsplit(':').next()?.parse().ok()
}

/// Load and parse the engine config document from the settings store.
///
/// An absent key and an empty value are both configuration errors here:
/// every caller needs at least one field of a real document.
pub async fn load_engine_config(settings: &dyn SettingsStore) -> Result<EngineConfig, Error> {
    let setting = settings
        .get(keys::ENGINE_CONFIG)
        .await?
        .ok_or_else(|| Error::config("engine config setting is missing"))?;
    if setting.value.is_empty() {
        return Err(Error::config("engine config is empty"));
    }
    EngineConfig::from_yaml(&setting.value)
}
