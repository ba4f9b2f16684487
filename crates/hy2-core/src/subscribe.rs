//! Subscription artifact rendering.
//!
//! Turns persisted account and engine settings into client-consumable
//! connection descriptors: a `hysteria2://` share URL, and for the client
//! apps that consume one, a Clash-style YAML document plus a traffic
//! accounting header. Artifacts are built fresh per call and never cached.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::engine::load_engine_config;
use crate::error::Error;
use crate::setting::keys;
use crate::traits::{AccountStore, SettingsStore};

/// Characters escaped inside URL query-parameter values.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'?');

/// Client application variants with bespoke rendering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Shadowrocket,
    ClashForWindows,
    /// Anything else; configured through the URL alone.
    Other,
}

impl ClientKind {
    /// Map the client label presented by a subscription download.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Shadowrocket" => Self::Shadowrocket,
            "ClashforWindows" => Self::ClashForWindows,
            _ => Self::Other,
        }
    }

    /// Whether this client consumes a structured config document.
    fn wants_clash_config(self) -> bool {
        matches!(self, Self::Shadowrocket | Self::ClashForWindows)
    }
}

/// One rendered proxy entry. Field names and nesting are consumed verbatim
/// by third-party client apps; do not rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashProxy {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub server: String,
    pub port: u16,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,
    #[serde(rename = "obfs-password", skip_serializing_if = "Option::is_none")]
    pub obfs_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<u64>,
}

/// A selection group referencing proxy entries by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub proxies: Vec<String>,
}

/// The rendered client-configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClashConfig {
    pub proxies: Vec<ClashProxy>,
    #[serde(rename = "proxy-groups")]
    pub proxy_groups: Vec<ClashProxyGroup>,
}

/// Renders subscription artifacts from account and engine settings state.
pub struct SubscriptionRenderer {
    accounts: Arc<dyn AccountStore>,
    settings: Arc<dyn SettingsStore>,
}

impl SubscriptionRenderer {
    pub fn new(accounts: Arc<dyn AccountStore>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { accounts, settings }
    }

    /// Render the bare `hysteria2://` share URL for one account.
    ///
    /// Query parameters appear in a fixed order (obfs, insecure, sni/peer,
    /// downmbps, port-hopping), each emitted only when its source setting is
    /// configured; `insecure` is always present. A non-empty display remark
    /// is appended last, as the URL fragment. The embedded credential is the
    /// account's proxy-facing secret, never the panel-login secret.
    pub async fn render_url(
        &self,
        client: ClientKind,
        account_id: i64,
        host: &str,
    ) -> Result<String, Error> {
        let cfg = load_engine_config(self.settings.as_ref()).await?;
        if cfg.listen.as_deref().map_or(true, str::is_empty) {
            return Err(Error::config("engine listen address is empty"));
        }
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(Error::NotFound)?;

        let mut query: Vec<String> = Vec::new();

        if let Some(pw) = cfg.salamander_password() {
            query.push("obfs=salamander".to_string());
            query.push(format!(
                "obfs-password={}",
                utf8_percent_encode(pw, QUERY_VALUE)
            ));
        }

        query.push(format!(
            "insecure={}",
            if cfg.self_issued_tls() { 1 } else { 0 }
        ));

        if let Some(domain) = cfg.first_acme_domain() {
            let param = match client {
                ClientKind::Shadowrocket => "peer",
                _ => "sni",
            };
            query.push(format!("{param}={domain}"));
        }

        if let Some(down) = cfg
            .bandwidth
            .as_ref()
            .and_then(|b| b.down.as_deref())
            .filter(|d| !d.is_empty())
        {
            query.push(format!("downmbps={}", query_escape(down)));
        }

        let mut port = cfg.listen_port()?.to_string();
        let hopping = self.setting_value(keys::PORT_HOPPING).await?;
        if !hopping.is_empty() {
            match client {
                ClientKind::Shadowrocket => query.push(format!("mport={hopping}")),
                // Other clients take the whole range in place of the port.
                _ => port = hopping,
            }
        }

        let host_part = match host.split_once(':') {
            Some((h, _)) => h,
            None => host,
        };
        let mut url = format!(
            "hysteria2://{}@{}:{}?{}",
            account.con_pass,
            host_part,
            port,
            query.join("&")
        );

        let remark = self.setting_value(keys::REMARK).await?;
        if !remark.is_empty() {
            url.push('#');
            url.push_str(&remark);
        }
        Ok(url)
    }

    /// Render the traffic-accounting header and structured config document.
    ///
    /// Only Shadowrocket and Clash-for-Windows consume the document; every
    /// other client gets two empty strings, not an error, since it is
    /// configured through [`render_url`](Self::render_url) instead.
    ///
    /// The `expire` field of the header is whole seconds, truncated from
    /// the stored millisecond deadline.
    pub async fn render_config(
        &self,
        con_pass: &str,
        client: ClientKind,
        host: &str,
    ) -> Result<(String, String), Error> {
        let cfg = load_engine_config(self.settings.as_ref()).await?;
        if cfg.listen.as_deref().map_or(true, str::is_empty) {
            return Err(Error::config("engine listen address is empty"));
        }
        let account = self
            .accounts
            .find_by_con_pass(con_pass)
            .await?
            .ok_or(Error::NotFound)?;

        if !client.wants_clash_config() {
            return Ok((String::new(), String::new()));
        }

        let user_info = format!(
            "upload={}; download={}; total={}; expire={}",
            account.upload,
            account.download,
            account.quota,
            account.expire_time / 1000
        );

        let server = match host.split_once(':') {
            Some((h, _)) => h,
            None => host,
        };
        let mut proxy = ClashProxy {
            name: "hysteria2".to_string(),
            kind: "hysteria2".to_string(),
            server: server.to_string(),
            port: cfg.listen_port()?,
            password: account.con_pass.clone(),
            obfs: None,
            obfs_password: None,
            up: None,
            down: None,
        };
        if let Some(pw) = cfg.salamander_password() {
            proxy.obfs = Some("salamander".to_string());
            proxy.obfs_password = Some(pw.to_string());
        }
        if let Some(bandwidth) = &cfg.bandwidth {
            if let Some(up) = bandwidth.up.as_deref().filter(|v| !v.is_empty()) {
                proxy.up = Some(parse_bandwidth(up)?);
            }
            if let Some(down) = bandwidth.down.as_deref().filter(|v| !v.is_empty()) {
                proxy.down = Some(parse_bandwidth(down)?);
            }
        }

        let document = ClashConfig {
            proxies: vec![proxy],
            proxy_groups: vec![ClashProxyGroup {
                name: "PROXY".to_string(),
                kind: "select".to_string(),
                proxies: vec!["hysteria2".to_string()],
            }],
        };
        let yaml = serde_yaml::to_string(&document)
            .map_err(|e| Error::config(format!("render clash config: {e}")))?;

        Ok((user_info, yaml))
    }

    /// URL of the panel's own subscription endpoint for one account,
    /// e.g. `https://panel.example.com/hy2/<con_pass>`.
    pub async fn subscribe_url(
        &self,
        account_id: i64,
        protocol: &str,
        host: &str,
    ) -> Result<String, Error> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(Error::NotFound)?;
        Ok(format!("{protocol}//{host}/hy2/{}", account.con_pass))
    }

    /// Fetch a setting that must exist; its value may legitimately be empty.
    async fn setting_value(&self, key: &str) -> Result<String, Error> {
        self.settings
            .get(key)
            .await?
            .map(|s| s.value)
            .ok_or_else(|| Error::config(format!("setting {key} is missing")))
    }
}

/// Form-style query escaping: percent-encode, but render the space as `+`.
/// Client apps parse the bandwidth hint with form semantics, so `"50 mbps"`
/// must come out as `50+mbps`, not `50%20mbps`.
fn query_escape(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE)
        .to_string()
        .replace("%20", "+")
}

/// Parse the numeric token of a bandwidth figure such as `"100 mbps"`.
///
/// A configured but garbled figure is a hard error; it must not silently
/// degrade to "no bandwidth limit".
fn parse_bandwidth(value: &str) -> Result<u64, Error> {
    let token = match value.split_once(' ') {
        Some((t, _)) => t,
        None => value,
    };
    token
        .parse::<u64>()
        .map_err(|_| Error::config(format!("unparseable bandwidth figure: {value:?}")))
}
