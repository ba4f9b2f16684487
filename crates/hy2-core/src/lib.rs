//! Account authorization and session governance for a hysteria2 proxy engine.
//!
//! This crate is the decision layer in front of a standalone proxy engine
//! process. It provides:
//!
//! - [`AuthGate`] - accept/reject a presented connection credential and
//!   resolve the owning identity
//! - [`OnlineRegistry`] - per-identity open-session counts from the engine
//! - [`KickCoordinator`] - persist a forced-disconnect window and evict
//!   live sessions
//! - [`SubscriptionRenderer`] - share URLs and Clash-style config documents
//!
//! Persistence and the engine management API are injected through the
//! [`AccountStore`], [`SettingsStore`], and [`ProxyEngine`] traits; see the
//! `hy2-store` and `hy2-engine` crates for the production implementations.

mod account;
mod engine;
mod error;
mod gate;
mod kick;
mod online;
mod setting;
mod subscribe;
mod traits;


pub use account::{Account, Role};
pub use engine::{
    load_engine_config, AcmeConfig, BandwidthConfig, EngineConfig, ObfsConfig, SalamanderConfig,
    TlsConfig, TrafficStatsConfig,
};
pub use error::Error;
pub use gate::AuthGate;
pub use kick::{KickCoordinator, KickOutcome};
pub use online::OnlineRegistry;
pub use setting::{keys, Setting};
pub use subscribe::{
    ClashConfig, ClashProxy, ClashProxyGroup, ClientKind, SubscriptionRenderer,
};
pub use traits::{AccountStore, ProxyEngine, SettingsStore};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as epoch milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
