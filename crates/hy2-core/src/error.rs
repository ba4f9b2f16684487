//! Error taxonomy for the authorization and rendering core.

/// Errors surfaced by the core components.
///
/// Authorization failures stay opaque to the connecting client (the engine
/// simply refuses the handshake); administrative callers can distinguish
/// "nothing to do" ([`EngineNotRunning`](Self::EngineNotRunning)) from broken
/// configuration ([`ConfigIncomplete`](Self::ConfigIncomplete)) from
/// transient engine-call failures ([`Engine`](Self::Engine)).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No live engine process; nothing can be authorized, listed, or kicked.
    #[error("proxy engine is not running")]
    EngineNotRunning,

    /// No eligible account matches the lookup.
    #[error("no eligible account found")]
    NotFound,

    /// Already-open sessions exceed the account's device ceiling.
    #[error("device limit exceeded")]
    DeviceLimited,

    /// A required setting is absent, empty, or unparseable.
    #[error("incomplete configuration: {0}")]
    ConfigIncomplete(String),

    /// Underlying persistence failure.
    #[error("store error: {0}")]
    Store(String),

    /// Engine management-API call failed or timed out.
    #[error("engine api error: {0}")]
    Engine(String),
}

impl Error {
    /// Create a store error from any error type.
    #[inline]
    pub fn store<E: std::fmt::Display>(err: E) -> Self {
        Self::Store(err.to_string())
    }

    /// Create an engine error from any error type.
    #[inline]
    pub fn engine<E: std::fmt::Display>(err: E) -> Self {
        Self::Engine(err.to_string())
    }

    /// Create a configuration error with a description of what is missing.
    #[inline]
    pub fn config(what: impl Into<String>) -> Self {
        Self::ConfigIncomplete(what.into())
    }
}
