//! HTTP client for the hysteria2 engine's management API.
//!
//! The engine is an opaque external process; this crate covers the two
//! authenticated calls the panel issues against its traffic-stats endpoint
//! (online-session listing and kick) plus the liveness flag the enclosing
//! lifecycle owner maintains.

mod client;

pub use client::Hysteria2Api;
