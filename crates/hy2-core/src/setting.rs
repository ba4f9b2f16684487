//! Key-value settings records.

use serde::{Deserialize, Serialize};

/// Well-known setting keys consumed by this core.
///
/// An absent key is a configuration error at the point of use; an empty
/// value is a meaningful "not configured" state.
pub mod keys {
    /// The engine's YAML configuration document.
    pub const ENGINE_CONFIG: &str = "HYSTERIA2_CONFIG";
    /// Shared secret authenticating this panel to the engine management API.
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Port-hopping range advertised in rendered URLs, e.g. `20000-30000`.
    pub const PORT_HOPPING: &str = "HYSTERIA2_CONFIG_PORT_HOPPING";
    /// Display remark appended to rendered URLs as a fragment.
    pub const REMARK: &str = "HYSTERIA2_CONFIG_REMARK";
}

/// One named setting row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub remark: String,
}
