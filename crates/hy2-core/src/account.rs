//! Account records and the session-eligibility invariant.

use serde::{Deserialize, Serialize};

/// Authorization tier of an account. Not consulted by the auth gate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse the database representation; anything unrecognized is a plain user.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// One subscriber row.
///
/// `pass` is the panel-login secret; `con_pass` is the proxy-facing
/// credential the engine authenticates with. The two are independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub pass: String,
    pub con_pass: String,
    /// Byte budget; negative means unlimited.
    pub quota: i64,
    pub download: i64,
    pub upload: i64,
    /// Epoch-millisecond deadline; unusable at or after this instant.
    pub expire_time: i64,
    /// Epoch-millisecond deadline; unusable while `now <= kick_until_time`.
    pub kick_until_time: i64,
    /// Maximum concurrent sessions.
    pub device_no: i64,
    pub role: Role,
    pub deleted: bool,
    /// Last panel login, epoch ms.
    pub login_at: i64,
    /// Last proxy connect, epoch ms.
    pub con_at: i64,
    pub create_time: i64,
    pub update_time: i64,
}

impl Account {
    /// The four-condition eligibility invariant gating new proxy sessions:
    /// not deleted, quota not exhausted, not expired, not inside a kick
    /// window. The SQL store evaluates the same predicate in a single row
    /// read; this helper exists for in-memory checks and fakes.
    pub fn eligible_at(&self, now_ms: i64) -> bool {
        !self.deleted
            && (self.quota < 0 || self.quota > self.download + self.upload)
            && now_ms < self.expire_time
            && now_ms > self.kick_until_time
    }
}
