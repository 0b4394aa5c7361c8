//! Persistent player records

use serde::{Deserialize, Serialize};

fn is_empty(s: &String) -> bool {
    s.is_empty()
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

/// A player encountered across lobbies, keyed by platform account id.
///
/// Older store versions identified players through the `uid` field; it is
/// kept only so existing files can be migrated on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    /// Stable platform account id (steamid64)
    #[serde(rename = "steamId64", default, skip_serializing_if = "is_empty")]
    pub steam_id64: String,
    /// Deprecated legacy identifier, cleared by migration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Most recently observed nickname
    #[serde(default, skip_serializing_if = "is_empty")]
    pub name: String,
    /// Free-form user notes
    #[serde(default, skip_serializing_if = "is_empty")]
    pub description: String,
    /// User-assigned rating (-1, 0, 1)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rating: i32,
}

impl Player {
    /// Create a record for a newly observed platform id
    pub fn new(steam_id64: impl Into<String>) -> Self {
        Self {
            steam_id64: steam_id64.into(),
            uid: None,
            name: String::new(),
            description: String::new(),
            rating: 0,
        }
    }

    /// Migrate the deprecated `uid` field into `steam_id64`.
    ///
    /// Returns true if the record changed (caller must mark the store dirty
    /// so the migration is durably written on the next flush).
    pub fn migrate_legacy_uid(&mut self) -> bool {
        match self.uid.take() {
            Some(uid) if !uid.is_empty() => {
                self.steam_id64 = uid;
                true
            }
            other => {
                self.uid = other;
                false
            }
        }
    }
}
