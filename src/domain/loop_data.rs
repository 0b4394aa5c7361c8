//! Persisted container for the daemon's accumulated data

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::stats::Stats;

/// Current store schema version
pub const SCHEMA_VERSION: u32 = 3;

/// Top-level persisted container: schema version, player list, stats.
///
/// Exclusively owned by the player store; nothing else mutates it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopData {
    pub version: u32,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub stats: Stats,
}

impl Default for LoopData {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            players: Vec::new(),
            stats: Stats::default(),
        }
    }
}
