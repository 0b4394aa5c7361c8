//! Player store with dirty-flag persistence
//!
//! In-memory keyed collection of player records plus the stats aggregate,
//! both backed by a [`LoopRepository`]. Mutations mark the store dirty; the
//! autosave task flushes it periodically. Saves are serialized against each
//! other but do not block concurrent map mutations — a mutation racing a
//! flush simply re-marks the store dirty and is captured by the next cycle.

mod autosave;
mod repository;

pub use autosave::AutosaveScheduler;
pub use repository::{JsonFileRepository, LoopRepository, RepositoryError, RepositoryResult};

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::domain::{LoopData, MatchOutcome, Player, Stats, SCHEMA_VERSION};

/// Thread-safe store of player records and match statistics
pub struct PlayerStore {
    repository: Arc<dyn LoopRepository>,
    players: RwLock<BTreeMap<String, Player>>,
    stats: Mutex<Stats>,
    dirty: AtomicBool,
    /// Serializes flushes; map mutations do not take it
    save_lock: Mutex<()>,
}

impl PlayerStore {
    /// Load the persisted container, or initialize an empty one on first run.
    ///
    /// Records still carrying the deprecated legacy `uid` are migrated in
    /// place and the store is marked dirty so the migration is durably
    /// written on the next flush.
    pub fn load(repository: Arc<dyn LoopRepository>) -> RepositoryResult<Self> {
        let data = match repository.load() {
            Ok(data) => data,
            Err(RepositoryError::NotFound) => {
                info!("no stored data found, initializing empty store");
                let data = LoopData::default();
                repository.save(&data)?;
                data
            }
            Err(e) => return Err(e),
        };

        let mut migrated = false;
        let mut players = BTreeMap::new();
        for mut player in data.players {
            if player.migrate_legacy_uid() {
                migrated = true;
            }
            players.insert(player.steam_id64.clone(), player);
        }
        if migrated {
            info!("migrated legacy player identifiers");
        }

        Ok(Self {
            repository,
            players: RwLock::new(players),
            stats: Mutex::new(data.stats),
            dirty: AtomicBool::new(migrated),
            save_lock: Mutex::new(()),
        })
    }

    /// Player record for a platform id, if known
    pub fn player_by_id(&self, steam_id64: &str) -> Option<Player> {
        self.players.read().get(steam_id64).cloned()
    }

    /// Insert or replace a player record and mark the store dirty
    pub fn add_or_update(&self, player: Player) {
        self.players
            .write()
            .insert(player.steam_id64.clone(), player);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Mark the store dirty after mutating a record obtained from it
    pub fn notify_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Record one match outcome into every stats window
    pub fn record_match(
        &self,
        character: &str,
        location: &str,
        outcome: MatchOutcome,
        duration_secs: u64,
        at: NaiveDateTime,
    ) {
        self.stats
            .lock()
            .record_match(character, location, outcome, duration_secs, at);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Snapshot of the current stats aggregate
    pub fn stats(&self) -> Stats {
        self.stats.lock().clone()
    }

    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Flush the store if dirty. A failed write keeps the dirty flag set so
    /// the next cycle retries (at-least-once persistence).
    pub fn save(&self) {
        let _guard = self.save_lock.lock();

        if !self.dirty.swap(false, Ordering::SeqCst) {
            return;
        }

        let data = LoopData {
            version: SCHEMA_VERSION,
            players: self.players.read().values().cloned().collect(),
            stats: self.stats.lock().clone(),
        };

        match self.repository.save(&data) {
            Ok(()) => debug!("saved store ({} players)", data.players.len()),
            Err(e) => {
                error!("failed to save store: {}", e);
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }
}
