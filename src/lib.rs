//! Lobby Companion Daemon
//!
//! Tails the game's live log file, correlates the lobby killer's ephemeral
//! session id with their stable platform id, and accumulates per-player and
//! per-time-window match statistics with periodic autosave.
//!
//! # Features
//!
//! - **Rotation-aware tailing**: detects log recreation through size
//!   regression and never terminates on I/O errors
//! - **Order-independent correlation**: killer identity resolves whichever
//!   of the membership or player-join lines arrives first
//! - **Typed events**: a closed set of domain events fanned out
//!   synchronously to in-process subscribers
//! - **Durable stats**: daily/weekly/monthly/yearly windows persisted with a
//!   dirty flag and at-least-once autosave
//!
//! # Modules
//!
//! - `config`: paths and intervals, with environment overrides
//! - `domain`: players, statistics windows, the persisted container
//! - `monitor`: log tailer, line classifier, session correlator
//! - `events`: domain events and the subscriber registry
//! - `store`: player store, repository, autosave scheduler
//! - `utils`: atomic file writes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lobby_companion::config::MonitorConfig;
//! use lobby_companion::events::EventPublisher;
//! use lobby_companion::monitor::LogTailer;
//! use lobby_companion::store::{JsonFileRepository, PlayerStore};
//!
//! let config = MonitorConfig::from_env();
//! let repository = Arc::new(JsonFileRepository::new(&config.data_path));
//! let store = Arc::new(PlayerStore::load(repository).unwrap());
//! let publisher = Arc::new(EventPublisher::new());
//! let tailer = LogTailer::new(&config, Arc::clone(&publisher)).unwrap();
//! ```

pub mod config;
pub mod domain;
pub mod events;
pub mod monitor;
pub mod store;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::MonitorConfig;
pub use domain::{LoopData, MatchOutcome, Period, PeriodStats, Player, Stats};
pub use events::{DomainEvent, EventPublisher, SubscriptionId};
pub use monitor::{LineClassifier, LineEvent, LogTailer, OutfitCodeTable, SessionCorrelator};
pub use store::{AutosaveScheduler, JsonFileRepository, LoopRepository, PlayerStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
