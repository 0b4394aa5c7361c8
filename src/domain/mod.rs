//! Core domain types: players, statistics, and the persisted container

mod loop_data;
mod player;
mod stats;

pub use loop_data::{LoopData, SCHEMA_VERSION};
pub use player::Player;
pub use stats::{MatchAggregate, MatchOutcome, Period, PeriodStats, Stats};
