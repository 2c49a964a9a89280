//! # Doubles Scheduler
//!
//! Round-robin doubles tournament scheduling: players are paired for each
//! round, pairs are grouped three to a match, and every player gets one of
//! six table positions per match while repeated partners, back-to-back
//! matches and repeated positions are kept to a minimum.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, pairs, matches, play history)
//! - **schedule**: Pair generation, match assignment and position optimization
//! - **tournament**: Roster plus the currently committed schedule
//! - **render**: Text and JSON views of a schedule
//! - **config**: Configuration loading and validation

pub mod config;
pub mod models;
pub mod render;
pub mod schedule;
pub mod tournament;

pub use models::*;
pub use schedule::{Schedule, ScheduleError, Scheduler};
pub use tournament::Tournament;

/// Split a comma-separated player list, dropping empty entries.
pub fn parse_player_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
