//! Core data models for the scheduler.

mod history;
mod ids;
mod match_record;
mod pair;
mod player;
mod slot_set;

pub use history::*;
pub use ids::*;
pub use match_record::*;
pub use pair::*;
pub use player::*;
pub use slot_set::*;
