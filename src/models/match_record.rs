//! Finalized matches.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{PlayerId, Position, SeatedPair, SlotSet, POSITION_ONE};

/// Violations of the match invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Match {number}: slot-set {slot_set} is used by more than one pair")]
    DuplicateSlotSet { number: u32, slot_set: SlotSet },

    #[error("Match {number}: player {player} appears more than once")]
    DuplicatePlayer { number: u32, player: PlayerId },

    #[error("Match number must be at least 1")]
    ZeroNumber,
}

/// A player seated at a position they had already played before this match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionConflict {
    pub player: PlayerId,
    pub position: Position,
}

/// Three seated pairs playing together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// 1-based, strictly increasing in assignment order
    pub number: u32,

    /// One pair per slot-set, in table order (A, B, C)
    pub pairs: [SeatedPair; 3],

    /// Repeated positions the optimizer could not avoid
    pub conflicts: Vec<PositionConflict>,
}

impl Match {
    /// Build a match, checking that slot-sets and players are all distinct.
    pub fn new(
        number: u32,
        mut pairs: [SeatedPair; 3],
        conflicts: Vec<PositionConflict>,
    ) -> Result<Self, MatchError> {
        if number == 0 {
            return Err(MatchError::ZeroNumber);
        }

        pairs.sort_by_key(|p| p.slot_set);
        for window in pairs.windows(2) {
            if window[0].slot_set == window[1].slot_set {
                return Err(MatchError::DuplicateSlotSet {
                    number,
                    slot_set: window[0].slot_set,
                });
            }
        }

        let mut seen = HashSet::new();
        for player in pairs.iter().flat_map(|p| p.players()) {
            if !seen.insert(player) {
                return Err(MatchError::DuplicatePlayer { number, player });
            }
        }

        Ok(Self {
            number,
            pairs,
            conflicts,
        })
    }

    pub fn pair_on(&self, slot_set: SlotSet) -> &SeatedPair {
        &self.pairs[slot_set.index()]
    }

    /// All six players, slot-set by slot-set.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.pairs.iter().flat_map(|p| p.players())
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players().any(|p| p == id)
    }

    pub fn position_of(&self, id: PlayerId) -> Option<Position> {
        self.pairs.iter().find_map(|p| p.position_of(id))
    }

    /// Whoever sits at position 1 had sat there before.
    pub fn has_position_one_conflict(&self) -> bool {
        self.conflicts.iter().any(|c| c.position == POSITION_ONE)
    }
}
