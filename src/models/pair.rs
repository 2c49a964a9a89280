//! Pairs of players, before and after they are seated at the table.

use serde::{Deserialize, Serialize};

use super::{PlayerId, Position, SlotSet};

/// Two distinct players drawn together in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    /// Round the pair was generated in (1-based)
    pub round: u32,

    pub first: PlayerId,

    pub second: PlayerId,
}

impl Pair {
    pub fn new(round: u32, first: PlayerId, second: PlayerId) -> Self {
        Self {
            round,
            first,
            second,
        }
    }

    pub fn players(&self) -> [PlayerId; 2] {
        [self.first, self.second]
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.first == id || self.second == id
    }

    /// Order-independent identity of the pair.
    pub fn key(&self) -> (PlayerId, PlayerId) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }

    /// Seat the pair on a slot-set, first player taking the low position.
    pub fn seat(&self, slot_set: SlotSet) -> SeatedPair {
        SeatedPair::new(slot_set, self.first, self.second)
    }
}

/// A pair bound to a slot-set, with each player on one of its two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatedPair {
    pub slot_set: SlotSet,

    /// Player at the slot-set's low position
    pub lower: PlayerId,

    /// Player at the slot-set's high position
    pub upper: PlayerId,
}

impl SeatedPair {
    pub fn new(slot_set: SlotSet, lower: PlayerId, upper: PlayerId) -> Self {
        Self {
            slot_set,
            lower,
            upper,
        }
    }

    pub fn lower_position(&self) -> Position {
        self.slot_set.low()
    }

    pub fn upper_position(&self) -> Position {
        self.slot_set.high()
    }

    /// Each player with the position they occupy, low position first.
    pub fn assignments(&self) -> [(PlayerId, Position); 2] {
        [
            (self.lower, self.lower_position()),
            (self.upper, self.upper_position()),
        ]
    }

    pub fn players(&self) -> [PlayerId; 2] {
        [self.lower, self.upper]
    }

    pub fn position_of(&self, id: PlayerId) -> Option<Position> {
        self.assignments()
            .into_iter()
            .find(|(player, _)| *player == id)
            .map(|(_, position)| position)
    }

    pub fn swap_players(&mut self) {
        std::mem::swap(&mut self.lower, &mut self.upper);
    }

    pub fn swapped(mut self) -> Self {
        self.swap_players();
        self
    }

    /// Same players and order on another slot-set.
    pub fn moved_to(&self, slot_set: SlotSet) -> Self {
        Self::new(slot_set, self.lower, self.upper)
    }

    /// The unseated pair, lower player first.
    pub fn unseat(&self, round: u32) -> Pair {
        Pair::new(round, self.lower, self.upper)
    }
}
