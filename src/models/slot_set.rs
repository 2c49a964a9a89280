//! Table positions and the three slot-sets a pair can occupy.

use serde::{Deserialize, Serialize};

/// A table position, 1 through 6.
pub type Position = u8;

/// The most contested position at the table.
pub const POSITION_ONE: Position = 1;

/// One of the three fixed position pairs at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotSet {
    /// Positions 1 and 4
    A,
    /// Positions 2 and 5
    B,
    /// Positions 3 and 6
    C,
}

impl SlotSet {
    /// All slot-sets in table order.
    pub const ALL: [SlotSet; 3] = [SlotSet::A, SlotSet::B, SlotSet::C];

    pub fn low(&self) -> Position {
        match self {
            SlotSet::A => 1,
            SlotSet::B => 2,
            SlotSet::C => 3,
        }
    }

    pub fn high(&self) -> Position {
        self.low() + 3
    }

    pub fn positions(&self) -> (Position, Position) {
        (self.low(), self.high())
    }

    pub fn contains(&self, position: Position) -> bool {
        position == self.low() || position == self.high()
    }

    /// Whether this slot-set holds position 1.
    pub fn holds_position_one(&self) -> bool {
        self.contains(POSITION_ONE)
    }

    /// Table-order index (A = 0).
    pub fn index(&self) -> usize {
        match self {
            SlotSet::A => 0,
            SlotSet::B => 1,
            SlotSet::C => 2,
        }
    }
}

impl std::fmt::Display for SlotSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.low(), self.high())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_set_positions() {
        assert_eq!(SlotSet::A.positions(), (1, 4));
        assert_eq!(SlotSet::B.positions(), (2, 5));
        assert_eq!(SlotSet::C.positions(), (3, 6));
    }

    #[test]
    fn test_slot_sets_cover_table_exactly_once() {
        let mut seen: Vec<Position> = SlotSet::ALL
            .iter()
            .flat_map(|s| [s.low(), s.high()])
            .collect();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_only_a_holds_position_one() {
        assert!(SlotSet::A.holds_position_one());
        assert!(!SlotSet::B.holds_position_one());
        assert!(!SlotSet::C.holds_position_one());
    }

    #[test]
    fn test_slot_set_index_matches_table_order() {
        for (i, slot_set) in SlotSet::ALL.iter().enumerate() {
            assert_eq!(slot_set.index(), i);
        }
    }

    #[test]
    fn test_slot_set_display() {
        assert_eq!(format!("{}", SlotSet::B), "2/5");
    }
}
