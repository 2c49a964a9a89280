//! Accumulated play history, threaded explicitly through the pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{PlayerId, Position, Roster};

/// What one player has done so far in the tournament.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHistory {
    /// Every table position the player has been seated at
    pub positions_played: BTreeSet<Position>,

    /// Match numbers the player appeared in, in assignment order
    pub match_history: Vec<u32>,
}

impl PlayerHistory {
    pub fn has_played_position(&self, position: Position) -> bool {
        self.positions_played.contains(&position)
    }

    pub fn played_in_match(&self, match_number: u32) -> bool {
        self.match_history.contains(&match_number)
    }

    pub fn matches_played(&self) -> usize {
        self.match_history.len()
    }
}

/// History for every player on a roster, indexed by `PlayerId`.
///
/// Unknown ids read as an empty history and writes to them are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    players: Vec<PlayerHistory>,
}

impl History {
    /// Fresh history for every player on the roster.
    pub fn for_roster(roster: &Roster) -> Self {
        Self {
            players: vec![PlayerHistory::default(); roster.len()],
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerHistory> {
        self.players.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &PlayerHistory)> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, h)| (PlayerId::new(i), h))
    }

    pub fn has_played_position(&self, id: PlayerId, position: Position) -> bool {
        self.get(id)
            .is_some_and(|h| h.has_played_position(position))
    }

    pub fn played_in_match(&self, id: PlayerId, match_number: u32) -> bool {
        self.get(id)
            .is_some_and(|h| h.played_in_match(match_number))
    }

    pub fn record_match(&mut self, id: PlayerId, match_number: u32) {
        if let Some(h) = self.players.get_mut(id.index()) {
            h.match_history.push(match_number);
        }
    }

    pub fn record_position(&mut self, id: PlayerId, position: Position) {
        if let Some(h) = self.players.get_mut(id.index()) {
            h.positions_played.insert(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> History {
        History::for_roster(&Roster::from_names(["Alice", "Bob"]))
    }

    #[test]
    fn test_history_starts_empty() {
        let h = history();
        let alice = h.get(PlayerId::new(0)).unwrap();

        assert!(alice.positions_played.is_empty());
        assert_eq!(alice.matches_played(), 0);
        assert_eq!(h.iter().count(), 2);
    }

    #[test]
    fn test_record_match_and_position() {
        let mut h = history();
        let bob = PlayerId::new(1);

        h.record_match(bob, 1);
        h.record_match(bob, 3);
        h.record_position(bob, 4);
        h.record_position(bob, 4);

        assert!(h.played_in_match(bob, 3));
        assert!(!h.played_in_match(bob, 2));
        assert!(h.has_played_position(bob, 4));
        assert_eq!(h.get(bob).unwrap().match_history, vec![1, 3]);
        assert_eq!(h.get(bob).unwrap().positions_played.len(), 1);
    }

    #[test]
    fn test_unknown_player_is_ignored() {
        let mut h = history();
        let ghost = PlayerId::new(5);

        h.record_match(ghost, 1);
        h.record_position(ghost, 1);

        assert!(!h.played_in_match(ghost, 1));
        assert!(!h.has_played_position(ghost, 1));
    }
}
