//! Players and the tournament roster.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A tournament participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Position in the roster
    pub id: PlayerId,

    /// Display name
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The fixed set of players for one tournament run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Build a roster from names, assigning ids in input order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::new(i), name))
            .collect();
        Self { players }
    }

    /// Parse a roster file: one name per line, blank lines and `#` comments skipped.
    pub fn parse(contents: &str) -> Self {
        Self::from_names(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Name for display; unknown ids render as their numeric id.
    pub fn name(&self, id: PlayerId) -> String {
        self.get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
