//! Player identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a player by their index in the roster.
///
/// Every identity check in the scheduler goes through this type, so two
/// players sharing a name are still distinct players.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(usize);

impl PlayerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Index into the roster (and into `History`).
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<usize> for PlayerId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
