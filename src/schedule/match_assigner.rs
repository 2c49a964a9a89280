//! Grouping pairs into matches.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{PositionOptimizer, ScheduleError, Stage};
use crate::models::{History, Match, Pair, PlayerId};

/// How strictly a candidate pair must have rested during the previous match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaxationTier {
    /// Neither player played the previous match
    Strict,
    /// At least one player sat out the previous match
    Partial,
    /// Previous match ignored
    Unrestricted,
}

impl RelaxationTier {
    /// Tiers in the order they are tried.
    pub const ORDER: [RelaxationTier; 3] = [
        RelaxationTier::Strict,
        RelaxationTier::Partial,
        RelaxationTier::Unrestricted,
    ];

    pub fn admits(&self, pair: &Pair, history: &History, previous_match: u32) -> bool {
        let rested = |id: &PlayerId| !history.played_in_match(*id, previous_match);
        match self {
            RelaxationTier::Strict => pair.players().iter().all(rested),
            RelaxationTier::Partial => pair.players().iter().any(rested),
            RelaxationTier::Unrestricted => true,
        }
    }
}

impl std::fmt::Display for RelaxationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelaxationTier::Strict => write!(f, "strict"),
            RelaxationTier::Partial => write!(f, "partial"),
            RelaxationTier::Unrestricted => write!(f, "unrestricted"),
        }
    }
}

/// Result of a successful assignment pass.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub matches: Vec<Match>,

    /// Input history plus every match and position assigned
    pub history: History,

    /// Full passes run, including the successful one
    pub attempts: u32,
}

/// Draws pairs from the pool three at a time and seats each match.
#[derive(Debug, Clone)]
pub struct MatchAssigner {
    restart_budget: u32,
    optimizer: PositionOptimizer,
}

impl Default for MatchAssigner {
    fn default() -> Self {
        Self::new(100)
    }
}

impl MatchAssigner {
    pub fn new(restart_budget: u32) -> Self {
        Self {
            restart_budget,
            optimizer: PositionOptimizer,
        }
    }

    /// Assign every pair in `pairs` to a match.
    ///
    /// Each pass starts from the full pool and a fresh copy of `history`, so a
    /// failed pass leaves nothing behind.
    pub fn assign_matches<R: Rng + ?Sized>(
        &self,
        pairs: &[Pair],
        history: &History,
        rng: &mut R,
    ) -> Result<Assignment, ScheduleError> {
        let max_attempts = self.restart_budget.saturating_add(1);

        for attempt in 1..=max_attempts {
            let mut working = history.clone();
            match self.try_assign(pairs, &mut working, rng) {
                Ok(matches) => {
                    info!(
                        "Assigned {} pairs to {} matches (attempt {})",
                        pairs.len(),
                        matches.len(),
                        attempt
                    );
                    return Ok(Assignment {
                        matches,
                        history: working,
                        attempts: attempt,
                    });
                }
                Err(e @ ScheduleError::NoValidGrouping { .. }) => {
                    warn!("Match assignment attempt {} failed: {}", attempt, e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(ScheduleError::SchedulingInfeasible {
            stage: Stage::MatchAssignment,
            attempts: max_attempts,
        })
    }

    fn try_assign<R: Rng + ?Sized>(
        &self,
        pairs: &[Pair],
        history: &mut History,
        rng: &mut R,
    ) -> Result<Vec<Match>, ScheduleError> {
        let mut pool = pairs.to_vec();
        let mut matches = Vec::new();
        let mut number = 1;

        while !pool.is_empty() {
            let mut selected: Vec<Pair> = Vec::with_capacity(3);
            let mut assigned: HashSet<PlayerId> = HashSet::new();

            while selected.len() < 3 {
                let (tier, candidates) = candidates(&pool, history, &assigned, number).ok_or(
                    ScheduleError::NoValidGrouping {
                        match_number: number,
                        remaining: pool.len(),
                    },
                )?;

                let pick = candidates[rng.gen_range(0..candidates.len())];
                let pair = pool.remove(pick);
                debug!(
                    "Match {}: took {}/{} from round {} ({} tier)",
                    number, pair.first, pair.second, pair.round, tier
                );

                for player in pair.players() {
                    history.record_match(player, number);
                    assigned.insert(player);
                }
                selected.push(pair);
            }

            let seating = self
                .optimizer
                .optimize([selected[0], selected[1], selected[2]], history);
            self.optimizer.commit(&seating, history);
            matches.push(seating.into_match(number)?);

            number += 1;
        }

        Ok(matches)
    }
}

/// Pool indices eligible for match `number` under the strictest tier that
/// admits any, skipping pairs with a player already in the match.
fn candidates(
    pool: &[Pair],
    history: &History,
    assigned: &HashSet<PlayerId>,
    number: u32,
) -> Option<(RelaxationTier, Vec<usize>)> {
    let previous = number.saturating_sub(1);

    RelaxationTier::ORDER.iter().find_map(|tier| {
        let eligible: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, pair)| {
                pair.players().iter().all(|id| !assigned.contains(id))
                    && tier.admits(pair, history, previous)
            })
            .map(|(i, _)| i)
            .collect();

        (!eligible.is_empty()).then_some((*tier, eligible))
    })
}
