//! Round-by-round pair generation.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info, warn};

use super::{ScheduleError, Stage};
use crate::models::{Pair, PlayerId, Roster};

/// Pairs produced by a successful generation run.
#[derive(Debug, Clone)]
pub struct GeneratedPairs {
    /// All pairs, round by round
    pub pairs: Vec<Pair>,

    /// Full generations run, including the successful one
    pub attempts: u32,
}

/// Partitions the roster into random pairs, one round at a time.
///
/// When a round leaves one player over, that player joins the next round's
/// pool a second time and so plays in two of its pairs.
#[derive(Debug, Clone)]
pub struct PairGenerator {
    retry_ceiling: u32,
    restart_budget: u32,
}

impl Default for PairGenerator {
    fn default() -> Self {
        Self::new(1000, 100)
    }
}

impl PairGenerator {
    pub fn new(retry_ceiling: u32, restart_budget: u32) -> Self {
        Self {
            retry_ceiling,
            restart_budget,
        }
    }

    /// Generate `round_count` rounds of pairs.
    ///
    /// A round that runs out of draws throws away every round generated so
    /// far and starts over, at most `restart_budget` times.
    pub fn generate_rounds<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        round_count: u32,
        rng: &mut R,
    ) -> Result<GeneratedPairs, ScheduleError> {
        let max_attempts = self.restart_budget.saturating_add(1);

        for attempt in 1..=max_attempts {
            match self.try_generate(roster, round_count, rng) {
                Ok(pairs) => {
                    info!(
                        "Generated {} pairs over {} rounds (attempt {})",
                        pairs.len(),
                        round_count,
                        attempt
                    );
                    return Ok(GeneratedPairs {
                        pairs,
                        attempts: attempt,
                    });
                }
                Err(e @ ScheduleError::ExhaustedRetries { .. }) => {
                    warn!("Pair generation attempt {} failed: {}", attempt, e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(ScheduleError::SchedulingInfeasible {
            stage: Stage::PairGeneration,
            attempts: max_attempts,
        })
    }

    fn try_generate<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        round_count: u32,
        rng: &mut R,
    ) -> Result<Vec<Pair>, ScheduleError> {
        let mut pairs = Vec::new();
        if roster.len() < 2 {
            debug!("Roster of {} yields no pairs", roster.len());
            return Ok(pairs);
        }

        let mut carry_over: Option<PlayerId> = None;

        for round in 1..=round_count {
            let mut working: Vec<PlayerId> = roster.ids().collect();
            working.extend(carry_over);
            debug!("Round {}: pairing {} entries", round, working.len());

            let mut used = HashSet::new();
            while working.len() > 1 {
                let pair = self.draw_pair(round, &mut working, &used, rng)?;
                debug!("Round {}: paired {} with {}", round, pair.first, pair.second);
                used.insert(pair.key());
                pairs.push(pair);
            }

            carry_over = working.pop();
            if let Some(player) = carry_over {
                debug!("Round {}: {} carries over to round {}", round, player, round + 1);
            }
        }

        Ok(pairs)
    }

    /// Draw two distinct players not yet paired together this round and
    /// remove one entry of each from `working`.
    fn draw_pair<R: Rng + ?Sized>(
        &self,
        round: u32,
        working: &mut Vec<PlayerId>,
        used: &HashSet<(PlayerId, PlayerId)>,
        rng: &mut R,
    ) -> Result<Pair, ScheduleError> {
        for _ in 0..self.retry_ceiling {
            let i = rng.gen_range(0..working.len());
            let j = rng.gen_range(0..working.len());

            // Catches both i == j and the carried player's duplicate entry
            if working[i] == working[j] {
                continue;
            }

            let candidate = Pair::new(round, working[i], working[j]);
            if used.contains(&candidate.key()) {
                continue;
            }

            working.remove(i.max(j));
            working.remove(i.min(j));
            return Ok(candidate);
        }

        Err(ScheduleError::ExhaustedRetries {
            round,
            attempts: self.retry_ceiling,
        })
    }
}
