//! Schedule generation.
//!
//! Runs the scheduling pipeline for one tournament:
//! 1. Generate pairs round by round
//! 2. Group pairs into three-pair matches
//! 3. Seat each match, keeping repeated positions to a minimum
//!
//! Each stage retries inside a bounded loop. A run either returns a complete
//! `Schedule` or fails with `ScheduleError::SchedulingInfeasible`; nothing
//! partial escapes.

mod match_assigner;
mod pair_generator;
mod position_optimizer;

pub use match_assigner::*;
pub use pair_generator::*;
pub use position_optimizer::*;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, ConfigError, SearchConfig, TournamentConfig};
use crate::models::{History, Match, MatchError, Pair, PlayerId, PositionConflict, Roster};

/// Pipeline stage that gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PairGeneration,
    MatchAssignment,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::PairGeneration => write!(f, "pair generation"),
            Stage::MatchAssignment => write!(f, "match assignment"),
        }
    }
}

/// Errors that can occur while scheduling.
///
/// `ExhaustedRetries` and `NoValidGrouping` are recovered inside their stage
/// by a full restart; callers only see them wrapped up as
/// `SchedulingInfeasible` once the restart budget runs out.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("No unique pair found for round {round} after {attempts} draws")]
    ExhaustedRetries { round: u32, attempts: u32 },

    #[error("No valid grouping for match {match_number} ({remaining} pairs left)")]
    NoValidGrouping { match_number: u32, remaining: usize },

    #[error("Scheduling infeasible: {stage} gave up after {attempts} attempts")]
    SchedulingInfeasible { stage: Stage, attempts: u32 },

    #[error("Roster has {players} players, at least {required} are needed")]
    RosterTooSmall { players: usize, required: usize },

    #[error("Invalid match: {0}")]
    InvalidMatch(#[from] MatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Counters describing how hard the search had to work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStats {
    /// Full pair generations run, including the successful one
    pub pair_generation_attempts: u32,

    /// Full match assignments run, including the successful one
    pub assignment_attempts: u32,

    /// Repeated positions left in the final schedule
    pub residual_conflicts: usize,
}

/// A complete schedule for one tournament run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub generated_at: DateTime<Utc>,

    /// Seed the run was drawn from, when known
    pub seed: Option<u64>,

    /// Rounds actually generated
    pub effective_round_count: u32,

    /// Every generated pair, tagged by round, in generation order
    pub pairs: Vec<Pair>,

    /// Matches in assignment order
    pub matches: Vec<Match>,

    /// Play history after the last match
    pub history: History,

    pub stats: ScheduleStats,
}

impl Schedule {
    pub fn pairs_in_round(&self, round: u32) -> impl Iterator<Item = &Pair> {
        self.pairs.iter().filter(move |p| p.round == round)
    }

    pub fn matches_for(&self, id: PlayerId) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.contains(id))
    }

    /// Every repeated position, with the number of the match it occurred in.
    pub fn residual_conflicts(&self) -> impl Iterator<Item = (u32, &PositionConflict)> {
        self.matches
            .iter()
            .flat_map(|m| m.conflicts.iter().map(move |c| (m.number, c)))
    }
}

/// Drives the three pipeline stages with a single random source.
pub struct Scheduler<R = ChaCha8Rng> {
    config: TournamentConfig,
    search: SearchConfig,
    rng: R,
    seed: Option<u64>,
}

impl Scheduler<ChaCha8Rng> {
    /// Seed from `config.seed`, or pick a fresh seed and remember it.
    pub fn new(config: TournamentConfig, search: SearchConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            search,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.tournament.clone(), config.search.clone())
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn with_rng(config: TournamentConfig, search: SearchConfig, rng: R) -> Self {
        Self {
            config,
            search,
            rng,
            seed: None,
        }
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Build a complete schedule for `roster`.
    pub fn generate(&mut self, roster: &Roster) -> Result<Schedule, ScheduleError> {
        self.config.validate()?;
        self.search.validate()?;

        let required = self.config.players_per_match() as usize;
        if roster.len() < required {
            return Err(ScheduleError::RosterTooSmall {
                players: roster.len(),
                required,
            });
        }

        let rounds = self.config.effective_round_count(roster.len());
        info!(
            "Scheduling {} players over {} rounds ({} requested)",
            roster.len(),
            rounds,
            self.config.desired_round_count
        );

        // 1. Pairs
        let generator =
            PairGenerator::new(self.search.pair_retry_ceiling, self.search.pair_restart_budget);
        let generated = generator.generate_rounds(roster, rounds, &mut self.rng)?;

        // 2. Matches and seating
        let assigner = MatchAssigner::new(self.search.assignment_restart_budget);
        let assignment =
            assigner.assign_matches(&generated.pairs, &History::for_roster(roster), &mut self.rng)?;

        let stats = ScheduleStats {
            pair_generation_attempts: generated.attempts,
            assignment_attempts: assignment.attempts,
            residual_conflicts: assignment.matches.iter().map(|m| m.conflicts.len()).sum(),
        };

        info!(
            "Scheduled {} matches from {} pairs ({} repeated positions)",
            assignment.matches.len(),
            generated.pairs.len(),
            stats.residual_conflicts
        );

        Ok(Schedule {
            generated_at: Utc::now(),
            seed: self.seed,
            effective_round_count: rounds,
            pairs: generated.pairs,
            matches: assignment.matches,
            history: assignment.history,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn roster(n: usize) -> Roster {
        Roster::from_names((0..n).map(|i| format!("P{i}")))
    }

    fn seeded(desired_round_count: u32, seed: u64) -> Scheduler {
        Scheduler::new(
            TournamentConfig {
                desired_round_count,
                seed: Some(seed),
                ..Default::default()
            },
            SearchConfig::default(),
        )
    }

    #[test]
    fn test_six_players_one_round() {
        let roster = roster(6);
        let schedule = seeded(1, 1).generate(&roster).unwrap();

        assert_eq!(schedule.effective_round_count, 1);
        assert_eq!(schedule.pairs.len(), 3);
        assert_eq!(schedule.matches.len(), 1);

        let m = &schedule.matches[0];
        assert_eq!(m.number, 1);

        let mut positions: Vec<_> = roster
            .ids()
            .map(|id| m.position_of(id).expect("every player is seated"))
            .collect();
        positions.sort();
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_matches_hold_six_distinct_players() {
        for seed in 0..10 {
            for size in [6, 9, 12, 14] {
                let schedule = seeded(3, seed).generate(&roster(size)).unwrap();
                for m in &schedule.matches {
                    let players: HashSet<_> = m.players().collect();
                    assert_eq!(players.len(), 6, "seed {seed}, size {size}, match {}", m.number);
                }
            }
        }
    }

    #[test]
    fn test_match_numbers_are_sequential() {
        let schedule = seeded(3, 5).generate(&roster(14)).unwrap();
        let numbers: Vec<_> = schedule.matches.iter().map(|m| m.number).collect();
        let expected: Vec<_> = (1..=schedule.matches.len() as u32).collect();

        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_every_pair_lands_in_one_match() {
        let schedule = seeded(3, 11).generate(&roster(9)).unwrap();

        // 9 players need 4 rounds: 36 slots, 18 pairs, 6 matches
        assert_eq!(schedule.effective_round_count, 4);
        assert_eq!(schedule.pairs.len(), 18);
        assert_eq!(schedule.matches.len(), 6);

        let seated: usize = schedule.matches.iter().map(|m| m.pairs.len()).sum();
        assert_eq!(seated, schedule.pairs.len());
    }

    #[test]
    fn test_match_history_matches_schedule() {
        let roster = roster(14);
        let schedule = seeded(3, 3).generate(&roster).unwrap();

        for id in roster.ids() {
            let expected: Vec<u32> = schedule.matches_for(id).map(|m| m.number).collect();
            let history = schedule.history.get(id).unwrap();

            assert_eq!(history.match_history, expected);
            assert!(history.match_history.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_positions_played_matches_schedule() {
        let roster = roster(12);
        let schedule = seeded(4, 8).generate(&roster).unwrap();

        for id in roster.ids() {
            let seated: std::collections::BTreeSet<_> = schedule
                .matches_for(id)
                .filter_map(|m| m.position_of(id))
                .collect();
            assert_eq!(schedule.history.get(id).unwrap().positions_played, seated);
        }
    }

    #[test]
    fn test_stats_count_residual_conflicts() {
        let schedule = seeded(2, 21).generate(&roster(6)).unwrap();

        assert!(schedule.stats.pair_generation_attempts >= 1);
        assert!(schedule.stats.assignment_attempts >= 1);
        assert_eq!(
            schedule.stats.residual_conflicts,
            schedule.residual_conflicts().count()
        );
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let roster = roster(14);
        let a = seeded(3, 42).generate(&roster).unwrap();
        let b = seeded(3, 42).generate(&roster).unwrap();

        assert_eq!(a.pairs, b.pairs);
        assert_eq!(a.matches, b.matches);
        assert_eq!(a.seed, Some(42));
    }

    #[test]
    fn test_unseeded_scheduler_records_seed() {
        let mut scheduler = Scheduler::new(TournamentConfig::default(), SearchConfig::default());
        let schedule = scheduler.generate(&roster(6)).unwrap();
        let seed = schedule.seed.expect("seed is recorded");

        let replay = seeded(3, seed).generate(&roster(6)).unwrap();
        assert_eq!(schedule.matches, replay.matches);
    }

    #[test]
    fn test_with_rng_has_no_seed() {
        let mut scheduler = Scheduler::with_rng(
            TournamentConfig::default(),
            SearchConfig::default(),
            ChaCha8Rng::seed_from_u64(9),
        );
        assert_eq!(scheduler.generate(&roster(6)).unwrap().seed, None);
    }

    #[test]
    fn test_roster_too_small() {
        let err = seeded(3, 1).generate(&roster(5)).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::RosterTooSmall {
                players: 5,
                required: 6
            }
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut scheduler = Scheduler::new(
            TournamentConfig {
                desired_round_count: 0,
                ..Default::default()
            },
            SearchConfig::default(),
        );
        assert!(matches!(
            scheduler.generate(&roster(6)),
            Err(ScheduleError::Config(_))
        ));
    }

    #[test]
    fn test_pairs_in_round() {
        let schedule = seeded(2, 2).generate(&roster(12)).unwrap();

        assert_eq!(schedule.pairs_in_round(1).count(), 6);
        assert_eq!(schedule.pairs_in_round(2).count(), 6);
        assert_eq!(schedule.pairs_in_round(3).count(), 0);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::PairGeneration.to_string(), "pair generation");
        assert_eq!(Stage::MatchAssignment.to_string(), "match assignment");
    }
}
