//! A tournament: roster, scheduler, and the schedule currently in effect.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::models::Roster;
use crate::schedule::{Schedule, ScheduleError, Scheduler};

/// Holds the committed schedule; a failed generation never replaces it.
pub struct Tournament<R = ChaCha8Rng> {
    roster: Roster,
    scheduler: Scheduler<R>,
    schedule: Option<Schedule>,
}

impl Tournament<ChaCha8Rng> {
    pub fn new(roster: Roster, config: &AppConfig) -> Self {
        Self::with_scheduler(roster, Scheduler::from_app_config(config))
    }
}

impl<R: Rng> Tournament<R> {
    pub fn with_scheduler(roster: Roster, scheduler: Scheduler<R>) -> Self {
        Self {
            roster,
            scheduler,
            schedule: None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Replace the roster. The current schedule stays until the next
    /// successful `generate`.
    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Generate a new schedule and commit it.
    pub fn generate(&mut self) -> Result<&Schedule, ScheduleError> {
        match self.scheduler.generate(&self.roster) {
            Ok(schedule) => {
                info!("Committed schedule with {} matches", schedule.matches.len());
                Ok(self.schedule.insert(schedule))
            }
            Err(e) => {
                error!("Schedule generation failed, keeping previous schedule: {}", e);
                Err(e)
            }
        }
    }
}
