//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Shape of the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Rounds requested; raised until every player-slot fits into a match
    #[serde(default = "default_round_count")]
    pub desired_round_count: u32,

    /// Players per pair (only 2 is supported)
    #[serde(default = "default_team_size")]
    pub team_size: u32,

    /// Pairs per match (only 3 is supported)
    #[serde(default = "default_teams_per_match")]
    pub teams_per_match: u32,

    /// Seed for reproducible schedules
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Upper bound on `desired_round_count`.
pub const MAX_ROUND_COUNT: u32 = 1000;

fn default_round_count() -> u32 {
    3
}

fn default_team_size() -> u32 {
    2
}

fn default_teams_per_match() -> u32 {
    3
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            desired_round_count: default_round_count(),
            team_size: default_team_size(),
            teams_per_match: default_teams_per_match(),
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Player-slots in one match.
    pub fn players_per_match(&self) -> u32 {
        self.team_size * self.teams_per_match
    }

    /// Smallest round count >= `desired_round_count` whose total player-slots
    /// divide evenly into matches.
    ///
    /// Saturates at `u32::MAX` for configs that skipped `validate`.
    pub fn effective_round_count(&self, roster_size: usize) -> u32 {
        let divisor = u64::from(self.players_per_match().max(1));
        let roster_size = roster_size as u64;
        let mut rounds = u64::from(self.desired_round_count);

        while (roster_size * rounds) % divisor != 0 {
            rounds += 1;
        }

        u32::try_from(rounds).unwrap_or(u32::MAX)
    }
}

/// Bounds on the randomized search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Draws allowed to find one unique pair before regenerating every round
    #[serde(default = "default_pair_retry_ceiling")]
    pub pair_retry_ceiling: u32,

    /// Full pair regenerations allowed before giving up
    #[serde(default = "default_restart_budget")]
    pub pair_restart_budget: u32,

    /// Full match-assignment restarts allowed before giving up
    #[serde(default = "default_restart_budget")]
    pub assignment_restart_budget: u32,
}

fn default_pair_retry_ceiling() -> u32 {
    1000
}

fn default_restart_budget() -> u32 {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pair_retry_ceiling: default_pair_retry_ceiling(),
            pair_restart_budget: default_restart_budget(),
            assignment_restart_budget: default_restart_budget(),
        }
    }
}

/// Players to schedule when none are given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_players")]
    pub players: Vec<String>,
}

fn default_players() -> Vec<String> {
    [
        "Frederik", "Amalie", "Mikkel", "Sofie", "Kasper", "Emma", "Magnus", "Clara", "Andreas",
        "Mathilde", "Nikolaj", "Julie", "Rasmus", "Cecilie",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub tournament: TournamentConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub roster: RosterConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            tournament: TournamentConfig::default(),
            search: SearchConfig::default(),
            roster: RosterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tournament.validate()?;
        self.search.validate()
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.desired_round_count == 0 {
            return Err(ConfigError::ValidationError(
                "Desired round count must be at least 1".to_string(),
            ));
        }

        if self.desired_round_count > MAX_ROUND_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "Desired round count must be at most {}, got {}",
                MAX_ROUND_COUNT, self.desired_round_count
            )));
        }

        if self.team_size != 2 {
            return Err(ConfigError::ValidationError(format!(
                "Team size must be 2, got {}",
                self.team_size
            )));
        }

        if self.teams_per_match != 3 {
            return Err(ConfigError::ValidationError(format!(
                "Teams per match must be 3, got {}",
                self.teams_per_match
            )));
        }

        Ok(())
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair_retry_ceiling == 0 {
            return Err(ConfigError::ValidationError(
                "Pair retry ceiling must be greater than 0".to_string(),
            ));
        }

        if self.pair_restart_budget == 0 || self.assignment_restart_budget == 0 {
            return Err(ConfigError::ValidationError(
                "Restart budgets must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.tournament.desired_round_count, 3);
        assert_eq!(config.tournament.players_per_match(), 6);
        assert_eq!(config.search.pair_retry_ceiling, 1000);
        assert_eq!(config.roster.players.len(), 14);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_rounds() {
        let mut config = AppConfig::default();
        config.tournament.desired_round_count = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_too_many_rounds() {
        let mut config = AppConfig::default();
        config.tournament.desired_round_count = MAX_ROUND_COUNT;
        assert!(config.validate().is_ok());

        config.tournament.desired_round_count = u32::MAX - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_round_count_near_u32_max() {
        let config = TournamentConfig {
            desired_round_count: u32::MAX - 1,
            ..Default::default()
        };
        // 7 * r first divisible by 6 past u32::MAX
        assert_eq!(config.effective_round_count(7), u32::MAX);
        assert_eq!(config.effective_round_count(6), u32::MAX - 1);
    }

    #[test]
    fn test_config_validation_unsupported_team_shape() {
        let mut config = AppConfig::default();
        config.tournament.team_size = 3;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.tournament.teams_per_match = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_budget() {
        let mut config = AppConfig::default();
        config.search.assignment_restart_budget = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_round_count_unchanged_when_divisible() {
        let config = TournamentConfig::default();
        // 14 * 3 = 42, divisible by 6
        assert_eq!(config.effective_round_count(14), 3);
    }

    #[test]
    fn test_effective_round_count_odd_roster() {
        let config = TournamentConfig::default();
        // 13 * r divisible by 6 first at r = 6
        assert_eq!(config.effective_round_count(13), 6);
    }

    #[test]
    fn test_effective_round_count_always_tiles() {
        for desired in 1..=5 {
            let config = TournamentConfig {
                desired_round_count: desired,
                ..Default::default()
            };
            for roster_size in 0..40 {
                let rounds = config.effective_round_count(roster_size);
                assert!(rounds >= desired);
                assert!(rounds < desired + 6);
                assert_eq!((roster_size as u32 * rounds) % 6, 0);
            }
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.tournament, parsed.tournament);
        assert_eq!(config.roster, parsed.roster);
    }

    #[test]
    fn test_config_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[tournament]\ndesired_round_count = 4\nseed = 7\n\n[roster]\nplayers = [\"A\", \"B\"]"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tournament.desired_round_count, 4);
        assert_eq!(config.tournament.seed, Some(7));
        assert_eq!(config.tournament.team_size, 2);
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.roster.players, vec!["A", "B"]);
    }

    #[test]
    fn test_config_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tournament]\ndesired_round_count = 0").unwrap();

        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_from_missing_file() {
        assert!(matches!(
            AppConfig::from_file("/nonexistent/doubles.toml"),
            Err(ConfigError::ReadError(_))
        ));
    }
}
