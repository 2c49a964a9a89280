use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doubles_scheduler::config::AppConfig;
use doubles_scheduler::render::{render_json, render_text};
use doubles_scheduler::{parse_player_list, Roster, Scheduler};

#[derive(Parser)]
#[command(name = "doubles-scheduler")]
#[command(about = "Round-robin doubles tournament scheduler")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schedule and print it
    Generate {
        /// Comma-separated player names
        #[arg(long, conflicts_with = "roster")]
        players: Option<String>,

        /// Roster file, one name per line
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Desired number of rounds
        #[arg(long)]
        rounds: Option<u32>,

        /// Seed for a reproducible schedule
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show how many rounds a roster size needs
    Rounds {
        /// Number of players
        #[arg(long)]
        players: usize,

        /// Desired number of rounds
        #[arg(long)]
        rounds: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    // Initialize tracing; logs go to stderr so stdout stays clean for output
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::debug!("Starting doubles-scheduler v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate {
            players,
            roster: roster_path,
            rounds,
            seed,
            format,
        } => {
            let roster = match (players, roster_path) {
                (Some(list), _) => Roster::from_names(parse_player_list(&list)),
                (None, Some(path)) => {
                    let contents = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read roster {}", path.display()))?;
                    Roster::parse(&contents)
                }
                (None, None) => Roster::from_names(config.roster.players.clone()),
            };

            if let Some(rounds) = rounds {
                config.tournament.desired_round_count = rounds;
            }
            if seed.is_some() {
                config.tournament.seed = seed;
            }
            config.validate()?;

            let mut scheduler = Scheduler::from_app_config(&config);
            let schedule = scheduler
                .generate(&roster)
                .context("Schedule generation failed")?;

            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&schedule, &roster));
                    if let Some(seed) = schedule.seed {
                        println!("\nseed: {}", seed);
                    }
                }
                OutputFormat::Json => println!("{}", render_json(&schedule, &roster)?),
            }
        }

        Commands::Rounds { players, rounds } => {
            if let Some(rounds) = rounds {
                config.tournament.desired_round_count = rounds;
            }
            config.validate()?;

            let effective = config.tournament.effective_round_count(players);
            let matches = players * effective as usize / config.tournament.players_per_match() as usize;
            println!(
                "{} players: {} rounds ({} requested), {} matches",
                players, effective, config.tournament.desired_round_count, matches
            );
        }
    }

    Ok(())
}
