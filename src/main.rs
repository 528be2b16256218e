//! Main entry point for the pantheon rating pipeline
//!
//! Loads the two generation snapshots, canonicalizes and merges player
//! identities, replays the whole history through the selected rating model
//! and exports the leaderboard.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use pantheon_rating::config::IdentityConfig;
use pantheon_rating::engine::calc_ratings;
use pantheon_rating::export::{build_leaderboard, write_export, LeaderboardRow, DEFAULT_MIN_GAMES};
use pantheon_rating::identity::{merge_generations, IdentityResolver};
use pantheon_rating::model::{
    BradleyTerryModel, EloModel, ModelKind, PlackettLuceModel, RatingModel, TrueSkillModel,
};
use pantheon_rating::snapshot;
use pantheon_rating::types::{Game, Generation};
use std::path::PathBuf;
use tracing::info;

/// Pantheon Rating - Two-generation mahjong leaderboard calculator
#[derive(Parser)]
#[command(
    name = "pantheon-rating",
    version,
    about = "Replays a merged two-generation mahjong game archive through a rating model",
    long_about = "Pantheon Rating loads game snapshots from the old and new pantheon databases, \
                 canonicalizes duplicate player accounts within each generation, merges player \
                 identity across generations and replays the full history chronologically \
                 through the selected rating model to produce a leaderboard export."
)]
struct Args {
    /// Rating model to replay the history with
    #[arg(short, long, value_enum)]
    model: ModelKind,

    /// Old-generation games snapshot (JSON Lines)
    #[arg(long, value_name = "FILE")]
    old_games: PathBuf,

    /// New-generation games snapshot (JSON Lines)
    #[arg(long, value_name = "FILE")]
    new_games: PathBuf,

    /// Identity configuration: alias groups and replacement names (TOML)
    #[arg(long, value_name = "FILE")]
    identity_config: Option<PathBuf>,

    /// Only rate games played on or before this date (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE")]
    date_to: Option<String>,

    /// Leaderboard export file (JSON); without it the result is only logged
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Minimum games before a player appears on the leaderboard
    #[arg(long, default_value_t = DEFAULT_MIN_GAMES)]
    min_games: u32,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value = "info",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: String,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn run_model<M: RatingModel>(
    model: &M,
    games: &[Game],
    date_to: NaiveDate,
    min_games: u32,
) -> Result<Vec<LeaderboardRow>> {
    let stats = calc_ratings(games, model, date_to)?;
    build_leaderboard(&stats, min_games)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;
    info!(version = pantheon_rating::VERSION, model = %args.model, "starting rating pipeline");

    let identity_config = match &args.identity_config {
        Some(path) => IdentityConfig::from_file(path)?,
        None => IdentityConfig::default(),
    };
    let resolver = IdentityResolver::new(&identity_config)?;

    let mut old_games = snapshot::read_games(&args.old_games, &identity_config)?;
    resolver.resolve_generation(&mut old_games, Generation::Old)?;

    let mut new_games = snapshot::read_games(&args.new_games, &identity_config)?;
    resolver.resolve_generation(&mut new_games, Generation::New)?;

    let mut games = old_games;
    games.append(&mut new_games);
    merge_generations(&mut games)?;

    let date_to = match &args.date_to {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid --date-to '{}': {}", raw, e))?,
        None => Local::now().date_naive(),
    };
    info!(date_to = %date_to, games = games.len(), "replaying merged history");

    let rows = match args.model {
        ModelKind::Elo => run_model(&EloModel::default(), &games, date_to, args.min_games)?,
        ModelKind::TrueSkill => run_model(&TrueSkillModel::new(), &games, date_to, args.min_games)?,
        ModelKind::PlackettLuce => {
            run_model(&PlackettLuceModel::new(), &games, date_to, args.min_games)?
        }
        ModelKind::BradleyTerry => {
            run_model(&BradleyTerryModel::new(), &games, date_to, args.min_games)?
        }
    };

    for row in &rows {
        info!(
            player = %row.player,
            rating = row.rating,
            mean = row.mean,
            stddev = row.stddev,
            games = row.game_count,
            places = %row.places,
            "leaderboard entry"
        );
    }

    if let Some(output) = &args.output {
        write_export(output, &args.model.to_string(), &games, &rows)?;
    }
    Ok(())
}
