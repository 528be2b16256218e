//! Reading and writing game-history snapshot files
//!
//! A snapshot is JSON Lines: one serialized game per line. Records carry raw
//! per-generation player ids; canonicalization happens later in the identity
//! resolver. Score units are normalized at load time, some historical dumps
//! stored thousands of points as fractional values.

use crate::config::IdentityConfig;
use crate::error::{RatingError, Result};
use crate::types::{Game, Generation, Player, PlayerId};
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One player seat as stored in a snapshot line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub old_ids: Vec<PlayerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_ids: Vec<PlayerId>,
}

/// One game as stored in a snapshot line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub pantheon_type: Generation,
    pub event_id: i64,
    pub session_id: i64,
    pub session_date: NaiveDateTime,
    pub players: Vec<PlayerRecord>,
    pub places: Vec<u8>,
    pub scores: Vec<f64>,
}

impl GameRecord {
    pub fn from_game(game: &Game) -> Self {
        Self {
            pantheon_type: game.generation,
            event_id: game.event_id,
            session_id: game.session_id,
            session_date: game.session_date,
            players: game
                .players
                .iter()
                .map(|p| PlayerRecord {
                    name: p.name.clone(),
                    old_ids: p.old_ids.clone(),
                    new_ids: p.new_ids.clone(),
                })
                .collect(),
            places: game.places.to_vec(),
            scores: game.scores.to_vec(),
        }
    }

    /// Convert a parsed record into a `Game` with per-seat raw players.
    pub fn into_game(self, config: &IdentityConfig) -> Result<Game> {
        let session_id = self.session_id;
        let seat_error = |what: &str, len: usize| RatingError::SnapshotError {
            message: format!("session {session_id}: expected 4 {what}, got {len}"),
        };
        let players: [Arc<Player>; 4] = self
            .players
            .into_iter()
            .map(|record| {
                let is_replacement = config.is_replacement_name(&record.name);
                Arc::new(Player {
                    name: record.name,
                    old_ids: record.old_ids,
                    new_ids: record.new_ids,
                    is_replacement,
                })
            })
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|v: Vec<_>| seat_error("players", v.len()))?;
        let places: [u8; 4] = self
            .places
            .try_into()
            .map_err(|v: Vec<_>| seat_error("places", v.len()))?;
        let mut scores: [f64; 4] = self
            .scores
            .try_into()
            .map_err(|v: Vec<_>| seat_error("scores", v.len()))?;
        normalize_score_units(&mut scores);

        Ok(Game {
            generation: self.pantheon_type,
            event_id: self.event_id,
            session_id: self.session_id,
            session_date: self.session_date,
            players,
            places,
            scores,
        })
    }
}

/// Some dumps store final scores in thousands (e.g. 42.0 for 42000 points).
/// When every score of a game fits in ±999.99, scale the whole game up.
pub fn normalize_score_units(scores: &mut [f64; 4]) {
    if scores.iter().all(|s| s.abs() <= 999.99) {
        for score in scores.iter_mut() {
            *score *= 1000.0;
        }
    }
}

/// Load a snapshot file into raw games.
pub fn read_games(path: impl AsRef<Path>, config: &IdentityConfig) -> Result<Vec<Game>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open snapshot file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut games = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("failed to read line {} of {}", line_number + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: GameRecord = serde_json::from_str(&line)
            .with_context(|| format!("malformed snapshot line {} in {}", line_number + 1, path.display()))?;
        games.push(record.into_game(config)?);
    }
    info!(games = games.len(), path = %path.display(), "snapshot loaded");
    Ok(games)
}

/// Dump games back into a snapshot file, one JSON object per line.
pub fn write_games(path: impl AsRef<Path>, games: &[Game]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for game in games {
        serde_json::to_writer(&mut writer, &GameRecord::from_game(game))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!(games = games.len(), path = %path.display(), "snapshot written");
    Ok(())
}
