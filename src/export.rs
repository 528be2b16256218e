//! Leaderboard construction and JSON export
//!
//! The export format is model-agnostic: a `tournament_ids` section counting
//! games per event, plus one section named after the active model holding
//! the leaderboard rows.

use crate::engine::PlayerStats;
use crate::error::{RatingError, Result};
use crate::types::{Game, Generation, Player};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Minimum games before a player appears on the leaderboard.
pub const DEFAULT_MIN_GAMES: u32 = 10;

/// One leaderboard entry, ordered best-first.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub player: String,
    pub rating: f64,
    pub mean: f64,
    pub stddev: f64,
    pub game_count: u32,
    pub places: String,
    pub last_game_date: String,
    pub event_game_counts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_ids: Option<String>,
}

/// Per-event game counts for the export header.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentEntry {
    pub pantheon_type: Generation,
    pub pantheon_id: i64,
    pub game_count: u32,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn format_ids(ids: &[i64]) -> Option<String> {
    if ids.is_empty() {
        None
    } else {
        let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        Some(format!("[{}]", parts.join(", ")))
    }
}

/// Build leaderboard rows from final replay state.
///
/// Replacement stand-ins and players below `min_games` are dropped. Rows are
/// ordered by descending sortable rating, ties broken by name.
pub fn build_leaderboard<R>(
    stats: &HashMap<Arc<Player>, PlayerStats<R>>,
    min_games: u32,
) -> Result<Vec<LeaderboardRow>> {
    let mut rows = Vec::new();
    for (player, entry) in stats {
        if player.is_replacement || entry.total_games() < min_games {
            continue;
        }
        let rating = entry
            .rating_for_sorting
            .ok_or_else(|| RatingError::EngineInvariant {
                message: format!("no sortable rating cached for {}", player.name),
            })?;
        let (mean, stddev) = entry
            .mean_and_stddev
            .ok_or_else(|| RatingError::EngineInvariant {
                message: format!("no mean/stddev cached for {}", player.name),
            })?;
        let last_game_date = entry
            .last_game_date
            .ok_or_else(|| RatingError::EngineInvariant {
                message: format!("player {} has games but no last game date", player.name),
            })?;

        let mut events: Vec<(&(Generation, i64), &u32)> = entry.event_game_counts.iter().collect();
        events.sort_by_key(|((generation, event_id), _)| (*generation, *event_id));

        rows.push(LeaderboardRow {
            player: player.name.clone(),
            rating: round3(rating),
            mean: round3(mean),
            stddev: round3(stddev),
            game_count: entry.total_games(),
            places: format!(
                "[{}, {}, {}, {}]",
                entry.places[0], entry.places[1], entry.places[2], entry.places[3]
            ),
            last_game_date: last_game_date.format("%Y-%m-%d").to_string(),
            event_game_counts: events
                .into_iter()
                .map(|((generation, event_id), count)| {
                    format!("{generation}_{event_id} -> {count}")
                })
                .collect(),
            old_ids: format_ids(&player.old_ids),
            new_ids: format_ids(&player.new_ids),
        });
    }

    rows.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.player.cmp(&b.player))
    });
    Ok(rows)
}

/// Count games per event across the whole merged history.
pub fn tournament_entries(games: &[Game]) -> Vec<TournamentEntry> {
    let mut counts: BTreeMap<(Generation, i64), u32> = BTreeMap::new();
    for game in games {
        *counts.entry((game.generation, game.event_id)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((pantheon_type, pantheon_id), game_count)| TournamentEntry {
            pantheon_type,
            pantheon_id,
            game_count,
        })
        .collect()
}

/// Write the full export document. The leaderboard section is keyed by the
/// model's name, so exports from different models stay distinguishable.
pub fn write_export(
    path: impl AsRef<Path>,
    model_name: &str,
    games: &[Game],
    rows: &[LeaderboardRow],
) -> Result<()> {
    let path = path.as_ref();
    let mut document = serde_json::Map::new();
    document.insert(
        "tournament_ids".to_string(),
        serde_json::to_value(tournament_entries(games))?,
    );
    document.insert(model_name.to_string(), serde_json::to_value(rows)?);

    let file = File::create(path)
        .with_context(|| format!("failed to create export file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &document)?;
    info!(model = model_name, rows = rows.len(), path = %path.display(), "leaderboard exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn stats_with(
        games: u32,
        rating: f64,
        last: &str,
    ) -> PlayerStats<f64> {
        let mut stats = PlayerStats::new(rating);
        stats.places = [games, 0, 0, 0];
        stats.rating_for_sorting = Some(rating);
        stats.mean_and_stddev = Some((rating, 0.0));
        stats.last_game_date =
            Some(NaiveDateTime::parse_from_str(last, "%Y-%m-%d %H:%M:%S").unwrap());
        stats.event_game_counts.insert((Generation::Old, 142), games);
        stats
    }

    #[test]
    fn test_leaderboard_filters_and_orders() {
        let mut stats = HashMap::new();
        stats.insert(
            Arc::new(Player::from_old("Veteran", 1)),
            stats_with(25, 1540.0, "2024-05-01 19:00:00"),
        );
        stats.insert(
            Arc::new(Player::from_old("Champion", 2)),
            stats_with(40, 1611.5, "2024-05-01 19:00:00"),
        );
        stats.insert(
            Arc::new(Player::from_old("Newcomer", 3)),
            stats_with(3, 1700.0, "2024-05-01 19:00:00"),
        );
        let sub = Player {
            name: "Replacement player (id 9)".to_string(),
            old_ids: vec![9],
            new_ids: Vec::new(),
            is_replacement: true,
        };
        stats.insert(Arc::new(sub), stats_with(50, 1800.0, "2024-05-01 19:00:00"));

        let rows = build_leaderboard(&stats, DEFAULT_MIN_GAMES).unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["Champion", "Veteran"]);
        assert_eq!(rows[0].rating, 1611.5);
        assert_eq!(rows[0].game_count, 40);
        assert_eq!(rows[0].places, "[40, 0, 0, 0]");
        assert_eq!(rows[0].last_game_date, "2024-05-01");
        assert_eq!(rows[0].event_game_counts, vec!["old_142 -> 40"]);
        assert_eq!(rows[0].old_ids.as_deref(), Some("[2]"));
        assert_eq!(rows[0].new_ids, None);
    }

    #[test]
    fn test_event_counts_old_generation_first() {
        let mut stats = HashMap::new();
        let mut entry = stats_with(12, 1500.0, "2024-05-01 19:00:00");
        entry.event_game_counts.insert((Generation::New, 7), 4);
        entry.event_game_counts.insert((Generation::New, 215), 2);
        stats.insert(Arc::new(Player::from_old("Alice", 1)), entry);

        let rows = build_leaderboard(&stats, DEFAULT_MIN_GAMES).unwrap();

        assert_eq!(
            rows[0].event_game_counts,
            vec!["old_142 -> 12", "new_7 -> 4", "new_215 -> 2"]
        );
    }

    #[test]
    fn test_ratings_are_rounded() {
        let mut stats = HashMap::new();
        stats.insert(
            Arc::new(Player::from_old("Alice", 1)),
            stats_with(10, 1534.56789, "2024-05-01 19:00:00"),
        );

        let rows = build_leaderboard(&stats, DEFAULT_MIN_GAMES).unwrap();
        assert_eq!(rows[0].rating, 1534.568);
        assert_eq!(rows[0].mean, 1534.568);
    }

    #[test]
    fn test_tournament_entries_sorted() {
        use crate::types::Game;
        use std::sync::Arc;

        let players = [
            Arc::new(Player::from_old("A", 1)),
            Arc::new(Player::from_old("B", 2)),
            Arc::new(Player::from_old("C", 3)),
            Arc::new(Player::from_old("D", 4)),
        ];
        let base = Game {
            generation: Generation::New,
            event_id: 215,
            session_id: 1,
            session_date: NaiveDateTime::parse_from_str(
                "2024-05-01 19:00:00",
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap(),
            players,
            places: [1, 2, 3, 4],
            scores: [40000.0, 20000.0, 0.0, -20000.0],
        };
        let mut old_game = base.clone();
        old_game.generation = Generation::Old;
        old_game.event_id = 142;

        let entries = tournament_entries(&[base.clone(), old_game, base]);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pantheon_type, Generation::Old);
        assert_eq!(entries[0].pantheon_id, 142);
        assert_eq!(entries[0].game_count, 1);
        assert_eq!(entries[1].pantheon_type, Generation::New);
        assert_eq!(entries[1].game_count, 2);
    }
}
