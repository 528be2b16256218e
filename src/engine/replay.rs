//! Chronological replay of the merged game history
//!
//! The engine validates every game, orders the history by session date and
//! feeds each match through the active rating model. Replacement players
//! accumulate placement statistics but never enter a rating update.

use crate::engine::stats::PlayerStats;
use crate::error::{RatingError, Result};
use crate::model::RatingModel;
use crate::types::{Game, Player};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Replay all games up to and including `date_to` and return the final
/// per-player state.
///
/// Games arriving in any order produce identical results: the history is
/// sorted by session date before processing (equal dates keep their input
/// order). Every participant gets a stats entry; only non-replacement
/// players are rated.
pub fn calc_ratings<M: RatingModel>(
    games: &[Game],
    model: &M,
    date_to: NaiveDate,
) -> Result<HashMap<Arc<Player>, PlayerStats<M::Rating>>> {
    for game in games {
        validate_places(game)?;
    }

    let mut ordered: Vec<&Game> = games
        .iter()
        .filter(|g| g.session_date.date() <= date_to)
        .collect();
    ordered.sort_by_key(|g| g.session_date);
    info!(
        total = games.len(),
        replayed = ordered.len(),
        date_to = %date_to,
        "replaying game history"
    );

    let mut stats: HashMap<Arc<Player>, PlayerStats<M::Rating>> = HashMap::new();
    for game in ordered {
        for player in &game.players {
            stats
                .entry(Arc::clone(player))
                .or_insert_with(|| PlayerStats::new(model.new_rating()));
        }

        // Active participants enter the rating update ordered by descending
        // score, ties broken by name.
        let mut active: Vec<usize> = (0..4).filter(|&i| !game.players[i].is_replacement).collect();
        active.sort_by(|&a, &b| {
            game.scores[b]
                .total_cmp(&game.scores[a])
                .then_with(|| game.players[a].name.cmp(&game.players[b].name))
        });

        let game_date = game.session_date.date();
        let mut old_ratings = Vec::with_capacity(active.len());
        let mut scores = Vec::with_capacity(active.len());
        for &seat in &active {
            let entry = stats
                .get_mut(&game.players[seat])
                .ok_or_else(|| RatingError::EngineInvariant {
                    message: format!("missing stats entry for {}", game.players[seat].name),
                })?;
            if let Some(last) = entry.last_game_date {
                let days = (game_date - last.date()).num_days();
                if days < 0 {
                    return Err(RatingError::EngineInvariant {
                        message: format!(
                            "game history not chronological around session {}",
                            game.session_id
                        ),
                    }
                    .into());
                }
                model.adjust(&mut entry.rating, days);
            }
            *entry
                .event_game_counts
                .entry((game.generation, game.event_id))
                .or_insert(0) += 1;
            old_ratings.push(entry.rating.clone());
            scores.push(game.scores[seat]);
        }

        let new_ratings = model.process_game(&old_ratings, &scores);
        if new_ratings.len() != active.len() {
            return Err(RatingError::EngineInvariant {
                message: format!(
                    "model returned {} ratings for {} participants in session {}",
                    new_ratings.len(),
                    active.len(),
                    game.session_id
                ),
            }
            .into());
        }
        for (&seat, rating) in active.iter().zip(new_ratings) {
            if let Some(entry) = stats.get_mut(&game.players[seat]) {
                entry.rating = rating;
            }
        }

        // Placement histogram and recency cover every seat, replacement
        // stand-ins included.
        for seat in 0..4 {
            if let Some(entry) = stats.get_mut(&game.players[seat]) {
                entry.places[usize::from(game.places[seat]) - 1] += 1;
                entry.last_game_date = Some(game.session_date);
            }
        }
    }

    // Bring every rated player's inactivity decay up to the cutoff, then
    // cache the scalar views the exporters read.
    for (player, entry) in stats.iter_mut() {
        if !player.is_replacement {
            if let Some(last) = entry.last_game_date {
                let days = (date_to - last.date()).num_days();
                if days > 0 {
                    model.adjust(&mut entry.rating, days);
                }
            }
        }
        entry.rating_for_sorting = Some(model.rating_for_sorting(&entry.rating));
        entry.mean_and_stddev = Some(model.mean_and_stddev(&entry.rating));
    }

    debug!(players = stats.len(), "replay finished");
    Ok(stats)
}

fn validate_places(game: &Game) -> Result<()> {
    let mut seen = [false; 4];
    for &place in &game.places {
        if !(1..=4).contains(&place) || seen[usize::from(place) - 1] {
            return Err(RatingError::MalformedGame {
                session_id: game.session_id,
                message: format!("places {:?} are not a permutation of 1..=4", game.places),
            }
            .into());
        }
        seen[usize::from(place) - 1] = true;
    }
    Ok(())
}
