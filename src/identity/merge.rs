//! Cross-generation identity merge
//!
//! After each generation has been canonicalized on its own, players still
//! carry only one generation's identifiers. This step indexes id lists by
//! canonical name and backfills the missing generation's list on every
//! player, rewriting games to share one merged instance per human.

use crate::error::{RatingError, Result};
use crate::types::{Game, Player, PlayerId, Provenance};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Merge old- and new-generation identity knowledge across all games.
///
/// Idempotent: running it on an already-merged corpus changes nothing and
/// raises no error. Fails if a player already carries an id list that
/// disagrees with the one computed from the corpus, which indicates the
/// input was not deduplicated.
pub fn merge_generations(games: &mut [Game]) -> Result<()> {
    let mut old_ids_by_name: HashMap<String, Vec<PlayerId>> = HashMap::new();
    let mut new_ids_by_name: HashMap<String, Vec<PlayerId>> = HashMap::new();

    for game in games.iter() {
        for player in &game.players {
            if player.is_replacement {
                continue;
            }
            if !player.old_ids.is_empty() {
                match old_ids_by_name.get(&player.name) {
                    Some(known) if known != &player.old_ids => {
                        return Err(RatingError::MergeConflict {
                            message: format!(
                                "player '{}' carries old ids {:?}, corpus says {:?}",
                                player.name, player.old_ids, known
                            ),
                        }
                        .into());
                    }
                    Some(_) => {}
                    None => {
                        old_ids_by_name.insert(player.name.clone(), player.old_ids.clone());
                    }
                }
            }
            if !player.new_ids.is_empty() {
                match new_ids_by_name.get(&player.name) {
                    Some(known) if known != &player.new_ids => {
                        return Err(RatingError::MergeConflict {
                            message: format!(
                                "player '{}' carries new ids {:?}, corpus says {:?}",
                                player.name, player.new_ids, known
                            ),
                        }
                        .into());
                    }
                    Some(_) => {}
                    None => {
                        new_ids_by_name.insert(player.name.clone(), player.new_ids.clone());
                    }
                }
            }
        }
    }
    info!(
        "indexed {} old names and {} new names for the merge",
        old_ids_by_name.len(),
        new_ids_by_name.len()
    );

    // One merged instance per canonical name, shared by every game.
    let mut merged: HashMap<String, Arc<Player>> = HashMap::new();
    for game in games.iter_mut() {
        for seat in game.players.iter_mut() {
            if seat.is_replacement {
                continue;
            }
            let old_ids = old_ids_by_name
                .get(&seat.name)
                .cloned()
                .unwrap_or_default();
            let new_ids = new_ids_by_name
                .get(&seat.name)
                .cloned()
                .unwrap_or_default();
            if !seat.old_ids.is_empty() && seat.old_ids != old_ids {
                return Err(RatingError::MergeConflict {
                    message: format!("player '{}' old ids diverge from the corpus", seat.name),
                }
                .into());
            }
            if !seat.new_ids.is_empty() && seat.new_ids != new_ids {
                return Err(RatingError::MergeConflict {
                    message: format!("player '{}' new ids diverge from the corpus", seat.name),
                }
                .into());
            }
            let player = merged.entry(seat.name.clone()).or_insert_with(|| {
                Arc::new(Player {
                    name: seat.name.clone(),
                    old_ids,
                    new_ids,
                    is_replacement: false,
                })
            });
            *seat = player.clone();
        }
    }

    let mut old_only = 0usize;
    let mut new_only = 0usize;
    let mut both = 0usize;
    for player in merged.values() {
        match player.provenance() {
            Some(Provenance::OldOnly) => old_only += 1,
            Some(Provenance::NewOnly) => new_only += 1,
            Some(Provenance::Both) => both += 1,
            None => {}
        }
    }
    info!(
        "merged {} players: {} old-only, {} new-only, {} in both generations",
        merged.len(),
        old_only,
        new_only,
        both
    );
    Ok(())
}
