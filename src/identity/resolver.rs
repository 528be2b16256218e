//! Within-generation canonicalization of raw player records
//!
//! Raw games carry one single-id player per seat. The resolver maps raw
//! names through the alias table, groups identifiers by canonical name,
//! elects one representative id per human and rewrites every game to share
//! one canonical `Player` instance per identity.

use crate::config::IdentityConfig;
use crate::error::{RatingError, Result};
use crate::types::{Game, Generation, Player, PlayerId, SessionId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Canonicalizes one generation's games in place.
pub struct IdentityResolver {
    aliases: HashMap<String, String>,
    config: IdentityConfig,
}

impl IdentityResolver {
    /// Create a resolver from a validated identity configuration.
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let aliases = config.alias_map()?;
        Ok(Self {
            aliases,
            config: config.clone(),
        })
    }

    /// Membership test for replacement players.
    pub fn is_replacement_name(&self, name: &str) -> bool {
        self.config.is_replacement_name(name)
    }

    /// The single raw id a not-yet-resolved player must carry in `generation`.
    fn raw_id(
        &self,
        player: &Player,
        generation: Generation,
        session_id: SessionId,
    ) -> Result<PlayerId> {
        let (own, other) = match generation {
            Generation::Old => (&player.old_ids, &player.new_ids),
            Generation::New => (&player.new_ids, &player.old_ids),
        };
        if own.len() != 1 || !other.is_empty() {
            return Err(RatingError::IdentityIntegrity {
                message: format!(
                    "player '{}' in session {} must carry exactly one {} id before resolution",
                    player.name, session_id, generation
                ),
            }
            .into());
        }
        Ok(own[0])
    }

    /// Canonicalize all players of one generation and rewrite the games'
    /// player references to shared canonical instances.
    ///
    /// Replacement players are never merged; each keeps its own identity
    /// under a name suffixed with the raw id.
    pub fn resolve_generation(&self, games: &mut [Game], generation: Generation) -> Result<()> {
        // Collect raw names by id, verifying that repeated sightings agree.
        let mut raw_names: HashMap<PlayerId, String> = HashMap::new();
        for game in games.iter() {
            for player in &game.players {
                let id = self.raw_id(player, generation, game.session_id)?;
                match raw_names.get(&id) {
                    Some(known) if known != &player.name => {
                        return Err(RatingError::IdentityIntegrity {
                            message: format!(
                                "{} id {} is claimed by both '{}' and '{}'",
                                generation, id, known, player.name
                            ),
                        }
                        .into());
                    }
                    Some(_) => {}
                    None => {
                        raw_names.insert(id, player.name.clone());
                    }
                }
            }
        }
        debug!(
            "found {} raw {} players across {} games",
            raw_names.len(),
            generation,
            games.len()
        );

        // Canonical name per id. Replacement ids get a unique suffixed name.
        let mut replacement_ids: HashSet<PlayerId> = HashSet::new();
        let mut canonical_names: HashMap<PlayerId, String> = HashMap::new();
        for (&id, name) in &raw_names {
            if self.is_replacement_name(name) {
                replacement_ids.insert(id);
                canonical_names.insert(id, format!("{} (id {})", name, id));
                info!("found replacement player: {} id {} '{}'", generation, id, name);
            } else {
                let canonical = self
                    .aliases
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| name.clone());
                canonical_names.insert(id, canonical);
            }
        }

        // Group non-replacement ids by canonical name.
        let mut ids_by_name: HashMap<String, Vec<PlayerId>> = HashMap::new();
        for (&id, name) in &canonical_names {
            if !replacement_ids.contains(&id) {
                ids_by_name.entry(name.clone()).or_default().push(id);
            }
        }

        for id in &replacement_ids {
            if ids_by_name.contains_key(&canonical_names[id]) {
                return Err(RatingError::IdentityIntegrity {
                    message: format!(
                        "replacement name '{}' collides with a canonical player name",
                        canonical_names[id]
                    ),
                }
                .into());
            }
        }

        // Elect one canonical player per name group: the largest id wins as
        // the representative, and the survivor absorbs all ids of the group.
        let mut canonical_by_id: HashMap<PlayerId, Arc<Player>> = HashMap::new();
        for (name, mut ids) in ids_by_name {
            ids.sort_unstable();
            if ids.len() > 1 {
                info!(
                    "several {} ids for player '{}': {:?}, choosing {}",
                    generation,
                    name,
                    ids,
                    ids.last().unwrap()
                );
            }
            let (old_ids, new_ids) = match generation {
                Generation::Old => (ids.clone(), Vec::new()),
                Generation::New => (Vec::new(), ids.clone()),
            };
            let player = Arc::new(Player {
                name,
                old_ids,
                new_ids,
                is_replacement: false,
            });
            for &id in &ids {
                if canonical_by_id.insert(id, player.clone()).is_some() {
                    return Err(RatingError::IdentityIntegrity {
                        message: format!(
                            "{} id {} is claimed by two canonical players",
                            generation, id
                        ),
                    }
                    .into());
                }
            }
        }
        for &id in &replacement_ids {
            let (old_ids, new_ids) = match generation {
                Generation::Old => (vec![id], Vec::new()),
                Generation::New => (Vec::new(), vec![id]),
            };
            let player = Arc::new(Player {
                name: canonical_names[&id].clone(),
                old_ids,
                new_ids,
                is_replacement: true,
            });
            if canonical_by_id.insert(id, player).is_some() {
                return Err(RatingError::IdentityIntegrity {
                    message: format!(
                        "{} replacement id {} is claimed by two canonical players",
                        generation, id
                    ),
                }
                .into());
            }
        }

        // Rewrite every game seat to the shared canonical instance.
        for game in games.iter_mut() {
            for seat in game.players.iter_mut() {
                let id = self.raw_id(seat, generation, game.session_id)?;
                let canonical =
                    canonical_by_id
                        .get(&id)
                        .ok_or_else(|| RatingError::IdentityIntegrity {
                            message: format!("{} id {} has no canonical player", generation, id),
                        })?;
                *seat = canonical.clone();
            }
        }

        let distinct: HashSet<_> = canonical_by_id.values().map(|p| p.key()).collect();
        info!(
            "resolved {} raw {} ids into {} canonical players",
            raw_names.len(),
            generation,
            distinct.len()
        );
        Ok(())
    }
}
