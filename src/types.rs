//! Common types used throughout the rating pipeline

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Raw player identifier in one generation's id space
pub type PlayerId = i64;

/// Tournament/event identifier within one generation
pub type EventId = i64;

/// Match session identifier within one generation
pub type SessionId = i64;

/// One of the two independent, schema-incompatible snapshots of the source
/// scoring database, each with its own player-identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    Old,
    New,
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generation::Old => write!(f, "old"),
            Generation::New => write!(f, "new"),
        }
    }
}

/// Which generations a player's identity is known in.
///
/// Replaces the negative-id convention some historical exports used to mark
/// "old player absent from the new generation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    OldOnly,
    NewOnly,
    Both,
}

/// A canonical player identity.
///
/// Identity (equality and hashing) is defined by the pair of representative
/// ids, never by the display name: names are rewritten during canonicalization,
/// ids are not. Players are built by the identity resolver and are immutable
/// afterwards; games share them through `Arc`.
#[derive(Debug, Clone)]
pub struct Player {
    /// Canonical display name
    pub name: String,
    /// Identifiers in the old generation, ascending; the last one is the
    /// representative id
    pub old_ids: Vec<PlayerId>,
    /// Identifiers in the new generation, ascending; the last one is the
    /// representative id
    pub new_ids: Vec<PlayerId>,
    /// Anonymous stand-in for an unidentified substitute. Excluded from
    /// rating updates and identity merging.
    pub is_replacement: bool,
}

impl Player {
    /// Create a raw single-id player from the old generation.
    pub fn from_old(name: impl Into<String>, id: PlayerId) -> Self {
        Self {
            name: name.into(),
            old_ids: vec![id],
            new_ids: Vec::new(),
            is_replacement: false,
        }
    }

    /// Create a raw single-id player from the new generation.
    pub fn from_new(name: impl Into<String>, id: PlayerId) -> Self {
        Self {
            name: name.into(),
            old_ids: Vec::new(),
            new_ids: vec![id],
            is_replacement: false,
        }
    }

    /// Representative id in the old generation, if any.
    pub fn representative_old_id(&self) -> Option<PlayerId> {
        self.old_ids.last().copied()
    }

    /// Representative id in the new generation, if any.
    pub fn representative_new_id(&self) -> Option<PlayerId> {
        self.new_ids.last().copied()
    }

    /// Identity key: the pair of representative ids.
    pub fn key(&self) -> (Option<PlayerId>, Option<PlayerId>) {
        (self.representative_old_id(), self.representative_new_id())
    }

    /// Which generations this player carries ids for. `None` if the player
    /// carries no ids at all, which the resolver never produces.
    pub fn provenance(&self) -> Option<Provenance> {
        match (self.old_ids.is_empty(), self.new_ids.is_empty()) {
            (false, false) => Some(Provenance::Both),
            (false, true) => Some(Provenance::OldOnly),
            (true, false) => Some(Provenance::NewOnly),
            (true, true) => None,
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// An immutable record of one completed four-player match.
///
/// Placements and scores are parallel arrays aligned by index with the
/// players array. Placements must form a permutation of 1..=4; the engine
/// verifies this before processing.
#[derive(Debug, Clone)]
pub struct Game {
    pub generation: Generation,
    pub event_id: EventId,
    pub session_id: SessionId,
    pub session_date: NaiveDateTime,
    pub players: [Arc<Player>; 4],
    pub places: [u8; 4],
    pub scores: [f64; 4],
}
