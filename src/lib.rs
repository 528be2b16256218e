//! Pantheon Rating - Skill ratings for a two-generation mahjong game archive
//!
//! This crate replays the merged game history of two schema-incompatible
//! snapshots of a scoring database ("old" and "new" pantheons) through a
//! pluggable rating model and exports a leaderboard. Player identities are
//! canonicalized per generation and merged across generations first, so one
//! human is rated as one player regardless of duplicate accounts.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod identity;
pub mod model;
pub mod snapshot;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use engine::{calc_ratings, PlayerStats};
pub use identity::{merge_generations, IdentityResolver};
pub use model::{ModelKind, RatingModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
