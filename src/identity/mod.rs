//! Identity resolution across two generations of the source database
//!
//! This module canonicalizes raw per-generation player records into
//! deduplicated player entities and merges identity knowledge across
//! generations, so that the same human compares equal in every game.

pub mod merge;
pub mod resolver;

pub use merge::merge_generations;
pub use resolver::IdentityResolver;
