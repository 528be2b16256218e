//! Rating engine: chronological replay and per-player state

pub mod replay;
pub mod stats;

pub use replay::calc_ratings;
pub use stats::PlayerStats;
