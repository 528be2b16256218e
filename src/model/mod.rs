//! Rating model capability contract and its variants
//!
//! The replay engine is generic over this trait and never inspects a
//! concrete variant. Variants differ only in the rating value's shape and
//! in the math of `process_game`; the surrounding engine is identical for
//! all of them.

pub mod bradley_terry;
pub mod elo;
pub mod plackett_luce;
pub mod true_skill;

pub use bradley_terry::BradleyTerryModel;
pub use elo::{EloConfig, EloModel};
pub use plackett_luce::{PlackettLuceConfig, PlackettLuceModel, PlackettLuceRating};
pub use true_skill::TrueSkillModel;

use clap::ValueEnum;

/// Interchangeable rating algorithm.
///
/// `process_game` receives the pre-game ratings of the active participants of
/// one match, ordered by descending score (ties broken by player name), and
/// returns their post-game ratings in the same order. Implementations must
/// treat zero or one participant as a no-op and must only ever see pre-game
/// state: the engine writes all returned ratings back at once.
pub trait RatingModel {
    /// Opaque per-player rating value.
    type Rating: Clone;

    /// Initial rating for a player with no history.
    fn new_rating(&self) -> Self::Rating;

    /// Post-game ratings for one match, same order as the input.
    fn process_game(&self, old_ratings: &[Self::Rating], scores: &[f64]) -> Vec<Self::Rating>;

    /// Conservative scalar for leaderboard ordering.
    fn rating_for_sorting(&self, rating: &Self::Rating) -> f64;

    /// Diagnostic decomposition; deterministic models return (rating, 0.0).
    fn mean_and_stddev(&self, rating: &Self::Rating) -> (f64, f64);

    /// Inactivity decay for `days` elapsed since the previous match. A no-op
    /// is a valid implementation. `days` must not be negative.
    fn adjust(&self, rating: &mut Self::Rating, days: i64);
}

/// Which rating algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    Elo,
    #[value(name = "trueskill")]
    TrueSkill,
    #[value(name = "plackett_luce")]
    PlackettLuce,
    #[value(name = "bradley_terry")]
    BradleyTerry,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Elo => write!(f, "elo"),
            ModelKind::TrueSkill => write!(f, "trueskill"),
            ModelKind::PlackettLuce => write!(f, "plackett_luce"),
            ModelKind::BradleyTerry => write!(f, "bradley_terry"),
        }
    }
}

/// Uncertainty growth applied to Bayesian ratings after a period of
/// inactivity. No decay inside the grace period.
#[derive(Debug, Clone, Copy)]
pub struct DecayConfig {
    /// Days of inactivity before uncertainty starts growing
    pub grace_days: i64,
    /// Uncertainty added per day past the grace period
    pub sigma_growth_per_day: f64,
}

impl DecayConfig {
    /// Extra uncertainty for `days` of inactivity.
    pub fn sigma_growth(&self, days: i64) -> f64 {
        debug_assert!(days >= 0, "elapsed days must not be negative");
        if days <= self.grace_days {
            return 0.0;
        }
        self.sigma_growth_per_day * (days - self.grace_days) as f64
    }
}

/// Competition ranks (1 = best) from score-descending input; equal scores
/// share a rank.
pub(crate) fn ranks_from_scores(scores: &[f64]) -> Vec<usize> {
    scores
        .iter()
        .map(|s| 1 + scores.iter().filter(|o| **o > *s).count())
        .collect()
}
