//! TrueSkill team-ranking model
//!
//! Wraps the Gaussian TrueSkill joint multi-way update from the
//! skillratings crate: all active participants of a match enter one rating
//! update as single-player teams ordered by rank. Inactivity grows the
//! uncertainty after a grace period.

use crate::model::{ranks_from_scores, DecayConfig, RatingModel};
use skillratings::trueskill::{trueskill_multi_team, TrueSkillConfig, TrueSkillRating};
use skillratings::MultiTeamOutcome;

/// TrueSkill model with zero draw probability: a four-player match with
/// distinct scores has no draws, tied scores are expressed through ranks.
#[derive(Debug, Clone)]
pub struct TrueSkillModel {
    config: TrueSkillConfig,
    decay: DecayConfig,
}

impl TrueSkillModel {
    pub fn new() -> Self {
        Self {
            config: TrueSkillConfig {
                draw_probability: 0.0,
                ..TrueSkillConfig::new()
            },
            decay: DecayConfig {
                grace_days: 180,
                sigma_growth_per_day: 0.0005,
            },
        }
    }
}

impl Default for TrueSkillModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingModel for TrueSkillModel {
    type Rating = TrueSkillRating;

    fn new_rating(&self) -> TrueSkillRating {
        TrueSkillRating::new()
    }

    fn process_game(
        &self,
        old_ratings: &[TrueSkillRating],
        scores: &[f64],
    ) -> Vec<TrueSkillRating> {
        debug_assert_eq!(scores.len(), old_ratings.len());
        if old_ratings.len() <= 1 {
            return old_ratings.to_vec();
        }

        let teams: Vec<[TrueSkillRating; 1]> = old_ratings.iter().map(|r| [*r]).collect();
        let ranks = ranks_from_scores(scores);
        let teams_and_ranks: Vec<(&[TrueSkillRating], MultiTeamOutcome)> = teams
            .iter()
            .zip(ranks.iter())
            .map(|(team, rank)| (&team[..], MultiTeamOutcome::new(*rank)))
            .collect();

        trueskill_multi_team(&teams_and_ranks, &self.config)
            .into_iter()
            .map(|team| team[0])
            .collect()
    }

    fn rating_for_sorting(&self, rating: &TrueSkillRating) -> f64 {
        // Conservative estimate: mean minus three uncertainties.
        rating.rating - 3.0 * rating.uncertainty
    }

    fn mean_and_stddev(&self, rating: &TrueSkillRating) -> (f64, f64) {
        (rating.rating, rating.uncertainty)
    }

    fn adjust(&self, rating: &mut TrueSkillRating, days: i64) {
        rating.uncertainty += self.decay.sigma_growth(days);
    }
}
