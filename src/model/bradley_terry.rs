//! Bradley-Terry-style Bayesian approximation model
//!
//! Wraps the Weng-Lin update from the skillratings crate, which applies the
//! Bradley-Terry pairwise-comparison model over a logistic distribution.
//! Like the TrueSkill variant, all active participants enter one joint
//! update as single-player teams ordered by rank.

use crate::model::{ranks_from_scores, DecayConfig, RatingModel};
use skillratings::weng_lin::{weng_lin_multi_team, WengLinConfig, WengLinRating};
use skillratings::MultiTeamOutcome;

#[derive(Debug, Clone)]
pub struct BradleyTerryModel {
    config: WengLinConfig,
    decay: DecayConfig,
}

impl BradleyTerryModel {
    pub fn new() -> Self {
        Self {
            config: WengLinConfig::new(),
            decay: DecayConfig {
                grace_days: 180,
                sigma_growth_per_day: 0.001,
            },
        }
    }
}

impl Default for BradleyTerryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingModel for BradleyTerryModel {
    type Rating = WengLinRating;

    fn new_rating(&self) -> WengLinRating {
        WengLinRating::new()
    }

    fn process_game(&self, old_ratings: &[WengLinRating], scores: &[f64]) -> Vec<WengLinRating> {
        debug_assert_eq!(scores.len(), old_ratings.len());
        if old_ratings.len() <= 1 {
            return old_ratings.to_vec();
        }

        let teams: Vec<[WengLinRating; 1]> = old_ratings.iter().map(|r| [*r]).collect();
        let ranks = ranks_from_scores(scores);
        let teams_and_ranks: Vec<(&[WengLinRating], MultiTeamOutcome)> = teams
            .iter()
            .zip(ranks.iter())
            .map(|(team, rank)| (&team[..], MultiTeamOutcome::new(*rank)))
            .collect();

        weng_lin_multi_team(&teams_and_ranks, &self.config)
            .into_iter()
            .map(|team| team[0])
            .collect()
    }

    fn rating_for_sorting(&self, rating: &WengLinRating) -> f64 {
        // Ordinal: mean minus three uncertainties.
        rating.rating - 3.0 * rating.uncertainty
    }

    fn mean_and_stddev(&self, rating: &WengLinRating) -> (f64, f64) {
        (rating.rating, rating.uncertainty)
    }

    fn adjust(&self, rating: &mut WengLinRating, days: i64) {
        rating.uncertainty += self.decay.sigma_growth(days);
    }
}
