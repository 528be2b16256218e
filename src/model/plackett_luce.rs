//! Plackett-Luce multi-way ranking model
//!
//! The Plackett-Luce variant of the Weng-Lin Bayesian approximation: a
//! single joint update over the full placement order of a match, instead of
//! a sum over pairwise comparisons. The skillratings crate only ships the
//! Bradley-Terry variant, so the closed-form Plackett-Luce update is
//! implemented here with the same rating shape and constants.

use crate::model::{ranks_from_scores, DecayConfig, RatingModel};
use serde::{Deserialize, Serialize};

/// The Plackett-Luce rating of a player.
///
/// The default rating is 25.0, the default uncertainty is 25/3 ≈ 8.33.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlackettLuceRating {
    /// The rating value (mu) of the player
    pub rating: f64,
    /// The uncertainty value (sigma) of the player
    pub uncertainty: f64,
}

impl PlackettLuceRating {
    pub const fn new() -> Self {
        Self {
            rating: 25.0,
            uncertainty: 25.0 / 3.0,
        }
    }
}

impl Default for PlackettLuceRating {
    fn default() -> Self {
        Self::new()
    }
}

/// Constants used in the Plackett-Luce calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlackettLuceConfig {
    /// The skill-class width, the rating difference needed for a ~67% win
    /// probability against another player. By default 25/6 ≈ 4.167.
    pub beta: f64,
    /// Lower bound on the uncertainty shrink factor, keeps sigma positive.
    pub kappa: f64,
}

impl PlackettLuceConfig {
    pub fn new() -> Self {
        Self {
            beta: 25.0 / 6.0,
            kappa: 0.0001,
        }
    }
}

impl Default for PlackettLuceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct PlackettLuceModel {
    config: PlackettLuceConfig,
    decay: DecayConfig,
}

impl PlackettLuceModel {
    pub fn new() -> Self {
        Self {
            config: PlackettLuceConfig::new(),
            decay: DecayConfig {
                grace_days: 180,
                sigma_growth_per_day: 0.0015,
            },
        }
    }
}

impl Default for PlackettLuceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingModel for PlackettLuceModel {
    type Rating = PlackettLuceRating;

    fn new_rating(&self) -> PlackettLuceRating {
        PlackettLuceRating::new()
    }

    fn process_game(
        &self,
        old_ratings: &[PlackettLuceRating],
        scores: &[f64],
    ) -> Vec<PlackettLuceRating> {
        debug_assert_eq!(scores.len(), old_ratings.len());
        let n = old_ratings.len();
        if n <= 1 {
            return old_ratings.to_vec();
        }

        let ranks = ranks_from_scores(scores);

        let c = old_ratings
            .iter()
            .map(|r| r.uncertainty.powi(2) + self.config.beta.powi(2))
            .sum::<f64>()
            .sqrt();
        let exp_mu: Vec<f64> = old_ratings.iter().map(|r| (r.rating / c).exp()).collect();

        // sum_q[q]: total strength of everyone placed at rank q or worse.
        let sum_q: Vec<f64> = (0..n)
            .map(|q| {
                (0..n)
                    .filter(|&i| ranks[i] >= ranks[q])
                    .map(|i| exp_mu[i])
                    .sum()
            })
            .collect();
        // a[q]: how many participants share rank q.
        let a: Vec<f64> = (0..n)
            .map(|q| (0..n).filter(|&i| ranks[i] == ranks[q]).count() as f64)
            .collect();

        let mut new_ratings = Vec::with_capacity(n);
        for i in 0..n {
            let mut omega_sum = 0.0;
            let mut delta_sum = 0.0;
            for q in 0..n {
                if ranks[q] > ranks[i] {
                    continue;
                }
                let quotient = exp_mu[i] / sum_q[q];
                if ranks[q] == ranks[i] {
                    omega_sum += (1.0 - quotient) / a[q];
                } else {
                    omega_sum -= quotient / a[q];
                }
                delta_sum += quotient * (1.0 - quotient) / a[q];
            }

            let sigma_sq = old_ratings[i].uncertainty.powi(2);
            let gamma = old_ratings[i].uncertainty / c;
            let new_mu = old_ratings[i].rating + sigma_sq / c * omega_sum;
            let shrink = (1.0 - gamma * sigma_sq / c.powi(2) * delta_sum).max(self.config.kappa);
            new_ratings.push(PlackettLuceRating {
                rating: new_mu,
                uncertainty: (sigma_sq * shrink).sqrt(),
            });
        }
        new_ratings
    }

    fn rating_for_sorting(&self, rating: &PlackettLuceRating) -> f64 {
        // Ordinal: mean minus three uncertainties.
        rating.rating - 3.0 * rating.uncertainty
    }

    fn mean_and_stddev(&self, rating: &PlackettLuceRating) -> (f64, f64) {
        (rating.rating, rating.uncertainty)
    }

    fn adjust(&self, rating: &mut PlackettLuceRating, days: i64) {
        rating.uncertainty += self.decay.sigma_growth(days);
    }
}
