//! Pairwise Elo over four-player matches
//!
//! Each match is treated as the sum of pairwise duels between every ordered
//! pair of active participants. The expected-score formula saturates the
//! effective rating gap at a fixed ceiling so an extreme gap never yields
//! more than a bounded expected-outcome shift.

use crate::error::{RatingError, Result};
use crate::model::RatingModel;
use serde::{Deserialize, Serialize};

/// Elo parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EloConfig {
    /// Rating for new players
    pub start_rating: f64,
    /// K-factor applied to every pairwise exchange
    pub k: f64,
    /// Ceiling on the effective rating gap in the expected-score formula
    pub max_rating_diff: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            start_rating: 1500.0,
            k: 10.0,
            max_rating_diff: 400.0,
        }
    }
}

impl EloConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.k <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Elo K-factor must be positive".to_string(),
            }
            .into());
        }
        if self.max_rating_diff <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Elo rating-gap ceiling must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Deterministic pairwise Elo model.
#[derive(Debug, Clone)]
pub struct EloModel {
    config: EloConfig,
}

impl EloModel {
    pub fn new(config: EloConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Outcome of one duel by score comparison: win 1.0, loss 0.0, tie 0.5.
    fn outcome(score_one: f64, score_two: f64) -> f64 {
        if score_one > score_two {
            1.0
        } else if score_one < score_two {
            0.0
        } else {
            0.5
        }
    }

    /// Expected score of the first player against the second, with the
    /// rating gap capped at the configured ceiling.
    fn expected(&self, rating_one: f64, rating_two: f64) -> f64 {
        let gap = (rating_two - rating_one).min(self.config.max_rating_diff);
        1.0 / (1.0 + 10f64.powf(gap / self.config.max_rating_diff))
    }
}

impl Default for EloModel {
    fn default() -> Self {
        Self {
            config: EloConfig::default(),
        }
    }
}

impl RatingModel for EloModel {
    type Rating = f64;

    fn new_rating(&self) -> f64 {
        self.config.start_rating
    }

    fn process_game(&self, old_ratings: &[f64], scores: &[f64]) -> Vec<f64> {
        let n = old_ratings.len();
        debug_assert_eq!(scores.len(), n);
        if n <= 1 {
            return old_ratings.to_vec();
        }

        let mut deltas = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let expected = self.expected(old_ratings[i], old_ratings[j]);
                let actual = Self::outcome(scores[i], scores[j]);
                deltas[i] += self.config.k * (actual - expected);
            }
        }

        old_ratings
            .iter()
            .zip(deltas.iter())
            .map(|(r, d)| r + d)
            .collect()
    }

    fn rating_for_sorting(&self, rating: &f64) -> f64 {
        *rating
    }

    fn mean_and_stddev(&self, rating: &f64) -> (f64, f64) {
        (*rating, 0.0)
    }

    fn adjust(&self, _rating: &mut f64, days: i64) {
        // Elo carries no uncertainty, so inactivity does not decay it.
        debug_assert!(days >= 0, "elapsed days must not be negative");
    }
}
