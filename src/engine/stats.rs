//! Per-player accumulated state during a replay

use crate::types::{EventId, Generation};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Everything the engine tracks for one player, generic over the rating
/// value of the active model.
#[derive(Debug, Clone)]
pub struct PlayerStats<R> {
    /// Current rating under the active model
    pub rating: R,
    /// Scalar for leaderboard ordering, cached after the replay finishes
    pub rating_for_sorting: Option<f64>,
    /// (mean, stddev) decomposition, cached after the replay finishes
    pub mean_and_stddev: Option<(f64, f64)>,
    /// Placement histogram: `places[p - 1]` counts finishes at place `p`
    pub places: [u32; 4],
    /// Date of the player's most recent match seen so far
    pub last_game_date: Option<NaiveDateTime>,
    /// Games played per event, keyed by generation and event id
    pub event_game_counts: HashMap<(Generation, EventId), u32>,
}

impl<R> PlayerStats<R> {
    pub fn new(rating: R) -> Self {
        Self {
            rating,
            rating_for_sorting: None,
            mean_and_stddev: None,
            places: [0; 4],
            last_game_date: None,
            event_game_counts: HashMap::new(),
        }
    }

    /// Total matches this player appears in.
    pub fn total_games(&self) -> u32 {
        self.places.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_games_sums_histogram() {
        let mut stats: PlayerStats<f64> = PlayerStats::new(1500.0);
        assert_eq!(stats.total_games(), 0);

        stats.places = [3, 1, 0, 2];
        assert_eq!(stats.total_games(), 6);
    }
}
