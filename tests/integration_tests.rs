//! Integration tests for the pantheon rating pipeline
//!
//! These tests validate the entire system working together, including:
//! - Snapshot parsing, identity resolution and cross-generation merging
//! - Chronological replay through every rating model
//! - Leaderboard construction and filtering

use chrono::{NaiveDate, NaiveDateTime};
use pantheon_rating::config::IdentityConfig;
use pantheon_rating::engine::calc_ratings;
use pantheon_rating::export::build_leaderboard;
use pantheon_rating::identity::{merge_generations, IdentityResolver};
use pantheon_rating::model::{
    BradleyTerryModel, EloModel, PlackettLuceModel, RatingModel, TrueSkillModel,
};
use pantheon_rating::snapshot::GameRecord;
use pantheon_rating::types::{Game, Generation};
use proptest::prelude::*;

fn identity_config() -> IdentityConfig {
    IdentityConfig {
        same_players: vec![vec!["Alice".to_string(), "alice_old_nick".to_string()]],
        replacement_names: vec!["Replacement player".to_string()],
    }
}

fn date(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Build a raw (unresolved) game the way the snapshot reader produces them.
fn raw_game(
    generation: Generation,
    session_id: i64,
    when: &str,
    seats: [(&str, i64); 4],
    scores: [f64; 4],
) -> Game {
    let record = GameRecord {
        pantheon_type: generation,
        event_id: 1,
        session_id,
        session_date: date(when),
        players: seats
            .iter()
            .map(|(name, id)| {
                let (old_ids, new_ids) = match generation {
                    Generation::Old => (vec![*id], vec![]),
                    Generation::New => (vec![], vec![*id]),
                };
                pantheon_rating::snapshot::PlayerRecord {
                    name: name.to_string(),
                    old_ids,
                    new_ids,
                }
            })
            .collect(),
        places: places_for(scores).to_vec(),
        scores: scores.to_vec(),
    };
    record.into_game(&identity_config()).unwrap()
}

fn places_for(scores: [f64; 4]) -> [u8; 4] {
    let mut order: Vec<usize> = (0..4).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut places = [0u8; 4];
    for (rank, seat) in order.into_iter().enumerate() {
        places[seat] = rank as u8 + 1;
    }
    places
}

/// A small two-generation history: Alice plays under two old ids and one
/// new id, everyone else keeps one account per generation.
fn sample_history() -> Vec<Game> {
    let config = identity_config();
    let resolver = IdentityResolver::new(&config).unwrap();

    let mut old_games = vec![
        raw_game(
            Generation::Old,
            1,
            "2019-03-01 19:00:00",
            [("Alice", 3), ("Bob", 4), ("Carol", 5), ("Dave", 6)],
            [45000.0, 15000.0, -5000.0, -15000.0],
        ),
        raw_game(
            Generation::Old,
            2,
            "2019-03-08 19:00:00",
            [("alice_old_nick", 9), ("Bob", 4), ("Carol", 5), ("Dave", 6)],
            [-10000.0, 50000.0, 10000.0, -10000.0],
        ),
    ];
    resolver
        .resolve_generation(&mut old_games, Generation::Old)
        .unwrap();

    let mut new_games = vec![raw_game(
        Generation::New,
        10,
        "2023-06-01 19:00:00",
        [("Alice", 21), ("Bob", 22), ("Carol", 23), ("Dave", 24)],
        [30000.0, 25000.0, -15000.0, 40000.0],
    )];
    resolver
        .resolve_generation(&mut new_games, Generation::New)
        .unwrap();

    let mut games = old_games;
    games.append(&mut new_games);
    merge_generations(&mut games).unwrap();
    games
}

#[test]
fn test_identity_survives_the_full_pipeline() {
    let games = sample_history();

    // One Alice across generations, carrying all three ids.
    let alice = games[0].players[0].clone();
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.old_ids, vec![3, 9]);
    assert_eq!(alice.new_ids, vec![21]);
    assert!(std::sync::Arc::ptr_eq(&alice, &games[1].players[0]));
    assert!(std::sync::Arc::ptr_eq(&alice, &games[2].players[0]));
}

#[test]
fn test_merge_is_idempotent() {
    let mut games = sample_history();
    let keys_before: Vec<_> = games
        .iter()
        .flat_map(|g| g.players.iter().map(|p| p.key()))
        .collect();

    merge_generations(&mut games).unwrap();

    let keys_after: Vec<_> = games
        .iter()
        .flat_map(|g| g.players.iter().map(|p| p.key()))
        .collect();
    assert_eq!(keys_before, keys_after);
}

#[test]
fn test_elo_replay_end_to_end() {
    let games = sample_history();
    let model = EloModel::default();
    let cutoff = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();

    let stats = calc_ratings(&games, &model, cutoff).unwrap();

    assert_eq!(stats.len(), 4);
    // Elo exchanges are zero-sum over the whole history.
    let delta_sum: f64 = stats.values().map(|s| s.rating - 1500.0).sum();
    assert!(delta_sum.abs() < 1e-9);

    for entry in stats.values() {
        assert_eq!(entry.total_games(), 3);
        assert_eq!(entry.last_game_date, Some(date("2023-06-01 19:00:00")));
        // Games in the old event plus games in the new event.
        assert_eq!(entry.event_game_counts[&(Generation::Old, 1)], 2);
        assert_eq!(entry.event_game_counts[&(Generation::New, 1)], 1);
    }
}

#[test]
fn test_cutoff_excludes_new_generation() {
    let games = sample_history();
    let model = EloModel::default();
    let cutoff = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    let stats = calc_ratings(&games, &model, cutoff).unwrap();

    for entry in stats.values() {
        assert_eq!(entry.total_games(), 2);
    }
}

#[test]
fn test_leaderboard_from_full_pipeline() {
    let games = sample_history();
    let model = EloModel::default();
    let cutoff = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();

    let stats = calc_ratings(&games, &model, cutoff).unwrap();
    let rows = build_leaderboard(&stats, 1).unwrap();

    assert_eq!(rows.len(), 4);
    // Rows are ordered best-first.
    for pair in rows.windows(2) {
        assert!(pair[0].rating >= pair[1].rating);
    }
    // Bob ends with the best cumulative record across the three games.
    assert_eq!(rows[0].player, "Bob");
    let alice = rows.iter().find(|r| r.player == "Alice").unwrap();
    assert_eq!(alice.old_ids.as_deref(), Some("[3, 9]"));
    assert_eq!(alice.new_ids.as_deref(), Some("[21]"));
    assert_eq!(alice.last_game_date, "2023-06-01");
}

#[test]
fn test_every_model_replays_the_history() {
    let games = sample_history();
    let cutoff = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();

    fn check<M: RatingModel>(games: &[Game], model: &M, cutoff: NaiveDate) {
        let stats = calc_ratings(games, model, cutoff).unwrap();
        assert_eq!(stats.len(), 4);
        for entry in stats.values() {
            assert!(entry.rating_for_sorting.is_some());
            assert!(entry.mean_and_stddev.is_some());
        }
        let rows = build_leaderboard(&stats, 1).unwrap();
        assert_eq!(rows.len(), 4);
    }

    check(&games, &EloModel::default(), cutoff);
    check(&games, &TrueSkillModel::new(), cutoff);
    check(&games, &PlackettLuceModel::new(), cutoff);
    check(&games, &BradleyTerryModel::new(), cutoff);
}

#[test]
fn test_replacement_seat_end_to_end() {
    let config = identity_config();
    let resolver = IdentityResolver::new(&config).unwrap();
    let mut games = vec![raw_game(
        Generation::New,
        1,
        "2023-06-01 19:00:00",
        [
            ("Alice", 21),
            ("Bob", 22),
            ("Carol", 23),
            ("Replacement player", 99),
        ],
        [40000.0, 20000.0, 0.0, -20000.0],
    )];
    resolver
        .resolve_generation(&mut games, Generation::New)
        .unwrap();
    merge_generations(&mut games).unwrap();

    let model = EloModel::default();
    let cutoff = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
    let stats = calc_ratings(&games, &model, cutoff).unwrap();
    let rows = build_leaderboard(&stats, 1).unwrap();

    // The stand-in keeps its histogram entry but never reaches the board.
    assert_eq!(stats.len(), 4);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| !r.player.starts_with("Replacement")));
}

proptest! {
    /// Elo pairwise exchanges are zero-sum for any score vector as long as
    /// all ratings stay inside the gap ceiling of each other.
    #[test]
    fn prop_elo_is_zero_sum(
        ratings in prop::collection::vec(1300.0f64..1700.0, 4),
        scores in prop::collection::vec(-50000.0f64..50000.0, 4),
    ) {
        let model = EloModel::default();
        let new = model.process_game(&ratings, &scores);
        let delta_sum: f64 = new.iter().zip(ratings.iter()).map(|(n, o)| n - o).sum();
        prop_assert!(delta_sum.abs() < 1e-9);
    }

    /// A strictly higher score never yields a smaller Elo delta when the
    /// players start equal.
    #[test]
    fn prop_elo_delta_follows_score(scores in prop::collection::vec(-50000.0f64..50000.0, 4)) {
        let model = EloModel::default();
        let old = vec![1500.0; 4];
        let new = model.process_game(&old, &scores);

        let mut indexed: Vec<usize> = (0..4).collect();
        indexed.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        let deltas: Vec<f64> = indexed.iter().map(|&i| new[i] - old[i]).collect();
        for pair in deltas.windows(2) {
            prop_assert!(pair[0] >= pair[1] - 1e-9);
        }
    }
}
