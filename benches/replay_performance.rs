//! Performance benchmarks for history replay

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pantheon_rating::engine::calc_ratings;
use pantheon_rating::model::{EloModel, PlackettLuceModel, TrueSkillModel};
use pantheon_rating::types::{Game, Generation, Player};
use std::sync::Arc;

/// A synthetic season: a fixed player pool rotating through four-player
/// tables, one session per day.
fn synthetic_history(games: usize, pool: usize) -> Vec<Game> {
    let players: Vec<Arc<Player>> = (0..pool)
        .map(|i| Arc::new(Player::from_new(format!("player{i}"), i as i64)))
        .collect();
    let start = NaiveDate::from_ymd_opt(2022, 1, 1)
        .unwrap()
        .and_hms_opt(19, 0, 0)
        .unwrap();

    (0..games)
        .map(|g| {
            let seats = [
                players[g % pool].clone(),
                players[(g + 1) % pool].clone(),
                players[(g + 11) % pool].clone(),
                players[(g + 23) % pool].clone(),
            ];
            let base = (g % 7) as f64 * 1000.0;
            Game {
                generation: Generation::New,
                event_id: (g / 64) as i64,
                session_id: g as i64,
                session_date: start + chrono::Duration::days(g as i64 / 8),
                players: seats,
                places: [1, 2, 3, 4],
                scores: [45000.0 - base, 15000.0, -5000.0, -15000.0 + base],
            }
        })
        .collect()
}

fn bench_replay(c: &mut Criterion) {
    let games = synthetic_history(1000, 40);
    let cutoff = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    c.bench_function("replay_1000_games_elo", |b| {
        let model = EloModel::default();
        b.iter(|| calc_ratings(black_box(&games), &model, cutoff).unwrap())
    });

    c.bench_function("replay_1000_games_trueskill", |b| {
        let model = TrueSkillModel::new();
        b.iter(|| calc_ratings(black_box(&games), &model, cutoff).unwrap())
    });

    c.bench_function("replay_1000_games_plackett_luce", |b| {
        let model = PlackettLuceModel::new();
        b.iter(|| calc_ratings(black_box(&games), &model, cutoff).unwrap())
    });
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
