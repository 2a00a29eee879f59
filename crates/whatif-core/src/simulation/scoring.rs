//! Fate scoring

use crate::mode::SimulationMode;
use crate::procedural::unit_hash;

const BASE_SCORE: i32 = 50;
const KEYWORD_WEIGHT: i32 = 5;
const RANDOM_JITTER: i32 = 20;

const POSITIVE: [&str; 7] = ["success", "happy", "achieve", "win", "love", "prosper", "fulfill"];
const NEGATIVE: [&str; 6] = ["fail", "regret", "lose", "struggle", "miss", "difficult"];

/// Score a branch in `0..=100` from its key events
///
/// Each event adds 5 per positive keyword it contains and subtracts 5 per
/// negative one. Random mode adds a jitter in `[-20, 20]` derived from `seed`,
/// so the same branch always scores the same.
pub fn fate_score(key_events: &[String], mode: SimulationMode, seed: &[&str]) -> u8 {
    let mut score = BASE_SCORE;
    for event in key_events {
        let lower = event.to_lowercase();
        score += KEYWORD_WEIGHT * POSITIVE.iter().filter(|k| lower.contains(*k)).count() as i32;
        score -= KEYWORD_WEIGHT * NEGATIVE.iter().filter(|k| lower.contains(*k)).count() as i32;
    }

    if mode == SimulationMode::Random {
        let span = (2 * RANDOM_JITTER + 1) as f64;
        score += (unit_hash(seed) * span).floor() as i32 - RANDOM_JITTER;
    }

    score.clamp(0, 100) as u8
}
