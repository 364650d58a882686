use std::collections::HashMap;

use crate::engine::ledger::CharacterScore;

/// Correct:wrong ratio with typed zero-division sentinels so NaN and
/// infinity never reach persisted or displayed state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    Undefined,
    Infinite,
    Value(f64),
}

pub fn accuracy_percent(correct: u64, wrong: u64) -> f64 {
    let total = correct + wrong;
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

pub fn correct_wrong_ratio(correct: u64, wrong: u64) -> Ratio {
    match (correct, wrong) {
        (0, 0) => Ratio::Undefined,
        (_, 0) => Ratio::Infinite,
        _ => Ratio::Value(correct as f64 / wrong as f64),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencySummary {
    pub average_secs: f64,
    pub fastest_secs: f64,
    pub slowest_secs: f64,
}

/// Summarize positive latency samples; None when there are none.
pub fn latency_summary(samples: &[f64]) -> Option<LatencySummary> {
    let positive: Vec<f64> = samples.iter().copied().filter(|s| *s > 0.0).collect();
    if positive.is_empty() {
        return None;
    }
    let total: f64 = positive.iter().sum();
    let mut fastest = positive[0];
    let mut slowest = positive[0];
    for &sample in &positive[1..] {
        fastest = fastest.min(sample);
        slowest = slowest.max(sample);
    }
    Some(LatencySummary {
        average_secs: total / positive.len() as f64,
        fastest_secs: fastest,
        slowest_secs: slowest,
    })
}

/// Characters holding the highest correct count. Ties are all reported,
/// sorted for stable output; empty until something is answered correctly.
pub fn highest_correct(scores: &HashMap<String, CharacterScore>) -> Vec<&str> {
    highest_by(scores, |score| score.correct)
}

pub fn highest_wrong(scores: &HashMap<String, CharacterScore>) -> Vec<&str> {
    highest_by(scores, |score| score.wrong)
}

fn highest_by(
    scores: &HashMap<String, CharacterScore>,
    count: impl Fn(&CharacterScore) -> u32,
) -> Vec<&str> {
    let max = scores.values().map(&count).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    let mut tied: Vec<&str> = scores
        .iter()
        .filter(|(_, score)| count(score) == max)
        .map(|(character, _)| character.as_str())
        .collect();
    tied.sort_unstable();
    tied
}

pub fn total_characters_played(scores: &HashMap<String, CharacterScore>) -> u64 {
    scores
        .values()
        .map(|score| u64::from(score.correct) + u64::from(score.wrong))
        .sum()
}

pub fn unique_characters_played(scores: &HashMap<String, CharacterScore>) -> usize {
    scores.len()
}

/// Render a millisecond total as "2h 5m 31s", eliding leading zero parts.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
