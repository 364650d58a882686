use std::collections::HashSet;

use rand::Rng;
use rand::rngs::SmallRng;

/// Sample up to `count` distinct wrong values from `candidates`: duplicates
/// and anything equal to `correct` are excluded first, then a partial
/// Fisher–Yates pass picks without replacement. Returns fewer than `count`
/// values when the pool cannot supply them; never fails.
pub fn sample_distractors(
    candidates: &[&str],
    correct: &str,
    count: usize,
    rng: &mut SmallRng,
) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for &value in candidates {
        if value != correct && seen.insert(value) {
            distinct.push(value);
        }
    }

    let take = count.min(distinct.len());
    for i in 0..take {
        let j = rng.gen_range(i..distinct.len());
        distinct.swap(i, j);
    }
    distinct.truncate(take);
    distinct.into_iter().map(str::to_string).collect()
}

/// Build a full option set: `option_count - 1` distractors plus the correct
/// value, shuffled. The correct value is always a member.
pub fn option_set(
    candidates: &[&str],
    correct: &str,
    option_count: usize,
    rng: &mut SmallRng,
) -> Vec<String> {
    let mut options =
        sample_distractors(candidates, correct, option_count.saturating_sub(1), rng);
    options.push(correct.to_string());
    shuffle(&mut options, rng);
    options
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle(values: &mut [String], rng: &mut SmallRng) {
    for i in (1..values.len()).rev() {
        let j = rng.gen_range(0..=i);
        values.swap(i, j);
    }
}
