use std::collections::HashSet;

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, CharacterEntry};
use crate::generator;

/// Number of answer options in pick modes: one correct, two distractors.
pub const OPTION_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    Pick,
    ReversePick,
    Writing,
}

impl GameMode {
    pub fn direction(self) -> Direction {
        match self {
            GameMode::Pick => Direction::Forward,
            GameMode::ReversePick | GameMode::Writing => Direction::Reverse,
        }
    }

    /// Writing mode shows no option buttons; submissions are auto-accepted.
    pub fn has_options(self) -> bool {
        !matches!(self, GameMode::Writing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// The current question. Replaced wholesale on every advance.
#[derive(Clone, Debug)]
pub struct QuestionState {
    pub prompt: String,
    pub answer: String,
    pub mode: GameMode,
    pub options: Vec<String>,
    /// Wrong values already submitted for this question; disabled until
    /// the question advances.
    pub rejected: HashSet<String>,
}

impl QuestionState {
    pub fn direction(&self) -> Direction {
        self.mode.direction()
    }
}

/// Build the next question. The prompt is drawn uniformly from the pool
/// and resampled while it equals `previous`; the guard is only honored
/// when the pool has at least two distinct prompt values. Returns None
/// on an empty pool.
pub fn next_question(
    pool: &[CharacterEntry],
    mode: GameMode,
    previous: Option<&str>,
    rng: &mut SmallRng,
) -> Option<QuestionState> {
    let entry = pick_prompt_entry(pool, mode.direction(), previous, rng)?;

    let (prompt, answer) = match mode.direction() {
        Direction::Forward => (entry.character.clone(), entry.romanization.clone()),
        Direction::Reverse => {
            // Several characters may share this romanization; the primary
            // mapping is the one canonical answer.
            let answer = catalog::primary_character(pool, &entry.romanization)
                .unwrap_or(entry.character.as_str())
                .to_string();
            (entry.romanization.clone(), answer)
        }
    };

    let options = if mode.has_options() {
        let candidates: Vec<&str> = match mode.direction() {
            Direction::Forward => pool.iter().map(|e| e.romanization.as_str()).collect(),
            // Reverse candidates come from the primary mapping only, so the
            // same question can never flip-flop between duplicate characters.
            Direction::Reverse => pool
                .iter()
                .filter(|e| {
                    catalog::primary_character(pool, &e.romanization) == Some(e.character.as_str())
                })
                .map(|e| e.character.as_str())
                .collect(),
        };
        generator::option_set(&candidates, &answer, OPTION_COUNT, rng)
    } else {
        Vec::new()
    };

    Some(QuestionState {
        prompt,
        answer,
        mode,
        options,
        rejected: HashSet::new(),
    })
}

/// Uniform draw over the pool with the no-immediate-repeat guard.
pub(crate) fn pick_prompt_entry<'a>(
    pool: &'a [CharacterEntry],
    direction: Direction,
    previous: Option<&str>,
    rng: &mut SmallRng,
) -> Option<&'a CharacterEntry> {
    if pool.is_empty() {
        return None;
    }

    let prompt_of = |entry: &'a CharacterEntry| -> &'a str {
        match direction {
            Direction::Forward => entry.character.as_str(),
            Direction::Reverse => entry.romanization.as_str(),
        }
    };

    let distinct: HashSet<&str> = pool.iter().map(prompt_of).collect();
    let guard = distinct.len() > 1;

    loop {
        let entry = &pool[rng.gen_range(0..pool.len())];
        if guard && previous == Some(prompt_of(entry)) {
            continue;
        }
        return Some(entry);
    }
}
