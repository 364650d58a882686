use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, CharacterEntry};
use crate::engine::ledger::SessionLedger;
use crate::session::question::{Direction, GameMode};

/// One answered test question, as shown to the user afterwards.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct QuestionDetail {
    pub character: String,
    pub romanization: String,
    pub mode: GameMode,
    pub user_answer: String,
    pub is_correct: bool,
    pub time_spent_seconds: f64,
}

/// Immutable record of one finished timed test.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TestResult {
    pub id: String,
    pub date: DateTime<Utc>,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub total_time_seconds: f64,
    pub score_percent: u32,
    pub questions: Vec<QuestionDetail>,
}

impl TestResult {
    /// Zip the ledger's parallel histories into per-question details,
    /// sliced to the question budget. Reverse prompts are romanizations, so
    /// the character shown is recovered through the primary reverse lookup.
    pub fn from_ledger(
        id: String,
        ledger: &SessionLedger,
        pool: &[CharacterEntry],
        question_count: usize,
        total_time_seconds: f64,
    ) -> Self {
        let count = question_count.min(ledger.character_history.len());
        let mut questions = Vec::with_capacity(count);
        for i in 0..count {
            let prompt = &ledger.character_history[i];
            let mode = ledger.mode_history[i];
            let (character, romanization) = match mode.direction() {
                Direction::Forward => (
                    prompt.clone(),
                    catalog::romanization_of(pool, prompt)
                        .map(str::to_string)
                        .unwrap_or_default(),
                ),
                Direction::Reverse => (
                    catalog::primary_character(pool, prompt)
                        .map(str::to_string)
                        .unwrap_or_default(),
                    prompt.clone(),
                ),
            };
            questions.push(QuestionDetail {
                character,
                romanization,
                mode,
                user_answer: ledger.answer_history[i].clone(),
                is_correct: ledger.outcome_history[i],
                time_spent_seconds: ledger.latency_samples.get(i).copied().unwrap_or(0.0),
            });
        }

        let correct_answers = questions.iter().filter(|q| q.is_correct).count() as u32;
        let wrong_answers = count as u32 - correct_answers;
        Self {
            id,
            date: Utc::now(),
            total_questions: question_count as u32,
            correct_answers,
            wrong_answers,
            total_time_seconds,
            score_percent: score_percent(correct_answers, question_count as u32),
            questions,
        }
    }
}

fn score_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    }
}

/// Mint a time-derived id that no stored result already uses.
pub fn unique_id(history: &[TestResult]) -> String {
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let id = stamp.to_string();
        if history.iter().all(|result| result.id != id) {
            return id;
        }
        stamp += 1;
    }
}
