use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::question::GameMode;

/// Per-character tally. Accuracy is recomputed on every update so the
/// stored value never goes stale.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CharacterScore {
    pub correct: u32,
    pub wrong: u32,
    pub accuracy: f64,
}

impl CharacterScore {
    pub fn recompute_accuracy(&mut self) {
        let total = self.correct + self.wrong;
        self.accuracy = if total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(total)
        };
    }
}

/// Session-scoped running totals. The four parallel histories are the
/// source of truth for reconstructing a test's question-by-question
/// detail and always have equal length.
#[derive(Clone, Debug, Default)]
pub struct SessionLedger {
    pub correct_answers: u32,
    pub wrong_answers: u32,
    /// Correct minus wrong, floored at zero.
    pub score: u32,
    /// Seconds per correct answer, in answer order. Wrong answers record
    /// no sample.
    pub latency_samples: Vec<f64>,
    pub character_history: Vec<String>,
    pub mode_history: Vec<GameMode>,
    pub answer_history: Vec<String>,
    pub outcome_history: Vec<bool>,
    pub character_scores: HashMap<String, CharacterScore>,
    pub elapsed_ms: u64,
    // Countdown-challenge counters; display-only, never merged.
    pub timed_correct: u32,
    pub timed_wrong: u32,
    pub streak: u32,
}

impl SessionLedger {
    pub fn record_correct(&mut self, character: &str, mode: GameMode, answer: &str, latency_secs: f64) {
        self.correct_answers += 1;
        self.score += 1;
        self.latency_samples.push(latency_secs);
        self.push_history(character, mode, answer, true);
        let entry = self.character_scores.entry(character.to_string()).or_default();
        entry.correct += 1;
        entry.recompute_accuracy();
    }

    pub fn record_wrong(&mut self, character: &str, mode: GameMode, answer: &str) {
        self.wrong_answers += 1;
        self.score = self.score.saturating_sub(1);
        self.push_history(character, mode, answer, false);
        let entry = self.character_scores.entry(character.to_string()).or_default();
        entry.wrong += 1;
        entry.recompute_accuracy();
    }

    fn push_history(&mut self, character: &str, mode: GameMode, answer: &str, correct: bool) {
        self.character_history.push(character.to_string());
        self.mode_history.push(mode);
        self.answer_history.push(answer.to_string());
        self.outcome_history.push(correct);
    }

    pub fn answered(&self) -> usize {
        (self.correct_answers + self.wrong_answers) as usize
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_timed_correct(&mut self) {
        self.timed_correct += 1;
        self.streak += 1;
    }

    pub fn record_timed_wrong(&mut self) {
        self.timed_wrong += 1;
        self.streak = 0;
    }

    pub fn reset_timed(&mut self) {
        self.timed_correct = 0;
        self.timed_wrong = 0;
        self.streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_answer_updates_all_ledgers() {
        let mut ledger = SessionLedger::default();
        ledger.record_correct("あ", GameMode::Pick, "a", 1.2);

        assert_eq!(ledger.correct_answers, 1);
        assert_eq!(ledger.score, 1);
        assert_eq!(ledger.character_history, vec!["あ".to_string()]);
        assert_eq!(ledger.answer_history, vec!["a".to_string()]);
        assert_eq!(ledger.mode_history, vec![GameMode::Pick]);
        assert_eq!(ledger.outcome_history, vec![true]);
        assert_eq!(ledger.latency_samples, vec![1.2]);

        let score = &ledger.character_scores["あ"];
        assert_eq!(score.correct, 1);
        assert_eq!(score.wrong, 0);
        assert!((score.accuracy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrong_answer_floors_score_at_zero() {
        let mut ledger = SessionLedger::default();
        ledger.record_wrong("あ", GameMode::Pick, "i");

        assert_eq!(ledger.wrong_answers, 1);
        assert_eq!(ledger.score, 0);
        assert_eq!(ledger.answer_history, vec!["i".to_string()]);
        assert_eq!(ledger.outcome_history, vec![false]);
        assert!(ledger.latency_samples.is_empty());
    }

    #[test]
    fn test_parallel_histories_stay_in_sync() {
        let mut ledger = SessionLedger::default();
        ledger.record_correct("あ", GameMode::Pick, "a", 0.8);
        ledger.record_wrong("い", GameMode::ReversePick, "う");
        ledger.record_correct("か", GameMode::Writing, "か", 2.5);
        ledger.record_wrong("い", GameMode::Pick, "e");

        let len = ledger.character_history.len();
        assert_eq!(len, 4);
        assert_eq!(ledger.mode_history.len(), len);
        assert_eq!(ledger.answer_history.len(), len);
        assert_eq!(ledger.outcome_history.len(), len);
        assert_eq!(ledger.answered(), 4);
    }

    #[test]
    fn test_per_character_accuracy() {
        let mut ledger = SessionLedger::default();
        ledger.record_correct("い", GameMode::Pick, "i", 1.0);
        ledger.record_correct("い", GameMode::Pick, "i", 1.0);
        ledger.record_wrong("い", GameMode::Pick, "e");

        let score = &ledger.character_scores["い"];
        assert_eq!(score.correct, 2);
        assert_eq!(score.wrong, 1);
        assert!((score.accuracy - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_recovers_after_floor() {
        let mut ledger = SessionLedger::default();
        ledger.record_wrong("あ", GameMode::Pick, "i");
        ledger.record_wrong("あ", GameMode::Pick, "u");
        assert_eq!(ledger.score, 0);
        ledger.record_correct("あ", GameMode::Pick, "a", 1.0);
        assert_eq!(ledger.score, 1);
    }

    #[test]
    fn test_reset_returns_to_default() {
        let mut ledger = SessionLedger::default();
        ledger.record_correct("あ", GameMode::Pick, "a", 1.0);
        ledger.record_timed_correct();
        ledger.elapsed_ms = 5000;
        ledger.reset();

        assert_eq!(ledger.answered(), 0);
        assert_eq!(ledger.score, 0);
        assert!(ledger.character_history.is_empty());
        assert!(ledger.character_scores.is_empty());
        assert_eq!(ledger.elapsed_ms, 0);
        assert_eq!(ledger.timed_correct, 0);
    }

    #[test]
    fn test_streak_resets_on_wrong_only() {
        let mut ledger = SessionLedger::default();
        ledger.record_timed_correct();
        ledger.record_timed_correct();
        ledger.record_timed_correct();
        assert_eq!(ledger.streak, 3);

        ledger.record_timed_wrong();
        assert_eq!(ledger.streak, 0);
        assert_eq!(ledger.timed_correct, 3);
        assert_eq!(ledger.timed_wrong, 1);

        ledger.record_timed_correct();
        assert_eq!(ledger.streak, 1);
    }

    #[test]
    fn test_reset_timed_leaves_session_counters() {
        let mut ledger = SessionLedger::default();
        ledger.record_correct("あ", GameMode::Pick, "a", 1.0);
        ledger.record_timed_correct();
        ledger.reset_timed();

        assert_eq!(ledger.timed_correct, 0);
        assert_eq!(ledger.streak, 0);
        assert_eq!(ledger.correct_answers, 1);
    }
}
