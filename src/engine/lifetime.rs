use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::ledger::{CharacterScore, SessionLedger};

/// All-time aggregates. Mutated only by an explicit merge when a session
/// is saved, and zeroed only by an explicit clear.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total_sessions: u32,
    pub total_correct_answers: u64,
    pub total_wrong_answers: u64,
    pub total_time_ms: u64,
    pub latency_samples: Vec<f64>,
    pub character_scores: HashMap<String, CharacterScore>,
}

impl LifetimeStats {
    /// Additive merge of one finished session. Per-character accuracy is
    /// recomputed after the counts land.
    pub fn merge_session(&mut self, session: &SessionLedger) {
        self.total_sessions += 1;
        self.total_correct_answers += u64::from(session.correct_answers);
        self.total_wrong_answers += u64::from(session.wrong_answers);
        self.total_time_ms += session.elapsed_ms;
        self.latency_samples.extend_from_slice(&session.latency_samples);

        for (character, score) in &session.character_scores {
            let entry = self.character_scores.entry(character.clone()).or_default();
            entry.correct += score.correct;
            entry.wrong += score.wrong;
            entry.recompute_accuracy();
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
