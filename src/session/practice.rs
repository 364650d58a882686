use rand::rngs::SmallRng;

use crate::catalog::{self, CharacterEntry, ReverseMatch};
use crate::engine::ledger::SessionLedger;
use crate::session::question::{self, Direction, GameMode, QuestionState};
use crate::session::stopwatch::Stopwatch;

/// What a wrong submission does to the current question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrongAnswerRule {
    /// Practice: the value is disabled and the question stays current.
    RetryInPlace,
    /// Test: the caller advances immediately so the question budget holds.
    AdvanceImmediately,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    /// The value was already rejected for this question; nothing recorded.
    Rejected,
}

/// One continuous run over a fixed pool. Scoring happens here; the caller
/// drives advancement (always after Correct, and after Wrong only under
/// `AdvanceImmediately`).
pub struct PracticeSession {
    pool: Vec<CharacterEntry>,
    mode: GameMode,
    rule: WrongAnswerRule,
    question: QuestionState,
    question_timer: Stopwatch,
    session_timer: Stopwatch,
    rng: SmallRng,
}

impl PracticeSession {
    pub fn start(
        pool: Vec<CharacterEntry>,
        mode: GameMode,
        rule: WrongAnswerRule,
        mut rng: SmallRng,
    ) -> Option<Self> {
        let question = question::next_question(&pool, mode, None, &mut rng)?;
        let mut question_timer = Stopwatch::default();
        question_timer.start();
        let mut session_timer = Stopwatch::default();
        session_timer.start();
        Some(Self {
            pool,
            mode,
            rule,
            question,
            question_timer,
            session_timer,
            rng,
        })
    }

    pub fn question(&self) -> &QuestionState {
        &self.question
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn pool(&self) -> &[CharacterEntry] {
        &self.pool
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.session_timer.elapsed_millis()
    }

    /// Stop accumulating session time; used when leaving or cancelling.
    pub fn stop_clock(&mut self) {
        self.session_timer.pause();
    }

    /// Score one submission against the current question.
    pub fn submit(&mut self, ledger: &mut SessionLedger, value: &str) -> AnswerOutcome {
        // Writing submissions are always accepted; the expected character
        // stands in for whatever was drawn.
        if self.question.mode == GameMode::Writing {
            let latency = self.question_timer.elapsed_secs();
            let answer = self.question.answer.clone();
            ledger.record_correct(&self.question.prompt, self.question.mode, &answer, latency);
            return AnswerOutcome::Correct;
        }

        let submitted = match self.question.direction() {
            Direction::Forward => value.trim().to_ascii_lowercase(),
            Direction::Reverse => catalog::nfc(value.trim()),
        };

        if self.question.rejected.contains(&submitted) {
            return AnswerOutcome::Rejected;
        }

        let correct = match self.question.direction() {
            Direction::Forward => submitted == self.question.answer,
            Direction::Reverse => {
                catalog::classify_reverse(&self.pool, &self.question.prompt, &submitted)
                    != ReverseMatch::NoMatch
            }
        };

        if correct {
            let latency = self.question_timer.elapsed_secs();
            ledger.record_correct(&self.question.prompt, self.question.mode, &submitted, latency);
            AnswerOutcome::Correct
        } else {
            ledger.record_wrong(&self.question.prompt, self.question.mode, &submitted);
            if self.rule == WrongAnswerRule::RetryInPlace {
                self.question.rejected.insert(submitted);
            }
            AnswerOutcome::Wrong
        }
    }

    /// Replace the current question and restart the question clock. The
    /// outgoing prompt is excluded by the no-immediate-repeat guard.
    pub fn advance(&mut self, mode: GameMode) {
        let previous = self.question.prompt.clone();
        if let Some(question) =
            question::next_question(&self.pool, mode, Some(&previous), &mut self.rng)
        {
            self.question = question;
        }
        self.question_timer.start();
    }
}
