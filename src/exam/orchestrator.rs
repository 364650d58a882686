use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::catalog::CharacterEntry;
use crate::engine::ledger::SessionLedger;
use crate::exam::result::{self, TestResult};
use crate::session::practice::{AnswerOutcome, PracticeSession, WrongAnswerRule};
use crate::session::question::{GameMode, QuestionState};

/// Modes a test question may be asked in; each question draws one at random.
const TEST_MODES: [GameMode; 3] = [GameMode::Pick, GameMode::ReversePick, GameMode::Writing];

#[derive(Clone, Debug, PartialEq)]
pub enum TestAnswer {
    /// Below the budget; a fresh question in a fresh random mode is current.
    Next { correct: bool },
    /// The budget is spent; the finished record is ready to persist.
    Completed(TestResult),
    /// The test was already completed or cancelled.
    Inactive,
}

/// Fixed-length timed test over a pool. Wrong answers advance immediately so
/// exactly `question_count` submissions are accepted.
pub struct TimedTest {
    question_count: usize,
    session: PracticeSession,
    rng: SmallRng,
    completed: bool,
}

impl TimedTest {
    pub fn start(
        pool: Vec<CharacterEntry>,
        question_count: usize,
        mut rng: SmallRng,
    ) -> Option<Self> {
        let mode = TEST_MODES[rng.gen_range(0..TEST_MODES.len())];
        let session_rng = SmallRng::from_rng(&mut rng).unwrap();
        let session =
            PracticeSession::start(pool, mode, WrongAnswerRule::AdvanceImmediately, session_rng)?;
        Some(Self {
            question_count,
            session,
            rng,
            completed: false,
        })
    }

    pub fn question(&self) -> &QuestionState {
        self.session.question()
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Score one submission. `history` supplies the ids already taken, so a
    /// completed test can mint a unique one.
    pub fn submit(
        &mut self,
        ledger: &mut SessionLedger,
        history: &[TestResult],
        value: &str,
    ) -> TestAnswer {
        if self.completed {
            return TestAnswer::Inactive;
        }
        // A zero-question test finishes on its first submission without
        // recording anything.
        if ledger.answered() >= self.question_count {
            return TestAnswer::Completed(self.finalize(ledger, history));
        }

        let correct = self.session.submit(ledger, value) == AnswerOutcome::Correct;
        if ledger.answered() >= self.question_count {
            TestAnswer::Completed(self.finalize(ledger, history))
        } else {
            let mode = TEST_MODES[self.rng.gen_range(0..TEST_MODES.len())];
            self.session.advance(mode);
            TestAnswer::Next { correct }
        }
    }

    fn finalize(&mut self, ledger: &mut SessionLedger, history: &[TestResult]) -> TestResult {
        self.completed = true;
        self.session.stop_clock();
        let total_time_seconds = self.session.elapsed_ms() as f64 / 1000.0;
        TestResult::from_ledger(
            result::unique_id(history),
            ledger,
            self.session.pool(),
            self.question_count,
            total_time_seconds,
        )
    }

    /// Quit without producing a result. Stops the clock where it is; safe to
    /// call repeatedly.
    pub fn cancel(&mut self) {
        self.completed = true;
        self.session.stop_clock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::session::question::Direction;

    fn entry(character: &str, romanization: &str) -> CharacterEntry {
        CharacterEntry {
            character: character.to_string(),
            romanization: romanization.to_string(),
            group: 0,
        }
    }

    fn pool() -> Vec<CharacterEntry> {
        vec![
            entry("あ", "a"),
            entry("い", "i"),
            entry("う", "u"),
            entry("え", "e"),
            entry("お", "o"),
        ]
    }

    fn correct_answer(test: &TimedTest) -> String {
        test.question().answer.clone()
    }

    fn wrong_answer(test: &TimedTest) -> String {
        match test.question().direction() {
            Direction::Forward => "zz".to_string(),
            Direction::Reverse => "ん".to_string(),
        }
    }

    #[test]
    fn test_budget_of_questions_is_exact() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 10, SmallRng::seed_from_u64(1)).unwrap();

        for turn in 0..10 {
            let answer = correct_answer(&test);
            match test.submit(&mut ledger, &[], &answer) {
                TestAnswer::Next { correct } => {
                    assert!(correct);
                    assert!(turn < 9, "test ran past its question budget");
                }
                TestAnswer::Completed(result) => {
                    assert_eq!(turn, 9, "test finished early");
                    assert_eq!(result.total_questions, 10);
                    assert_eq!(result.correct_answers, 10);
                    assert_eq!(result.score_percent, 100);
                    assert_eq!(result.questions.len(), 10);
                }
                TestAnswer::Inactive => panic!("test went inactive mid-run"),
            }
        }
        assert!(!test.is_active());
    }

    #[test]
    fn test_wrong_answers_advance_and_count_against_budget() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 10, SmallRng::seed_from_u64(2)).unwrap();

        let mut completed = None;
        for turn in 0..10 {
            // Writing questions accept anything, so alternate on the rest.
            let answer = if turn % 2 == 0 {
                correct_answer(&test)
            } else {
                wrong_answer(&test)
            };
            match test.submit(&mut ledger, &[], &answer) {
                TestAnswer::Next { .. } => {}
                TestAnswer::Completed(result) => completed = Some(result),
                TestAnswer::Inactive => panic!("test went inactive mid-run"),
            }
        }

        let result = completed.expect("ten answers must finish a ten-question test");
        assert_eq!(result.correct_answers + result.wrong_answers, 10);
        assert_eq!(
            result.score_percent,
            ((result.correct_answers as f64 / 10.0) * 100.0).round() as u32
        );
    }

    #[test]
    fn test_mode_rotation_reaches_every_mode() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 60, SmallRng::seed_from_u64(3)).unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..59 {
            seen.insert(test.question().mode);
            let answer = correct_answer(&test);
            test.submit(&mut ledger, &[], &answer);
        }
        assert!(seen.contains(&GameMode::Pick));
        assert!(seen.contains(&GameMode::ReversePick));
        assert!(seen.contains(&GameMode::Writing));
    }

    #[test]
    fn test_reverse_detail_shows_primary_character() {
        let duplicated = vec![entry("じ", "ji"), entry("ぢ", "ji")];
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(duplicated.clone(), 1, SmallRng::seed_from_u64(4)).unwrap();

        let answer = match test.question().direction() {
            Direction::Forward => test.question().answer.clone(),
            // Answer with the secondary character; the record must still
            // show the primary one.
            Direction::Reverse => "ぢ".to_string(),
        };
        let was_reverse = test.question().direction() == Direction::Reverse;

        match test.submit(&mut ledger, &[], &answer) {
            TestAnswer::Completed(result) => {
                assert!(result.questions[0].is_correct);
                if was_reverse {
                    assert_eq!(result.questions[0].character, "じ");
                    assert_eq!(
                        catalog::classify_reverse(&duplicated, "ji", &result.questions[0].character),
                        catalog::ReverseMatch::Primary
                    );
                }
            }
            other => panic!("one answer must complete a one-question test, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_question_test_completes_immediately() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 0, SmallRng::seed_from_u64(5)).unwrap();

        match test.submit(&mut ledger, &[], "anything") {
            TestAnswer::Completed(result) => {
                assert_eq!(result.total_questions, 0);
                assert_eq!(result.score_percent, 0);
                assert!(result.questions.is_empty());
            }
            other => panic!("expected immediate completion, got {other:?}"),
        }
        assert_eq!(ledger.answered(), 0);
    }

    #[test]
    fn test_completed_test_refuses_further_submissions() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 1, SmallRng::seed_from_u64(6)).unwrap();

        let answer = correct_answer(&test);
        assert!(matches!(
            test.submit(&mut ledger, &[], &answer),
            TestAnswer::Completed(_)
        ));
        assert_eq!(test.submit(&mut ledger, &[], "a"), TestAnswer::Inactive);
        assert_eq!(ledger.answered(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent_and_deactivates() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 10, SmallRng::seed_from_u64(7)).unwrap();
        let answer = correct_answer(&test);
        test.submit(&mut ledger, &[], &answer);

        test.cancel();
        assert!(!test.is_active());
        test.cancel();
        assert_eq!(test.submit(&mut ledger, &[], "a"), TestAnswer::Inactive);
    }

    #[test]
    fn test_minted_id_avoids_existing_history() {
        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 1, SmallRng::seed_from_u64(8)).unwrap();
        let answer = correct_answer(&test);

        let first = match test.submit(&mut ledger, &[], &answer) {
            TestAnswer::Completed(result) => result,
            other => panic!("expected completion, got {other:?}"),
        };

        let mut ledger = SessionLedger::default();
        let mut test = TimedTest::start(pool(), 1, SmallRng::seed_from_u64(9)).unwrap();
        let answer = correct_answer(&test);
        let history = vec![first.clone()];
        match test.submit(&mut ledger, &history, &answer) {
            TestAnswer::Completed(second) => assert_ne!(second.id, first.id),
            other => panic!("expected completion, got {other:?}"),
        }
    }
}
