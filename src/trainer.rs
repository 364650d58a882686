use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::KanaCatalog;
use crate::config::Preferences;
use crate::engine::ledger::SessionLedger;
use crate::engine::lifetime::LifetimeStats;
use crate::error::TrainerError;
use crate::exam::orchestrator::{TestAnswer, TimedTest};
use crate::exam::result::TestResult;
use crate::session::challenge::{Challenge, ChallengeStatus};
use crate::session::practice::{AnswerOutcome, PracticeSession, WrongAnswerRule};
use crate::session::question::{GameMode, OPTION_COUNT, QuestionState};
use crate::store::json_store::JsonStore;
use crate::store::schema::{StatsData, TestResultsData};

/// Owns the catalog, ledgers, store and whichever flow (practice, timed
/// test, countdown challenge) is active. At most one flow runs at a time;
/// starting a new one discards the others without merging anything.
pub struct Trainer {
    catalog: KanaCatalog,
    preferences: Preferences,
    ledger: SessionLedger,
    lifetime: LifetimeStats,
    results: Vec<TestResult>,
    practice: Option<PracticeSession>,
    test: Option<TimedTest>,
    challenge: Option<Challenge>,
    store: Option<JsonStore>,
    rng: SmallRng,
}

impl Trainer {
    pub fn new() -> Self {
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("failed to open data directory, running without persistence: {e:?}");
                None
            }
        };
        let preferences = match Preferences::load() {
            Ok(preferences) => preferences,
            Err(e) => {
                log::warn!("failed to load preferences, using defaults: {e:?}");
                Preferences::default()
            }
        };
        Self::with_parts(store, preferences, SmallRng::from_entropy())
    }

    /// Build against an injected store with default preferences. Used by
    /// integration tests and embedders that manage their own directories.
    pub fn with_store(store: JsonStore) -> Self {
        Self::with_parts(Some(store), Preferences::default(), SmallRng::from_entropy())
    }

    fn with_parts(store: Option<JsonStore>, mut preferences: Preferences, rng: SmallRng) -> Self {
        let catalog = KanaCatalog::load();
        preferences.normalize(catalog.group_count());

        let (lifetime, results) = if let Some(ref s) = store {
            let stats = s.load_stats();
            let lifetime = if stats.needs_reset() {
                log::warn!("lifetime stats schema changed, starting fresh");
                LifetimeStats::default()
            } else {
                stats.stats
            };
            let history = s.load_test_results();
            let results = if history.needs_reset() {
                log::warn!("test history schema changed, starting fresh");
                Vec::new()
            } else {
                history.results
            };
            (lifetime, results)
        } else {
            (LifetimeStats::default(), Vec::new())
        };

        Self {
            catalog,
            preferences,
            ledger: SessionLedger::default(),
            lifetime,
            results,
            practice: None,
            test: None,
            challenge: None,
            store,
            rng,
        }
    }

    pub fn catalog(&self) -> &KanaCatalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Replace the preferences after normalizing them against the catalog.
    /// Callers persist with `Preferences::save` when they want them kept.
    pub fn set_preferences(&mut self, mut preferences: Preferences) {
        preferences.normalize(self.catalog.group_count());
        self.preferences = preferences;
    }

    /// Current-session counters and histories, for display.
    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn statistics(&self) -> &LifetimeStats {
        &self.lifetime
    }

    pub fn current_question(&self) -> Option<&QuestionState> {
        if let Some(test) = &self.test {
            return Some(test.question());
        }
        self.practice.as_ref().map(|session| session.question())
    }

    pub fn start_practice(
        &mut self,
        selection: &[usize],
        mode: GameMode,
    ) -> Result<(), TrainerError> {
        let pool = self.catalog.eligible_pool(selection);
        if pool.len() < OPTION_COUNT {
            return Err(TrainerError::InsufficientPool {
                needed: OPTION_COUNT,
                available: pool.len(),
            });
        }
        self.drop_active_flows();
        let rng = SmallRng::from_rng(&mut self.rng).unwrap();
        self.practice = PracticeSession::start(pool, mode, WrongAnswerRule::RetryInPlace, rng);
        Ok(())
    }

    /// Score one practice submission. `None` when no practice is running.
    pub fn submit_answer(&mut self, value: &str) -> Option<AnswerOutcome> {
        let session = self.practice.as_mut()?;
        let outcome = session.submit(&mut self.ledger, value);
        if outcome == AnswerOutcome::Correct {
            let mode = session.mode();
            session.advance(mode);
        }
        Some(outcome)
    }

    /// End practice. A session with at least one answer merges into the
    /// lifetime stats and is persisted; an untouched one just goes away.
    pub fn leave_practice(&mut self) {
        let Some(mut session) = self.practice.take() else {
            return;
        };
        session.stop_clock();
        if self.ledger.answered() > 0 {
            self.ledger.elapsed_ms = session.elapsed_ms();
            self.lifetime.merge_session(&self.ledger);
            log::debug!(
                "merged practice session: {} answered in {}ms",
                self.ledger.answered(),
                self.ledger.elapsed_ms
            );
            self.save_stats();
        }
        self.ledger.reset();
    }

    pub fn start_test(&mut self, question_count: usize) -> Result<(), TrainerError> {
        let pool = self.catalog.full_pool();
        if pool.len() < OPTION_COUNT {
            return Err(TrainerError::InsufficientPool {
                needed: OPTION_COUNT,
                available: pool.len(),
            });
        }
        self.drop_active_flows();
        let rng = SmallRng::from_rng(&mut self.rng).unwrap();
        self.test = TimedTest::start(pool, question_count, rng);
        Ok(())
    }

    pub fn test_active(&self) -> bool {
        self.test.is_some()
    }

    /// Score one test submission. On completion the result is appended to
    /// the history, persisted, and the session ledger cleared.
    pub fn submit_test_answer(&mut self, value: &str) -> Option<TestAnswer> {
        let test = self.test.as_mut()?;
        let answer = test.submit(&mut self.ledger, &self.results, value);
        if let TestAnswer::Completed(result) = &answer {
            log::debug!("test {} completed: {}%", result.id, result.score_percent);
            self.results.push(result.clone());
            self.save_results();
            self.ledger.reset();
            self.test = None;
        }
        Some(answer)
    }

    /// Abandon a running test: no result, no merge, ledger cleared. Safe to
    /// call when no test is running.
    pub fn quit_test(&mut self) {
        if let Some(mut test) = self.test.take() {
            test.cancel();
            self.ledger.reset();
        }
    }

    pub fn test_results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn test_result(&self, id: &str) -> Result<&TestResult, TrainerError> {
        self.results
            .iter()
            .find(|result| result.id == id)
            .ok_or_else(|| TrainerError::ResultNotFound(id.to_string()))
    }

    pub fn clear_test_history(&mut self) {
        self.results.clear();
        self.save_results();
    }

    pub fn clear_lifetime(&mut self) {
        self.lifetime.clear();
        self.save_stats();
    }

    /// Start a countdown challenge over the selected groups. `None` duration
    /// means the preferred one.
    pub fn start_challenge(
        &mut self,
        selection: &[usize],
        duration: Option<Duration>,
    ) -> Result<(), TrainerError> {
        let pool = self.catalog.eligible_pool(selection);
        if pool.len() < OPTION_COUNT {
            return Err(TrainerError::InsufficientPool {
                needed: OPTION_COUNT,
                available: pool.len(),
            });
        }
        self.drop_active_flows();
        let duration = duration
            .unwrap_or_else(|| Duration::from_secs(self.preferences.challenge_duration_secs));
        let rng = SmallRng::from_rng(&mut self.rng).unwrap();
        self.challenge = Challenge::start(pool, duration, &mut self.ledger, rng);
        Ok(())
    }

    pub fn challenge_prompt(&self) -> Option<&str> {
        self.challenge.as_ref().map(Challenge::prompt)
    }

    pub fn challenge_status(&mut self) -> Option<ChallengeStatus> {
        self.challenge.as_mut().map(Challenge::status)
    }

    pub fn submit_challenge_answer(&mut self, value: &str) -> Option<bool> {
        let challenge = self.challenge.as_mut()?;
        challenge.submit(&mut self.ledger, value)
    }

    /// Drop the challenge. Its counters stay readable on the ledger until
    /// another flow starts; they are never merged or persisted.
    pub fn end_challenge(&mut self) {
        self.challenge = None;
    }

    fn drop_active_flows(&mut self) {
        if let Some(mut session) = self.practice.take() {
            session.stop_clock();
        }
        if let Some(mut test) = self.test.take() {
            test.cancel();
        }
        self.challenge = None;
        self.ledger.reset();
    }

    fn save_stats(&self) {
        if let Some(ref store) = self.store {
            if let Err(e) = store.save_stats(&StatsData::new(self.lifetime.clone())) {
                log::warn!("failed to save lifetime stats: {e:?}");
            }
        }
    }

    fn save_results(&self) {
        if let Some(ref store) = self.store {
            if let Err(e) = store.save_test_results(&TestResultsData::new(self.results.clone())) {
                log::warn!("failed to save test history: {e:?}");
            }
        }
    }
}
