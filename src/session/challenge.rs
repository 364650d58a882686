use std::time::Duration;

use rand::rngs::SmallRng;

use crate::catalog::CharacterEntry;
use crate::engine::ledger::SessionLedger;
use crate::session::question::{self, Direction};
use crate::session::stopwatch::Countdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeStatus {
    Running { remaining: Duration },
    Finished,
}

/// Rapid-fire countdown round: kana prompts, typed romanizations, every
/// submission advances. Counters live in the ledger's timed fields and
/// never reach lifetime stats.
pub struct Challenge {
    pool: Vec<CharacterEntry>,
    current: CharacterEntry,
    countdown: Countdown,
    rng: SmallRng,
    finished: bool,
}

impl Challenge {
    pub fn start(
        pool: Vec<CharacterEntry>,
        duration: Duration,
        ledger: &mut SessionLedger,
        mut rng: SmallRng,
    ) -> Option<Self> {
        let current =
            question::pick_prompt_entry(&pool, Direction::Forward, None, &mut rng)?.clone();
        ledger.reset_timed();
        let mut countdown = Countdown::new(duration);
        countdown.start();
        Some(Self {
            pool,
            current,
            countdown,
            rng,
            finished: false,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.current.character
    }

    pub fn is_finished(&self) -> bool {
        self.finished || self.countdown.expired()
    }

    pub fn status(&mut self) -> ChallengeStatus {
        if self.is_finished() {
            self.finished = true;
            ChallengeStatus::Finished
        } else {
            ChallengeStatus::Running {
                remaining: self.countdown.remaining(),
            }
        }
    }

    /// Check one typed answer against the current prompt. Returns `None`
    /// once the countdown has expired.
    pub fn submit(&mut self, ledger: &mut SessionLedger, value: &str) -> Option<bool> {
        if self.is_finished() {
            self.finished = true;
            return None;
        }

        let correct = value.trim().to_ascii_lowercase() == self.current.romanization;
        if correct {
            ledger.record_timed_correct();
        } else {
            ledger.record_timed_wrong();
        }

        let previous = self.current.character.clone();
        if let Some(next) =
            question::pick_prompt_entry(&self.pool, Direction::Forward, Some(&previous), &mut self.rng)
        {
            self.current = next.clone();
        }
        Some(correct)
    }
}
