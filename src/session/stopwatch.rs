use std::time::{Duration, Instant};

/// Explicit elapsed-time accumulator. Nothing advances it in the
/// background: session transitions start, pause and resume it, and
/// readers see the accumulated total.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    /// Zero the accumulator and begin running.
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

/// Fixed-duration countdown for the timed challenge. Expiry is observed
/// when polled; it never fires on its own.
#[derive(Clone, Copy, Debug)]
pub struct Countdown {
    duration: Duration,
    started_at: Option<Instant>,
}

impl Countdown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn remaining(&self) -> Duration {
        match self.started_at {
            Some(at) => self.duration.saturating_sub(at.elapsed()),
            None => self.duration,
        }
    }

    pub fn expired(&self) -> bool {
        self.started_at.is_some_and(|at| at.elapsed() >= self.duration)
    }
}
