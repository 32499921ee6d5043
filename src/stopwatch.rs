//! The round timer.
//!
//! Only the start and end timestamps of a round matter, so unlike a general-purpose stopwatch this one can't be
//! paused and, once stopped, stays stopped.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    time_started: Instant,
    /// Set once, on the first `stop`.
    time_ended: Option<Instant>,
}

impl Stopwatch {
    /// Creates a running stopwatch.
    pub fn start() -> Self {
        Stopwatch {
            time_started: Instant::now(),
            time_ended: None,
        }
    }

    /// Freezes the elapsed time. Stopping an already stopped stopwatch has no effect.
    pub fn stop(&mut self) {
        if self.time_ended.is_none() {
            self.time_ended = Some(Instant::now());
        }
    }

    /// Returns `time_ended - time_started` once stopped and `now - time_started` while running.
    pub fn elapsed(&self) -> Duration {
        match self.time_ended {
            Some(time_ended) => time_ended.duration_since(self.time_started),
            None => self.time_started.elapsed(),
        }
    }
}
