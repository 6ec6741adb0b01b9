//! Due-tick timers for the randomly spaced background jobs.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fires once at a random frame inside `delay` after being armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    pub due: Option<u64>,
    /// Inclusive delay range in frames
    pub delay: (u64, u64),
}

impl Scheduler {
    pub fn new(delay: (u64, u64)) -> Self {
        Self { due: None, delay }
    }

    pub fn arm(&mut self, frame: u64, rng: &mut impl Rng) {
        let (lo, hi) = self.delay;
        let wait = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
        self.due = Some(frame + wait.max(1));
    }

    /// True once when the due frame is reached; disarms itself.
    pub fn fire(&mut self, frame: u64) -> bool {
        match self.due {
            Some(due) if frame >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }
}
