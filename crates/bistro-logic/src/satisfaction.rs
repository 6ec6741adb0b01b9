//! Per-order satisfaction scoring and the rolling tracker.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::satisfaction::*;

/// Coarse satisfaction class of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionLevel {
    Happy,
    Neutral,
    Angry,
}

impl SatisfactionLevel {
    pub fn from_score(score: f32) -> Self {
        if score >= HAPPY_AT {
            Self::Happy
        } else if score >= NEUTRAL_AT {
            Self::Neutral
        } else {
            Self::Angry
        }
    }

    /// Gold multiplier applied to the order's payout.
    pub fn gold_multiplier(self) -> f32 {
        match self {
            Self::Happy => 1.5,
            Self::Neutral => 1.0,
            Self::Angry => 0.5,
        }
    }
}

/// Inputs to one satisfaction score.
#[derive(Debug, Clone, Copy, Default)]
pub struct SatisfactionInputs {
    pub wait_ticks: u32,
    /// Decor bonus as a fraction, see `UpgradeState::satisfaction_bonus`.
    pub upgrade_bonus: f32,
    pub menu_size: usize,
    /// Additive bonus from today's modifiers.
    pub modifier_bonus: f32,
    /// Uniform draw in `[-JITTER, JITTER]`, supplied by the caller.
    pub jitter: f32,
}

/// Score an order. Always within `[0, 100]`.
pub fn score(inputs: &SatisfactionInputs) -> f32 {
    let wait = if inputs.wait_ticks <= WAIT_HAPPY {
        FAST_BONUS
    } else if inputs.wait_ticks <= WAIT_NEUTRAL {
        OK_BONUS
    } else {
        SLOW_PENALTY
    };
    let menu = (inputs.menu_size as f32 * 2.0).min(MENU_BONUS_CAP);
    let jitter = inputs.jitter.clamp(-JITTER, JITTER);
    let raw = BASE_SCORE + wait + inputs.upgrade_bonus * 100.0 + menu + inputs.modifier_bonus + jitter;
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Fixed-capacity FIFO of recent scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionTracker {
    scores: VecDeque<f32>,
    capacity: usize,
}

impl Default for SatisfactionTracker {
    fn default() -> Self {
        Self::with_capacity(TRACKER_CAPACITY)
    }
}

impl SatisfactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a score, evicting the oldest once full.
    pub fn record(&mut self, score: f32) {
        self.scores.push_back(score.clamp(0.0, 100.0));
        while self.scores.len() > self.capacity {
            self.scores.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean of the window, 50 when empty.
    pub fn average(&self) -> f32 {
        if self.scores.is_empty() {
            return 50.0;
        }
        self.scores.iter().sum::<f32>() / self.scores.len() as f32
    }

    pub fn traffic_multiplier(&self) -> f32 {
        let avg = self.average();
        if avg >= 80.0 {
            1.3
        } else if avg >= 60.0 {
            1.1
        } else if avg >= 40.0 {
            1.0
        } else {
            0.8
        }
    }

    /// 1–5 star rating.
    pub fn stars(&self) -> u8 {
        (self.average() / 20.0).round().clamp(1.0, 5.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(wait_ticks: u32) -> SatisfactionInputs {
        SatisfactionInputs {
            wait_ticks,
            ..Default::default()
        }
    }

    #[test]
    fn test_wait_bands() {
        assert_eq!(score(&inputs(0)), 80.0);
        assert_eq!(score(&inputs(40)), 80.0);
        assert_eq!(score(&inputs(41)), 60.0);
        assert_eq!(score(&inputs(120)), 60.0);
        assert_eq!(score(&inputs(121)), 30.0);
    }

    #[test]
    fn test_bonuses_and_clamp() {
        let s = score(&SatisfactionInputs {
            wait_ticks: 0,
            upgrade_bonus: 0.18,
            menu_size: 4,
            modifier_bonus: 0.0,
            jitter: 0.0,
        });
        assert_eq!(s, 100.0);

        let low = score(&SatisfactionInputs {
            wait_ticks: 500,
            modifier_bonus: -60.0,
            jitter: -5.0,
            ..Default::default()
        });
        assert_eq!(low, 0.0);
    }

    #[test]
    fn test_menu_bonus_capped() {
        let a = score(&SatisfactionInputs {
            wait_ticks: 200,
            menu_size: 8,
            ..Default::default()
        });
        let b = score(&SatisfactionInputs {
            wait_ticks: 200,
            menu_size: 50,
            ..Default::default()
        });
        assert_eq!(a, 45.0);
        assert_eq!(b, 45.0);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(SatisfactionLevel::from_score(70.0), SatisfactionLevel::Happy);
        assert_eq!(SatisfactionLevel::from_score(69.99), SatisfactionLevel::Neutral);
        assert_eq!(SatisfactionLevel::from_score(40.0), SatisfactionLevel::Neutral);
        assert_eq!(SatisfactionLevel::from_score(39.99), SatisfactionLevel::Angry);
    }

    #[test]
    fn test_tracker_defaults_and_eviction() {
        let mut t = SatisfactionTracker::new();
        assert_eq!(t.average(), 50.0);
        assert_eq!(t.traffic_multiplier(), 1.0);
        assert_eq!(t.stars(), 3);

        for _ in 0..20 {
            t.record(10.0);
        }
        assert_eq!(t.traffic_multiplier(), 0.8);
        assert_eq!(t.stars(), 1);

        for _ in 0..20 {
            t.record(95.0);
        }
        assert_eq!(t.len(), 20);
        assert_eq!(t.average(), 95.0);
        assert_eq!(t.traffic_multiplier(), 1.3);
        assert_eq!(t.stars(), 5);
    }
}
