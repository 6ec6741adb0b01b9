//! Reputation - single 0–100 scalar, five tiers, bounded history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::reputation::{HISTORY_LEN, INITIAL, MAX, MIN};
use crate::satisfaction::SatisfactionLevel;

/// Reputation band. Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Stall,
    Local,
    Popular,
    Famous,
    Legendary,
}

/// Per-tier gates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierInfo {
    pub tier: Tier,
    pub name: &'static str,
    pub min_value: f32,
    pub traffic_mult: f32,
    pub special_chance: f32,
    pub positive_weight: f32,
}

pub static TIERS: [TierInfo; 5] = [
    TierInfo {
        tier: Tier::Stall,
        name: "Street Stall",
        min_value: 0.0,
        traffic_mult: 0.8,
        special_chance: 0.02,
        positive_weight: 0.3,
    },
    TierInfo {
        tier: Tier::Local,
        name: "Local Favorite",
        min_value: 21.0,
        traffic_mult: 1.0,
        special_chance: 0.05,
        positive_weight: 0.4,
    },
    TierInfo {
        tier: Tier::Popular,
        name: "Popular Spot",
        min_value: 41.0,
        traffic_mult: 1.2,
        special_chance: 0.10,
        positive_weight: 0.5,
    },
    TierInfo {
        tier: Tier::Famous,
        name: "Famous Bistro",
        min_value: 61.0,
        traffic_mult: 1.5,
        special_chance: 0.18,
        positive_weight: 0.6,
    },
    TierInfo {
        tier: Tier::Legendary,
        name: "Legendary Restaurant",
        min_value: 81.0,
        traffic_mult: 2.0,
        special_chance: 0.25,
        positive_weight: 0.7,
    },
];

impl Tier {
    /// Highest tier whose minimum is at or below `value`.
    pub fn for_value(value: f32) -> Self {
        TIERS
            .iter()
            .rev()
            .find(|t| value >= t.min_value)
            .map(|t| t.tier)
            .unwrap_or(Self::Stall)
    }

    pub fn info(self) -> &'static TierInfo {
        &TIERS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }
}

/// Base reputation delta for a served guest.
pub fn delta_for_satisfaction(level: SatisfactionLevel) -> f32 {
    match level {
        SatisfactionLevel::Happy => 1.5,
        SatisfactionLevel::Neutral => 0.2,
        SatisfactionLevel::Angry => -2.0,
    }
}

/// Running reputation. Value is clamped at every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationState {
    pub value: f32,
    pub tier: Tier,
    pub history: VecDeque<f32>,
    pub peak: f32,
}

impl Default for ReputationState {
    fn default() -> Self {
        Self::with_value(INITIAL)
    }
}

impl ReputationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: f32) -> Self {
        let value = value.clamp(MIN, MAX);
        Self {
            value,
            tier: Tier::for_value(value),
            history: VecDeque::new(),
            peak: value,
        }
    }

    /// Apply a delta. Returns the previous tier when the tier changed.
    pub fn add(&mut self, delta: f32) -> Option<Tier> {
        let before = self.tier;
        self.value = (self.value + delta).clamp(MIN, MAX);
        self.tier = Tier::for_value(self.value);
        if self.value > self.peak {
            self.peak = self.value;
        }
        self.history.push_back(self.value);
        while self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
        (before != self.tier).then_some(before)
    }

    pub fn info(&self) -> &'static TierInfo {
        self.tier.info()
    }

    /// Recompute derived fields after loading a record that may be stale.
    pub fn normalize(&mut self) {
        self.value = if self.value.is_finite() {
            self.value.clamp(MIN, MAX)
        } else {
            INITIAL
        };
        self.tier = Tier::for_value(self.value);
        self.peak = self.peak.max(self.value).min(MAX);
        while self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::for_value(0.0), Tier::Stall);
        assert_eq!(Tier::for_value(20.9), Tier::Stall);
        assert_eq!(Tier::for_value(21.0), Tier::Local);
        assert_eq!(Tier::for_value(41.0), Tier::Popular);
        assert_eq!(Tier::for_value(60.99), Tier::Popular);
        assert_eq!(Tier::for_value(61.0), Tier::Famous);
        assert_eq!(Tier::for_value(81.0), Tier::Legendary);
        assert_eq!(Tier::for_value(100.0), Tier::Legendary);
    }

    #[test]
    fn test_starts_at_stall() {
        let rep = ReputationState::new();
        assert_eq!(rep.value, 15.0);
        assert_eq!(rep.tier, Tier::Stall);
        assert_eq!(rep.info().traffic_mult, 0.8);
    }

    #[test]
    fn test_add_clamps_and_reports_tier_change() {
        let mut rep = ReputationState::new();
        assert_eq!(rep.add(10.0), Some(Tier::Stall));
        assert_eq!(rep.tier, Tier::Local);
        assert_eq!(rep.add(1.0), None);

        rep.add(500.0);
        assert_eq!(rep.value, 100.0);
        assert_eq!(rep.peak, 100.0);

        rep.add(-1000.0);
        assert_eq!(rep.value, 0.0);
        assert_eq!(rep.peak, 100.0);
        assert_eq!(rep.tier, Tier::Stall);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut rep = ReputationState::new();
        for _ in 0..250 {
            rep.add(0.1);
        }
        assert_eq!(rep.history.len(), HISTORY_LEN);
    }

    #[test]
    fn test_normalize_repairs_bad_record() {
        let mut rep = ReputationState {
            value: 140.0,
            tier: Tier::Stall,
            history: VecDeque::new(),
            peak: 3.0,
        };
        rep.normalize();
        assert_eq!(rep.value, 100.0);
        assert_eq!(rep.tier, Tier::Legendary);
        assert_eq!(rep.peak, 100.0);
    }

    #[test]
    fn test_satisfaction_deltas() {
        assert_eq!(delta_for_satisfaction(SatisfactionLevel::Happy), 1.5);
        assert_eq!(delta_for_satisfaction(SatisfactionLevel::Neutral), 0.2);
        assert_eq!(delta_for_satisfaction(SatisfactionLevel::Angry), -2.0);
    }
}
