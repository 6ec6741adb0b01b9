//! Gold math - payouts, restaurant level, cook durations, clamped deltas.

use serde::{Deserialize, Serialize};

use crate::constants::economy::GOLD_PER_LEVEL;
use crate::satisfaction::SatisfactionLevel;

/// Rare guest archetypes with their own timing and payout rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialGuest {
    Critic,
    Royal,
    Influencer,
    Stray,
}

impl SpecialGuest {
    pub const ALL: [SpecialGuest; 4] = [Self::Critic, Self::Royal, Self::Influencer, Self::Stray];

    pub fn name(self) -> &'static str {
        match self {
            Self::Critic => "critic",
            Self::Royal => "royal",
            Self::Influencer => "influencer",
            Self::Stray => "stray",
        }
    }

    /// Pick a type with `roll` in `[0, 1)`, uniform over the four.
    pub fn pick(roll: f32) -> Self {
        let index = ((roll.clamp(0.0, 1.0) * 4.0) as usize).min(3);
        Self::ALL[index]
    }

    /// Extra reputation on top of the satisfaction delta.
    pub fn reputation_bonus(self, level: SatisfactionLevel) -> f32 {
        let happy = level == SatisfactionLevel::Happy;
        match self {
            Self::Critic if happy => 5.0,
            Self::Critic => -3.0,
            Self::Stray if happy => 3.0,
            Self::Influencer if happy => 4.0,
            _ => 0.0,
        }
    }
}

/// Inputs of a single order's payout.
#[derive(Debug, Clone, Copy)]
pub struct PayoutInputs {
    /// Profit unit of the matched dish (already doubled for signatures),
    /// `None` when the order matched nothing on the menu.
    pub dish_profit: Option<u32>,
    pub special: Option<SpecialGuest>,
    pub level: SatisfactionLevel,
    pub profit_mult: f32,
}

/// Gold an order pays. Strays eat free; everyone else pays at least one.
pub fn payout(inputs: &PayoutInputs) -> u64 {
    let mut base = inputs.dish_profit.unwrap_or(1) as f32;
    match inputs.special {
        Some(SpecialGuest::Royal) => base *= 5.0,
        Some(SpecialGuest::Critic) if inputs.level == SatisfactionLevel::Happy => base *= 3.0,
        Some(SpecialGuest::Stray) => base = 0.0,
        _ => {}
    }
    let floor = if inputs.special == Some(SpecialGuest::Stray) {
        0
    } else {
        1
    };
    let raw = (base * inputs.level.gold_multiplier() * inputs.profit_mult).round();
    let raw = if raw.is_finite() && raw > 0.0 {
        raw as u64
    } else {
        0
    };
    raw.max(floor)
}

/// Restaurant level from lifetime earnings.
pub fn level_for_gold(total_earned: u64) -> u32 {
    (total_earned / GOLD_PER_LEVEL) as u32 + 1
}

/// Cook time in ticks after stove upgrades and today's modifiers. Never zero.
///
/// `base_ticks` is normally [`BASE_COOK_TICKS`](crate::constants::economy::BASE_COOK_TICKS).
pub fn cook_duration(base_ticks: u32, upgrade_mult: f32, modifier_mult: f32) -> u32 {
    let ticks = (base_ticks as f32 * upgrade_mult * modifier_mult).floor();
    if ticks.is_finite() && ticks >= 1.0 {
        ticks as u32
    } else {
        1
    }
}

/// Apply a signed delta to a gold balance without going below zero.
pub fn apply_gold_delta(gold: u64, delta: i64) -> u64 {
    if delta >= 0 {
        gold.saturating_add(delta as u64)
    } else {
        gold.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::economy::BASE_COOK_TICKS;

    fn inputs(dish_profit: Option<u32>, special: Option<SpecialGuest>, level: SatisfactionLevel) -> PayoutInputs {
        PayoutInputs {
            dish_profit,
            special,
            level,
            profit_mult: 1.0,
        }
    }

    #[test]
    fn test_signature_happy_payout() {
        // Profit 2, signature doubles to 4, happy ×1.5.
        assert_eq!(payout(&inputs(Some(4), None, SatisfactionLevel::Happy)), 6);
    }

    #[test]
    fn test_minimum_one_gold() {
        assert_eq!(payout(&inputs(None, None, SatisfactionLevel::Angry)), 1);
        let mut poor = inputs(Some(1), None, SatisfactionLevel::Angry);
        poor.profit_mult = 0.5;
        assert_eq!(payout(&poor), 1);
    }

    #[test]
    fn test_special_guest_rules() {
        assert_eq!(payout(&inputs(Some(2), Some(SpecialGuest::Royal), SatisfactionLevel::Neutral)), 10);
        assert_eq!(payout(&inputs(Some(2), Some(SpecialGuest::Critic), SatisfactionLevel::Happy)), 9);
        assert_eq!(payout(&inputs(Some(2), Some(SpecialGuest::Critic), SatisfactionLevel::Neutral)), 2);
        assert_eq!(payout(&inputs(Some(3), Some(SpecialGuest::Stray), SatisfactionLevel::Happy)), 0);
    }

    #[test]
    fn test_special_reputation() {
        assert_eq!(SpecialGuest::Critic.reputation_bonus(SatisfactionLevel::Happy), 5.0);
        assert_eq!(SpecialGuest::Critic.reputation_bonus(SatisfactionLevel::Angry), -3.0);
        assert_eq!(SpecialGuest::Stray.reputation_bonus(SatisfactionLevel::Neutral), 0.0);
        assert_eq!(SpecialGuest::Influencer.reputation_bonus(SatisfactionLevel::Happy), 4.0);
        assert_eq!(SpecialGuest::Royal.reputation_bonus(SatisfactionLevel::Happy), 0.0);
    }

    #[test]
    fn test_levels_and_cook_time() {
        assert_eq!(level_for_gold(0), 1);
        assert_eq!(level_for_gold(49), 1);
        assert_eq!(level_for_gold(50), 2);
        assert_eq!(cook_duration(BASE_COOK_TICKS, 1.0, 1.0), 40);
        assert_eq!(cook_duration(BASE_COOK_TICKS, 0.25, 0.5), 5);
        assert_eq!(cook_duration(BASE_COOK_TICKS, 0.0, 1.0), 1);
        assert_eq!(cook_duration(20, 1.0, 1.0), 20);
    }

    #[test]
    fn test_gold_delta_clamps() {
        assert_eq!(apply_gold_delta(5, -3), 2);
        assert_eq!(apply_gold_delta(2, -10), 0);
        assert_eq!(apply_gold_delta(2, 10), 12);
    }

    #[test]
    fn test_special_pick_covers_all() {
        assert_eq!(SpecialGuest::pick(0.0), SpecialGuest::Critic);
        assert_eq!(SpecialGuest::pick(0.3), SpecialGuest::Royal);
        assert_eq!(SpecialGuest::pick(0.6), SpecialGuest::Influencer);
        assert_eq!(SpecialGuest::pick(0.99), SpecialGuest::Stray);
    }
}
