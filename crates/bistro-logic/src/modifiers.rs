//! Daily modifier catalog and effect aggregation.
//!
//! The roll itself (which needs randomness) lives in the engine; this module
//! only owns the static table and the math.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    Challenge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

/// "Serve `target` guests within `seconds` for `reward` gold."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedChallenge {
    pub seconds: u32,
    pub target: u32,
    pub reward: u64,
}

/// Numeric effects of one modifier, or of a whole day once aggregated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierEffects {
    pub traffic_mult: f32,
    pub satisfaction_bonus: f32,
    pub profit_mult: f32,
    pub cook_speed_mult: f32,
    pub special_customer_mult: f32,
    pub gold_flat: i64,
    /// Gold lost per angry guest.
    pub angry_penalty: u64,
    pub timed_challenge: Option<TimedChallenge>,
}

impl ModifierEffects {
    /// Identity: multiplies by one, adds zero.
    pub const NEUTRAL: ModifierEffects = ModifierEffects {
        traffic_mult: 1.0,
        satisfaction_bonus: 0.0,
        profit_mult: 1.0,
        cook_speed_mult: 1.0,
        special_customer_mult: 1.0,
        gold_flat: 0,
        angry_penalty: 0,
        timed_challenge: None,
    };

    /// Fold another effect bundle into this one.
    pub fn combine(&mut self, other: &ModifierEffects) {
        self.traffic_mult *= other.traffic_mult;
        self.satisfaction_bonus += other.satisfaction_bonus;
        self.profit_mult *= other.profit_mult;
        self.cook_speed_mult *= other.cook_speed_mult;
        self.special_customer_mult *= other.special_customer_mult;
        self.gold_flat += other.gold_flat;
        self.angry_penalty += other.angry_penalty;
        if other.timed_challenge.is_some() {
            self.timed_challenge = other.timed_challenge;
        }
    }
}

impl Default for ModifierEffects {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub polarity: Polarity,
    pub rarity: Rarity,
    pub effects: ModifierEffects,
}

const N: ModifierEffects = ModifierEffects::NEUTRAL;

const fn m(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    polarity: Polarity,
    rarity: Rarity,
    effects: ModifierEffects,
) -> Modifier {
    Modifier {
        id,
        name,
        description,
        polarity,
        rarity,
        effects,
    }
}

use Polarity::{Challenge, Negative, Positive};
use Rarity::{Common, Legendary, Rare};

pub static MODIFIERS: [Modifier; 30] = [
    // Positive
    m("food_festival", "Food Festival", "Everyone in town wants a taste", Positive, Common,
        ModifierEffects { traffic_mult: 1.5, ..N }),
    m("catnip_day", "Catnip Day", "The cats are in a great mood", Positive, Common,
        ModifierEffects { satisfaction_bonus: 20.0, ..N }),
    m("tycoon_visit", "Tycoon in Town", "Special guests are far more likely", Positive, Rare,
        ModifierEffects { special_customer_mult: 3.0, ..N }),
    m("discount_supplies", "Discount Supplies", "Cheap groceries, double profit", Positive, Common,
        ModifierEffects { profit_mult: 2.0, ..N }),
    m("chef_inspiration", "Chef Inspiration", "Cooking twice as fast", Positive, Common,
        ModifierEffects { cook_speed_mult: 0.5, ..N }),
    m("word_of_mouth", "Word of Mouth", "Rave reviews bring more and happier guests", Positive, Rare,
        ModifierEffects { traffic_mult: 1.3, satisfaction_bonus: 10.0, ..N }),
    m("lucky_coin", "Lucky Coin", "Found some gold on the doorstep", Positive, Common,
        ModifierEffects { gold_flat: 5, ..N }),
    m("celebrity_post", "Celebrity Post", "A famous cat posted about us", Positive, Rare,
        ModifierEffects { traffic_mult: 2.0, ..N }),
    m("perfect_weather", "Perfect Weather", "Lovely day to eat out", Positive, Common,
        ModifierEffects { traffic_mult: 1.3, ..N }),
    m("nostalgia", "Retro Craze", "Old-school diners are in fashion", Positive, Common,
        ModifierEffects { satisfaction_bonus: 15.0, profit_mult: 1.3, ..N }),
    // Negative
    m("supply_shortage", "Supply Shortage", "Ingredient prices spiked", Negative, Common,
        ModifierEffects { profit_mult: 0.5, ..N }),
    m("storm", "Storm", "Fewer guests, but they linger", Negative, Common,
        ModifierEffects { traffic_mult: 0.5, satisfaction_bonus: 10.0, ..N }),
    m("health_inspect", "Health Inspection", "The inspector is watching", Negative, Common,
        ModifierEffects { satisfaction_bonus: -15.0, ..N }),
    m("rival_opening", "Rival Opening", "A new place opened next door", Negative, Common,
        ModifierEffects { traffic_mult: 0.7, ..N }),
    m("power_outage", "Power Outage", "Kitchen equipment is sluggish", Negative, Common,
        ModifierEffects { cook_speed_mult: 1.5, ..N }),
    m("cat_flu", "Cat Flu", "The mascot is feeling under the weather", Negative, Common,
        ModifierEffects { satisfaction_bonus: -5.0, ..N }),
    m("tax_day", "Tax Day", "Quarterly taxes are due", Negative, Common,
        ModifierEffects { gold_flat: -3, ..N }),
    m("noise_complaint", "Noise Complaint", "The neighbors want quiet", Negative, Common,
        ModifierEffects { satisfaction_bonus: -10.0, ..N }),
    m("ingredient_spoil", "Spoiled Ingredients", "Some stock went bad", Negative, Common,
        ModifierEffects { profit_mult: 0.7, ..N }),
    m("critic_rumor", "Bad Review Rumor", "A nasty review is going around", Negative, Common,
        ModifierEffects { traffic_mult: 0.8, satisfaction_bonus: -5.0, ..N }),
    // Challenge
    m("speed_challenge", "Speed Challenge", "Serve 5 guests in 60 seconds for 10 gold", Challenge, Rare,
        ModifierEffects {
            timed_challenge: Some(TimedChallenge { seconds: 60, target: 5, reward: 10 }),
            ..N
        }),
    m("vip_only", "VIP Only", "A single VIP paying ten times over", Challenge, Legendary,
        ModifierEffects { traffic_mult: 0.2, profit_mult: 10.0, ..N }),
    m("mystery_menu", "Mystery Menu", "Double profit, unpredictable reactions", Challenge, Rare,
        ModifierEffects { profit_mult: 2.0, satisfaction_bonus: -10.0, ..N }),
    m("golden_hour", "Golden Hour", "Triple profit", Challenge, Legendary,
        ModifierEffects { profit_mult: 3.0, ..N }),
    m("cat_parade", "Cat Parade", "Crowds of cats, total chaos", Challenge, Rare,
        ModifierEffects { traffic_mult: 2.0, satisfaction_bonus: -10.0, ..N }),
    m("critic_arrival", "Critic Incoming", "A food critic is coming today", Challenge, Rare,
        ModifierEffects { special_customer_mult: 5.0, satisfaction_bonus: -5.0, ..N }),
    m("double_or_nothing", "Double or Nothing", "Double profit, angry guests cost 3 gold", Challenge, Legendary,
        ModifierEffects { profit_mult: 2.0, angry_penalty: 3, ..N }),
    m("rush_hour", "Rush Hour", "Huge crowds, stressed kitchen", Challenge, Rare,
        ModifierEffects { traffic_mult: 2.5, cook_speed_mult: 1.3, ..N }),
    m("secret_recipe", "Secret Recipe", "Guests love it, but it takes time", Challenge, Rare,
        ModifierEffects { satisfaction_bonus: 30.0, cook_speed_mult: 1.5, ..N }),
    m("investor_visit", "Investor Visit", "An investor drops by with 20 gold", Challenge, Legendary,
        ModifierEffects { gold_flat: 20, satisfaction_bonus: -10.0, ..N }),
];

pub fn find(id: &str) -> Option<&'static Modifier> {
    MODIFIERS.iter().find(|m| m.id == id)
}

/// Probability that a modifier of this rarity survives the daily pre-filter.
pub fn keep_chance(rarity: Rarity) -> f32 {
    match rarity {
        Rarity::Common => 1.0,
        Rarity::Rare => 0.4,
        Rarity::Legendary => 0.15,
    }
}

/// Which polarity bucket a slot roll selects, given the tier's positive weight.
pub fn polarity_for_roll(roll: f32, positive_weight: f32) -> Polarity {
    if roll < positive_weight {
        Polarity::Positive
    } else if roll < positive_weight + 0.2 {
        Polarity::Challenge
    } else {
        Polarity::Negative
    }
}

/// Combined effects of a day's modifiers.
///
/// Folds in id order, so the result does not depend on roll order.
pub fn aggregate<'a>(modifiers: impl IntoIterator<Item = &'a Modifier>) -> ModifierEffects {
    let mut sorted: Vec<&Modifier> = modifiers.into_iter().collect();
    sorted.sort_by_key(|m| m.id);
    let mut total = ModifierEffects::NEUTRAL;
    for modifier in sorted {
        total.combine(&modifier.effects);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        let ids: HashSet<_> = MODIFIERS.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 30);
        for polarity in [Positive, Negative, Challenge] {
            assert_eq!(MODIFIERS.iter().filter(|m| m.polarity == polarity).count(), 10);
        }
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let picks = ["word_of_mouth", "power_outage", "lucky_coin", "speed_challenge"];
        let forward: Vec<_> = picks.iter().filter_map(|id| find(id)).collect();
        let backward: Vec<_> = forward.iter().rev().copied().collect();
        let a = aggregate(forward);
        let b = aggregate(backward);
        assert_eq!(a, b);
        assert!((a.traffic_mult - 1.3).abs() < 1e-6);
        assert!((a.cook_speed_mult - 1.5).abs() < 1e-6);
        assert_eq!(a.gold_flat, 5);
        assert_eq!(a.satisfaction_bonus, 10.0);
        assert!(a.timed_challenge.is_some());
    }

    #[test]
    fn test_aggregate_ignores_order_for_every_triple() {
        let n = MODIFIERS.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let (a, b, c) = (&MODIFIERS[i], &MODIFIERS[j], &MODIFIERS[k]);
                    let expected = aggregate([a, b, c]);
                    for order in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
                        assert_eq!(aggregate(order), expected, "{} {} {}", a.id, b.id, c.id);
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_aggregate_is_neutral() {
        assert_eq!(aggregate(std::iter::empty()), ModifierEffects::NEUTRAL);
    }

    #[test]
    fn test_double_or_nothing_penalizes_angry() {
        let e = find("double_or_nothing").unwrap().effects;
        assert_eq!(e.angry_penalty, 3);
        assert_eq!(e.profit_mult, 2.0);
    }

    #[test]
    fn test_polarity_buckets() {
        assert_eq!(polarity_for_roll(0.1, 0.3), Positive);
        assert_eq!(polarity_for_roll(0.35, 0.3), Challenge);
        assert_eq!(polarity_for_roll(0.6, 0.3), Negative);
    }
}
