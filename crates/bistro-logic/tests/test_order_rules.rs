//! Integration tests for the order pipeline rules.
//!
//! Exercises: Menu → satisfaction score → payout → reputation delta,
//! plus the daily modifier math feeding into it.
//!
//! All tests are pure logic - no engine, no RNG.

use bistro_logic::economy::{payout, PayoutInputs, SpecialGuest};
use bistro_logic::menu::{FoodCategory, FoodItem, Menu};
use bistro_logic::modifiers::{self, aggregate};
use bistro_logic::reputation::{delta_for_satisfaction, ReputationState, Tier};
use bistro_logic::satisfaction::{score, SatisfactionInputs, SatisfactionLevel, SatisfactionTracker};
use bistro_logic::upgrades::{UpgradeId, UpgradeState};

// ── Helpers ────────────────────────────────────────────────────────────

fn logged_week() -> Vec<FoodItem> {
    let mut foods = Vec::new();
    for _ in 0..3 {
        foods.push(FoodItem::new("Tofu Stir Fry", 340, FoodCategory::Vegetable));
    }
    foods.push(FoodItem::new("Oatmeal", 150, FoodCategory::Rice));
    foods.push(FoodItem::new("Greek Yogurt", 120, FoodCategory::Dairy));
    foods
}

/// Resolve one order the way the engine does, without randomness.
fn resolve(
    menu: &Menu,
    dish: &str,
    wait_ticks: u32,
    upgrades: &UpgradeState,
    special: Option<SpecialGuest>,
    profit_mult: f32,
) -> (f32, SatisfactionLevel, u64) {
    let s = score(&SatisfactionInputs {
        wait_ticks,
        upgrade_bonus: upgrades.satisfaction_bonus(),
        menu_size: menu.len(),
        modifier_bonus: 0.0,
        jitter: 0.0,
    });
    let level = SatisfactionLevel::from_score(s);
    let gold = payout(&PayoutInputs {
        dish_profit: menu.find(dish).map(|m| m.base_profit()),
        special,
        level,
        profit_mult,
    });
    (s, level, gold)
}

// ── Order resolution ───────────────────────────────────────────────────

#[test]
fn test_quick_signature_order_pays_six() {
    let menu = Menu::build(&logged_week());
    let (s, level, gold) = resolve(&menu, "Tofu Stir Fry", 10, &UpgradeState::new(), None, 1.0);
    assert_eq!(s, 86.0);
    assert_eq!(level, SatisfactionLevel::Happy);
    assert_eq!(gold, 6);
}

#[test]
fn test_slow_unknown_dish_still_pays_one() {
    let menu = Menu::build(&logged_week());
    let (_, level, gold) = resolve(&menu, "Not On Menu", 400, &UpgradeState::new(), None, 1.0);
    assert_eq!(level, SatisfactionLevel::Angry);
    assert_eq!(gold, 1);
}

#[test]
fn test_decor_lifts_a_slow_order_to_neutral() {
    let menu = Menu::build(&[]);
    let mut upgrades = UpgradeState::new();
    let (_, before, _) = resolve(&menu, "x", 200, &upgrades, None, 1.0);
    assert_eq!(before, SatisfactionLevel::Angry);

    upgrades.apply(UpgradeId::TableLevel);
    let (after_score, after, _) = resolve(&menu, "x", 200, &upgrades, None, 1.0);
    assert!((after_score - 40.0).abs() < 1e-4);
    assert_eq!(after, SatisfactionLevel::Neutral);
}

#[test]
fn test_modifiers_scale_payout() {
    let menu = Menu::build(&logged_week());
    let day = aggregate(
        ["discount_supplies", "supply_shortage"]
            .iter()
            .filter_map(|id| modifiers::find(id)),
    );
    assert_eq!(day.profit_mult, 1.0);

    let golden = aggregate(modifiers::find("golden_hour"));
    let (_, _, gold) = resolve(&menu, "Greek Yogurt", 10, &UpgradeState::new(), None, golden.profit_mult);
    assert_eq!(gold, 9);
}

// ── Reputation feedback ────────────────────────────────────────────────

#[test]
fn test_happy_critics_climb_tiers() {
    let mut rep = ReputationState::new();
    let mut changes = 0;
    for _ in 0..5 {
        let level = SatisfactionLevel::Happy;
        let before = rep.tier;
        rep.add(delta_for_satisfaction(level));
        rep.add(SpecialGuest::Critic.reputation_bonus(level));
        if rep.tier != before {
            changes += 1;
        }
    }
    assert_eq!(rep.value, 15.0 + 5.0 * 6.5);
    assert_eq!(rep.tier, Tier::Popular);
    assert_eq!(changes, 2);
}

#[test]
fn test_tracker_feeds_traffic() {
    let mut tracker = SatisfactionTracker::new();
    for _ in 0..20 {
        tracker.record(86.0);
    }
    assert_eq!(tracker.traffic_multiplier(), 1.3);
    assert_eq!(tracker.stars(), 4);
}
