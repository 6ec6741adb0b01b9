//! Cat Bistro Headless Simulation Harness
//!
//! Validates the rule catalogs and runs the engine for a few simulated hours
//! against an in-memory store. No host, no rendering, no disk.
//!
//! Usage:
//!   cargo run -p bistro-simtest
//!   cargo run -p bistro-simtest -- --verbose

use std::collections::HashSet;

use bistro_core::prelude::*;
use bistro_logic::achievements::ACHIEVEMENTS;
use bistro_logic::choices::{Rarity, CHOICE_EVENTS};
use bistro_logic::constants::TICK_RATE_HZ;
use bistro_logic::menu::{FoodCategory, FoodItem, Menu};
use bistro_logic::modifiers::{aggregate, Polarity, MODIFIERS};
use bistro_logic::reputation::{ReputationState, Tier, TIERS};
use bistro_logic::upgrades::{UpgradeId, UPGRADES};

// ── Sample meal log (same shape the host sends) ─────────────────────────
const MEALS_JSON: &str = include_str!("../../../data/sample_meals.json");

/// Noon, 1 Jan 2026 UTC.
const NOON: i64 = 1_767_268_800_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Cat Bistro Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Meal log and menu
    results.extend(validate_menu(verbose));

    // 2. Upgrade catalog
    results.extend(validate_upgrades(verbose));

    // 3. Daily modifiers
    results.extend(validate_modifiers(verbose));

    // 4. Choice events
    results.extend(validate_choices(verbose));

    // 5. Reputation tiers
    results.extend(validate_reputation(verbose));

    // 6. A long service
    results.extend(run_service(verbose));

    // 7. Saving and reopening
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!("\n=== RESULT: {}/{} passed, {} failed ===", passed, total, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Menu ─────────────────────────────────────────────────────────────

fn validate_menu(verbose: bool) -> Vec<TestResult> {
    println!("--- Menu ---");
    let mut results = Vec::new();

    let meals: Vec<FoodItem> = match serde_json::from_str(MEALS_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult::new("meals_parse", false, format!("JSON parse error: {}", e)));
            return results;
        }
    };
    results.push(TestResult::new(
        "meals_parse",
        !meals.is_empty(),
        format!("{} meal records loaded", meals.len()),
    ));

    let menu = Menu::build(&meals);
    let names: HashSet<&str> = meals.iter().map(|m| m.name.as_str()).collect();
    results.push(TestResult::new(
        "menu_merges_duplicates",
        menu.len() == names.len(),
        format!("{} dishes from {} distinct names", menu.len(), names.len()),
    ));

    let signatures: Vec<&str> = menu
        .items
        .iter()
        .filter(|i| i.is_signature)
        .map(|i| i.name.as_str())
        .collect();
    results.push(TestResult::new(
        "menu_signatures",
        signatures.len() == 2,
        format!("signature dishes: {}", signatures.join(", ")),
    ));

    let unknown = menu.items.iter().filter(|i| i.category == FoodCategory::Other).count();
    results.push(TestResult::new(
        "menu_unknown_category_is_other",
        unknown == 2,
        format!("{} dishes fell back to Other", unknown),
    ));

    // Every roll in [0, 1) must land on a dish.
    let misses = (0..1000)
        .map(|i| i as f32 / 1000.0)
        .filter(|&roll| menu.pick(roll).is_none())
        .count();
    results.push(TestResult::new(
        "menu_pick_covers_unit_interval",
        misses == 0,
        format!("{} rolls missed", misses),
    ));

    if verbose {
        for item in &menu.items {
            println!(
                "    {:<20} x{} profit {}{}",
                item.name,
                item.times_ordered,
                item.profit,
                if item.is_signature { " ★" } else { "" }
            );
        }
    }
    results
}

// ── 2. Upgrades ─────────────────────────────────────────────────────────

fn validate_upgrades(verbose: bool) -> Vec<TestResult> {
    println!("--- Upgrades ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "upgrade_catalog_size",
        UPGRADES.len() == UpgradeId::ALL.len(),
        format!("{} upgrades", UPGRADES.len()),
    ));

    let keys: HashSet<&str> = UpgradeId::ALL.iter().map(|id| id.key()).collect();
    results.push(TestResult::new(
        "upgrade_keys_unique",
        keys.len() == UpgradeId::ALL.len(),
        format!("{} distinct keys", keys.len()),
    ));

    let mut bad_curve = Vec::new();
    let mut full_price = 0u64;
    for spec in &UPGRADES {
        let costs: Vec<u64> = (0..spec.max_level).map(|l| spec.cost_at(l)).collect();
        if costs.windows(2).any(|w| w[1] < w[0]) || costs.first().copied() != Some(spec.base_cost) {
            bad_curve.push(spec.name);
        }
        full_price += costs.iter().sum::<u64>();
        if verbose {
            println!("    {:<16} {:?}", spec.name, costs);
        }
    }
    results.push(TestResult::new(
        "upgrade_costs_non_decreasing",
        bad_curve.is_empty(),
        if bad_curve.is_empty() {
            "all cost curves start at base and grow".to_string()
        } else {
            format!("bad curves: {}", bad_curve.join(", "))
        },
    ));

    // Buying everything must end with every id at its max.
    let mut state = bistro_logic::upgrades::UpgradeState::new();
    let mut gold = full_price;
    for id in UpgradeId::ALL {
        while let Ok(cost) = state.check_purchase(id, gold) {
            state.apply(id);
            gold -= cost;
        }
    }
    let all_maxed = UpgradeId::ALL.iter().all(|&id| state.level(id) == id.spec().max_level);
    results.push(TestResult::new(
        "upgrade_full_tree_affordable",
        all_maxed && gold == 0,
        format!("{} gold buys every level, {} left", full_price, gold),
    ));
    results
}

// ── 3. Modifiers ────────────────────────────────────────────────────────

fn validate_modifiers(verbose: bool) -> Vec<TestResult> {
    println!("--- Daily Modifiers ---");
    let mut results = Vec::new();

    let ids: HashSet<&str> = MODIFIERS.iter().map(|m| m.id).collect();
    results.push(TestResult::new(
        "modifier_ids_unique",
        ids.len() == MODIFIERS.len(),
        format!("{} modifiers, {} distinct ids", MODIFIERS.len(), ids.len()),
    ));

    for polarity in [Polarity::Positive, Polarity::Negative, Polarity::Challenge] {
        let count = MODIFIERS.iter().filter(|m| m.polarity == polarity).count();
        results.push(TestResult::new(
            &format!("modifier_pool_{:?}", polarity).to_lowercase(),
            count > 0,
            format!("{} modifiers", count),
        ));
    }

    let all = aggregate(MODIFIERS.iter());
    let sane = [all.traffic_mult, all.profit_mult, all.cook_speed_mult, all.special_customer_mult]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
    results.push(TestResult::new(
        "modifier_stack_stays_positive",
        sane,
        format!(
            "traffic {:.2} profit {:.2} cook {:.2} special {:.2}",
            all.traffic_mult, all.profit_mult, all.cook_speed_mult, all.special_customer_mult
        ),
    ));

    if verbose {
        for m in MODIFIERS.iter() {
            println!("    {:<20} {:?}/{:?}", m.id, m.polarity, m.rarity);
        }
    }
    results
}

// ── 4. Choice events ────────────────────────────────────────────────────

fn validate_choices(verbose: bool) -> Vec<TestResult> {
    println!("--- Choice Events ---");
    let mut results = Vec::new();

    let ids: HashSet<&str> = CHOICE_EVENTS.iter().map(|e| e.id).collect();
    results.push(TestResult::new(
        "choice_ids_unique",
        ids.len() == CHOICE_EVENTS.len(),
        format!("{} events", CHOICE_EVENTS.len()),
    ));

    let mut bad = Vec::new();
    for event in CHOICE_EVENTS {
        for option in event.options {
            let total: f32 = option.outcomes.iter().map(|o| o.probability).sum();
            if (total - 1.0).abs() > 0.01 {
                bad.push(format!("{}/{} sums to {:.2}", event.id, option.label, total));
            }
        }
        if verbose {
            println!("    {:<20} {:?}, {} options", event.id, event.rarity, event.options.len());
        }
    }
    results.push(TestResult::new(
        "choice_outcomes_sum_to_one",
        bad.is_empty(),
        if bad.is_empty() {
            "every option's outcomes sum to 1".to_string()
        } else {
            bad.join("; ")
        },
    ));

    let legendary = CHOICE_EVENTS.iter().filter(|e| e.rarity == Rarity::Legendary).count();
    results.push(TestResult::new(
        "choice_legendary_present",
        legendary > 0,
        format!("{} legendary events", legendary),
    ));

    let mascot_only = CHOICE_EVENTS
        .iter()
        .flat_map(|e| e.options.iter())
        .filter(|o| o.requires_mascot)
        .count();
    results.push(TestResult::new(
        "choice_mascot_options",
        mascot_only > 0,
        format!("{} options need the cat", mascot_only),
    ));
    results
}

// ── 5. Reputation ───────────────────────────────────────────────────────

fn validate_reputation(verbose: bool) -> Vec<TestResult> {
    println!("--- Reputation ---");
    let mut results = Vec::new();

    let ordered = TIERS.windows(2).all(|w| w[0].min_value < w[1].min_value);
    results.push(TestResult::new(
        "tier_thresholds_ascending",
        ordered,
        format!("{} tiers", TIERS.len()),
    ));

    // Walk 0 -> 100 in small steps and count tier changes.
    let mut state = ReputationState::with_value(0.0);
    let mut changes = 0;
    for _ in 0..250 {
        if state.add(0.5).is_some() {
            changes += 1;
        }
    }
    results.push(TestResult::new(
        "tier_walk_up",
        changes == TIERS.len() - 1 && state.tier == Tier::Legendary && state.value == 100.0,
        format!("{} tier changes, ended at {:.1}", changes, state.value),
    ));

    let traffic_grows = TIERS.windows(2).all(|w| w[0].traffic_mult <= w[1].traffic_mult);
    results.push(TestResult::new(
        "tier_traffic_non_decreasing",
        traffic_grows,
        "higher tiers never bring fewer guests",
    ));

    if verbose {
        for info in TIERS.iter() {
            println!(
                "    {:<10} ≥{:>4} traffic x{:.2} special {:.0}%",
                info.name,
                info.min_value,
                info.traffic_mult,
                info.special_chance * 100.0
            );
        }
    }
    results
}

// ── 6. Service run ──────────────────────────────────────────────────────

fn run_service(verbose: bool) -> Vec<TestResult> {
    println!("--- Service Run ---");
    let mut results = Vec::new();

    let meals: Vec<FoodItem> = serde_json::from_str(MEALS_JSON).unwrap_or_default();
    let mut engine = SimulationEngine::new(
        EngineConfig::seeded(2024),
        Box::new(MemoryStore::new()),
        Box::new(ManualClock::new(NOON)),
    );
    let rolled = engine.setup_new_day();
    engine.update_menu(&meals);
    engine.add_gold(400);
    for id in [UpgradeId::TableCount, UpgradeId::ChefCount, UpgradeId::WaiterCount] {
        if let Err(e) = engine.purchase_upgrade(id) {
            results.push(TestResult::new(&format!("service_buy_{}", id.key()), false, e.to_string()));
        }
    }

    // Three simulated hours.
    let ticks = 3 * 60 * 60 * TICK_RATE_HZ as u64;
    let mut max_floor = 0;
    let mut violations = 0;
    for _ in 0..ticks {
        engine.update();
        max_floor = max_floor.max(engine.customers().len());
        if !tables_match_guests(&engine) {
            violations += 1;
        }
        if engine.pending_choice().is_some() && engine.make_choice(0).is_err() {
            engine.dismiss_choice();
        }
    }

    results.push(TestResult::new(
        "service_day_rolled",
        !rolled.is_empty(),
        rolled.iter().map(|m| m.name).collect::<Vec<_>>().join(", "),
    ));
    results.push(TestResult::new(
        "service_guests_arrived",
        engine.total_customers() > 100,
        format!("{} guests in {} ticks", engine.total_customers(), ticks),
    ));
    results.push(TestResult::new(
        "service_floor_capacity",
        max_floor <= engine.upgrades.table_count() + 3,
        format!("at most {} guests on the floor", max_floor),
    ));
    results.push(TestResult::new(
        "service_table_occupancy",
        violations == 0,
        format!("{} occupancy violations", violations),
    ));
    results.push(TestResult::new(
        "service_earned_gold",
        engine.total_gold_earned() > 400,
        format!("{} gold earned, {} in hand", engine.total_gold_earned(), engine.gold()),
    ));
    results.push(TestResult::new(
        "service_feed_bounded",
        engine.events.len() <= 50 && !engine.events.is_empty(),
        format!("{} events in the feed", engine.events.len()),
    ));

    if verbose {
        println!(
            "    reputation {:.1} ({}), {} stars, {} achievements, level {}",
            engine.reputation.value,
            engine.reputation.tier.name(),
            engine.satisfaction.stars(),
            engine.achievements.unlocked_count(),
            engine.level()
        );
        for event in engine.events.iter().take(10) {
            println!("    [{:?}] {}", event.category, event.text);
        }
    }

    let unlocked = engine.achievements.unlocked_count();
    results.push(TestResult::new(
        "service_achievements",
        unlocked > 0 && unlocked <= ACHIEVEMENTS.len(),
        format!("{}/{} unlocked", unlocked, ACHIEVEMENTS.len()),
    ));
    results
}

/// Every occupied table is held by exactly one guest, and no free table is held.
fn tables_match_guests(engine: &SimulationEngine) -> bool {
    let mut holders = vec![0usize; engine.layout.tables.len()];
    for &entity in engine.customers() {
        let Ok(actor) = engine.world.get::<&Actor>(entity) else {
            return false;
        };
        if let Some(table) = actor.as_customer().and_then(|c| c.table) {
            match holders.get_mut(table) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
    }
    engine
        .layout
        .tables
        .iter()
        .zip(&holders)
        .all(|(table, &count)| count == usize::from(table.occupied))
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let store = MemoryStore::new();
    let clock = ManualClock::new(NOON);
    let mut first = SimulationEngine::new(EngineConfig::seeded(7), Box::new(store.clone()), Box::new(clock.clone()));
    first.setup_new_day();
    for _ in 0..2000 {
        first.update();
    }
    let gold = first.gold();
    let day = first.roguelike.day_count;
    first.teardown();

    results.push(TestResult::new(
        "persist_six_records",
        store.len() == 6,
        format!("keys: {}", store.keys().join(", ")),
    ));

    let second = SimulationEngine::new(EngineConfig::seeded(8), Box::new(store.clone()), Box::new(clock.clone()));
    results.push(TestResult::new(
        "persist_gold_restored",
        second.gold() == gold,
        format!("{} -> {}", gold, second.gold()),
    ));
    results.push(TestResult::new(
        "persist_same_day_continues",
        !second.needs_daily_setup() && second.roguelike.day_count == day,
        format!("day {}", second.roguelike.day_count),
    ));

    clock.advance(24 * 3_600_000);
    let third = SimulationEngine::new(EngineConfig::seeded(9), Box::new(store), Box::new(clock));
    results.push(TestResult::new(
        "persist_next_day_rolls",
        third.needs_daily_setup(),
        "a new calendar day asks for setup",
    ));

    let mut snapshot = Vec::new();
    let roundtrip = second
        .save(&mut snapshot)
        .map_err(|e| e.to_string())
        .and_then(|_| {
            let mut fresh = SimulationEngine::default();
            fresh.load(&snapshot[..]).map_err(|e| e.to_string())?;
            Ok(fresh.gold())
        });
    results.push(TestResult::new(
        "persist_snapshot_roundtrip",
        roundtrip.as_ref().map(|g| *g == gold).unwrap_or(false),
        match roundtrip {
            Ok(g) => format!("{} bytes, gold {}", snapshot.len(), g),
            Err(e) => e,
        },
    ));
    results
}
