//! Whole-engine runs: many ticks through the public API.

use std::collections::HashSet;

use bistro_core::prelude::*;
use bistro_logic::menu::{FoodCategory, FoodItem};
use bistro_logic::upgrades::UpgradeId;

/// Noon, 1 Jan 2026 UTC.
const NOON: i64 = 1_767_268_800_000;

fn open(config: EngineConfig, store: MemoryStore, clock: ManualClock) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config, Box::new(store), Box::new(clock));
    if engine.needs_daily_setup() {
        engine.continue_previous_day();
    }
    engine
}

fn busy_config(seed: u64) -> EngineConfig {
    EngineConfig {
        base_spawn_interval: 8.0,
        min_spawn_interval: 8.0,
        spawn_jitter: 0.0,
        ..EngineConfig::seeded(seed)
    }
}

fn assert_floor_consistent(engine: &SimulationEngine) {
    let layout = &engine.layout;
    assert!(layout.occupied_count() <= layout.tables.len());
    assert!(engine.customers().len() <= engine.upgrades.table_count() + 3);

    let mut holders = vec![0usize; layout.tables.len()];
    for &entity in engine.customers() {
        let actor = engine.world.get::<&Actor>(entity).expect("live customer");
        let customer = actor.as_customer().expect("customer roster holds customers");
        if let Some(table) = customer.table {
            holders[table] += 1;
        }
    }
    for (index, table) in layout.tables.iter().enumerate() {
        let expected = usize::from(table.occupied);
        assert_eq!(
            holders[index], expected,
            "frame {}: table {index} occupied={} held by {} guests",
            engine.frame(),
            table.occupied,
            holders[index]
        );
    }

    let mut matched = HashSet::new();
    for delivery in &engine.kitchen.deliveries {
        assert!(matched.insert(delivery.customer), "guest matched twice");
    }
}

#[test]
fn test_tables_match_guests_every_tick() {
    for seed in 0..4 {
        let mut engine = open(busy_config(seed), MemoryStore::new(), ManualClock::new(NOON));
        for _ in 0..4000 {
            engine.update();
            assert_floor_consistent(&engine);
        }
    }
}

#[test]
fn test_table_purchase_keeps_leaving_guests_seated() {
    let mut engine = open(busy_config(0), MemoryStore::new(), ManualClock::new(NOON));
    engine.add_gold(10_000);
    for _ in 0..6 {
        for _ in 0..300 {
            engine.update();
            assert_floor_consistent(&engine);
        }
        engine.purchase_upgrade(UpgradeId::TableCount).expect("affordable");
        assert_floor_consistent(&engine);
    }
}

#[test]
fn test_single_guest_is_served_and_leaves() {
    let config = EngineConfig {
        base_spawn_interval: 1.0e9,
        min_spawn_interval: 0.0,
        spawn_jitter: 0.0,
        ..EngineConfig::seeded(7)
    };
    let mut engine = open(config, MemoryStore::new(), ManualClock::new(NOON));

    for _ in 0..3000 {
        engine.update();
    }

    assert_eq!(engine.total_customers(), 1);
    assert_eq!(engine.satisfaction.len(), 1);
    assert!(engine.customers().is_empty());
    assert_eq!(engine.layout.occupied_count(), 0);
    assert!(engine.kitchen.orders.is_empty());
    assert!(engine.kitchen.deliveries.is_empty());
}

#[test]
fn test_busy_floor_stays_consistent() {
    let mut engine = open(busy_config(11), MemoryStore::new(), ManualClock::new(NOON));
    engine.update_menu(&[
        FoodItem::new("Salmon Bowl", 540, FoodCategory::Rice),
        FoodItem::new("Milk Tea", 210, FoodCategory::Drink),
        FoodItem::new("Milk Tea", 210, FoodCategory::Drink),
    ]);

    for _ in 0..6000 {
        engine.update();
        assert_floor_consistent(&engine);
    }

    assert!(engine.total_customers() > 20);
    assert!(!engine.satisfaction.is_empty());
    assert!(engine.total_gold_earned() > 0);
}

#[test]
fn test_extra_staff_serve_more_guests() {
    let mut small = open(busy_config(5), MemoryStore::new(), ManualClock::new(NOON));
    let mut large = open(busy_config(5), MemoryStore::new(), ManualClock::new(NOON));
    large.add_gold(5_000);
    for id in [UpgradeId::ChefCount, UpgradeId::WaiterCount, UpgradeId::TableCount, UpgradeId::ChefCount] {
        large.purchase_upgrade(id).expect("affordable");
    }
    assert_eq!(large.chefs().len(), 3);
    assert_eq!(large.waiters().len(), 2);

    for _ in 0..8000 {
        small.update();
        large.update();
        assert_floor_consistent(&small);
        assert_floor_consistent(&large);
    }
    assert!(large.total_customers() > small.total_customers());
}

#[test]
fn test_gold_never_underflows_through_choices() {
    let mut engine = open(EngineConfig::seeded(2), MemoryStore::new(), ManualClock::new(NOON));
    engine.add_gold(-(engine.gold() as i64));
    assert_eq!(engine.gold(), 0);

    for _ in 0..20_000 {
        engine.update();
        if engine.pending_choice().is_some() {
            // Any outcome, including the costly ones.
            if engine.make_choice(0).is_err() {
                engine.dismiss_choice();
            }
        }
    }
    // Losses clamp at zero, so the purse never exceeds what was earned.
    assert!(engine.gold() <= engine.total_gold_earned());
}

#[test]
fn test_day_gate_holds_until_setup() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOON);
    let mut engine = SimulationEngine::new(EngineConfig::seeded(1), Box::new(store.clone()), Box::new(clock.clone()));
    assert!(engine.needs_daily_setup());
    for _ in 0..100 {
        engine.update();
    }
    assert_eq!(engine.frame(), 0);
    assert!(engine.customers().is_empty());

    let rolled = engine.setup_new_day();
    assert!((1..=2).contains(&rolled.len()));
    assert_eq!(engine.active_modifiers().len(), rolled.len());
    engine.teardown();

    // Same day: no new roll.
    clock.advance(3_600_000);
    let again = SimulationEngine::new(EngineConfig::seeded(1), Box::new(store.clone()), Box::new(clock.clone()));
    assert!(!again.needs_daily_setup());
    assert_eq!(again.active_modifiers().len(), rolled.len());

    // Next calendar day: roll again.
    clock.advance(24 * 3_600_000);
    let mut tomorrow = SimulationEngine::new(EngineConfig::seeded(1), Box::new(store), Box::new(clock));
    assert!(tomorrow.needs_daily_setup());
    tomorrow.setup_new_day();
    assert_eq!(tomorrow.roguelike.day_count, 2);
    assert_eq!(tomorrow.days_played(), 2);
}

#[test]
fn test_progress_roundtrip_across_engines() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOON);
    let mut first = open(busy_config(3), store.clone(), clock.clone());
    first.add_gold(300);
    first.purchase_upgrade(UpgradeId::TableCount).expect("affordable");
    for _ in 0..1500 {
        first.update();
    }
    let gold = first.gold();
    let earned = first.total_gold_earned();
    let customers = first.total_customers();
    let reputation = first.reputation.value;
    first.teardown();

    let second = open(busy_config(4), store, clock);
    assert_eq!(second.gold(), gold);
    assert_eq!(second.total_gold_earned(), earned);
    assert_eq!(second.total_customers(), customers);
    assert_eq!(second.reputation.value, reputation);
    assert_eq!(second.upgrades.level(UpgradeId::TableCount), 1);
    assert_eq!(second.layout.tables.len(), 3);
}

#[test]
fn test_corrupt_records_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    store.set("bistro_game", b"not json at all").unwrap();
    store.set("bistro_reputation", br#"{"value": 250.0}"#).unwrap();

    let engine = open(EngineConfig::seeded(1), store, ManualClock::new(NOON));
    assert_eq!(engine.gold(), 10);
    assert_eq!(engine.reputation.value, 100.0);
}

#[test]
fn test_teardown_stops_everything() {
    let store = MemoryStore::new();
    let mut engine = open(busy_config(8), store.clone(), ManualClock::new(NOON));
    for _ in 0..200 {
        engine.update();
    }
    engine.teardown();
    assert!(engine.is_torn_down());
    assert_eq!(store.len(), 6);

    let frame = engine.frame();
    let customers = engine.total_customers();
    for _ in 0..200 {
        engine.update();
    }
    assert_eq!(engine.frame(), frame);
    assert_eq!(engine.total_customers(), customers);
}

#[test]
fn test_feed_fills_up_over_time() {
    let mut engine = open(EngineConfig::seeded(6), MemoryStore::new(), ManualClock::new(NOON));
    for _ in 0..4000 {
        engine.update();
    }
    // Ambient events land every 8-20 seconds.
    assert!(engine.events.len() > 10);
    assert!(engine.events.len() <= 50);
    let ids: Vec<u64> = engine.events.iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "newest first");
}
