//! Achievements - ordered predicate rules over a stats snapshot.
//!
//! Unlocks are append-only: once an id has a timestamp it is never checked
//! again, even if the stat that triggered it later drops.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything the rules look at. Refreshed by the engine before each check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub total_gold: u64,
    pub total_customers: u64,
    pub total_upgrades: u32,
    pub max_concurrent_customers: u32,
    pub satisfaction_avg: f32,
    pub has_mascot: bool,
    pub signature_dishes: u32,
    pub night_customers: u32,
    pub days_played: u32,
    pub max_gold_once: u64,
    pub rare_events_seen: u32,
    pub total_events_generated: u32,
    pub all_tables_full: bool,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            total_gold: 0,
            total_customers: 0,
            total_upgrades: 0,
            max_concurrent_customers: 0,
            satisfaction_avg: 50.0,
            has_mascot: false,
            signature_dishes: 0,
            night_customers: 0,
            days_played: 0,
            max_gold_once: 0,
            rare_events_seen: 0,
            total_events_generated: 0,
            all_tables_full: false,
        }
    }
}

pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub condition: fn(&GameStats) -> bool,
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement").field("id", &self.id).finish()
    }
}

pub static ACHIEVEMENTS: [Achievement; 17] = [
    Achievement {
        id: "first_customer",
        name: "Grand Opening",
        description: "Serve your first guest",
        condition: |s| s.total_customers >= 1,
    },
    Achievement {
        id: "gold_100",
        name: "Money Maker",
        description: "Earn 100 gold in total",
        condition: |s| s.total_gold >= 100,
    },
    Achievement {
        id: "gold_500",
        name: "Well Off",
        description: "Earn 500 gold in total",
        condition: |s| s.total_gold >= 500,
    },
    Achievement {
        id: "gold_1000",
        name: "Tycoon",
        description: "Earn 1000 gold in total",
        condition: |s| s.total_gold >= 1000,
    },
    Achievement {
        id: "full_house",
        name: "Full House",
        description: "Every table occupied at once",
        condition: |s| s.all_tables_full,
    },
    Achievement {
        id: "five_star",
        name: "Five Stars",
        description: "Average satisfaction of 90",
        condition: |s| s.satisfaction_avg >= 90.0,
    },
    Achievement {
        id: "night_owl",
        name: "Midnight Diner",
        description: "Welcome 5 guests at night",
        condition: |s| s.night_customers >= 5,
    },
    Achievement {
        id: "signature_dish",
        name: "Signature Dish",
        description: "A dish ordered 3 or more times",
        condition: |s| s.signature_dishes >= 1,
    },
    Achievement {
        id: "cat_unlock",
        name: "Her Majesty Arrives",
        description: "Unlock the mascot cat",
        condition: |s| s.has_mascot,
    },
    Achievement {
        id: "regular_7",
        name: "Dedicated",
        description: "Play on 7 different days",
        condition: |s| s.days_played >= 7,
    },
    Achievement {
        id: "customers_50",
        name: "Crowd Pleaser",
        description: "Serve 50 guests",
        condition: |s| s.total_customers >= 50,
    },
    Achievement {
        id: "customers_200",
        name: "Hot Spot",
        description: "Serve 200 guests",
        condition: |s| s.total_customers >= 200,
    },
    Achievement {
        id: "upgrade_5",
        name: "Renovator",
        description: "Buy 5 upgrades",
        condition: |s| s.total_upgrades >= 5,
    },
    Achievement {
        id: "upgrade_15",
        name: "Perfectionist",
        description: "Buy 15 upgrades",
        condition: |s| s.total_upgrades >= 15,
    },
    Achievement {
        id: "rare_event",
        name: "Lucky Streak",
        description: "Witness 3 rare events",
        condition: |s| s.rare_events_seen >= 3,
    },
    Achievement {
        id: "big_tipper",
        name: "Big Spender",
        description: "Earn 5 or more gold from one guest",
        condition: |s| s.max_gold_once >= 5,
    },
    Achievement {
        id: "events_100",
        name: "Storyteller",
        description: "Witness 100 events",
        condition: |s| s.total_events_generated >= 100,
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Unlock ledger plus the last stats snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementState {
    /// Achievement id → unlock time in epoch milliseconds.
    pub unlocked: BTreeMap<String, i64>,
    pub stats: GameStats,
}

impl AchievementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Stamp every rule that just became true. Returns them in catalog order.
    pub fn check(&mut self, now_ms: i64) -> Vec<&'static Achievement> {
        let mut newly = Vec::new();
        for achievement in ACHIEVEMENTS.iter() {
            if self.unlocked.contains_key(achievement.id) {
                continue;
            }
            if (achievement.condition)(&self.stats) {
                self.unlocked.insert(achievement.id.to_string(), now_ms);
                newly.push(achievement);
            }
        }
        newly
    }
}
