//! Upgrade ledger - catalog, exponential cost curve, derived multipliers.
//!
//! Levels are stored per [`UpgradeId`]; everything else (staff counts, cook
//! speed, decor satisfaction bonus) is derived from those levels on demand so
//! there is exactly one source of truth.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::economy::UPGRADE_COST_GROWTH;

/// Identifier of a purchasable upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    StoveLevel,
    ChefCount,
    TableCount,
    TableLevel,
    WaiterCount,
    WallDecor,
    FloorLevel,
    CatMascot,
    TakeoutWindow,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 9] = [
        Self::StoveLevel,
        Self::ChefCount,
        Self::TableCount,
        Self::TableLevel,
        Self::WaiterCount,
        Self::WallDecor,
        Self::FloorLevel,
        Self::CatMascot,
        Self::TakeoutWindow,
    ];

    /// Stable string key, matching the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Self::StoveLevel => "stove_level",
            Self::ChefCount => "chef_count",
            Self::TableCount => "table_count",
            Self::TableLevel => "table_level",
            Self::WaiterCount => "waiter_count",
            Self::WallDecor => "wall_decor",
            Self::FloorLevel => "floor_level",
            Self::CatMascot => "cat_mascot",
            Self::TakeoutWindow => "takeout_window",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    pub fn spec(self) -> &'static UpgradeSpec {
        // ALL and UPGRADES are declared in the same order.
        &UPGRADES[self as usize]
    }
}

/// Shop category, used by the host to group the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    Kitchen,
    Hall,
    Decor,
    Special,
}

/// Static description of one upgrade.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeSpec {
    pub id: UpgradeId,
    pub category: UpgradeCategory,
    pub name: &'static str,
    pub effect: &'static str,
    pub max_level: u32,
    pub base_cost: u64,
}

impl UpgradeSpec {
    /// Price of buying the level after `current_level`: `floor(base × 1.5^level)`.
    pub fn cost_at(&self, current_level: u32) -> u64 {
        (self.base_cost as f64 * UPGRADE_COST_GROWTH.powi(current_level as i32)).floor() as u64
    }
}

pub static UPGRADES: [UpgradeSpec; 9] = [
    UpgradeSpec {
        id: UpgradeId::StoveLevel,
        category: UpgradeCategory::Kitchen,
        name: "Stove",
        effect: "cook time -15% per level",
        max_level: 5,
        base_cost: 10,
    },
    UpgradeSpec {
        id: UpgradeId::ChefCount,
        category: UpgradeCategory::Kitchen,
        name: "Extra Chef",
        effect: "+1 chef per level",
        max_level: 3,
        base_cost: 50,
    },
    UpgradeSpec {
        id: UpgradeId::TableCount,
        category: UpgradeCategory::Hall,
        name: "Extra Table",
        effect: "+1 table per level",
        max_level: 6,
        base_cost: 20,
    },
    UpgradeSpec {
        id: UpgradeId::TableLevel,
        category: UpgradeCategory::Hall,
        name: "Better Furniture",
        effect: "satisfaction +10% per level",
        max_level: 5,
        base_cost: 15,
    },
    UpgradeSpec {
        id: UpgradeId::WaiterCount,
        category: UpgradeCategory::Hall,
        name: "Extra Waiter",
        effect: "+1 waiter per level",
        max_level: 3,
        base_cost: 40,
    },
    UpgradeSpec {
        id: UpgradeId::WallDecor,
        category: UpgradeCategory::Decor,
        name: "Wall Decor",
        effect: "satisfaction +5% per level",
        max_level: 5,
        base_cost: 8,
    },
    UpgradeSpec {
        id: UpgradeId::FloorLevel,
        category: UpgradeCategory::Decor,
        name: "Flooring",
        effect: "satisfaction +3% per level",
        max_level: 3,
        base_cost: 12,
    },
    UpgradeSpec {
        id: UpgradeId::CatMascot,
        category: UpgradeCategory::Decor,
        name: "Mascot Cat",
        effect: "unlocks the mascot and cat events",
        max_level: 1,
        base_cost: 100,
    },
    UpgradeSpec {
        id: UpgradeId::TakeoutWindow,
        category: UpgradeCategory::Special,
        name: "Takeout Window",
        effect: "+1 gold every minute",
        max_level: 1,
        base_cost: 200,
    },
];

/// Why an upgrade cannot be bought right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeError {
    UnknownUpgrade,
    MaxLevel { id: UpgradeId, max_level: u32 },
    InsufficientGold { cost: u64, gold: u64 },
}

impl std::fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUpgrade => write!(f, "Unknown upgrade"),
            Self::MaxLevel { id, max_level } => {
                write!(f, "Upgrade {} already at max level {}", id.key(), max_level)
            }
            Self::InsufficientGold { cost, gold } => {
                write!(f, "Upgrade costs {} gold but only {} available", cost, gold)
            }
        }
    }
}

impl std::error::Error for UpgradeError {}

/// Purchased upgrade levels plus lifetime spend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeState {
    pub levels: BTreeMap<UpgradeId, u32>,
    pub total_gold_spent: u64,
}

impl UpgradeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, id: UpgradeId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    /// Price of the next level, or `None` when maxed out.
    pub fn next_cost(&self, id: UpgradeId) -> Option<u64> {
        let spec = id.spec();
        let level = self.level(id);
        (level < spec.max_level).then(|| spec.cost_at(level))
    }

    /// Check a purchase without mutating anything.
    pub fn check_purchase(&self, id: UpgradeId, gold: u64) -> Result<u64, UpgradeError> {
        let spec = id.spec();
        let level = self.level(id);
        if level >= spec.max_level {
            return Err(UpgradeError::MaxLevel {
                id,
                max_level: spec.max_level,
            });
        }
        let cost = spec.cost_at(level);
        if gold < cost {
            return Err(UpgradeError::InsufficientGold { cost, gold });
        }
        Ok(cost)
    }

    /// Raise the level by one and book the spend. Returns the price paid.
    ///
    /// Callers deduct gold themselves; use [`check_purchase`](Self::check_purchase) first.
    pub fn apply(&mut self, id: UpgradeId) -> u64 {
        let level = self.level(id);
        let cost = id.spec().cost_at(level);
        self.levels.insert(id, (level + 1).min(id.spec().max_level));
        self.total_gold_spent += cost;
        cost
    }

    /// Sum of all purchased levels.
    pub fn total_levels(&self) -> u32 {
        self.levels.values().sum()
    }

    pub fn table_count(&self) -> usize {
        2 + self.level(UpgradeId::TableCount) as usize
    }

    pub fn chef_count(&self) -> usize {
        1 + self.level(UpgradeId::ChefCount) as usize
    }

    pub fn waiter_count(&self) -> usize {
        1 + self.level(UpgradeId::WaiterCount) as usize
    }

    /// Cook time factor from stoves: 1.0 at level 0, −0.15 per level.
    pub fn cook_speed_multiplier(&self) -> f32 {
        1.0 - self.level(UpgradeId::StoveLevel) as f32 * 0.15
    }

    /// Decor satisfaction bonus as a fraction (0.10 = ten points).
    pub fn satisfaction_bonus(&self) -> f32 {
        self.level(UpgradeId::TableLevel) as f32 * 0.10
            + self.level(UpgradeId::WallDecor) as f32 * 0.05
            + self.level(UpgradeId::FloorLevel) as f32 * 0.03
    }

    pub fn has_mascot(&self) -> bool {
        self.level(UpgradeId::CatMascot) >= 1
    }

    pub fn has_takeout(&self) -> bool {
        self.level(UpgradeId::TakeoutWindow) >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_ids() {
        for (i, id) in UpgradeId::ALL.iter().enumerate() {
            assert_eq!(UPGRADES[i].id, *id);
            assert_eq!(UpgradeId::from_key(id.key()), Some(*id));
        }
    }

    #[test]
    fn test_cost_strictly_increasing() {
        for spec in &UPGRADES {
            for level in 0..spec.max_level {
                assert!(
                    spec.cost_at(level + 1) > spec.cost_at(level),
                    "{} not increasing at {}",
                    spec.name,
                    level
                );
            }
        }
    }

    #[test]
    fn test_table_count_purchase() {
        let mut state = UpgradeState::new();
        assert_eq!(state.check_purchase(UpgradeId::TableCount, 100), Ok(20));
        assert_eq!(state.apply(UpgradeId::TableCount), 20);
        assert_eq!(state.level(UpgradeId::TableCount), 1);
        assert_eq!(state.next_cost(UpgradeId::TableCount), Some(30));
        assert_eq!(state.table_count(), 3);
        assert_eq!(state.total_gold_spent, 20);
    }

    #[test]
    fn test_purchase_rejections() {
        let mut state = UpgradeState::new();
        assert_eq!(
            state.check_purchase(UpgradeId::CatMascot, 99),
            Err(UpgradeError::InsufficientGold { cost: 100, gold: 99 })
        );
        state.apply(UpgradeId::CatMascot);
        assert!(matches!(
            state.check_purchase(UpgradeId::CatMascot, 10_000),
            Err(UpgradeError::MaxLevel { max_level: 1, .. })
        ));
        assert_eq!(state.next_cost(UpgradeId::CatMascot), None);
        assert!(state.has_mascot());
    }

    #[test]
    fn test_derived_values() {
        let mut state = UpgradeState::new();
        assert_eq!(state.chef_count(), 1);
        assert_eq!(state.waiter_count(), 1);
        assert!((state.cook_speed_multiplier() - 1.0).abs() < f32::EPSILON);

        state.apply(UpgradeId::StoveLevel);
        state.apply(UpgradeId::StoveLevel);
        state.apply(UpgradeId::TableLevel);
        state.apply(UpgradeId::WallDecor);
        state.apply(UpgradeId::FloorLevel);

        assert!((state.cook_speed_multiplier() - 0.7).abs() < 1e-6);
        assert!((state.satisfaction_bonus() - 0.18).abs() < 1e-6);
        assert_eq!(state.total_levels(), 5);
    }

    #[test]
    fn test_serializes_with_string_keys() {
        let mut state = UpgradeState::new();
        state.apply(UpgradeId::WallDecor);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"wall_decor\":1"));
        let back: UpgradeState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
