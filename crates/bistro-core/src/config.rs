//! Engine tunables.
//!
//! Everything here has a default matching the shipped game; hosts and tests
//! override single fields with struct update syntax.

use serde::{Deserialize, Serialize};

use bistro_logic::constants::economy::{BASE_COOK_TICKS, STARTING_GOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks between arrivals before demand multipliers
    pub base_spawn_interval: f32,
    /// Floor on the arrival interval
    pub min_spawn_interval: f32,
    /// Uniform extra ticks added to each interval, `[0, jitter)`
    pub spawn_jitter: f32,
    /// Ticks to cook a dish before stove upgrades and modifiers
    pub base_cook_ticks: u32,
    pub autosave_interval: u64,
    pub achievement_interval: u64,
    pub day_night_interval: u64,
    /// Ticks between takeout-window earnings
    pub takeout_interval: u32,
    /// Ticks until the next ambient log event, inclusive range
    pub event_delay: (u64, u64),
    /// Ticks until the next choice-event roll, inclusive range
    pub choice_delay: (u64, u64),
    pub event_log_capacity: usize,
    /// Base of every storage key, e.g. `bistro_game`
    pub key_prefix: String,
    /// Appended to every key when set, one save per user
    pub user_id: Option<String>,
    /// Gold on a fresh save
    pub starting_gold: u64,
    /// Fixed RNG seed; entropy when `None`
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_spawn_interval: 70.0,
            min_spawn_interval: 30.0,
            spawn_jitter: 40.0,
            base_cook_ticks: BASE_COOK_TICKS,
            autosave_interval: 600,
            achievement_interval: 120,
            day_night_interval: 60,
            takeout_interval: 480,
            event_delay: (64, 160),
            choice_delay: (720, 1440),
            event_log_capacity: 50,
            key_prefix: "bistro".to_string(),
            user_id: None,
            starting_gold: STARTING_GOLD,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Same defaults with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Full storage key for a record, namespaced by user when one is set.
    pub fn storage_key(&self, record: &str) -> String {
        match &self.user_id {
            Some(user) => format!("{}_{}_{}", self.key_prefix, record, user),
            None => format!("{}_{}", self.key_prefix, record),
        }
    }
}
