//! Pure restaurant rules for Cat Bistro.
//!
//! This crate holds the data tables and formulas of the game with no engine,
//! storage or randomness attached. Anything stochastic takes its rolls as
//! plain arguments, so the engine owns the RNG and tests can pin outcomes.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`achievements`] | 17 unlock rules over a stats snapshot, append-only ledger |
//! | [`choices`] | Branching choice events, outcome resolution, encounter ledger |
//! | [`constants`] | Tick rate, speeds, wait thresholds, canvas size |
//! | [`day_night`] | Time-of-day bands, weather weights, overlay tints |
//! | [`economy`] | Payouts, special guests, restaurant level, cook time |
//! | [`menu`] | Menu built from logged food, signature dishes, weighted pick |
//! | [`modifiers`] | Daily modifier catalog and effect aggregation |
//! | [`reputation`] | 0–100 reputation with five tiers |
//! | [`satisfaction`] | Per-order scoring and the rolling tracker |
//! | [`upgrades`] | Upgrade catalog, cost curve, derived multipliers |

pub mod achievements;
pub mod choices;
pub mod constants;
pub mod day_night;
pub mod economy;
pub mod menu;
pub mod modifiers;
pub mod reputation;
pub mod satisfaction;
pub mod upgrades;
