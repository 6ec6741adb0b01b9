//! Cat Bistro Core - Restaurant Simulation Engine
//!
//! An ECS-based simulation of a small cat-run bistro: chefs cook, waiters
//! carry plates, guests queue, eat, pay and leave, while reputation, daily
//! modifiers and the occasional branching event shape the day.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Chefs, waiters, guests, the mascot cat, the boss
//! - **Components**: Pure data attached to entities (Motion, Actor)
//! - **Systems**: Free functions that query and update components
//!
//! Rules and catalogs live in `bistro-logic`; this crate owns the world, the
//! RNG, the clock and the store.
//!
//! # Example
//!
//! ```rust,no_run
//! use bistro_core::prelude::*;
//!
//! let mut engine = SimulationEngine::default();
//!
//! if engine.needs_daily_setup() {
//!     engine.setup_new_day();
//! }
//!
//! // Run simulation at 8 ticks per second
//! loop {
//!     engine.update();
//! }
//! ```

pub mod clock;
pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod render;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::components::*;
    pub use crate::config::EngineConfig;
    pub use crate::engine::{EngineCallbacks, SimulationEngine};
    pub use crate::persistence::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::render::{DrawList, RenderSurface};
}
