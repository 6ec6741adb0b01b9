//! Systems - logic that operates on components

mod actors;
mod choice_events;
mod day_night;
mod events;
mod roguelike;
mod schedule;
mod service;
mod spawning;

pub use actors::*;
pub use choice_events::*;
pub use day_night::*;
pub use events::*;
pub use roguelike::*;
pub use schedule::*;
pub use service::*;
pub use spawning::*;
