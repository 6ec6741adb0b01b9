//! Restaurant generation - scene geometry and staff rosters

mod layout;
mod staff;

pub use layout::*;
pub use staff::*;
