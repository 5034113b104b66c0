//! Building structure: sensors, rooms, floors and the building itself.
//!
//! Data flows top-down for commands (building → floor → room) and bottom-up
//! for aggregate queries (room → floor → building).

mod building;
mod common;
mod floor;
mod room;
mod sensor;

pub use building::*;
pub use common::*;
pub use floor::*;
pub use room::*;
pub use sensor::*;
