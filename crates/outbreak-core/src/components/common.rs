//! Shared value types used across the building model.

use std::fmt;

/// Positional key of a room: zero-based floor index and room index on that floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCoord {
    pub floor: usize,
    pub room: usize,
}

impl RoomCoord {
    pub const fn new(floor: usize, room: usize) -> Self {
        Self { floor, room }
    }
}

impl From<(usize, usize)> for RoomCoord {
    fn from((floor, room): (usize, usize)) -> Self {
        Self { floor, room }
    }
}

impl fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "floor {}, room {}", self.floor, self.room)
    }
}
