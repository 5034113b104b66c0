//! Floor: an ordered, fixed-size row of rooms.

use std::fmt;

use super::common::RoomCoord;
use super::room::Room;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    number: usize,
    rooms: Vec<Room>,
}

impl Floor {
    pub fn new(number: usize, rooms_per_floor: usize) -> Self {
        Self {
            number,
            rooms: (0..rooms_per_floor)
                .map(|room| Room::new(RoomCoord::new(number, room)))
                .collect(),
        }
    }

    pub(crate) fn from_rooms(number: usize, rooms: Vec<Room>) -> Self {
        Self { number, rooms }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn room_mut(&mut self, index: usize) -> Option<&mut Room> {
        self.rooms.get_mut(index)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn infected_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_infected()).count()
    }

    /// True when every room on the floor is infected, blocked or not.
    pub fn is_fully_infected(&self) -> bool {
        self.rooms.iter().all(Room::is_infected)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Floor {}", self.number)?;
        for room in &self.rooms {
            writeln!(f, "{}", room)?;
        }
        Ok(())
    }
}
