//! Building: ordered floors, seeding, aggregate state and snapshot import/export.

use std::fmt;

use rand::Rng;

use super::common::RoomCoord;
use super::floor::Floor;
use super::room::Room;
use crate::error::{Error, Result};
use crate::persistence::{BuildingSnapshot, FloorSnapshot, RoomSnapshot};

/// Largest building `Building::empty` will allocate, counted in rooms.
pub const MAX_ROOMS: usize = 1_000_000;

/// The full simulated structure. Dimensions are fixed after construction;
/// every floor holds the same number of rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    floors: Vec<Floor>,
    rooms_per_floor: usize,
}

impl Building {
    /// Build a clean building with no infection.
    ///
    /// Both dimensions must be at least 1 and the total must not exceed [`MAX_ROOMS`].
    pub fn empty(floors: usize, rooms_per_floor: usize) -> Result<Self> {
        let total = floors.checked_mul(rooms_per_floor);
        if floors == 0 || rooms_per_floor == 0 || total.map_or(true, |t| t > MAX_ROOMS) {
            return Err(Error::InvalidDimensions {
                floors,
                rooms_per_floor,
            });
        }
        Ok(Self {
            floors: (0..floors).map(|f| Floor::new(f, rooms_per_floor)).collect(),
            rooms_per_floor,
        })
    }

    /// Build a building and infect one uniformly random room as the outbreak seed.
    ///
    /// The floor index is drawn first, then the room index.
    pub fn with_random_seed(
        floors: usize,
        rooms_per_floor: usize,
        rng: &mut impl Rng,
    ) -> Result<(Self, RoomCoord)> {
        let mut building = Self::empty(floors, rooms_per_floor)?;
        let seed = RoomCoord::new(rng.gen_range(0..floors), rng.gen_range(0..rooms_per_floor));
        building.room_mut(seed)?.infect();
        log::debug!("Outbreak seeded at {}", seed);
        Ok((building, seed))
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn rooms_per_floor(&self) -> usize {
        self.rooms_per_floor
    }

    pub fn total_rooms(&self) -> usize {
        self.floors.len() * self.rooms_per_floor
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, index: usize) -> Option<&Floor> {
        self.floors.get(index)
    }

    /// Iterate every room, floor-major.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.floors.iter().flat_map(|floor| floor.rooms().iter())
    }

    pub fn contains(&self, coord: RoomCoord) -> bool {
        coord.floor < self.floors.len() && coord.room < self.rooms_per_floor
    }

    fn out_of_range(&self, coord: RoomCoord) -> Error {
        Error::OutOfRange {
            coord,
            floors: self.floors.len(),
            rooms_per_floor: self.rooms_per_floor,
        }
    }

    pub fn room(&self, coord: RoomCoord) -> Result<&Room> {
        self.floors
            .get(coord.floor)
            .and_then(|floor| floor.room(coord.room))
            .ok_or_else(|| self.out_of_range(coord))
    }

    pub fn room_mut(&mut self, coord: RoomCoord) -> Result<&mut Room> {
        let err = self.out_of_range(coord);
        self.floors
            .get_mut(coord.floor)
            .and_then(|floor| floor.room_mut(coord.room))
            .ok_or(err)
    }

    pub fn infected_count(&self) -> usize {
        self.floors.iter().map(Floor::infected_count).sum()
    }

    pub fn is_fully_infected(&self) -> bool {
        self.floors.iter().all(Floor::is_fully_infected)
    }

    /// Capture the complete state of every room.
    pub fn export_snapshot(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            floors: self
                .floors
                .iter()
                .map(|floor| FloorSnapshot {
                    floor_number: floor.number(),
                    rooms: floor
                        .rooms()
                        .iter()
                        .map(|room| RoomSnapshot {
                            room_number: room.number(),
                            has_zombies: room.is_infected(),
                            is_blocked: room.is_blocked(),
                            sensor_state: room.sensor().state(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Construct a building directly from a snapshot document.
    ///
    /// Room state is restored verbatim, including combinations the mutation
    /// methods would never produce.
    pub fn from_snapshot(snapshot: &BuildingSnapshot) -> Result<Self> {
        let (_, rooms_per_floor) = snapshot.validate()?;
        let floors = snapshot
            .floors
            .iter()
            .map(|floor| {
                let rooms = floor
                    .rooms
                    .iter()
                    .map(|room| {
                        Room::restore(
                            RoomCoord::new(floor.floor_number, room.room_number),
                            room.has_zombies,
                            room.is_blocked,
                            room.sensor_state,
                        )
                    })
                    .collect();
                Floor::from_rooms(floor.floor_number, rooms)
            })
            .collect();
        Ok(Self {
            floors,
            rooms_per_floor,
        })
    }

    /// Replace the whole floor/room collection with the snapshot's contents.
    ///
    /// On error the building is left untouched.
    pub fn import_snapshot(&mut self, snapshot: &BuildingSnapshot) -> Result<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Building status:")?;
        for floor in &self.floors {
            write!(f, "{}", floor)?;
        }
        Ok(())
    }
}
