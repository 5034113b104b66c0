//! Room: infection and block flags plus the owned sensor.

use std::fmt;

use super::common::RoomCoord;
use super::sensor::{Sensor, SensorState};
use crate::error::{Error, Result};

/// Atomic unit of space in the building.
///
/// Invariants held by the mutation methods:
/// - infecting a room always forces its sensor to `Alert`
/// - a blocked room never goes from clean to infected
/// - the sensor can only be reset while the room is clean
///
/// Snapshot restore bypasses these checks and may produce incoherent
/// combinations (infected + blocked, infected + normal sensor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    coord: RoomCoord,
    infected: bool,
    blocked: bool,
    sensor: Sensor,
}

impl Room {
    pub fn new(coord: RoomCoord) -> Self {
        Self {
            coord,
            infected: false,
            blocked: false,
            sensor: Sensor::new(),
        }
    }

    /// Restore a room verbatim from persisted state.
    pub(crate) fn restore(
        coord: RoomCoord,
        infected: bool,
        blocked: bool,
        sensor_state: SensorState,
    ) -> Self {
        Self {
            coord,
            infected,
            blocked,
            sensor: Sensor::with_state(sensor_state),
        }
    }

    pub fn coord(&self) -> RoomCoord {
        self.coord
    }

    /// Index of this room on its floor.
    pub fn number(&self) -> usize {
        self.coord.room
    }

    pub fn is_infected(&self) -> bool {
        self.infected
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }

    /// Whether propagation may infect this room.
    pub fn accepts_infection(&self) -> bool {
        !self.infected && !self.blocked
    }

    /// Infect the room unless it is blocked. Idempotent.
    ///
    /// Returns `true` if the room is infected afterwards.
    pub fn infect(&mut self) -> bool {
        if self.blocked {
            return false;
        }
        self.infected = true;
        self.sensor.set_alert();
        true
    }

    /// Remove the infection. The sensor keeps its reading.
    ///
    /// Returns whether the room was infected before clearing.
    pub fn clear(&mut self) -> bool {
        std::mem::replace(&mut self.infected, false)
    }

    /// Blocking only prevents future infection; an infected room stays infected.
    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    pub fn reset_sensor(&mut self) -> Result<()> {
        if self.infected {
            return Err(Error::PreconditionViolation {
                coord: self.coord,
                reason: "sensor cannot be reset while the room is infected".to_string(),
            });
        }
        self.sensor.reset();
        Ok(())
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.infected { "Yes" } else { "No" };
        let blocked = if self.blocked { " (blocked)" } else { "" };
        write!(
            f,
            "Room {} - Zombies: {}{} | {}",
            self.coord.room, status, blocked, self.sensor
        )
    }
}
