//! Save/Load functionality for persisting building state
//!
//! The snapshot is a human-readable JSON document listing every floor and
//! room. Dimensions are inferred from the document on load, so a snapshot
//! can be loaded without an existing building.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::components::{Building, SensorState};
use crate::error::{Error, MalformedReason, Result};

/// Serializable snapshot of the whole building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    pub floors: Vec<FloorSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    /// Must equal the floor's position in `floors`
    pub floor_number: usize,
    pub rooms: Vec<RoomSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Must equal the room's position in `rooms`
    pub room_number: usize,
    pub has_zombies: bool,
    pub is_blocked: bool,
    pub sensor_state: SensorState,
}

impl BuildingSnapshot {
    /// Check document structure and return `(floors, rooms_per_floor)`.
    ///
    /// Cross-field room state (e.g. infected while blocked) is not checked.
    pub fn validate(&self) -> Result<(usize, usize)> {
        let first = self.floors.first().ok_or(MalformedReason::NoFloors)?;
        let rooms_per_floor = first.rooms.len();

        for (index, floor) in self.floors.iter().enumerate() {
            if floor.floor_number != index {
                return Err(MalformedReason::FloorNumber {
                    index,
                    found: floor.floor_number,
                }
                .into());
            }
            if floor.rooms.is_empty() {
                return Err(MalformedReason::EmptyFloor { floor: index }.into());
            }
            if floor.rooms.len() != rooms_per_floor {
                return Err(MalformedReason::RaggedFloor {
                    floor: index,
                    expected: rooms_per_floor,
                    found: floor.rooms.len(),
                }
                .into());
            }
            for (room_index, room) in floor.rooms.iter().enumerate() {
                if room.room_number != room_index {
                    return Err(MalformedReason::RoomNumber {
                        floor: index,
                        index: room_index,
                        found: room.room_number,
                    }
                    .into());
                }
            }
        }

        Ok((self.floors.len(), rooms_per_floor))
    }

    /// Parse a snapshot document.
    ///
    /// Syntax errors and schema errors are reported with distinct reasons.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            let reason = match e.classify() {
                Category::Data => MalformedReason::Schema(e.to_string()),
                Category::Syntax | Category::Eof | Category::Io => {
                    MalformedReason::Unparsable(e.to_string())
                }
            };
            Error::MalformedSnapshot(reason)
        })
    }

    /// Write as pretty JSON with four-space indentation.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = Vec::new();
        self.write_json(&mut out)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// Write the building's snapshot to a writer
pub fn save_building<W: Write>(mut writer: W, building: &Building) -> std::io::Result<()> {
    building
        .export_snapshot()
        .write_json(&mut writer)
        .map_err(std::io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Read a snapshot from a reader and construct a building from it
pub fn load_building<R: Read>(reader: R) -> Result<Building> {
    read_building(reader, Path::new("<reader>"))
}

/// Invalid UTF-8 is a malformed document; any other read failure is I/O on `source`.
fn read_building<R: Read>(mut reader: R, source: &Path) -> Result<Building> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => Error::from(MalformedReason::Unparsable(e.to_string())),
        _ => Error::io(source, e),
    })?;
    Building::from_snapshot(&BuildingSnapshot::from_json(&text)?)
}

/// Save the building to a file, replacing any existing contents
pub fn save_to_path(path: impl AsRef<Path>, building: &Building) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    save_building(BufWriter::new(file), building).map_err(|e| Error::io(path, e))?;
    log::info!("Building state saved to {}", path.display());
    Ok(())
}

/// Load a building from a snapshot file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Building> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let building = read_building(file, path)?;
    log::info!(
        "Building state loaded from {} ({}x{})",
        path.display(),
        building.floor_count(),
        building.rooms_per_floor()
    );
    Ok(building)
}
