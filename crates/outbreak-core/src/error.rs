//! Simulation errors

use std::path::PathBuf;

use thiserror::Error;

use crate::components::RoomCoord;

/// Simulation result type
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure is recoverable at the call site; none of them leaves a
/// room or building partially mutated.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot operate on {coord}: {reason}")]
    PreconditionViolation { coord: RoomCoord, reason: String },

    #[error("{coord} is outside the {floors}x{rooms_per_floor} building")]
    OutOfRange {
        coord: RoomCoord,
        floors: usize,
        rooms_per_floor: usize,
    },

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] MalformedReason),

    #[error("snapshot not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error("building has not been set up")]
    NotConfigured,

    #[error(
        "invalid building dimensions {floors}x{rooms_per_floor}: both must be at least 1 \
         and the building may hold at most {max} rooms",
        max = crate::components::MAX_ROOMS
    )]
    InvalidDimensions { floors: usize, rooms_per_floor: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a snapshot document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("not valid JSON: {0}")]
    Unparsable(String),

    #[error("missing or invalid key: {0}")]
    Schema(String),

    #[error("document has no floors")]
    NoFloors,

    #[error("floor {floor} has no rooms")]
    EmptyFloor { floor: usize },

    #[error("floor {floor} has {found} rooms, expected {expected}")]
    RaggedFloor {
        floor: usize,
        expected: usize,
        found: usize,
    },

    #[error("floor at index {index} declares floor_number {found}")]
    FloorNumber { index: usize, found: usize },

    #[error("room at index {index} on floor {floor} declares room_number {found}")]
    RoomNumber {
        floor: usize,
        index: usize,
        found: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::ResourceNotFound(path)
        } else {
            Error::Io { path, source }
        }
    }
}
