//! Two-state alert sensor owned by a room.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor reading. Serialized as `"normal"` / `"alert"` in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorState {
    #[default]
    Normal,
    Alert,
}

impl SensorState {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorState::Normal => "normal",
            SensorState::Alert => "alert",
        }
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert indicator. Only mutated through its owning [`Room`](super::Room).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sensor {
    state: SensorState,
}

impl Sensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_state(state: SensorState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn is_alert(&self) -> bool {
        self.state == SensorState::Alert
    }

    pub(crate) fn set_alert(&mut self) {
        self.state = SensorState::Alert;
    }

    /// Unconditional; the room guards the precondition.
    pub(crate) fn reset(&mut self) {
        self.state = SensorState::Normal;
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sensor state: {}", self.state)
    }
}
