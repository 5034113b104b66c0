//! Outbreak Core - Building Contagion Simulation Engine
//!
//! A turn-based model of an infection spreading room by room through a
//! multi-floor building. Each room carries an infection flag, a blocked flag
//! and a sensor; blocking rooms and cleaning them are the only defenses.
//!
//! # Architecture
//!
//! - **Components**: the building structure (`Sensor`, `Room`, `Floor`, `Building`)
//! - **Systems**: the propagation rules that compute each turn's infections
//! - **Engine**: `Simulation`, holding the building, turn counter and RNG
//! - **Persistence**: JSON snapshots of the full building state
//!
//! # Example
//!
//! ```rust,no_run
//! use outbreak_core::prelude::*;
//!
//! let mut sim = Simulation::new();
//! let seed = sim.setup(3, 4).unwrap();
//! println!("Outbreak starts at {}", seed);
//!
//! let report = sim.advance_turn().unwrap();
//! for coord in &report.newly_infected {
//!     println!("Zombies have infected {}", coord);
//! }
//!
//! sim.block_room((2, 0)).unwrap();
//! sim.run_to_completion(Some(100)).unwrap();
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod systems;

pub use error::{Error, MalformedReason, Result};

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimulationConfig;
    pub use crate::engine::{CleanOutcome, RunOutcome, RunSummary, Simulation, TurnReport};
    pub use crate::error::{Error, MalformedReason, Result};
    pub use crate::persistence::BuildingSnapshot;
    pub use crate::systems::{PropagationEngine, SpreadRules};
}
