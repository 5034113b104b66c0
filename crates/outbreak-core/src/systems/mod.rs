//! Systems - logic that advances the building state

mod propagation;

pub use propagation::*;
