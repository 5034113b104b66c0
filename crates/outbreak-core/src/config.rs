//! Simulation configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```json
//! { "vertical_spread_chance": 0.5, "seed": 42 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::systems::{SpreadRules, DEFAULT_VERTICAL_SPREAD_CHANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Probability of spreading to the same room one floor up or down
    pub vertical_spread_chance: f64,
    /// Fixed RNG seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    /// Turn cap for run-to-completion
    pub max_turns: Option<u64>,
    /// Pause between turns when running to completion interactively
    pub turn_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            vertical_spread_chance: DEFAULT_VERTICAL_SPREAD_CHANCE,
            seed: None,
            max_turns: None,
            turn_delay_ms: 1000,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.spread_rules().map(|_| ())
    }

    pub fn spread_rules(&self) -> Result<SpreadRules> {
        SpreadRules::new(self.vertical_spread_chance)
    }
}
