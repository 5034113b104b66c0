//! Propagation - decides which rooms become infected each turn.
//!
//! A turn is computed in three separate passes so each can be inspected on
//! its own:
//! 1. [`PropagationEngine::candidates`] reads the building as it stands at
//!    the start of the turn and proposes coordinates (duplicates allowed).
//! 2. [`filter_candidates`] drops targets that are already infected or
//!    blocked, and repeats.
//! 3. [`apply_infections`] infects what is left.
//!
//! Reads never observe writes from the same turn, so a room infected this
//! turn does not spread until the next one.

use rand::Rng;

use crate::components::{Building, RoomCoord};
use crate::error::{Error, Result};

/// Chance that an infected room spreads to the same room on an adjacent floor.
pub const DEFAULT_VERTICAL_SPREAD_CHANCE: f64 = 0.3;

/// Tunable spread parameters. Only constructed through [`SpreadRules::new`]
/// or `Default`, so the chance is always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadRules {
    vertical_chance: f64,
}

impl SpreadRules {
    pub fn new(vertical_chance: f64) -> Result<Self> {
        let rules = Self { vertical_chance };
        rules.validate()?;
        Ok(rules)
    }

    /// Independent per-room, per-direction probability of vertical spread
    pub fn vertical_chance(&self) -> f64 {
        self.vertical_chance
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.vertical_chance) {
            return Err(Error::InvalidConfig(format!(
                "vertical spread chance must be within [0, 1], got {}",
                self.vertical_chance
            )));
        }
        Ok(())
    }
}

impl Default for SpreadRules {
    fn default() -> Self {
        Self {
            vertical_chance: DEFAULT_VERTICAL_SPREAD_CHANCE,
        }
    }
}

/// Computes and applies one turn of spread
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagationEngine {
    rules: SpreadRules,
}

impl PropagationEngine {
    pub fn new(rules: SpreadRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> SpreadRules {
        self.rules
    }

    /// Propose this turn's candidates, rolling for vertical spread.
    ///
    /// For each infected, unblocked room: both horizontal neighbours always,
    /// then the room below and the room above on a successful roll. The roll
    /// is only drawn when that floor exists. After the rooms of a floor, a
    /// fully infected floor seeds room 0 of the floors below and above.
    pub fn candidates(&self, building: &Building, rng: &mut impl Rng) -> Vec<RoomCoord> {
        let chance = self.rules.vertical_chance;
        collect_candidates(building, || rng.gen_bool(chance))
    }

    /// Every target that could be proposed this turn if all rolls succeeded.
    ///
    /// Vertical spread is left out entirely when its chance is zero.
    pub fn reachable(&self, building: &Building) -> Vec<RoomCoord> {
        let possible = self.rules.vertical_chance > 0.0;
        collect_candidates(building, || possible)
    }

    /// Whether any future turn can change the building without outside help.
    pub fn can_progress(&self, building: &Building) -> bool {
        !filter_candidates(building, &self.reachable(building)).is_empty()
    }

    /// Run one full turn and return the newly infected rooms in order.
    pub fn advance(&self, building: &mut Building, rng: &mut impl Rng) -> Vec<RoomCoord> {
        let candidates = self.candidates(building, rng);
        let infections = filter_candidates(building, &candidates);
        apply_infections(building, &infections);
        infections
    }
}

fn collect_candidates(building: &Building, mut vertical: impl FnMut() -> bool) -> Vec<RoomCoord> {
    let floor_count = building.floor_count();
    let rooms_per_floor = building.rooms_per_floor();
    let mut candidates = Vec::new();

    for floor in building.floors() {
        let f = floor.number();
        for room in floor.rooms() {
            if !room.is_infected() || room.is_blocked() {
                continue;
            }
            let r = room.number();
            if r > 0 {
                candidates.push(RoomCoord::new(f, r - 1));
            }
            if r + 1 < rooms_per_floor {
                candidates.push(RoomCoord::new(f, r + 1));
            }
            if f > 0 && vertical() {
                candidates.push(RoomCoord::new(f - 1, r));
            }
            if f + 1 < floor_count && vertical() {
                candidates.push(RoomCoord::new(f + 1, r));
            }
        }

        if floor.is_fully_infected() {
            if f > 0 {
                candidates.push(RoomCoord::new(f - 1, 0));
            }
            if f + 1 < floor_count {
                candidates.push(RoomCoord::new(f + 1, 0));
            }
        }
    }

    candidates
}

/// Keep candidates that can actually be infected, first occurrence only.
///
/// Already infected, blocked and out-of-range targets are skipped silently.
pub fn filter_candidates(building: &Building, candidates: &[RoomCoord]) -> Vec<RoomCoord> {
    let mut taken = vec![false; building.total_rooms()];
    let mut infections = Vec::new();

    for &coord in candidates {
        let Ok(room) = building.room(coord) else {
            continue;
        };
        let slot = coord.floor * building.rooms_per_floor() + coord.room;
        if taken[slot] || !room.accepts_infection() {
            continue;
        }
        taken[slot] = true;
        infections.push(coord);
    }

    infections
}

/// Infect every listed room.
pub fn apply_infections(building: &mut Building, infections: &[RoomCoord]) {
    for &coord in infections {
        if let Ok(room) = building.room_mut(coord) {
            if room.infect() {
                log::debug!("Zombies have infected {}", coord);
            }
        }
    }
}
