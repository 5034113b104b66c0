//! Simulation engine - main entry point for running the simulation

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{Building, Room, RoomCoord};
use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::persistence::{self, BuildingSnapshot};
use crate::systems::{PropagationEngine, SpreadRules};

/// What one call to [`Simulation::advance_turn`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn number after advancing (first turn is 1)
    pub turn: u64,
    /// Rooms infected this turn, in application order
    pub newly_infected: Vec<RoomCoord>,
    pub fully_infected: bool,
}

/// Result of [`Simulation::clean_room`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    Cleaned,
    AlreadyClean,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    FullyInfected,
    /// The turn cap was reached first
    TurnLimit,
    /// No further spread is possible without outside intervention
    Contained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Turns advanced during this run
    pub turns: u64,
    pub outcome: RunOutcome,
}

/// Holds the building, the turn counter and the random source.
///
/// Each simulation is an independent context; nothing is process-wide.
pub struct Simulation<R: Rng = StdRng> {
    building: Option<Building>,
    turn: u64,
    engine: PropagationEngine,
    rng: R,
}

impl Simulation<StdRng> {
    /// Create an empty simulation with default rules and an entropy-seeded RNG
    pub fn new() -> Self {
        Self {
            building: None,
            turn: 0,
            engine: PropagationEngine::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng, config.spread_rules()?)
    }
}

impl Default for Simulation<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Simulation<R> {
    /// Create an empty simulation driven by the given random source
    pub fn with_rng(rng: R, rules: SpreadRules) -> Result<Self> {
        Ok(Self {
            building: None,
            turn: 0,
            engine: PropagationEngine::new(rules)?,
            rng,
        })
    }

    pub fn building(&self) -> Option<&Building> {
        self.building.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.building.is_some()
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn rules(&self) -> SpreadRules {
        self.engine.rules()
    }

    fn building_ref(&self) -> Result<&Building> {
        self.building.as_ref().ok_or(Error::NotConfigured)
    }

    /// Room lookup for the commands; a missing building or bad coordinate is logged.
    fn room_mut(&mut self, coord: RoomCoord) -> Result<&mut Room> {
        let lookup = match self.building.as_mut() {
            Some(building) => building.room_mut(coord),
            None => Err(Error::NotConfigured),
        };
        lookup.map_err(|e| {
            log::warn!("Room command rejected: {}", e);
            e
        })
    }

    /// Build a fresh building with one random infected room and reset the turn counter
    pub fn setup(&mut self, floors: usize, rooms_per_floor: usize) -> Result<RoomCoord> {
        let (building, seed) = Building::with_random_seed(floors, rooms_per_floor, &mut self.rng)?;
        log::info!(
            "Building set up with {} floors x {} rooms, outbreak starts at {}",
            floors,
            rooms_per_floor,
            seed
        );
        self.replace_building(building);
        Ok(seed)
    }

    /// Install an existing building and reset the turn counter
    pub fn replace_building(&mut self, building: Building) {
        self.building = Some(building);
        self.turn = 0;
    }

    /// Advance one turn of spread.
    ///
    /// Without a building this returns `NotConfigured` and the turn counter
    /// is left alone.
    pub fn advance_turn(&mut self) -> Result<TurnReport> {
        let building = self.building.as_mut().ok_or(Error::NotConfigured)?;
        let was_full = building.is_fully_infected();

        let newly_infected = self.engine.advance(building, &mut self.rng);
        self.turn += 1;

        let fully_infected = building.is_fully_infected();
        log::debug!(
            "Turn {}: {} new infections, {}/{} rooms infected",
            self.turn,
            newly_infected.len(),
            building.infected_count(),
            building.total_rooms()
        );
        if fully_infected && !was_full {
            log::info!("Building fully infected after turn {}", self.turn);
        }

        Ok(TurnReport {
            turn: self.turn,
            newly_infected,
            fully_infected,
        })
    }

    pub fn clean_room(&mut self, coord: impl Into<RoomCoord>) -> Result<CleanOutcome> {
        let room = self.room_mut(coord.into())?;
        if room.clear() {
            log::debug!("Cleaned {}", room.coord());
            Ok(CleanOutcome::Cleaned)
        } else {
            Ok(CleanOutcome::AlreadyClean)
        }
    }

    pub fn reset_sensor(&mut self, coord: impl Into<RoomCoord>) -> Result<()> {
        self.room_mut(coord.into())?.reset_sensor().map_err(|e| {
            log::warn!("Sensor reset rejected: {}", e);
            e
        })
    }

    pub fn block_room(&mut self, coord: impl Into<RoomCoord>) -> Result<()> {
        self.room_mut(coord.into())?.block();
        Ok(())
    }

    pub fn unblock_room(&mut self, coord: impl Into<RoomCoord>) -> Result<()> {
        self.room_mut(coord.into())?.unblock();
        Ok(())
    }

    /// Advance until the building is fully infected, the cap is hit, or
    /// spread can no longer progress.
    pub fn run_to_completion(&mut self, max_turns: Option<u64>) -> Result<RunSummary> {
        self.run_observed(max_turns, |_, _| {})
    }

    /// Like [`run_to_completion`](Self::run_to_completion), calling `observer`
    /// after every turn.
    pub fn run_observed(
        &mut self,
        max_turns: Option<u64>,
        mut observer: impl FnMut(&TurnReport, &Building),
    ) -> Result<RunSummary> {
        let mut turns = 0;
        loop {
            let building = self.building_ref()?;
            let outcome = if building.is_fully_infected() {
                Some(RunOutcome::FullyInfected)
            } else if max_turns.is_some_and(|cap| turns >= cap) {
                Some(RunOutcome::TurnLimit)
            } else if !self.engine.can_progress(building) {
                Some(RunOutcome::Contained)
            } else {
                None
            };
            if let Some(outcome) = outcome {
                log::info!("Run stopped after {} turns: {:?}", turns, outcome);
                return Ok(RunSummary { turns, outcome });
            }

            let report = self.advance_turn()?;
            turns += 1;
            observer(&report, self.building_ref()?);
        }
    }

    pub fn export_snapshot(&self) -> Result<BuildingSnapshot> {
        Ok(self.building_ref()?.export_snapshot())
    }

    /// Replace the building with the snapshot's contents.
    ///
    /// Works with or without an existing building. On error nothing changes.
    pub fn import_snapshot(&mut self, snapshot: &BuildingSnapshot) -> Result<()> {
        let building = Building::from_snapshot(snapshot)?;
        self.replace_building(building);
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        persistence::save_to_path(path, self.building_ref()?)
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let building = persistence::load_from_path(path)?;
        self.replace_building(building);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SensorState;

    fn seeded(chance: f64) -> Simulation {
        Simulation::with_rng(StdRng::seed_from_u64(5), SpreadRules::new(chance).unwrap()).unwrap()
    }

    fn forced(floors: usize, rooms: usize, infected: &[(usize, usize)], chance: f64) -> Simulation {
        let mut building = Building::empty(floors, rooms).unwrap();
        for &c in infected {
            building.room_mut(c.into()).unwrap().infect();
        }
        let mut sim = seeded(chance);
        sim.replace_building(building);
        sim
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new();
        assert!(!sim.is_configured());
        assert_eq!(sim.turn(), 0);
        assert_eq!(sim.rules(), SpreadRules::default());
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let config = SimulationConfig {
            vertical_spread_chance: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::from_config(&config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_setup_resets_turns() {
        let mut sim = seeded(0.3);
        let seed = sim.setup(3, 3).unwrap();
        sim.advance_turn().unwrap();
        sim.advance_turn().unwrap();
        assert_eq!(sim.turn(), 2);

        assert!(sim.building().unwrap().room(seed).is_ok());
        sim.setup(2, 2).unwrap();
        assert_eq!(sim.turn(), 0);
        assert_eq!(sim.building().unwrap().infected_count(), 1);
    }

    #[test]
    fn test_setup_rejects_zero_dimensions() {
        let mut sim = seeded(0.3);
        assert!(matches!(sim.setup(0, 4), Err(Error::InvalidDimensions { .. })));
        assert!(matches!(
            sim.setup(1, usize::MAX),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(!sim.is_configured());

        sim.setup(2, 2).unwrap();
        let before = sim.building().cloned();
        assert!(sim.setup(usize::MAX, usize::MAX).is_err());
        assert_eq!(sim.building().cloned(), before);
    }

    #[test]
    fn test_operations_require_building() {
        let mut sim = seeded(0.3);
        assert!(matches!(sim.advance_turn(), Err(Error::NotConfigured)));
        assert_eq!(sim.turn(), 0);
        assert!(matches!(sim.clean_room((0, 0)), Err(Error::NotConfigured)));
        assert!(matches!(sim.block_room((0, 0)), Err(Error::NotConfigured)));
        assert!(matches!(sim.run_to_completion(None), Err(Error::NotConfigured)));
        assert!(matches!(sim.export_snapshot(), Err(Error::NotConfigured)));
    }

    #[test]
    fn test_turn_counts_even_without_spread() {
        let mut sim = forced(1, 1, &[(0, 0)], 0.3);
        let report = sim.advance_turn().unwrap();
        assert_eq!(report.turn, 1);
        assert!(report.newly_infected.is_empty());
        assert!(report.fully_infected);
        assert_eq!(sim.turn(), 1);
    }

    #[test]
    fn test_room_commands_validate_coordinates() {
        let mut sim = forced(2, 3, &[], 0.3);
        assert!(matches!(sim.block_room((2, 0)), Err(Error::OutOfRange { .. })));
        assert!(matches!(sim.unblock_room((0, 3)), Err(Error::OutOfRange { .. })));
        assert!(matches!(sim.clean_room((9, 9)), Err(Error::OutOfRange { .. })));
        assert!(matches!(sim.reset_sensor((0, 7)), Err(Error::OutOfRange { .. })));
    }

    // ── Log capture ──

    static CAPTURED: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = CAPTURED.lock() {
                    lines.push(format!("{} {}", record.level(), record.args()));
                }
            }
        }

        fn flush(&self) {}
    }

    fn captured_warnings() -> Vec<String> {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            log::set_logger(&CaptureLogger).unwrap();
            log::set_max_level(log::LevelFilter::Warn);
        });
        CAPTURED.lock().unwrap().clone()
    }

    #[test]
    fn test_rejected_room_commands_are_logged() {
        captured_warnings();

        let mut sim = forced(2, 3, &[], 0.3);
        assert!(sim.block_room((7, 7)).is_err());
        let mut unconfigured = seeded(0.3);
        assert!(unconfigured.unblock_room((0, 0)).is_err());

        let lines = captured_warnings();
        assert!(lines.iter().any(|l| l.starts_with("WARN Room command rejected")
            && l.contains("floor 7, room 7 is outside the 2x3 building")));
        assert!(lines
            .iter()
            .any(|l| l == "WARN Room command rejected: building has not been set up"));
    }

    #[test]
    fn test_clean_room_outcomes() {
        let mut sim = forced(1, 2, &[(0, 0)], 0.3);
        sim.block_room((0, 0)).unwrap();
        assert_eq!(sim.clean_room((0, 0)).unwrap(), CleanOutcome::Cleaned);
        assert_eq!(sim.clean_room((0, 0)).unwrap(), CleanOutcome::AlreadyClean);

        let room = sim.building().unwrap().room(RoomCoord::new(0, 0)).unwrap();
        assert!(!room.is_infected());
        assert!(room.is_blocked());
        assert!(room.sensor().is_alert());
    }

    #[test]
    fn test_reset_sensor_through_simulation() {
        let mut sim = forced(1, 2, &[(0, 0)], 0.3);
        assert!(matches!(
            sim.reset_sensor((0, 0)),
            Err(Error::PreconditionViolation { .. })
        ));
        sim.clean_room((0, 0)).unwrap();
        sim.reset_sensor((0, 0)).unwrap();
        let room = sim.building().unwrap().room(RoomCoord::new(0, 0)).unwrap();
        assert_eq!(room.sensor().state(), SensorState::Normal);
    }

    #[test]
    fn test_run_to_completion_single_floor() {
        let mut sim = forced(1, 5, &[(0, 2)], 0.3);
        let summary = sim.run_to_completion(None).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                turns: 2,
                outcome: RunOutcome::FullyInfected
            }
        );
        assert_eq!(sim.turn(), 2);
    }

    #[test]
    fn test_run_respects_turn_cap() {
        let mut sim = forced(1, 10, &[(0, 0)], 0.3);
        let summary = sim.run_to_completion(Some(3)).unwrap();
        assert_eq!(summary.outcome, RunOutcome::TurnLimit);
        assert_eq!(summary.turns, 3);
        assert_eq!(sim.building().unwrap().infected_count(), 4);
    }

    #[test]
    fn test_run_stops_when_contained() {
        let mut sim = forced(1, 5, &[(0, 0)], 0.3);
        sim.block_room((0, 2)).unwrap();
        let summary = sim.run_to_completion(None).unwrap();
        assert_eq!(summary.outcome, RunOutcome::Contained);
        assert_eq!(summary.turns, 1);
        assert_eq!(sim.building().unwrap().infected_count(), 2);
    }

    #[test]
    fn test_run_observed_sees_every_turn() {
        let mut sim = forced(2, 3, &[(0, 0)], 1.0);
        let mut seen = Vec::new();
        let summary = sim
            .run_observed(None, |report, building| {
                seen.push((report.turn, building.infected_count()));
            })
            .unwrap();
        assert_eq!(summary.outcome, RunOutcome::FullyInfected);
        assert_eq!(seen.len() as u64, summary.turns);
        assert_eq!(seen.last().map(|s| s.1), Some(6));
    }

    #[test]
    fn test_import_without_existing_building() {
        let mut source = forced(3, 2, &[(2, 1)], 0.3);
        source.advance_turn().unwrap();
        let snapshot = source.export_snapshot().unwrap();

        let mut sim = seeded(0.3);
        sim.import_snapshot(&snapshot).unwrap();
        assert_eq!(sim.turn(), 0);
        assert_eq!(sim.building(), source.building());
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut sim = forced(2, 2, &[(0, 0)], 0.3);
        sim.advance_turn().unwrap();
        let before = sim.building().cloned();

        let path = std::env::temp_dir().join("outbreak-engine-missing.json");
        assert!(matches!(sim.load(&path), Err(Error::ResourceNotFound(_))));
        assert_eq!(sim.turn(), 1);
        assert_eq!(sim.building().cloned(), before);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("outbreak-engine-{}.json", std::process::id()));
        let mut sim = forced(2, 3, &[(1, 1)], 0.3);
        sim.block_room((0, 0)).unwrap();
        sim.advance_turn().unwrap();
        sim.save(&path).unwrap();

        let mut other = seeded(0.3);
        other.setup(5, 5).unwrap();
        other.advance_turn().unwrap();
        other.load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(other.turn(), 0);
        assert_eq!(other.building(), sim.building());
    }

    #[test]
    fn test_from_config_is_reproducible() {
        let config = SimulationConfig {
            seed: Some(1234),
            ..Default::default()
        };
        let mut a = Simulation::from_config(&config).unwrap();
        let mut b = Simulation::from_config(&config).unwrap();
        assert_eq!(a.setup(6, 6).unwrap(), b.setup(6, 6).unwrap());
        for _ in 0..5 {
            assert_eq!(a.advance_turn().unwrap(), b.advance_turn().unwrap());
        }
    }
}
