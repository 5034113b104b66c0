//! Interactive menu loop.
//!
//! Generic over its input and output so tests can drive it with scripted
//! text. All simulation state lives in the wrapped [`Simulation`].

use std::io::{self, BufRead, Write};
use std::time::Duration;

use outbreak_core::prelude::*;

use crate::menu::MenuChoice;

/// Settings for run-to-completion
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    pub max_turns: Option<u64>,
    pub turn_delay: Duration,
}

impl From<&SimulationConfig> for RunSettings {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            turn_delay: Duration::from_millis(config.turn_delay_ms),
        }
    }
}

pub struct Shell<I, O> {
    sim: Simulation,
    settings: RunSettings,
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Shell<I, O> {
    pub fn new(sim: Simulation, settings: RunSettings, input: I, output: O) -> Self {
        Self {
            sim,
            settings,
            input,
            output,
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (Simulation, O) {
        (self.sim, self.output)
    }

    /// Show the menu and handle choices until quit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "{}", MenuChoice::render_menu())?;
            let Some(line) = self.prompt("Select an option: ")? else {
                return Ok(());
            };
            match line.parse::<MenuChoice>() {
                Ok(MenuChoice::Quit) => {
                    writeln!(self.output, "Leaving the simulation. Goodbye!")?;
                    return Ok(());
                }
                Ok(choice) => {
                    log::debug!("Menu choice: {:?}", choice);
                    if !self.handle(choice)? {
                        return Ok(());
                    }
                }
                Err(_) => writeln!(self.output, "Invalid option. Please try again.")?,
            }
        }
    }

    /// Returns `false` when input ran out mid-command.
    fn handle(&mut self, choice: MenuChoice) -> io::Result<bool> {
        match choice {
            MenuChoice::Setup => {
                let Some(floors) = self.prompt_number("Number of floors: ")? else {
                    return Ok(false);
                };
                let Some(rooms) = self.prompt_number("Rooms per floor: ")? else {
                    return Ok(false);
                };
                match self.sim.setup(floors, rooms) {
                    Ok(seed) => {
                        writeln!(self.output, "Building set up with {} floors of {} rooms.", floors, rooms)?;
                        writeln!(self.output, "Outbreak started at {}!", seed)?;
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Status => self.show_status()?,
            MenuChoice::Advance => self.advance()?,
            MenuChoice::Block
            | MenuChoice::Unblock
            | MenuChoice::Clean
            | MenuChoice::ResetSensor => {
                if !self.sim.is_configured() {
                    self.report(&Error::NotConfigured)?;
                    return Ok(true);
                }
                let Some(coord) = self.prompt_coord()? else {
                    return Ok(false);
                };
                self.room_command(choice, coord)?;
            }
            MenuChoice::Save => {
                let Some(path) = self.prompt("File name to save to: ")? else {
                    return Ok(false);
                };
                match self.sim.save(&path) {
                    Ok(()) => writeln!(self.output, "State saved to {}.", path)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Load => {
                let Some(path) = self.prompt("File name to load from: ")? else {
                    return Ok(false);
                };
                match self.sim.load(&path) {
                    Ok(()) => writeln!(
                        self.output,
                        "State loaded from {}. The simulation has been replaced.",
                        path
                    )?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Run => self.run_to_completion()?,
            MenuChoice::Quit => {}
        }
        Ok(true)
    }

    fn room_command(&mut self, choice: MenuChoice, coord: RoomCoord) -> io::Result<()> {
        let result = match choice {
            MenuChoice::Block => self
                .sim
                .block_room(coord)
                .map(|()| format!("Room {} on floor {} is now blocked.", coord.room, coord.floor)),
            MenuChoice::Unblock => self
                .sim
                .unblock_room(coord)
                .map(|()| format!("Room {} on floor {} is now unblocked.", coord.room, coord.floor)),
            MenuChoice::Clean => self.sim.clean_room(coord).map(|outcome| match outcome {
                CleanOutcome::Cleaned => {
                    format!("Room {} on floor {} has been cleaned.", coord.room, coord.floor)
                }
                CleanOutcome::AlreadyClean => {
                    format!("Room {} on floor {} has no zombies.", coord.room, coord.floor)
                }
            }),
            _ => self.sim.reset_sensor(coord).map(|()| {
                format!("Sensor in room {} on floor {} has been reset.", coord.room, coord.floor)
            }),
        };
        match result {
            Ok(message) => writeln!(self.output, "{}", message),
            Err(e) => self.report(&e),
        }
    }

    fn show_status(&mut self) -> io::Result<()> {
        match self.sim.building() {
            Some(building) => {
                write!(self.output, "{}", building)?;
                writeln!(
                    self.output,
                    "Turn {}: {}/{} rooms infected",
                    self.sim.turn(),
                    building.infected_count(),
                    building.total_rooms()
                )
            }
            None => self.report(&Error::NotConfigured),
        }
    }

    fn advance(&mut self) -> io::Result<()> {
        match self.sim.advance_turn() {
            Ok(report) => write_turn(&mut self.output, &report),
            Err(e) => self.report(&e),
        }
    }

    fn run_to_completion(&mut self) -> io::Result<()> {
        let RunSettings {
            max_turns,
            turn_delay,
        } = self.settings;
        let output = &mut self.output;
        let mut write_result = Ok(());

        let summary = self.sim.run_observed(max_turns, |report, building| {
            if write_result.is_ok() {
                write_result = write_turn(&mut *output, report)
                    .and_then(|()| write!(output, "{}", building));
            }
            if !turn_delay.is_zero() {
                std::thread::sleep(turn_delay);
            }
        });
        write_result?;

        match summary {
            Ok(summary) => match summary.outcome {
                RunOutcome::FullyInfected => {
                    writeln!(self.output, "\nThe building is fully infected!")
                }
                RunOutcome::TurnLimit => writeln!(
                    self.output,
                    "\nStopped after {} turns without full infection.",
                    summary.turns
                ),
                RunOutcome::Contained => writeln!(
                    self.output,
                    "\nThe outbreak is contained: no room can be infected any more."
                ),
            },
            Err(e) => self.report(&e),
        }
    }

    fn report(&mut self, error: &Error) -> io::Result<()> {
        writeln!(self.output, "Error: {}", error)
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_number(&mut self, label: &str) -> io::Result<Option<usize>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
    }

    fn prompt_coord(&mut self) -> io::Result<Option<RoomCoord>> {
        let Some(floor) = self.prompt_number("Floor number: ")? else {
            return Ok(None);
        };
        let Some(room) = self.prompt_number("Room number: ")? else {
            return Ok(None);
        };
        Ok(Some(RoomCoord::new(floor, room)))
    }
}

fn write_turn(output: &mut impl Write, report: &TurnReport) -> io::Result<()> {
    writeln!(output, "\n--- Turn {} ---", report.turn)?;
    for coord in &report.newly_infected {
        writeln!(output, "Zombies have infected {}", coord)?;
    }
    if report.newly_infected.is_empty() {
        writeln!(output, "No new infections.")?;
    }
    Ok(())
}
