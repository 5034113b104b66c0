//! Menu choices offered by the interactive shell.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Setup,
    Status,
    Advance,
    Block,
    Unblock,
    Clean,
    ResetSensor,
    Save,
    Load,
    Quit,
    Run,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 11] = [
        MenuChoice::Setup,
        MenuChoice::Status,
        MenuChoice::Advance,
        MenuChoice::Block,
        MenuChoice::Unblock,
        MenuChoice::Clean,
        MenuChoice::ResetSensor,
        MenuChoice::Save,
        MenuChoice::Load,
        MenuChoice::Quit,
        MenuChoice::Run,
    ];

    pub fn number(self) -> usize {
        match self {
            MenuChoice::Setup => 1,
            MenuChoice::Status => 2,
            MenuChoice::Advance => 3,
            MenuChoice::Block => 4,
            MenuChoice::Unblock => 5,
            MenuChoice::Clean => 6,
            MenuChoice::ResetSensor => 7,
            MenuChoice::Save => 8,
            MenuChoice::Load => 9,
            MenuChoice::Quit => 10,
            MenuChoice::Run => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Setup => "Set up building",
            MenuChoice::Status => "Show building status",
            MenuChoice::Advance => "Advance turn",
            MenuChoice::Block => "Block room",
            MenuChoice::Unblock => "Unblock room",
            MenuChoice::Clean => "Clean room",
            MenuChoice::ResetSensor => "Reset sensor",
            MenuChoice::Save => "Save state",
            MenuChoice::Load => "Load state",
            MenuChoice::Quit => "Quit",
            MenuChoice::Run => "Run until fully infected",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            MenuChoice::Setup => "setup",
            MenuChoice::Status => "status",
            MenuChoice::Advance => "advance",
            MenuChoice::Block => "block",
            MenuChoice::Unblock => "unblock",
            MenuChoice::Clean => "clean",
            MenuChoice::ResetSensor => "reset",
            MenuChoice::Save => "save",
            MenuChoice::Load => "load",
            MenuChoice::Quit => "quit",
            MenuChoice::Run => "run",
        }
    }

    pub fn render_menu() -> String {
        let mut menu = String::from("\n=== Zombie Outbreak Simulation ===\n");
        for choice in Self::ALL {
            menu.push_str(&format!("{}. {}\n", choice.number(), choice.label()));
        }
        menu
    }
}

impl FromStr for MenuChoice {
    type Err = String;

    /// Accepts the menu number or its keyword, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| s == c.number().to_string() || s == c.keyword())
            .ok_or_else(|| format!("unknown option '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers_and_keywords() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::Setup));
        assert_eq!(" 10 ".parse::<MenuChoice>(), Ok(MenuChoice::Quit));
        assert_eq!("Run".parse::<MenuChoice>(), Ok(MenuChoice::Run));
        assert_eq!("reset".parse::<MenuChoice>(), Ok(MenuChoice::ResetSensor));
        assert!("12".parse::<MenuChoice>().is_err());
        assert!("".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn test_numbers_are_unique() {
        let mut numbers: Vec<_> = MenuChoice::ALL.iter().map(|c| c.number()).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers, (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn test_menu_lists_every_choice() {
        let menu = MenuChoice::render_menu();
        assert!(menu.contains("3. Advance turn"));
        assert!(menu.contains("11. Run until fully infected"));
    }
}
