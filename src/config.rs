use std::time::Duration;

use log::warn;

pub const MIN_DIFFICULTY: u32 = 1;
pub const MAX_DIFFICULTY: u32 = 20;
pub const DEFAULT_DIFFICULTY: u32 = 10;

/// Literal mode token that turns on wrapping at the board edges.
pub const WRAP_TOKEN: &str = "wrap";

/// Points per food and game speed, always within `1..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty(u32);

impl Difficulty {
    /// Out of range values fall back to the default difficulty.
    pub fn new(value: i64) -> Self {
        if value < MIN_DIFFICULTY as i64 || value > MAX_DIFFICULTY as i64 {
            warn!("difficulty {} out of range, using {}", value, DEFAULT_DIFFICULTY);
            return Difficulty::default();
        }

        Difficulty(value as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Time between two moves: 20ms for every step below 21.
    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(20 * (MAX_DIFFICULTY + 1 - self.0) as u64)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(DEFAULT_DIFFICULTY)
    }
}

/// Settings read from the config file once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub wrap: bool,
}

impl Settings {
    pub fn new(difficulty: Difficulty, wrap: bool) -> Self {
        Settings { difficulty, wrap }
    }

    /// Parses `<difficulty> <mode>`. An unreadable difficulty discards the whole
    /// file, an out of range one only resets the difficulty.
    pub fn parse(text: &str) -> Self {
        let mut tokens = text.split_whitespace();

        let difficulty = match tokens.next().map(str::parse::<i64>) {
            Some(Ok(value)) => Difficulty::new(value),
            Some(Err(_)) => {
                warn!("unreadable difficulty in config, using defaults");
                return Settings::default();
            }
            None => Difficulty::default(),
        };
        let wrap = tokens.next() == Some(WRAP_TOKEN);

        Settings { difficulty, wrap }
    }
}
