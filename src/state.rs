use std::time::Duration;

use log::{error, info};

use crate::config::{Difficulty, Settings};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Ended(Outcome),
}

/// Score keeping and the round's phase.
///
/// When built with [`GameState::load`] the highscore is written back to disk
/// when the state is dropped.
#[derive(Debug)]
pub struct GameState {
    score: u32,
    highscore: u32,
    difficulty: Difficulty,
    wrap: bool,
    phase: Phase,
    store: Option<Storage>,
}

impl GameState {
    pub fn new(settings: Settings, highscore: u32) -> Self {
        GameState {
            score: 0,
            highscore,
            difficulty: settings.difficulty,
            wrap: settings.wrap,
            phase: Phase::Running,
            store: None,
        }
    }

    pub fn load(store: Storage) -> Self {
        let settings = store.load_settings();
        let highscore = store.load_highscore();
        info!(
            "loaded difficulty {}, wrap {}, highscore {}",
            settings.difficulty.get(),
            settings.wrap,
            highscore
        );

        let mut state = GameState::new(settings, highscore);
        state.store = Some(store);
        state
    }

    /// Starts a new round. Settings stay as they were loaded.
    pub fn restart(&mut self) {
        self.score = 0;
        self.phase = Phase::Running;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn won(&self) -> bool {
        self.phase == Phase::Ended(Outcome::Won)
    }

    pub fn speed(&self) -> Duration {
        self.difficulty.tick_interval()
    }

    /// Whether this round's score is the best one. Only used for display.
    pub fn has_new_highscore(&self) -> bool {
        self.score == self.highscore
    }

    pub fn increase_score(&mut self) {
        self.score += self.difficulty.get();
        if self.score > self.highscore {
            self.highscore = self.score;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    pub fn lose(&mut self) {
        self.end(Outcome::Lost);
    }

    pub fn win(&mut self) {
        self.end(Outcome::Won);
    }

    fn end(&mut self, outcome: Outcome) {
        if self.phase == Phase::Running {
            info!("round ended: {:?}, score {}", outcome, self.score);
            self.phase = Phase::Ended(outcome);
        }
    }
}

impl Drop for GameState {
    fn drop(&mut self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_highscore(self.highscore) {
                error!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state(difficulty: i64, highscore: u32) -> GameState {
        GameState::new(Settings::new(Difficulty::new(difficulty), false), highscore)
    }

    #[test]
    fn score_grows_by_difficulty() {
        let mut state = state(6, 100);

        state.increase_score();
        assert_eq!(state.score(), 6);
        assert_eq!(state.highscore(), 100);
        assert!(!state.has_new_highscore());
    }

    #[test]
    fn highscore_needs_strictly_greater_score() {
        let mut state = state(5, 10);

        state.increase_score();
        state.increase_score();
        assert_eq!(state.score(), 10);
        assert_eq!(state.highscore(), 10);

        state.increase_score();
        assert_eq!(state.highscore(), 15);
        assert!(state.has_new_highscore());
    }

    #[test]
    fn phase_transitions() {
        let mut state = state(10, 0);
        assert_eq!(state.phase(), Phase::Running);

        state.pause();
        assert_eq!(state.phase(), Phase::Paused);
        state.lose();
        assert_eq!(state.phase(), Phase::Paused);
        state.resume();
        assert_eq!(state.phase(), Phase::Running);

        state.win();
        assert!(state.won());
        state.lose();
        state.resume();
        assert_eq!(state.phase(), Phase::Ended(Outcome::Won));
    }

    #[test]
    fn restart_keeps_settings_and_highscore() {
        let mut state = GameState::new(Settings::new(Difficulty::new(4), true), 0);
        state.increase_score();
        state.lose();

        state.restart();
        assert_eq!(state.score(), 0);
        assert_eq!(state.highscore(), 4);
        assert!(state.is_running());
        assert!(state.wrap());
        assert_eq!(state.difficulty().get(), 4);
    }

    #[test]
    fn speed_follows_difficulty() {
        assert_eq!(state(20, 0).speed(), Duration::from_millis(20));
        assert_eq!(state(0, 0).speed(), Duration::from_millis(220));
    }

    #[test]
    fn drop_persists_highscore() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config"), "3 wrap").unwrap();

        {
            let mut state = GameState::load(Storage::in_dir(dir.path()));
            assert!(state.wrap());
            state.increase_score();
        }

        assert_eq!(Storage::in_dir(dir.path()).load_highscore(), 3);
    }
}
