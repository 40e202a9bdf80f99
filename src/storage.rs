use std::{fs, io, path::{Path, PathBuf}};

use log::{info, warn};
use thiserror::Error;

use crate::config::Settings;

pub const HIGHSCORE_FILE: &str = "highscores";
pub const CONFIG_FILE: &str = "config";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Where the highscore and the config live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    highscore_path: PathBuf,
    config_path: PathBuf,
}

impl Storage {
    pub fn new(highscore_path: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Storage { highscore_path: highscore_path.into(), config_path: config_path.into() }
    }

    /// Both files inside `dir`, under their usual names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Storage::new(dir.join(HIGHSCORE_FILE), dir.join(CONFIG_FILE))
    }

    pub fn highscore_path(&self) -> &Path {
        &self.highscore_path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Best score so far, or 0 when the file is missing or unreadable.
    pub fn load_highscore(&self) -> u32 {
        let text = match read_optional(&self.highscore_path) {
            Some(text) => text,
            None => return 0,
        };

        match text.split_whitespace().next().map(str::parse::<u32>) {
            Some(Ok(score)) => score,
            _ => {
                warn!("ignoring malformed highscore file {}", self.highscore_path.display());
                0
            }
        }
    }

    pub fn load_settings(&self) -> Settings {
        match read_optional(&self.config_path) {
            Some(text) => Settings::parse(&text),
            None => Settings::default(),
        }
    }

    pub fn save_highscore(&self, score: u32) -> Result<(), StorageError> {
        fs::write(&self.highscore_path, format!("{}\n", score))
            .map_err(|source| StorageError::Write { path: self.highscore_path.clone(), source })?;

        info!("saved highscore {} to {}", score, self.highscore_path.display());
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Storage::new(HIGHSCORE_FILE, CONFIG_FILE)
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            info!("{} not read ({}), using defaults", path.display(), e);
            None
        }
    }
}
