//! Persistent progress: current level, best level and deaths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resources::levelstate::LevelState;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to access save file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt save file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveState {
    pub level: u32,
    pub max_level: u32,
    pub death_counter: u32,
}

impl Default for SaveState {
    fn default() -> Self {
        Self {
            level: 1,
            max_level: 1,
            death_counter: 0,
        }
    }
}

impl SaveState {
    /// Read the save file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No save file at {:?}, starting fresh", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SaveError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| SaveError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let io_err = |source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        };
        let text = serde_json::to_string(self).map_err(|source| SaveError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)?;
        info!("Saved progress to {:?}", path);
        Ok(())
    }

    pub fn from_level_state(state: &LevelState) -> Self {
        Self {
            level: state.level,
            max_level: state.max_level,
            death_counter: state.death_counter,
        }
    }

    /// Copy the saved progress into a level state.
    pub fn apply(&self, state: &mut LevelState) {
        state.level = self.level.max(1);
        state.max_level = self.max_level.max(state.level);
        state.death_counter = self.death_counter;
    }
}
