//! Whole-file JSON store.
//!
//! Layout under the data directory:
//! - `goals.json`: array of goals
//! - `config.json`: day config object (missing keys take defaults)
//!
//! Every save rewrites the whole file. There is no locking: two processes
//! writing at the same time can lose each other's updates.

use std::fs;
use std::path::{Path, PathBuf};

use dayline_core::{DayConfig, Goal};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::repo::{ConfigRepository, GoalRepository};

pub const GOALS_FILE: &str = "goals.json";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn goals_path(&self) -> PathBuf {
        self.root.join(GOALS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `Ok(None)` when the file does not exist yet.
    fn read_json(&self, path: &Path) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;

        // write-then-rename so a crash never leaves a half-written file
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

impl GoalRepository for JsonStore {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        let path = self.goals_path();
        let goals: Vec<Goal> = match self.read_json(&path)? {
            None => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?,
        };
        // a hand-edited file must not feed the scheduler a broken goal
        for goal in &goals {
            goal.validate().map_err(|source| StoreError::InvalidGoal {
                path: path.display().to_string(),
                id: goal.id,
                source,
            })?;
        }
        debug!(count = goals.len(), path = %path.display(), "loaded goals");
        Ok(goals)
    }

    fn save_goals(&self, goals: &[Goal]) -> Result<()> {
        let path = self.goals_path();
        self.write_json(&path, goals)?;
        debug!(count = goals.len(), path = %path.display(), "saved goals");
        Ok(())
    }
}

impl ConfigRepository for JsonStore {
    fn load_config(&self) -> Result<DayConfig> {
        let path = self.config_path();
        let config = match self.read_json(&path)? {
            None => DayConfig::default(),
            Some(value) => DayConfig::from_json(&value),
        };
        debug!(blocks = config.fixed_blocks.len(), path = %path.display(), "loaded config");
        Ok(config)
    }

    fn save_config(&self, config: &DayConfig) -> Result<()> {
        let path = self.config_path();
        let value = config.to_json().map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        self.write_json(&path, &value)?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }
}
