//! Repository abstractions.
//!
//! Both repositories work on whole collections: a scheduling pass reads
//! everything once and a mutation writes everything back.

use std::cell::RefCell;

use dayline_core::{DayConfig, Goal};

use crate::error::Result;

pub trait GoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>>;
    fn save_goals(&self, goals: &[Goal]) -> Result<()>;
}

pub trait ConfigRepository {
    fn load_config(&self) -> Result<DayConfig>;
    fn save_config(&self, config: &DayConfig) -> Result<()>;
}

/// In-process store, for tests and for embedding without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    goals: RefCell<Vec<Goal>>,
    config: RefCell<DayConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DayConfig) -> Self {
        Self {
            goals: RefCell::new(Vec::new()),
            config: RefCell::new(config),
        }
    }
}

impl GoalRepository for MemoryStore {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.borrow().clone())
    }

    fn save_goals(&self, goals: &[Goal]) -> Result<()> {
        *self.goals.borrow_mut() = goals.to_vec();
        Ok(())
    }
}

impl ConfigRepository for MemoryStore {
    fn load_config(&self) -> Result<DayConfig> {
        Ok(self.config.borrow().clone())
    }

    fn save_config(&self, config: &DayConfig) -> Result<()> {
        *self.config.borrow_mut() = config.clone();
        Ok(())
    }
}
