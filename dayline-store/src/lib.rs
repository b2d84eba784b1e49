//! dayline-store: persistence for goals and day config, plus the `Planner`
//! service that front ends call.

pub mod error;
pub mod json;
pub mod planner;
pub mod repo;

pub use error::{Result, StoreError};
pub use json::JsonStore;
pub use planner::{Clock, FixedClock, Planner, SystemClock};
pub use repo::{ConfigRepository, GoalRepository, MemoryStore};
