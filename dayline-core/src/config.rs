//! Day configuration: working window and fixed blocks.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::block::{FixedBlock, RawFixedBlock};
use crate::error::{Error, Result};
use crate::time::{minutes_to_time, time_to_minutes};

pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_AVAILABLE_HOURS: u32 = 8;

/// Constructed from stored JSON with [`DayConfig::from_json`] so that
/// defaults and validation are applied in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayConfig {
    /// `"HH:MM"`, always valid once constructed through this module.
    pub start_time: String,
    pub available_hours: u32,
    pub fixed_blocks: Vec<FixedBlock>,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            start_time: DEFAULT_START_TIME.to_string(),
            available_hours: DEFAULT_AVAILABLE_HOURS,
            fixed_blocks: Vec::new(),
        }
    }
}

impl DayConfig {
    /// Build from whatever JSON was stored, filling gaps with defaults.
    ///
    /// Never fails: missing or malformed keys fall back to defaults, a
    /// non-array `fixedBlocks` becomes empty, and blocks that do not
    /// validate are dropped. Every fallback is logged.
    pub fn from_json(value: &Value) -> Self {
        let mut cfg = Self::default();
        let Some(obj) = value.as_object() else {
            warn!("config is not a JSON object; using defaults");
            return cfg;
        };

        if let Some(v) = obj.get("startTime") {
            match v.as_str().map(time_to_minutes) {
                Some(Ok(m)) => cfg.start_time = minutes_to_time(m),
                _ => warn!(value = %v, "ignoring invalid startTime"),
            }
        }

        if let Some(v) = obj.get("availableHours") {
            match v.as_u64().map(u32::try_from) {
                Some(Ok(h)) if validate_hours(h).is_ok() => cfg.available_hours = h,
                _ => warn!(value = %v, "ignoring invalid availableHours"),
            }
        }

        match obj.get("fixedBlocks") {
            Some(Value::Array(items)) => {
                for item in items {
                    match serde_json::from_value::<RawFixedBlock>(item.clone()) {
                        Ok(raw) => match raw.normalize() {
                            Ok(Some(block)) => cfg.fixed_blocks.push(block),
                            Ok(None) => {
                                warn!(name = %raw.name, "dropping legacy non-recurring block")
                            }
                            Err(e) => {
                                warn!(name = %raw.name, error = %e, "dropping invalid block")
                            }
                        },
                        Err(e) => warn!(error = %e, "dropping unreadable block"),
                    }
                }
            }
            Some(other) if !other.is_null() => {
                warn!("fixedBlocks is not an array; treating as empty")
            }
            _ => {}
        }

        cfg
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn start_minutes(&self) -> u32 {
        // start_time is validated on every write path; 0 is unreachable in practice
        time_to_minutes(&self.start_time).unwrap_or(0)
    }

    pub fn available_minutes(&self) -> u32 {
        self.available_hours * 60
    }

    pub fn set_start_time(&mut self, s: &str) -> Result<()> {
        let m = time_to_minutes(s)?;
        self.start_time = minutes_to_time(m);
        Ok(())
    }

    pub fn set_available_hours(&mut self, hours: i64) -> Result<()> {
        let h = u32::try_from(hours)
            .map_err(|_| Error::validation(format!("availableHours out of range: {hours}")))?;
        validate_hours(h)?;
        self.available_hours = h;
        Ok(())
    }

    /// Validate and append a block. The config is unchanged on error.
    pub fn add_fixed_block(&mut self, raw: &RawFixedBlock) -> Result<&FixedBlock> {
        let block = raw.normalize()?.ok_or_else(|| {
            Error::validation("fixed block needs a recurrence (daily, weekly or one-time)")
        })?;
        self.fixed_blocks.push(block);
        let last = self.fixed_blocks.len() - 1;
        Ok(&self.fixed_blocks[last])
    }

    /// Remove the block at `index` (0-based).
    pub fn remove_fixed_block(&mut self, index: usize) -> Result<FixedBlock> {
        if index >= self.fixed_blocks.len() {
            return Err(Error::validation(format!(
                "no fixed block at position {} ({} configured)",
                index + 1,
                self.fixed_blocks.len()
            )));
        }
        Ok(self.fixed_blocks.remove(index))
    }
}

fn validate_hours(hours: u32) -> Result<()> {
    if (1..=24).contains(&hours) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "availableHours must be between 1 and 24, got {hours}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Recurrence;
    use serde_json::json;

    #[test]
    fn missing_keys_take_defaults() {
        let cfg = DayConfig::from_json(&json!({ "availableHours": 6 }));
        assert_eq!(cfg.start_time, "09:00");
        assert_eq!(cfg.available_hours, 6);
        assert!(cfg.fixed_blocks.is_empty());
    }

    #[test]
    fn non_array_blocks_become_empty() {
        let cfg = DayConfig::from_json(&json!({ "fixedBlocks": { "name": "Lunch" } }));
        assert!(cfg.fixed_blocks.is_empty());
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = DayConfig::from_json(&json!({
            "startTime": "25:00",
            "availableHours": 40,
        }));
        assert_eq!(cfg, DayConfig::default());
    }

    #[test]
    fn normalizes_legacy_and_drops_bad_blocks() {
        let cfg = DayConfig::from_json(&json!({
            "startTime": "8:30",
            "fixedBlocks": [
                { "name": "Lunch", "startTime": "12:00", "endTime": "13:00", "recurring": true },
                { "name": "Old", "startTime": "15:00", "endTime": "16:00", "recurring": false },
                { "name": "Sync", "startTime": "10:00", "endTime": "10:30", "recurrence": "weekly" },
                { "name": "Gym", "startTime": "18:00", "endTime": "19:00",
                  "recurrence": "weekly", "weekDay": "Tuesday" },
                "garbage"
            ]
        }));
        assert_eq!(cfg.start_time, "08:30");
        let names: Vec<&str> = cfg.fixed_blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Lunch", "Gym"]);
        assert_eq!(cfg.fixed_blocks[0].recurrence, Recurrence::Daily);
    }

    #[test]
    fn rejected_block_leaves_config_unchanged() {
        let mut cfg = DayConfig::default();
        let before = cfg.clone();
        let raw = RawFixedBlock {
            name: "Team sync".to_string(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            recurrence: Some("weekly".to_string()),
            ..Default::default()
        };
        assert!(matches!(cfg.add_fixed_block(&raw), Err(Error::Validation(_))));
        assert_eq!(cfg, before);
    }

    #[test]
    fn hours_are_range_checked() {
        let mut cfg = DayConfig::default();
        assert!(cfg.set_available_hours(0).is_err());
        assert!(cfg.set_available_hours(25).is_err());
        cfg.set_available_hours(24).unwrap();
        assert_eq!(cfg.available_minutes(), 24 * 60);
    }

    #[test]
    fn round_trips_through_json() {
        let mut cfg = DayConfig::default();
        cfg.add_fixed_block(&RawFixedBlock {
            name: "Lunch".to_string(),
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            recurrence: Some("daily".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(DayConfig::from_json(&cfg.to_json().unwrap()), cfg);
    }
}
