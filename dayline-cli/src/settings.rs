//! Data directory and app settings (`settings.toml`).
//!
//! Goals and the day config live next to the settings file as JSON; see
//! `dayline_store::JsonStore`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.toml";

/// Resolve the data directory: explicit override (flag or `DAYLINE_HOME`),
/// otherwise `~/.dayline`.
pub fn dayline_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let home = std::env::var("HOME").context("HOME is not set (pass --data-dir)")?;
    Ok(PathBuf::from(home).join(".dayline"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

pub fn settings_path(home: &Path) -> PathBuf {
    home.join(SETTINGS_FILE)
}

pub fn load_settings(home: &Path) -> Result<Settings> {
    let p = settings_path(home);
    if !p.exists() {
        return Ok(Settings::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Write default settings unless the file already exists.
pub fn init_settings(home: &Path) -> Result<PathBuf> {
    let p = settings_path(home);
    if p.exists() {
        return Ok(p);
    }
    fs::create_dir_all(home).with_context(|| format!("create {}", home.display()))?;
    let s = toml::to_string_pretty(&Settings::default()).context("serialize settings")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}
