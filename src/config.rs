// File: ./src/config.rs
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "DB/TimeTable.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `http(s)://` URL of the published timetable, or a local path.
    pub source: String,
    pub allow_insecure_certs: bool,
    /// Append a `v=<millis>` query parameter to every remote fetch.
    pub cache_bust: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            allow_insecure_certs: false,
            cache_bust: true,
        }
    }
}

impl Config {
    /// `$CLASSEASE_CONFIG_DIR/config.toml` when set, otherwise the platform
    /// config directory.
    pub fn get_path() -> Option<PathBuf> {
        if let Ok(dir) = env::var("CLASSEASE_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.toml"));
        }
        ProjectDirs::from("com", "classease", "classease")
            .map(|proj| proj.config_dir().join("config.toml"))
    }

    /// A missing file means defaults; a broken one is an error.
    pub fn load() -> Result<Self> {
        match Self::get_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }
}
