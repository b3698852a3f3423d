use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::capture::client::DEFAULT_API_BASE_URL;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_COLLECTION_KEY: &str = "caughtPokemon";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub initial_minutes: u64,
    pub initial_seconds: u64,
    pub collection_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            initial_minutes: 0,
            initial_seconds: 0,
            collection_key: DEFAULT_COLLECTION_KEY.into(),
        }
    }
}

impl Settings {
    pub fn initial_duration_seconds(&self) -> u64 {
        self.initial_minutes
            .saturating_mul(60)
            .saturating_add(self.initial_seconds)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: Settings,
}

impl SettingsStore {
    /// Reads `<data_dir>/settings.json`, writing the defaults out when the
    /// file does not exist yet. An invalid file falls back to defaults.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring invalid settings in {}: {err}", path.display());
                Settings::default()
            })
        } else {
            let defaults = Settings::default();
            persist(&path, &defaults)?;
            defaults
        };

        Ok(Self { path, data })
    }

    pub fn settings(&self) -> &Settings {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn persist(path: &Path, data: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let serialized = serde_json::to_string_pretty(data)?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write settings to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path()).unwrap();

        assert_eq!(store.settings(), &Settings::default());
        let written: Settings =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(written, Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r#"{"initial_minutes": 25}"#).unwrap();

        let store = SettingsStore::new(dir.path()).unwrap();
        assert_eq!(store.settings().initial_minutes, 25);
        assert_eq!(store.settings().api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(store.settings().initial_duration_seconds(), 1500);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "][").unwrap();

        let store = SettingsStore::new(dir.path()).unwrap();
        assert_eq!(store.settings(), &Settings::default());
    }
}
