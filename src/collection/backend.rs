use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};

use crate::models::CapturedRecord;

/// Where the caught collection lives between runs.
///
/// `load` distinguishes "nothing stored yet" (`Ok(None)`) from "stored but
/// unreadable" (`Err`); callers decide how forgiving to be.
pub trait CollectionBackend: Send + Sync {
    fn load(&self) -> Result<Option<Vec<CapturedRecord>>>;
    fn save(&self, records: &[CapturedRecord]) -> Result<()>;
}

/// One JSON array per key, stored as `<dir>/<key>.json`.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CollectionBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Vec<CapturedRecord>>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        let records = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(records))
    }

    fn save(&self, records: &[CapturedRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create collection directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string(records)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Keeps the encoded array in memory, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw contents, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CollectionBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<CapturedRecord>>> {
        match self.slot().as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(
                serde_json::from_str(raw).context("failed to parse stored collection")?,
            )),
        }
    }

    fn save(&self, records: &[CapturedRecord]) -> Result<()> {
        *self.slot() = Some(serde_json::to_string(records)?);
        Ok(())
    }
}
