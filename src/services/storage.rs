//! Key-value persistence for the active timer list and the theme preference
//!
//! Failures never reach the caller: reads fall back to an empty list and
//! writes are logged and dropped, leaving the in-memory board authoritative.

use std::{
    collections::HashMap,
    fs,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    state::{timer::Timer, ui_state::Theme},
    utils::lock_or_recover,
};

/// Key holding the serialized active timer list
pub const TIMERS_KEY: &str = "timers";

/// Key holding the theme preference
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read/write storage: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to (de)serialize timers: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// String key-value store, the shape of browser local storage
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_DATA_HOME/timer-board` or the platform equivalent, `./timer-board` as a last resort
    pub fn default_dir() -> PathBuf {
        let mut dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.push("timer-board");
        dir
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // atomic replace: readers never see a partial file
        let tmp = self.dir.join(format!("{}.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process store for tests and `--ephemeral` runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock_or_recover(&self.entries, "memory storage").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock_or_recover(&self.entries, "memory storage").insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn try_load_timers(storage: &dyn Storage) -> Result<Vec<Timer>, StorageError> {
    match storage.get(TIMERS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Load the active list. Missing or unreadable data yields an empty list.
pub fn load_timers(storage: &dyn Storage) -> Vec<Timer> {
    match try_load_timers(storage) {
        Ok(timers) => {
            debug!("Loaded {} timers from storage", timers.len());
            timers
        }
        Err(e) => {
            error!("Error loading timers from storage: {}", e);
            Vec::new()
        }
    }
}

fn try_save_timers(storage: &dyn Storage, timers: &[Timer]) -> Result<(), StorageError> {
    let raw = serde_json::to_string(timers)?;
    storage.set(TIMERS_KEY, &raw)
}

/// Overwrite the stored active list. Failures are logged, never returned.
pub fn save_timers(storage: &dyn Storage, timers: &[Timer]) {
    match try_save_timers(storage, timers) {
        Ok(()) => debug!("Saved {} timers to storage", timers.len()),
        Err(e) => error!("Error saving timers to storage: {}", e),
    }
}

/// Stored theme, if one was saved and is recognizable
pub fn load_theme(storage: &dyn Storage) -> Option<Theme> {
    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!("Ignoring stored theme: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            error!("Error loading theme from storage: {}", e);
            None
        }
    }
}

pub fn save_theme(storage: &dyn Storage, theme: Theme) {
    if let Err(e) = storage.set(THEME_KEY, theme.as_str()) {
        error!("Error saving theme to storage: {}", e);
    }
}
