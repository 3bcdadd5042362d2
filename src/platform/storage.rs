//! High-score persistence
//!
//! One integer, read when a session is created and written whenever a run
//! beats it.

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key-value port holding the high score
pub trait HighScoreStore {
    /// Stored high score, 0 when nothing has been saved yet
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store
///
/// Clones share the same slot, so a caller can keep a handle after giving one
/// to the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: Rc<Cell<Option<u64>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        let store = Self::default();
        store.score.set(Some(score));
        store
    }

    /// Make every subsequent load/save fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn stored(&self) -> Option<u64> {
        self.score.get()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.score.get().unwrap_or(0))
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.check()?;
        self.score.set(Some(score));
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// JSON file store for native builds
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<u64, StoreError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let json = fs::read_to_string(&self.path)?;
        let record: HighScoreFile = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreFile { high_score: score })?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, StoreError> {
        let item = self
            .storage()?
            .get_item(&self.key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        match item {
            Some(text) => text.trim().parse().map_err(|_| StoreError::Corrupt(text)),
            None => Ok(0),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
