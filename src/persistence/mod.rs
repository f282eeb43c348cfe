//! Best-time persistence
//!
//! Stores the single best-time record between runs:
//! - JSON file on disk for the native binary
//! - In-memory store for tests and hosts without storage

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::records::BestTime;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("best-time storage I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt best-time record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Where the best time lives between sessions
pub trait BestTimeStore {
    fn load(&self) -> Result<BestTime, StoreError>;
    fn save(&mut self, best: &BestTime) -> Result<(), StoreError>;
}

/// Read the record, falling back to "never completed" on any failure
pub fn load_or_default(store: &dyn BestTimeStore) -> BestTime {
    match store.load() {
        Ok(best) => {
            if let Some(secs) = best.seconds {
                log::info!("Loaded best time {:.1}s", secs);
            }
            best
        }
        Err(e) => {
            log::warn!("Could not load best time, starting fresh: {}", e);
            BestTime::new()
        }
    }
}

/// Best time as a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BestTimeStore for JsonFileStore {
    fn load(&self) -> Result<BestTime, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            // Nothing saved yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BestTime::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, best: &BestTime) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string(best)?;
        // Write a temp file, then rename it over the record
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        log::debug!("Best time saved to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the record for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: BestTime,
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: BestTime) -> Self {
        Self { best, saves: 0 }
    }
}

impl BestTimeStore for MemoryStore {
    fn load(&self) -> Result<BestTime, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, best: &BestTime) -> Result<(), StoreError> {
        self.best = *best;
        self.saves += 1;
        Ok(())
    }
}
