//! Identity stores
//!
//! Durable key-value slots for the user key. `FileStore` is the native
//! stand-in for browser local storage; `MemoryStore` backs tests.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur reading or writing an identity store
#[derive(Error, Debug)]
pub enum IdentityError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file is not a JSON object of strings
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for identity store operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Durable string slots
pub trait IdentityStore: Send + Sync {
    fn get(&self, slot: &str) -> IdentityResult<Option<String>>;
    fn set(&self, slot: &str, value: &str) -> IdentityResult<()>;
}

impl<T: IdentityStore + ?Sized> IdentityStore for Arc<T> {
    fn get(&self, slot: &str) -> IdentityResult<Option<String>> {
        (**self).get(slot)
    }

    fn set(&self, slot: &str, value: &str) -> IdentityResult<()> {
        (**self).set(slot, value)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: pre-populate a slot
    pub fn with_slot(self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(slot.into(), value.into());
        }
        self
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for MemoryStore {
    fn get(&self, slot: &str) -> IdentityResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| IdentityError::Lock(e.to_string()))?;
        Ok(slots.get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> IdentityResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| IdentityError::Lock(e.to_string()))?;
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file store
///
/// The whole file is one object of slot name to value. Each write goes
/// through its own temporary file in the same directory and is renamed into
/// place, so concurrent writers are last-write-wins and readers never see a
/// partial file. A corrupt file is replaced on the next write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> IdentityResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl IdentityStore for FileStore {
    fn get(&self, slot: &str) -> IdentityResult<Option<String>> {
        Ok(self.read_all()?.remove(slot))
    }

    fn set(&self, slot: &str, value: &str) -> IdentityResult<()> {
        let mut slots = match self.read_all() {
            Ok(slots) => slots,
            Err(IdentityError::Serialization(e)) => {
                tracing::warn!(path = ?self.path, error = %e, "Discarding corrupt identity store");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        slots.insert(slot.to_string(), value.to_string());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(&slots)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| IdentityError::Io(e.error))?;

        tracing::debug!(path = ?self.path, slot, "Identity slot written");
        Ok(())
    }
}
