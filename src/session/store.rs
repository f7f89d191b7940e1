//! Session store backends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use super::error::{SessionError, SessionResult};
use super::Slot;

/// Synchronous key-value storage for the session slots
///
/// `read` must never fail: a store that is unavailable reads as empty, which
/// every guard then treats as an anonymous visitor.
pub trait SessionStore: Send + Sync {
    /// Current value of a slot, if any
    fn read(&self, slot: Slot) -> Option<String>;

    /// Overwrite a slot
    fn write(&self, slot: Slot, value: &str) -> SessionResult<()>;

    /// Remove a slot; removing an absent slot is not an error
    fn remove(&self, slot: Slot) -> SessionResult<()>;

    /// Time of the last write or removal, when the store records it
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<Slot, String>>,
    updated_at: RwLock<Option<DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&self) {
        if let Ok(mut updated) = self.updated_at.write() {
            *updated = Some(Utc::now());
        }
    }
}

impl SessionStore for MemoryStore {
    fn read(&self, slot: Slot) -> Option<String> {
        match self.slots.read() {
            Ok(slots) => slots.get(&slot).cloned(),
            Err(e) => {
                tracing::warn!(slot = %slot, "Session store unreadable: {}", e);
                None
            }
        }
    }

    fn write(&self, slot: Slot, value: &str) -> SessionResult<()> {
        self.slots
            .write()
            .map_err(|e| SessionError::Lock(e.to_string()))?
            .insert(slot, value.to_string());
        self.touch();
        Ok(())
    }

    fn remove(&self, slot: Slot) -> SessionResult<()> {
        self.slots
            .write()
            .map_err(|e| SessionError::Lock(e.to_string()))?
            .remove(&slot);
        self.touch();
        Ok(())
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at.read().ok().and_then(|u| *u)
    }
}

/// On-disk layout of the session file
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    fn slot(&self, slot: Slot) -> &Option<String> {
        match slot {
            Slot::Token => &self.token,
            Slot::Role => &self.role,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Token => &mut self.token,
            Slot::Role => &mut self.role,
        }
    }
}

/// Durable session store backed by a JSON file
///
/// Every write rewrites the whole file, so a session written by one process
/// is visible to the next one started with the same path.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record; missing or unreadable files load as empty
    fn load(&self) -> SessionRecord {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SessionRecord::default(),
            Err(e) => {
                tracing::warn!(path = ?self.path, "Cannot read session file: {}", e);
                return SessionRecord::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = ?self.path, "Ignoring corrupt session file: {}", e);
            SessionRecord::default()
        })
    }

    fn save(&self, record: &SessionRecord) -> SessionResult<()> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, content).map_err(io_err)
    }

    fn update(&self, slot: Slot, value: Option<&str>) -> SessionResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| SessionError::Lock(e.to_string()))?;

        let mut record = self.load();
        *record.slot_mut(slot) = value.map(str::to_string);
        record.updated_at = Some(Utc::now());
        self.save(&record)
    }
}

impl SessionStore for FileStore {
    fn read(&self, slot: Slot) -> Option<String> {
        self.load().slot(slot).clone()
    }

    fn write(&self, slot: Slot, value: &str) -> SessionResult<()> {
        self.update(slot, Some(value))
    }

    fn remove(&self, slot: Slot) -> SessionResult<()> {
        self.update(slot, None)
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.load().updated_at
    }
}
