//! Session Persistence
//!
//! Keeps the logged-in user across restarts as a single JSON document,
//! `{"currentUser": {...}}`. Without a path the store lives in memory only.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::egui_app::error::ClientError;
use crate::shared::messaging::User;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDocument {
    current_user: Option<User>,
}

#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    memory: Mutex<Option<User>>,
}

impl SessionStore {
    /// File-backed store; parent directories are created on first save
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            memory: Mutex::new(None),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            memory: Mutex::new(None),
        }
    }

    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::at(path),
            None => Self::in_memory(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the persisted user, if any
    ///
    /// A missing file is an empty session, not an error.
    pub fn load(&self) -> Result<Option<User>, ClientError> {
        let Some(path) = &self.path else {
            return Ok(self.memory_slot()?.clone());
        };
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document: SessionDocument = serde_json::from_str(&raw)
            .map_err(|e| ClientError::storage(format!("corrupt session file: {}", e)))?;
        Ok(document.current_user)
    }

    pub fn save(&self, user: &User) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            *self.memory_slot()? = Some(user.clone());
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let document = SessionDocument {
            current_user: Some(user.clone()),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| ClientError::storage(e.to_string()))?;
        std::fs::write(path, json)?;
        tracing::debug!("Session saved to {}", path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            *self.memory_slot()? = None;
            return Ok(());
        };
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn memory_slot(&self) -> Result<std::sync::MutexGuard<'_, Option<User>>, ClientError> {
        self.memory
            .lock()
            .map_err(|_| ClientError::storage("session lock poisoned"))
    }
}
