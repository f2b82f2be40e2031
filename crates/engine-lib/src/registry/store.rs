//! Persisted registry state
//!
//! The tracked entries survive between front-end sessions as a small JSON
//! document. Writes go through a temp file and a rename.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct RegistryState {
    version: u32,
    entries: Vec<String>,
}

/// JSON-file backing store for the registry's entry list
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read persisted entries; a missing file means an empty registry
    pub fn load(&self) -> Result<Vec<String>, RegistryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No registry state file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.state_error(format!("failed to read: {}", e))),
        };

        let state: RegistryState = serde_json::from_str(&raw)
            .map_err(|e| self.state_error(format!("failed to parse: {}", e)))?;

        if state.version != STATE_VERSION {
            return Err(self.state_error(format!("unsupported version {}", state.version)));
        }

        Ok(state.entries)
    }

    pub fn save(&self, entries: &[String]) -> Result<(), RegistryError> {
        let state = RegistryState {
            version: STATE_VERSION,
            entries: entries.to_vec(),
        };
        let content = serde_json::to_string_pretty(&state)
            .map_err(|e| self.state_error(format!("failed to serialize: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("tmp");
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            RegistryError::io(&self.path, e)
        })?;

        debug!(path = %self.path.display(), entries = entries.len(), "Registry state saved");
        Ok(())
    }

    fn state_error(&self, reason: String) -> RegistryError {
        RegistryError::StateFile {
            path: self.path.clone(),
            reason,
        }
    }
}
