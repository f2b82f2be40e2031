//! Directory entry registry
//!
//! Owns the ordered list of tracked directories. Entries are unique after
//! normalization and keep their insertion order. File operations live here
//! too since they share the path validation rules.

mod files;
mod path;
mod store;

#[cfg(test)]
mod tests;

pub use files::{create_file, remove_file};
pub use path::{existing_directory, normalize_path};
pub use store::RegistryStore;

use crate::error::RegistryError;
use crate::models::{DirectoryEntry, ManagementAction, RunOutcome};
use crate::observability::StructuredLogger;
use crate::error::ModelError;
use crate::predictor::{FeatureExtractor, Predictor, FEATURE_COUNT};
use tracing::{debug, warn};

/// Ordered set of tracked directories
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<DirectoryEntry>,
    extractor: FeatureExtractor,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted paths.
    ///
    /// Paths are re-normalized and de-duplicated but not checked for
    /// existence; a directory that vanished stays tracked until removed.
    pub fn from_persisted(paths: impl IntoIterator<Item = String>) -> Self {
        let mut registry = Self::new();
        for raw in paths {
            match normalize_path(&raw) {
                Ok(key) if !registry.contains_key(&key) => registry
                    .entries
                    .push(DirectoryEntry::from_normalized(key)),
                Ok(_) => debug!(path = %raw, "Skipping duplicate persisted entry"),
                Err(e) => warn!(path = %raw, error = %e, "Skipping invalid persisted entry"),
            }
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Whether `path` is tracked, after normalization
    pub fn contains(&self, path: &str) -> bool {
        normalize_path(path)
            .map(|key| self.contains_key(&key))
            .unwrap_or(false)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.path() == key)
    }

    /// Track an existing directory. Returns `false` if it was already tracked.
    pub fn add_entry(&mut self, path: &str) -> Result<bool, RegistryError> {
        let key = existing_directory(path)?;
        if self.contains_key(&key) {
            debug!(path = %key, "Entry already tracked");
            return Ok(false);
        }

        debug!(event = "entry_added", path = %key, "Entry added");
        self.entries.push(DirectoryEntry::from_normalized(key));
        Ok(true)
    }

    /// Stop tracking `path`
    pub fn remove_entry(&mut self, path: &str) -> Result<DirectoryEntry, RegistryError> {
        let idx = self
            .find(path)
            .ok_or_else(|| RegistryError::EntryNotFound(path.to_string()))?;

        let removed = self.entries.remove(idx);
        debug!(event = "entry_removed", path = %removed, "Entry removed");
        Ok(removed)
    }

    /// Replace `old_path` with `new_path` in place, keeping its position
    pub fn update_entry(&mut self, old_path: &str, new_path: &str) -> Result<(), RegistryError> {
        let idx = self
            .find(old_path)
            .ok_or_else(|| RegistryError::EntryNotFound(old_path.to_string()))?;
        let new_key = existing_directory(new_path)?;

        if self.entries[idx].path() == new_key {
            return Ok(());
        }
        if self.contains_key(&new_key) {
            return Err(RegistryError::invalid_path(new_path, "already tracked"));
        }

        debug!(
            event = "entry_updated",
            old = %self.entries[idx],
            new = %new_key,
            "Entry updated"
        );
        self.entries[idx] = DirectoryEntry::from_normalized(new_key);
        Ok(())
    }

    /// Snapshot of tracked paths in insertion order
    pub fn list_entries(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path().to_string()).collect()
    }

    /// Classify every entry and report the selected action.
    ///
    /// Actions are reported, not applied, and the entry list is untouched.
    /// A model trained on a different feature width is rejected before any
    /// entry is classified. A prediction failure stops the run; outcomes
    /// already logged stay logged.
    pub fn run<P: Predictor + ?Sized>(
        &self,
        predictor: &P,
        logger: &StructuredLogger,
    ) -> Result<Vec<RunOutcome>, RegistryError> {
        if let Some(expected) = predictor.feature_dimensionality() {
            if expected != FEATURE_COUNT {
                return Err(ModelError::DimensionMismatch {
                    expected,
                    actual: FEATURE_COUNT,
                }
                .into());
            }
        }

        let mut outcomes = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let features = self.extractor.extract(entry);
            let label = predictor.predict(&features)?;
            let outcome = RunOutcome {
                entry: entry.path().to_string(),
                features,
                label,
                action: ManagementAction::from_label(label),
            };
            logger.log_run_outcome(&outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    fn find(&self, path: &str) -> Option<usize> {
        normalize_path(path).ok().and_then(|key| self.position(&key))
    }
}
