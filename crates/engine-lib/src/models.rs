//! Core data models for the directory engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Discrete class label produced by the classifier
pub type Label = u32;

/// A tracked directory, always stored in normalized absolute form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryEntry {
    path: String,
}

impl DirectoryEntry {
    /// Wrap an already-normalized path. Use `registry::normalize_path` for user input.
    pub(crate) fn from_normalized(path: String) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Numeric classifier input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// One labelled training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: Label,
}

impl Sample {
    pub fn new(features: impl Into<FeatureVector>, label: Label) -> Self {
        Self {
            features: features.into(),
            label,
        }
    }
}

/// Management action selected for an entry during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementAction {
    Ignore,
    Flag,
    Archive,
}

impl ManagementAction {
    /// 0 ignores, 1 flags, anything else archives
    pub fn from_label(label: Label) -> Self {
        match label {
            0 => ManagementAction::Ignore,
            1 => ManagementAction::Flag,
            _ => ManagementAction::Archive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManagementAction::Ignore => "ignore",
            ManagementAction::Flag => "flag",
            ManagementAction::Archive => "archive",
        }
    }
}

impl fmt::Display for ManagementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-entry result of a management run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub entry: String,
    pub features: FeatureVector,
    pub label: Label,
    pub action: ManagementAction,
}
