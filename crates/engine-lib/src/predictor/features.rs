//! Feature extraction for tracked entries
//!
//! Each entry is described by two path-derived values so that it lines up
//! with the two-dimensional bootstrap model:
//! 1. character length of the final path component (0 for a root)
//! 2. depth, the number of normal components below the root

use crate::models::{DirectoryEntry, FeatureVector};
use std::path::{Component, Path};

/// Number of features produced per entry
pub const FEATURE_COUNT: usize = 2;

/// Derives classifier input from a directory entry
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, entry: &DirectoryEntry) -> FeatureVector {
        let path = entry.as_path();
        FeatureVector(vec![name_length(path) as f64, depth(path) as f64])
    }
}

fn name_length(path: &Path) -> usize {
    path.file_name()
        .map(|name| name.to_string_lossy().chars().count())
        .unwrap_or(0)
}

fn depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}
