//! On-disk model artifact
//!
//! The artifact is a JSON envelope around the serialized classifier state.
//! The state is embedded as a string so its SHA-256 checksum covers the
//! exact bytes that were written.

use super::classifier::TrainedState;
use crate::error::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Artifact layout version written by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    checksum: String,
    trained_at: DateTime<Utc>,
    payload: String,
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

pub(crate) fn write_artifact(
    path: &Path,
    state: &TrainedState,
    trained_at: DateTime<Utc>,
) -> Result<(), ModelError> {
    let payload = serde_json::to_string(state)
        .map_err(|e| ModelError::Persistence(format!("failed to serialize model: {}", e)))?;
    let artifact = ModelArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        checksum: compute_checksum(payload.as_bytes()),
        trained_at,
        payload,
    };
    let bytes = serde_json::to_vec_pretty(&artifact)
        .map_err(|e| ModelError::Persistence(format!("failed to serialize artifact: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ModelError::Persistence(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }

    // Write to temp file first
    let temp_path = path.with_extension("tmp");
    let persist = || -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    };

    persist().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ModelError::Persistence(format!("failed to write {}: {}", path.display(), e))
    })
}

pub(crate) fn read_artifact(path: &Path) -> Result<(TrainedState, DateTime<Utc>), ModelError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ModelError::ArtifactNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ModelError::Persistence(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let corrupt = |reason: String| ModelError::CorruptArtifact {
        path: path.to_path_buf(),
        reason,
    };

    let artifact: ModelArtifact =
        serde_json::from_str(&raw).map_err(|e| corrupt(format!("unreadable envelope: {}", e)))?;

    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {}",
            artifact.format_version
        )));
    }

    let computed = compute_checksum(artifact.payload.as_bytes());
    if computed != artifact.checksum {
        return Err(corrupt(format!(
            "checksum mismatch: expected {}, got {}",
            artifact.checksum, computed
        )));
    }

    let state: TrainedState = serde_json::from_str(&artifact.payload)
        .map_err(|e| corrupt(format!("unreadable model payload: {}", e)))?;
    state.validate().map_err(corrupt)?;

    Ok((state, artifact.trained_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use tempfile::TempDir;

    fn state() -> TrainedState {
        TrainedState {
            neighbours: 1,
            dimensionality: 2,
            samples: vec![Sample::new(vec![1.0, 2.0], 0), Sample::new(vec![3.0, 4.0], 1)],
        }
    }

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"test model weights");
        assert_eq!(checksum.len(), 64); // SHA256 hex is 64 chars
        assert_eq!(checksum, compute_checksum(b"test model weights"));
    }

    #[test]
    fn test_write_creates_parent_and_no_temp_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("model.json");

        write_artifact(&path, &state(), Utc::now()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        let (loaded, _) = read_artifact(&path).unwrap();
        assert_eq!(loaded, state());
    }

    #[test]
    fn test_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        fs::write(&path, "old contents").unwrap();

        write_artifact(&path, &state(), Utc::now()).unwrap();
        assert!(read_artifact(&path).is_ok());
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        fs::write(&path, "not json at all").unwrap();

        assert!(matches!(
            read_artifact(&path),
            Err(ModelError::CorruptArtifact { .. })
        ));
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        write_artifact(&path, &state(), Utc::now()).unwrap();

        let mut artifact: ModelArtifact =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        artifact.payload = artifact.payload.replace("\"label\":1", "\"label\":7");
        fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

        match read_artifact(&path) {
            Err(ModelError::CorruptArtifact { reason, .. }) => {
                assert!(reason.contains("checksum"), "reason was {}", reason)
            }
            other => panic!("expected corrupt artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_version_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        write_artifact(&path, &state(), Utc::now()).unwrap();

        let mut artifact: ModelArtifact =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        artifact.format_version = 99;
        fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

        assert!(matches!(
            read_artifact(&path),
            Err(ModelError::CorruptArtifact { .. })
        ));
    }

    #[test]
    fn test_inconsistent_payload_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        let mut bad = state();
        bad.dimensionality = 3;
        write_artifact(&path, &bad, Utc::now()).unwrap();

        assert!(matches!(
            read_artifact(&path),
            Err(ModelError::CorruptArtifact { .. })
        ));
    }
}
