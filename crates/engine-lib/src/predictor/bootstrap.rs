//! Model initialization: load the persisted artifact, or fall back to
//! bootstrap training.
//!
//! The bootstrap sample is a fixed placeholder, not a training pipeline.
//! It exists so the engine always has *some* usable model; its predictions
//! carry no real signal about the directories being managed.

use super::classifier::PredictiveModel;
use crate::error::ModelError;
use crate::models::Sample;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Where the active model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Read from an existing artifact
    Loaded,
    /// Trained on the bootstrap sample and saved
    Bootstrapped,
}

/// The fixed fallback training set
pub fn bootstrap_samples() -> Vec<Sample> {
    vec![
        Sample::new(vec![1.0, 2.0], 0),
        Sample::new(vec![3.0, 4.0], 1),
        Sample::new(vec![5.0, 6.0], 0),
    ]
}

/// Load the artifact at `path`; if there is none, train on the bootstrap
/// sample and save it there. Every other load failure is returned as-is.
pub fn load_or_bootstrap(model: &mut PredictiveModel, path: &Path) -> Result<ModelSource, ModelError> {
    match model.load(path) {
        Ok(()) => Ok(ModelSource::Loaded),
        Err(ModelError::ArtifactNotFound(_)) => {
            warn!(
                event = "model_bootstrap",
                path = %path.display(),
                "No pre-trained model found, training on bootstrap sample"
            );
            retrain_bootstrap(model, path)?;
            Ok(ModelSource::Bootstrapped)
        }
        Err(e) => Err(e),
    }
}

/// Train on the bootstrap sample and overwrite the artifact at `path`
pub fn retrain_bootstrap(model: &mut PredictiveModel, path: &Path) -> Result<(), ModelError> {
    model.train(&bootstrap_samples())?;
    model.save(path)?;
    info!(path = %path.display(), "Bootstrap model trained and saved");
    Ok(())
}
