//! k-nearest-neighbour classifier
//!
//! Training memorises the samples; prediction ranks them by Euclidean
//! distance and takes a majority vote over the `k` closest. Ties go to the
//! label whose nearest member ranked first, so results are deterministic
//! for a given sample set.

use super::artifact;
use super::Predictor;
use crate::error::ModelError;
use crate::models::{FeatureVector, Label, Sample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Neighbours consulted per prediction unless configured otherwise
pub const DEFAULT_NEIGHBOURS: usize = 1;

/// Fitted classifier state, the payload of a persisted artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TrainedState {
    pub neighbours: usize,
    pub dimensionality: usize,
    pub samples: Vec<Sample>,
}

impl TrainedState {
    fn fit(samples: &[Sample], neighbours: usize) -> Result<Self, String> {
        let dimensionality = samples
            .first()
            .map(|s| s.features.len())
            .ok_or_else(|| "no training samples".to_string())?;

        let state = Self {
            neighbours,
            dimensionality,
            samples: samples.to_vec(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Check internal consistency; shared by training and artifact loading
    pub fn validate(&self) -> Result<(), String> {
        if self.neighbours == 0 {
            return Err("neighbour count must be at least 1".to_string());
        }
        if self.samples.is_empty() {
            return Err("no training samples".to_string());
        }
        if self.dimensionality == 0 {
            return Err("feature vectors must not be empty".to_string());
        }
        for (i, sample) in self.samples.iter().enumerate() {
            if sample.features.len() != self.dimensionality {
                return Err(format!(
                    "sample {} has {} features, expected {}",
                    i,
                    sample.features.len(),
                    self.dimensionality
                ));
            }
            if sample.features.values().iter().any(|v| !v.is_finite()) {
                return Err(format!("sample {} contains a non-finite value", i));
            }
        }
        Ok(())
    }

    fn classify(&self, features: &FeatureVector) -> Option<Label> {
        let mut ranked: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| (squared_distance(s.features.values(), features.values()), i))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let k = self.neighbours.min(ranked.len());

        // (label, votes, rank of nearest member)
        let mut votes: Vec<(Label, usize, usize)> = Vec::new();
        for (rank, (_, idx)) in ranked.iter().take(k).enumerate() {
            let label = self.samples[*idx].label;
            match votes.iter_mut().find(|v| v.0 == label) {
                Some(v) => v.1 += 1,
                None => votes.push((label, 1, rank)),
            }
        }

        votes
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)))
            .map(|(label, _, _)| label)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Classifier wrapper with train/predict/save/load
#[derive(Debug, Clone)]
pub struct PredictiveModel {
    neighbours: usize,
    state: Option<TrainedState>,
    trained_at: Option<DateTime<Utc>>,
}

impl Default for PredictiveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictiveModel {
    /// Create an untrained model
    pub fn new() -> Self {
        Self::with_neighbours(DEFAULT_NEIGHBOURS)
    }

    pub fn with_neighbours(neighbours: usize) -> Self {
        Self {
            neighbours,
            state: None,
            trained_at: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    pub fn feature_dimensionality(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.dimensionality)
    }

    pub fn neighbours(&self) -> usize {
        self.state
            .as_ref()
            .map(|s| s.neighbours)
            .unwrap_or(self.neighbours)
    }

    pub fn sample_count(&self) -> usize {
        self.state.as_ref().map(|s| s.samples.len()).unwrap_or(0)
    }

    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }

    /// Fit the classifier. On failure the previous state is kept.
    pub fn train(&mut self, samples: &[Sample]) -> Result<(), ModelError> {
        let state = TrainedState::fit(samples, self.neighbours).map_err(ModelError::Training)?;

        info!(
            event = "model_trained",
            samples = state.samples.len(),
            dimensionality = state.dimensionality,
            neighbours = state.neighbours,
            "Classifier trained"
        );

        self.state = Some(state);
        self.trained_at = Some(Utc::now());
        Ok(())
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        let state = self.state.as_ref().ok_or(ModelError::NotTrained)?;

        if features.len() != state.dimensionality {
            return Err(ModelError::DimensionMismatch {
                expected: state.dimensionality,
                actual: features.len(),
            });
        }
        if features.values().iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidFeature(format!(
                "non-finite value in {:?}",
                features.values()
            )));
        }

        let label = state.classify(features).ok_or(ModelError::NotTrained)?;
        debug!(features = ?features.values(), label = label, "Prediction made");
        Ok(label)
    }

    /// Serialize the trained model to `path`, replacing any existing artifact
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let (state, trained_at) = match (&self.state, self.trained_at) {
            (Some(state), Some(trained_at)) => (state, trained_at),
            _ => {
                return Err(ModelError::Persistence(
                    "cannot save an untrained model".to_string(),
                ))
            }
        };

        artifact::write_artifact(path, state, trained_at)?;
        info!(event = "model_saved", path = %path.display(), "Model artifact written");
        Ok(())
    }

    /// Replace internal state with the artifact at `path`
    pub fn load(&mut self, path: &Path) -> Result<(), ModelError> {
        let (state, trained_at) = artifact::read_artifact(path)?;

        info!(
            event = "model_loaded",
            path = %path.display(),
            samples = state.samples.len(),
            dimensionality = state.dimensionality,
            "Model artifact loaded"
        );

        self.neighbours = state.neighbours;
        self.state = Some(state);
        self.trained_at = Some(trained_at);
        Ok(())
    }
}

impl Predictor for PredictiveModel {
    fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        PredictiveModel::predict(self, features)
    }

    fn feature_dimensionality(&self) -> Option<usize> {
        PredictiveModel::feature_dimensionality(self)
    }
}
