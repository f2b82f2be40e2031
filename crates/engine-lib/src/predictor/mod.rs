//! Predictive model wrapper
//!
//! A small supervised classifier with a train/predict/persist cycle. The
//! registry only sees the `Predictor` trait, never the model family.

mod artifact;
mod bootstrap;
mod classifier;
mod features;

pub use artifact::{compute_checksum, ARTIFACT_FORMAT_VERSION};
pub use bootstrap::{bootstrap_samples, load_or_bootstrap, retrain_bootstrap, ModelSource};
pub use classifier::{PredictiveModel, DEFAULT_NEIGHBOURS};
pub use features::{FeatureExtractor, FEATURE_COUNT};

use crate::error::ModelError;
use crate::models::{FeatureVector, Label};

/// Trait for classifiers the registry can consult during a run
pub trait Predictor {
    /// Predict a discrete label for a feature vector
    fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError>;

    /// Input width fixed at training time, `None` while untrained
    fn feature_dimensionality(&self) -> Option<usize>;
}
