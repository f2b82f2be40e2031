//! Engine configuration

use crate::predictor::DEFAULT_NEIGHBOURS;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "dirman";

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Where the model artifact is read from and written to
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Persisted registry state; `None` keeps entries in memory only
    #[serde(default = "default_registry_path")]
    pub registry_path: Option<PathBuf>,

    /// Whether `create_file` may replace an existing file
    #[serde(default)]
    pub allow_overwrite: bool,

    /// Neighbours consulted per prediction
    #[serde(default = "default_neighbours")]
    pub neighbours: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            registry_path: default_registry_path(),
            allow_overwrite: false,
            neighbours: default_neighbours(),
        }
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|dir| dir.join(APP_DIR))
}

fn default_model_path() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("model.json"))
        .unwrap_or_else(|| PathBuf::from("model.json"))
}

fn default_registry_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("entries.json"))
}

fn default_neighbours() -> usize {
    DEFAULT_NEIGHBOURS
}

impl EngineConfig {
    /// Default location of the optional config file
    pub fn default_config_file() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration from `path`, or from the default config file when
    /// it exists. Missing keys fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_config_file() {
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder.build().context("Failed to read configuration")?;
        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}
