//! Engine context and typed command interface
//!
//! One `Engine` is built at startup and owns the model, the registry and the
//! metrics. The front end only marshals user input into a `Command` and
//! renders the `CommandOutcome`.

use crate::config::EngineConfig;
use crate::error::{EngineError, RegistryError};
use crate::models::RunOutcome;
use crate::observability::{EngineMetrics, StructuredLogger};
use crate::predictor::{load_or_bootstrap, retrain_bootstrap, ModelSource, PredictiveModel};
use crate::registry::{self, Registry, RegistryStore};
use serde::Serialize;
use std::path::PathBuf;

const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A user action with validated string input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddEntry { path: String },
    RemoveEntry { path: String },
    UpdateEntry { old_path: String, new_path: String },
    ListEntries,
    Run,
    CreateFile {
        directory: String,
        file_name: String,
        content: Option<String>,
    },
    RemoveFile { path: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddEntry { .. } => "add_entry",
            Command::RemoveEntry { .. } => "remove_entry",
            Command::UpdateEntry { .. } => "update_entry",
            Command::ListEntries => "list_entries",
            Command::Run => "run",
            Command::CreateFile { .. } => "create_file",
            Command::RemoveFile { .. } => "remove_file",
        }
    }

    fn mutates_entries(&self) -> bool {
        matches!(
            self,
            Command::AddEntry { .. } | Command::RemoveEntry { .. } | Command::UpdateEntry { .. }
        )
    }
}

/// Result data of a successful command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    EntryAdded { path: String, newly_tracked: bool },
    EntryRemoved { path: String },
    EntryUpdated { old_path: String, new_path: String },
    Entries { entries: Vec<String> },
    Run { outcomes: Vec<RunOutcome> },
    FileCreated { path: PathBuf },
    FileRemoved { path: String },
}

/// Snapshot of model state for display
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub trained: bool,
    pub artifact_path: PathBuf,
    pub feature_dimensionality: Option<usize>,
    pub neighbours: usize,
    pub samples: usize,
    pub trained_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Application context: configuration, model, registry and metrics
pub struct Engine {
    config: EngineConfig,
    model: PredictiveModel,
    registry: Registry,
    store: Option<RegistryStore>,
    metrics: EngineMetrics,
    logger: StructuredLogger,
}

impl Engine {
    /// Build the engine, restoring persisted entries when a registry path is
    /// configured. The model starts untrained; call `initialize_model`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let store = config.registry_path.clone().map(RegistryStore::new);
        let registry = match &store {
            Some(store) => Registry::from_persisted(store.load()?),
            None => Registry::new(),
        };

        let instance = store
            .as_ref()
            .map(|s| s.path().display().to_string())
            .unwrap_or_else(|| "in-memory".to_string());
        let logger = StructuredLogger::new(instance);

        let metrics = EngineMetrics::new()?;
        metrics.set_entries_tracked(registry.len());
        logger.log_startup(ENGINE_VERSION, registry.len());

        Ok(Self {
            model: PredictiveModel::with_neighbours(config.neighbours),
            config,
            registry,
            store,
            metrics,
            logger,
        })
    }

    /// Load the model artifact, or train on the bootstrap sample and save it
    pub fn initialize_model(&mut self) -> Result<ModelSource, EngineError> {
        let source = load_or_bootstrap(&mut self.model, &self.config.model_path)?;
        self.logger.log_model_ready(
            source,
            &self.config.model_path.display().to_string(),
            self.model.sample_count(),
        );
        Ok(source)
    }

    /// Discard the current model and retrain on the bootstrap sample
    pub fn retrain_model(&mut self) -> Result<(), EngineError> {
        let mut model = PredictiveModel::with_neighbours(self.config.neighbours);
        retrain_bootstrap(&mut model, &self.config.model_path)?;
        self.model = model;
        self.logger.log_model_ready(
            ModelSource::Bootstrapped,
            &self.config.model_path.display().to_string(),
            self.model.sample_count(),
        );
        Ok(())
    }

    pub fn model(&self) -> &PredictiveModel {
        &self.model
    }

    pub fn model_status(&self) -> ModelStatus {
        ModelStatus {
            trained: self.model.is_trained(),
            artifact_path: self.config.model_path.clone(),
            feature_dimensionality: self.model.feature_dimensionality(),
            neighbours: self.model.neighbours(),
            samples: self.model.sample_count(),
            trained_at: self.model.trained_at(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute one command. Entry mutations are persisted before returning
    /// when a registry store is configured.
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, EngineError> {
        let name = command.name();
        let persist = command.mutates_entries();

        let result = self.apply(command).and_then(|outcome| {
            if persist {
                self.persist()?;
            }
            Ok(outcome)
        });

        self.logger.log_command(name, result.is_ok());
        result
    }

    fn apply(&mut self, command: Command) -> Result<CommandOutcome, EngineError> {
        match command {
            Command::AddEntry { path } => {
                let newly_tracked = self.registry.add_entry(&path)?;
                Ok(CommandOutcome::EntryAdded {
                    path: registry::normalize_path(&path)?,
                    newly_tracked,
                })
            }
            Command::RemoveEntry { path } => {
                let removed = self.registry.remove_entry(&path)?;
                Ok(CommandOutcome::EntryRemoved {
                    path: removed.path().to_string(),
                })
            }
            Command::UpdateEntry { old_path, new_path } => {
                self.registry.update_entry(&old_path, &new_path)?;
                Ok(CommandOutcome::EntryUpdated {
                    old_path: registry::normalize_path(&old_path)?,
                    new_path: registry::normalize_path(&new_path)?,
                })
            }
            Command::ListEntries => Ok(CommandOutcome::Entries {
                entries: self.registry.list_entries(),
            }),
            Command::Run => {
                let outcomes = self
                    .registry
                    .run(&self.metrics.timed(&self.model), &self.logger)
                    .map_err(unwrap_model_error)?;
                self.metrics.record_run(&outcomes);
                Ok(CommandOutcome::Run { outcomes })
            }
            Command::CreateFile {
                directory,
                file_name,
                content,
            } => {
                let path = registry::create_file(
                    &directory,
                    &file_name,
                    content.as_deref(),
                    self.config.allow_overwrite,
                )?;
                self.metrics.inc_file_operation("create");
                Ok(CommandOutcome::FileCreated { path })
            }
            Command::RemoveFile { path } => {
                registry::remove_file(&path)?;
                self.metrics.inc_file_operation("remove");
                Ok(CommandOutcome::FileRemoved { path })
            }
        }
    }

    /// Write the entry list to the registry store, if one is configured
    pub fn persist(&self) -> Result<(), EngineError> {
        self.metrics.set_entries_tracked(self.registry.len());
        if let Some(store) = &self.store {
            store.save(&self.registry.list_entries())?;
        }
        Ok(())
    }
}

/// Model failures surfaced during a run keep their model identity
fn unwrap_model_error(err: RegistryError) -> EngineError {
    match err {
        RegistryError::Model(e) => EngineError::Model(e),
        other => EngineError::Registry(other),
    }
}
