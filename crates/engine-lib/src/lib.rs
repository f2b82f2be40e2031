//! Engine library for AI-assisted directory management
//!
//! This crate provides the core functionality for:
//! - A registry of tracked directory entries
//! - File creation and removal inside directories
//! - A small persisted classifier consulted during management runs
//! - Configuration, metrics and structured logging

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod registry;

pub use config::EngineConfig;
pub use engine::{Command, CommandOutcome, Engine, ModelStatus};
pub use error::{EngineError, ModelError, RegistryError};
pub use models::*;
pub use observability::{EngineMetrics, StructuredLogger};
