//! Subcommand handlers

pub mod entries;
pub mod files;
pub mod model;
