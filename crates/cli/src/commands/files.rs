//! File-related CLI commands

use anyhow::Result;
use engine_lib::{Command, CommandOutcome, Engine};

use crate::output::{print_json, print_success, OutputFormat};

pub fn create_file(
    engine: &mut Engine,
    directory: String,
    file_name: String,
    content: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let outcome = engine.execute(Command::CreateFile {
        directory,
        file_name,
        content,
    })?;
    match (&outcome, format) {
        (_, OutputFormat::Json) => print_json(&outcome)?,
        (CommandOutcome::FileCreated { path }, _) => {
            print_success(&format!("File '{}' created successfully.", path.display()))
        }
        _ => {}
    }
    Ok(())
}

pub fn remove_file(engine: &mut Engine, path: String, format: OutputFormat) -> Result<()> {
    let outcome = engine.execute(Command::RemoveFile { path })?;
    match (&outcome, format) {
        (_, OutputFormat::Json) => print_json(&outcome)?,
        (CommandOutcome::FileRemoved { path }, _) => {
            print_success(&format!("File '{}' removed successfully.", path))
        }
        _ => {}
    }
    Ok(())
}
