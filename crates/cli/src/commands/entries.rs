//! Entry-related CLI commands

use anyhow::Result;
use colored::Colorize;
use engine_lib::{Command, CommandOutcome, Engine, RunOutcome};
use tabled::Tabled;

use crate::output::{
    color_action, format_features, print_info, print_json, print_success, print_table,
    OutputFormat,
};

/// Row for the entries table
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Path")]
    path: String,
}

/// Row for the run report
#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Features")]
    features: String,
    #[tabled(rename = "Label")]
    label: u32,
    #[tabled(rename = "Action")]
    action: String,
}

pub fn add_entry(engine: &mut Engine, path: String, format: OutputFormat) -> Result<()> {
    let outcome = engine.execute(Command::AddEntry { path })?;
    match (&outcome, format) {
        (_, OutputFormat::Json) => print_json(&outcome)?,
        (CommandOutcome::EntryAdded { path, newly_tracked: true }, _) => {
            print_success(&format!("Entry '{}' added successfully.", path))
        }
        (CommandOutcome::EntryAdded { path, .. }, _) => {
            print_info(&format!("Entry '{}' is already tracked.", path))
        }
        _ => {}
    }
    Ok(())
}

pub fn remove_entry(engine: &mut Engine, path: String, format: OutputFormat) -> Result<()> {
    let outcome = engine.execute(Command::RemoveEntry { path })?;
    match (&outcome, format) {
        (_, OutputFormat::Json) => print_json(&outcome)?,
        (CommandOutcome::EntryRemoved { path }, _) => {
            print_success(&format!("Entry '{}' removed successfully.", path))
        }
        _ => {}
    }
    Ok(())
}

pub fn update_entry(
    engine: &mut Engine,
    old_path: String,
    new_path: String,
    format: OutputFormat,
) -> Result<()> {
    let outcome = engine.execute(Command::UpdateEntry { old_path, new_path })?;
    match (&outcome, format) {
        (_, OutputFormat::Json) => print_json(&outcome)?,
        (CommandOutcome::EntryUpdated { old_path, new_path }, _) => {
            print_success(&format!("Entry '{}' updated to '{}'.", old_path, new_path))
        }
        _ => {}
    }
    Ok(())
}

pub fn list_entries(engine: &mut Engine, format: OutputFormat) -> Result<()> {
    let outcome = engine.execute(Command::ListEntries)?;
    let CommandOutcome::Entries { entries } = &outcome else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Table => {
            let rows: Vec<EntryRow> = entries
                .iter()
                .enumerate()
                .map(|(i, path)| EntryRow {
                    index: i + 1,
                    path: path.clone(),
                })
                .collect();
            print_table(rows, "No entries found.");
        }
    }
    Ok(())
}

/// Run directory management over every tracked entry
pub fn run(engine: &mut Engine, show_metrics: bool, format: OutputFormat) -> Result<()> {
    let outcome = engine.execute(Command::Run)?;
    let CommandOutcome::Run { outcomes } = &outcome else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Table => {
            println!("{}", "Directory Management Run".bold());
            println!("{}", "=".repeat(60));
            print_table(run_rows(outcomes), "No entries to manage.");
            print_success(&format!(
                "Directory management completed for {} entries.",
                outcomes.len()
            ));
        }
    }

    if show_metrics {
        println!();
        print!("{}", engine.metrics().render());
    }
    Ok(())
}

fn run_rows(outcomes: &[RunOutcome]) -> Vec<RunRow> {
    outcomes
        .iter()
        .map(|o| RunRow {
            entry: o.entry.clone(),
            features: format_features(o.features.values()),
            label: o.label,
            action: color_action(o.action),
        })
        .collect()
}
