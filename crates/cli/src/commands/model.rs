//! Model inspection and maintenance commands

use anyhow::Result;
use colored::Colorize;
use engine_lib::predictor::ModelSource;
use engine_lib::Engine;

use crate::output::{format_timestamp, print_json, print_success, print_warning, OutputFormat};

/// Show the state of the model after initialization
pub fn show_status(engine: &Engine, source: ModelSource, format: OutputFormat) -> Result<()> {
    let status = engine.model_status();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "source": source,
            "status": status,
        }))?,
        OutputFormat::Table => {
            println!("{}", "Model Status".bold());
            println!("{}", "=".repeat(50));
            println!("Artifact:        {}", status.artifact_path.display().to_string().cyan());
            println!(
                "Source:          {}",
                match source {
                    ModelSource::Loaded => "artifact".green().to_string(),
                    ModelSource::Bootstrapped => "bootstrap sample".yellow().to_string(),
                }
            );
            println!("Trained:         {}", status.trained);
            println!(
                "Dimensionality:  {}",
                status
                    .feature_dimensionality
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("Neighbours:      {}", status.neighbours);
            println!("Samples:         {}", status.samples);
            println!("Trained At:      {}", format_timestamp(status.trained_at));

            if source == ModelSource::Bootstrapped {
                println!();
                print_warning("The bootstrap model is a placeholder and carries no real signal.");
            }
        }
    }
    Ok(())
}

/// Retrain on the bootstrap sample, overwriting the artifact
pub fn retrain(engine: &mut Engine, format: OutputFormat) -> Result<()> {
    engine.retrain_model()?;
    match format {
        OutputFormat::Json => print_json(&engine.model_status())?,
        OutputFormat::Table => print_success(&format!(
            "AI model trained and saved to '{}'.",
            engine.config().model_path.display()
        )),
    }
    Ok(())
}
