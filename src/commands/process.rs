// Process command implementation
// Turns a hooks directory into scripts plus the aggregated hooks JSON

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::{generate_hooks_config, DocumentFailure, HooksSettings};
use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::settings::{merge_with_settings, write_settings};

#[derive(Debug)]
pub struct ProcessResult {
    pub hooks_config: HooksSettings,
    pub rendered: String,
    pub debug_config_path: PathBuf,
    pub merged_settings: Option<Value>,
    pub documents_processed: usize,
    pub scripts_created: Vec<PathBuf>,
    pub failures: Vec<DocumentFailure>,
}

/// Run the full pipeline and print the hooks JSON to stdout
pub fn execute_process_command(config: &ProcessorConfig) -> Result<ProcessResult> {
    let result = build_hooks_output(config)?;
    println!("{}", result.rendered);
    Ok(result)
}

/// Everything `execute_process_command` does except writing to stdout
pub fn build_hooks_output(config: &ProcessorConfig) -> Result<ProcessResult> {
    fs::create_dir_all(&config.scripts_dir)?;

    let aggregation = generate_hooks_config(config);
    let rendered = aggregation.settings.to_json_pretty()?;

    let debug_config_path = config.debug_config_path();
    write_settings(&debug_config_path, &rendered)?;
    info!(
        "Hooks configuration saved to: {}",
        debug_config_path.display()
    );

    let merged_settings = match &config.merge_template {
        Some(template) => Some(merge_with_settings(
            &aggregation.settings,
            template,
            &config.settings_output,
        )?),
        None => None,
    };

    Ok(ProcessResult {
        hooks_config: aggregation.settings,
        rendered,
        debug_config_path,
        merged_settings,
        documents_processed: aggregation.documents_processed,
        scripts_created: aggregation.scripts_created,
        failures: aggregation.failures,
    })
}
