// CLI interface for process-hooks using clap
use clap::Parser;
use std::path::PathBuf;

use crate::commands::process::execute_process_command;
use crate::config::ProcessorConfig;
use crate::error::{exit_codes, CliError, HooksError, Result};
use crate::logging::LogFormat;

pub const USAGE: &str =
    "Usage: process-hooks <hooks_dir> <scripts_output_dir> <settings_output_path>";

#[derive(Parser, Debug)]
#[command(
    name = "process-hooks",
    about = "Build hook settings and executable scripts from YAML hook definitions",
    version = crate::VERSION,
    long_version = crate::LONG_VERSION,
    override_usage = "process-hooks [OPTIONS] <hooks_dir> <scripts_output_dir> <settings_output_path>",
    long_about = "Reads every *.yaml hook definition in <hooks_dir>, writes inline scripts to <scripts_output_dir> and prints the aggregated hooks configuration as JSON."
)]
pub struct Cli {
    /// <hooks_dir> <scripts_output_dir> <settings_output_path>
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Merge the generated hooks into this settings document and write the
    /// result to <settings_output_path>
    #[arg(long, value_name = "PATH")]
    pub merge_template: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Control color output (auto, always, never)
    #[arg(long, value_name = "WHEN")]
    pub color: Option<String>,

    /// Diagnostic format (pretty, compact, json)
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    pub log_format: String,
}

impl Cli {
    pub fn run(&self) -> Result<i32> {
        // Arguments are checked before logging or any filesystem work
        let config = self.processor_config()?;
        self.init_logging()?;

        let result = execute_process_command(&config)?;
        if !result.failures.is_empty() {
            tracing::debug!(
                failed = result.failures.len(),
                processed = result.documents_processed,
                "Some hook documents were skipped"
            );
        }
        Ok(exit_codes::SUCCESS)
    }

    /// Resolve the run configuration from the positional arguments
    pub fn processor_config(&self) -> Result<ProcessorConfig> {
        if self.verbose && self.quiet {
            return Err(HooksError::Cli(Box::new(CliError::InvalidArgument {
                argument: "--verbose".to_string(),
                message: "Use either --verbose for more output or --quiet for less output, but not both".to_string(),
            })));
        }

        let [hooks_dir, scripts_dir, settings_output] = self.paths.as_slice() else {
            return Err(HooksError::Cli(Box::new(CliError::WrongArgumentCount {
                expected: 3,
                found: self.paths.len(),
                usage: USAGE.to_string(),
            })));
        };

        Ok(
            ProcessorConfig::new(hooks_dir, scripts_dir, settings_output)
                .with_merge_template(self.merge_template.clone()),
        )
    }

    fn init_logging(&self) -> Result<()> {
        use crate::logging::{init_logging, LogConfig};

        let format: LogFormat = self.log_format.parse()?;
        let log_config = LogConfig::from_cli(self.verbose, self.quiet, self.color.clone())
            .with_format(format);

        if let Err(e) = init_logging(log_config) {
            eprintln!("Failed to initialize logging: {e}");
            // Continue execution even if logging fails
        }
        Ok(())
    }
}
