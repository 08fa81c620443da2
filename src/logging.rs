// Diagnostic logging for process-hooks
//
// stdout is reserved for the generated JSON, so every subscriber writes to stderr.
use std::io::{self, IsTerminal};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{CliError, HooksError, Result};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Color output configuration
    pub color: ColorConfig,
    /// Whether to show targets (module names)
    pub show_targets: bool,
    /// Whether to show timestamps
    pub show_timestamps: bool,
}

/// Log output format options
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Plain lines for terminals and build logs
    Pretty,
    /// JSON output for programmatic use
    Json,
    /// Compact format for structured logging
    Compact,
}

impl FromStr for LogFormat {
    type Err = HooksError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(HooksError::Cli(Box::new(CliError::InvalidArgument {
                argument: "--log-format".to_string(),
                message: format!("unknown log format '{other}', expected pretty, compact or json"),
            }))),
        }
    }
}

/// Color output configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ColorConfig {
    /// Automatically detect if colors should be used
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            color: ColorConfig::Auto,
            show_targets: false,
            show_timestamps: false,
        }
    }
}

impl LogConfig {
    /// Create logging configuration from CLI arguments
    pub fn from_cli(verbose: bool, quiet: bool, color: Option<String>) -> Self {
        let level = if quiet {
            Level::ERROR
        } else if verbose {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let color_config = match color.as_deref() {
            Some("always") => ColorConfig::Always,
            Some("never") => ColorConfig::Never,
            _ => ColorConfig::Auto,
        };

        Self {
            level,
            color: color_config,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Check if colors should be used based on configuration and terminal
    pub fn should_use_colors(&self) -> bool {
        match self.color {
            ColorConfig::Always => true,
            ColorConfig::Never => false,
            ColorConfig::Auto => {
                io::stderr().is_terminal()
                    && std::env::var("TERM").map_or(true, |term| term != "dumb")
                    && std::env::var("NO_COLOR").is_err()
            }
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        format!("process_hooks={}", self.level)
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: LogConfig) -> Result<()> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(config.default_directive()),
    };

    match config.format {
        LogFormat::Pretty => init_pretty_logging(config, env_filter),
        LogFormat::Json => init_json_logging(config, env_filter),
        LogFormat::Compact => init_compact_logging(config, env_filter),
    }
}

fn init_error(error: Box<dyn std::error::Error + Send + Sync>) -> HooksError {
    HooksError::Io(io::Error::new(io::ErrorKind::Other, error.to_string()))
}

fn init_pretty_logging(config: LogConfig, env_filter: EnvFilter) -> Result<()> {
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(config.should_use_colors())
        .with_target(config.show_targets);

    let result = if config.show_timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
    result.map_err(init_error)
}

fn init_json_logging(_config: LogConfig, env_filter: EnvFilter) -> Result<()> {
    fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .json()
        .try_init()
        .map_err(init_error)
}

fn init_compact_logging(config: LogConfig, env_filter: EnvFilter) -> Result<()> {
    fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(config.should_use_colors())
        .compact()
        .with_target(config.show_targets)
        .try_init()
        .map_err(init_error)
}

/// Spans shared by the processing pipeline
pub mod utils {
    use std::path::Path;
    use tracing::{span, Level, Span};

    /// Span covering one hook document
    pub fn hook_document_span(path: &Path) -> Span {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        span!(Level::DEBUG, "hook_document", file = %file)
    }

    /// Span covering a full directory scan
    pub fn aggregation_span(hooks_dir: &Path, scripts_dir: &Path) -> Span {
        span!(
            Level::DEBUG,
            "aggregate",
            hooks_dir = %hooks_dir.display(),
            scripts_dir = %scripts_dir.display()
        )
    }
}
