// Error handling framework for process-hooks
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HooksError>;

/// Main error type for process-hooks
#[derive(Debug, Error)]
pub enum HooksError {
    #[error("CLI argument error: {0}")]
    Cli(#[from] Box<CliError>),

    #[error("Hook document error: {0}")]
    Document(#[from] Box<DocumentError>),

    #[error("Settings error: {0}")]
    Settings(#[from] Box<SettingsError>),

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Command-line errors. These abort the run before any file is touched.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Expected {expected} arguments, found {found}")]
    WrongArgumentCount {
        expected: usize,
        found: usize,
        usage: String,
    },

    #[error("Invalid argument: {argument}")]
    InvalidArgument { argument: String, message: String },
}

/// Errors scoped to a single hook document. The aggregator logs these and
/// moves on to the next document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {path}: {error}")]
    Unreadable { path: PathBuf, error: String },

    #[error("cannot write script for hook '{hook_id}' to {path}: {error}")]
    ScriptWriteFailed {
        hook_id: String,
        path: PathBuf,
        error: String,
    },
}

/// Errors while reading, merging or writing settings documents
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson {
        path: PathBuf,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Failed to write {path}: {error}")]
    WriteFailed { path: PathBuf, error: String },

    #[error("Failed to serialize settings: {message}")]
    Serialize { message: String },
}

/// Format errors with colors and context
pub struct ErrorFormatter {
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format an error with context and colors
    pub fn format_error(&self, error: &HooksError) -> String {
        let mut output = String::new();

        if self.use_colors {
            output.push_str("\x1b[31m");
        }
        output.push_str("Error: ");
        if self.use_colors {
            output.push_str("\x1b[0m");
        }

        output.push_str(&error.to_string());

        match error {
            HooksError::Cli(cli_err) => self.add_cli_context(&mut output, cli_err.as_ref()),
            HooksError::Settings(settings_err) => {
                self.add_settings_context(&mut output, settings_err.as_ref())
            }
            _ => {}
        }

        output
    }

    fn add_cli_context(&self, output: &mut String, error: &CliError) {
        match error {
            CliError::WrongArgumentCount { usage, .. } => {
                output.push('\n');
                output.push_str(usage);
            }
            CliError::InvalidArgument { message, .. } => {
                output.push_str(&format!("\n  {message}"));
            }
        }
    }

    fn add_settings_context(&self, output: &mut String, error: &SettingsError) {
        if let SettingsError::InvalidJson {
            path, line, column, ..
        } = error
        {
            output.push_str(&format!("\n  --> {}:{}:{}", path.display(), line, column));
        }
    }
}

/// Exit codes of the process-hooks binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CLI_ERROR: i32 = 1;
}

impl HooksError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HooksError::Cli(_) => exit_codes::CLI_ERROR,
            HooksError::Document(_) | HooksError::Settings(_) | HooksError::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }

    /// Create a user-friendly error message with context
    pub fn user_message(&self, use_colors: bool) -> String {
        ErrorFormatter::new(use_colors).format_error(self)
    }
}

// Conversion from serde_json::Error for documents without a known path
impl From<serde_json::Error> for Box<SettingsError> {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            return Box::new(SettingsError::Serialize {
                message: error.to_string(),
            });
        }
        Box::new(SettingsError::InvalidJson {
            path: PathBuf::new(),
            message: error.to_string(),
            line: error.line(),
            column: error.column(),
        })
    }
}

impl From<serde_json::Error> for HooksError {
    fn from(error: serde_json::Error) -> Self {
        HooksError::Settings(Box::<SettingsError>::from(error))
    }
}
