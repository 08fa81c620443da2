// process-hooks - Library module
// Hook definition documents in, hooks settings JSON and executable scripts out

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod definition;
pub mod error;
pub mod logging;
pub mod script;
pub mod settings;

// Re-export main types for easier access
pub use aggregate::{
    discover_documents, generate_hooks_config, AggregatedConfig, AggregationResult,
    DocumentFailure, HookCommand, HookKind, HooksSettings, MatcherGroup,
};
pub use config::ProcessorConfig;
pub use definition::{extract_by_patterns, parse_hook_document, HookDefinition};
pub use error::{exit_codes, CliError, DocumentError, HooksError, Result, SettingsError};
pub use logging::{ColorConfig, LogConfig, LogFormat};
pub use script::{render_script, ScriptWriter};
pub use settings::{merge_settings, merge_with_settings};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// Build information (set by build script)
pub const BUILD_DATE: &str = env!("BUILD_DATE");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const GIT_BRANCH: &str = env!("GIT_BRANCH");
pub const RUST_VERSION: &str = env!("RUST_VERSION");

/// Version string shown by `--version` in long form
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit: ",
    env!("GIT_COMMIT"),
    ", branch: ",
    env!("GIT_BRANCH"),
    ", built: ",
    env!("BUILD_DATE"),
    ", rustc: ",
    env!("RUST_VERSION"),
    ")"
);
