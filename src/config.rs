// Run configuration for process-hooks
use std::path::{Path, PathBuf};

/// File written next to the scripts directory for inspecting the generated hooks
pub const DEBUG_CONFIG_FILE: &str = "claude-hooks-config.json";

/// Extension of hook definition documents
pub const DEFAULT_EXTENSION: &str = "yaml";

/// Interpreter line prepended to scripts that don't carry their own
pub const DEFAULT_INTERPRETER: &str = "#!/bin/bash";

/// rwxr-xr-x
pub const DEFAULT_SCRIPT_MODE: u32 = 0o755;

/// Resolved configuration for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    pub hooks_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub settings_output: PathBuf,
    /// When set, the aggregated hooks are merged into this settings document
    /// and written to `settings_output`.
    pub merge_template: Option<PathBuf>,
    pub extension: String,
    pub interpreter: String,
    pub script_mode: u32,
}

impl ProcessorConfig {
    pub fn new(
        hooks_dir: impl Into<PathBuf>,
        scripts_dir: impl Into<PathBuf>,
        settings_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            hooks_dir: hooks_dir.into(),
            scripts_dir: scripts_dir.into(),
            settings_output: settings_output.into(),
            merge_template: None,
            extension: DEFAULT_EXTENSION.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script_mode: DEFAULT_SCRIPT_MODE,
        }
    }

    pub fn with_merge_template(mut self, template: Option<PathBuf>) -> Self {
        self.merge_template = template;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Location of the debug copy of the aggregated hooks: the parent of the
    /// scripts directory.
    pub fn debug_config_path(&self) -> PathBuf {
        let parent = self
            .scripts_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        parent.join(DEBUG_CONFIG_FILE)
    }

    /// Whether `path` looks like a hook definition document
    pub fn is_hook_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}
