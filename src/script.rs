// Materializes inline hook scripts as executables
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::config::ProcessorConfig;
use crate::definition::HookDefinition;
use crate::error::{DocumentError, HooksError, Result};

/// Writes `<id>.sh` files into the scripts directory
#[derive(Debug)]
pub struct ScriptWriter {
    scripts_dir: PathBuf,
    interpreter: String,
    mode: u32,
    written: HashSet<String>,
}

impl ScriptWriter {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            scripts_dir: config.scripts_dir.clone(),
            interpreter: config.interpreter.clone(),
            mode: config.script_mode,
            written: HashSet::new(),
        }
    }

    /// Write the hook's script and mark it executable. Returns the script path.
    pub fn write(&mut self, hook: &HookDefinition) -> Result<PathBuf> {
        let script_path = self.scripts_dir.join(hook.script_file_name());

        if let Some(problem) = id_problem(&hook.id) {
            warn!(
                hook_id = %hook.id,
                path = %script_path.display(),
                "Hook id {problem}"
            );
        }

        if !self.written.insert(hook.id.clone()) {
            warn!(
                hook_id = %hook.id,
                path = %script_path.display(),
                "Hook id already produced a script in this run, overwriting it"
            );
        }

        let map_err = |e: std::io::Error| {
            HooksError::Document(Box::new(DocumentError::ScriptWriteFailed {
                hook_id: hook.id.clone(),
                path: script_path.clone(),
                error: e.to_string(),
            }))
        };

        fs::write(&script_path, render_script(&hook.script, &self.interpreter))
            .map_err(map_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = fs::metadata(&script_path).map_err(map_err)?.permissions();
            permissions.set_mode(self.mode);
            fs::set_permissions(&script_path, permissions).map_err(map_err)?;
        }

        debug!(path = %script_path.display(), mode = %format!("{:o}", self.mode), "Wrote script");
        Ok(script_path)
    }
}

/// Why an id makes a poor script file name, if it does
fn id_problem(id: &str) -> Option<&'static str> {
    if id.is_empty() {
        return Some("is empty, script file name is hidden");
    }
    let escapes = Path::new(id)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes || id.contains('/') || id.contains('\\') {
        return Some("is a path, script is written outside the scripts directory");
    }
    None
}

/// Script text as written to disk: the interpreter line is added unless the
/// script already starts with `#!`. No trailing newline is appended.
pub fn render_script(script: &str, interpreter: &str) -> String {
    if script.starts_with("#!") {
        script.to_string()
    } else {
        format!("{interpreter}\n{script}")
    }
}
