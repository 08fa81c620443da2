// Aggregation of hook documents into the event-keyed hooks configuration
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::config::ProcessorConfig;
use crate::definition::HookDefinition;
use crate::error::Result;
use crate::logging::utils::{aggregation_span, hook_document_span};
use crate::script::ScriptWriter;

/// Kind of a configured hook. The host only runs shell commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub kind: HookKind,
    pub command: String,
}

impl HookCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            kind: HookKind::Command,
            command: command.into(),
        }
    }
}

/// Hooks sharing one matcher within an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherGroup {
    pub matcher: String,
    pub hooks: Vec<HookCommand>,
}

/// Event name to matcher groups, in first-seen order
pub type AggregatedConfig = IndexMap<String, Vec<MatcherGroup>>;

/// The `{"hooks": {...}}` document handed to the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HooksSettings {
    pub hooks: AggregatedConfig,
}

impl HooksSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` under each of its events. Hooks with the same event
    /// and matcher end up in one group, in call order.
    pub fn add_hook(&mut self, hook: &HookDefinition) {
        for event in &hook.events {
            self.add_command(event, &hook.matcher, HookCommand::new(&hook.command));
            info!("Added to event: {event}");
        }
    }

    pub fn add_command(&mut self, event: &str, matcher: &str, command: HookCommand) {
        let groups = self.hooks.entry(event.to_string()).or_default();
        match groups.iter_mut().find(|group| group.matcher == matcher) {
            Some(group) => group.hooks.push(command),
            None => groups.push(MatcherGroup {
                matcher: matcher.to_string(),
                hooks: vec![command],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Pretty JSON with 2-space indentation, no trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A document that was skipped
#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a directory scan
#[derive(Debug)]
pub struct AggregationResult {
    pub settings: HooksSettings,
    pub documents_processed: usize,
    pub scripts_created: Vec<PathBuf>,
    pub failures: Vec<DocumentFailure>,
}

/// Hook documents directly inside the hooks directory, sorted by file name.
/// An unreadable directory yields no documents.
pub fn discover_documents(config: &ProcessorConfig) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    if !config.hooks_dir.is_dir() {
        warn!(
            "Hooks directory not found: {}",
            config.hooks_dir.display()
        );
        return documents;
    }

    for entry in WalkDir::new(&config.hooks_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() && config.is_hook_document(entry.path()) => {
                documents.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => warn!(
                hooks_dir = %config.hooks_dir.display(),
                error = %e,
                "Cannot list hooks directory entry"
            ),
        }
    }

    documents
}

/// Scan the hooks directory, writing scripts and collecting the hooks
/// configuration. A failing document is logged and skipped.
pub fn generate_hooks_config(config: &ProcessorConfig) -> AggregationResult {
    let _span = aggregation_span(&config.hooks_dir, &config.scripts_dir).entered();

    let mut writer = ScriptWriter::new(config);
    let mut result = AggregationResult {
        settings: HooksSettings::new(),
        documents_processed: 0,
        scripts_created: Vec::new(),
        failures: Vec::new(),
    };

    for path in discover_documents(config) {
        let _doc_span = hook_document_span(&path).entered();
        info!("Processing hook: {}", display_name(&path));

        match process_document(&path, &mut writer, &mut result.settings) {
            Ok(script) => {
                result.documents_processed += 1;
                result.scripts_created.extend(script);
            }
            Err(e) => {
                error!("Error processing {}: {}", path.display(), e);
                result.failures.push(DocumentFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    result
}

fn process_document(
    path: &Path,
    writer: &mut ScriptWriter,
    settings: &mut HooksSettings,
) -> Result<Option<PathBuf>> {
    let hook = HookDefinition::from_file(path)?;

    let script = if hook.has_script() {
        let script_path = writer.write(&hook)?;
        info!("Created script: {}", hook.script_file_name());
        Some(script_path)
    } else {
        None
    };

    settings.add_hook(&hook);
    Ok(script)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
