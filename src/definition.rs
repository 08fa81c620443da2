// Hook definition documents
//
// The line-pattern extractor owns every field it recognises: quoted values
// are taken verbatim and script lines lose exactly two spaces. The YAML
// decoder only fills fields the patterns left empty, so documents written
// in another valid layout (flow lists, unquoted matchers) still work.
// Neither path fails: missing sections come back as empty strings or lists.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{DocumentError, HooksError, Result};

static EVENT_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+-\s+(.+)$").unwrap());
static CONFIG_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+\S").unwrap());
static MATCHER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s+matcher:\s*"([^"]*)""#).unwrap());
static COMMAND_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s+command:\s*"([^"]+)""#).unwrap());
static SCRIPT_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^script:\s*\|\s*$").unwrap());

/// One hook as extracted from its definition document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub events: Vec<String>,
    pub matcher: String,
    pub command: String,
    /// Inline script body, empty when the document has none
    pub script: String,
}

impl HookDefinition {
    /// Read and extract a hook definition document
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HooksError::Document(Box::new(DocumentError::Unreadable {
                path: path.to_path_buf(),
                error: e.to_string(),
            }))
        })?;
        Ok(parse_hook_document(&content))
    }

    pub fn has_script(&self) -> bool {
        !self.script.is_empty()
    }

    /// File name of the generated script, `<id>.sh`
    pub fn script_file_name(&self) -> String {
        format!("{}.sh", self.id)
    }

    /// Take each field from `other` where this definition has none
    fn fill_missing(mut self, other: HookDefinition) -> Self {
        fn fill(field: &mut String, other: String) {
            if field.is_empty() {
                *field = other;
            }
        }

        fill(&mut self.id, other.id);
        fill(&mut self.name, other.name);
        fill(&mut self.description, other.description);
        fill(&mut self.matcher, other.matcher);
        fill(&mut self.command, other.command);
        fill(&mut self.script, other.script);
        if self.events.is_empty() {
            self.events = other.events;
        }
        self
    }
}

/// The recognised sections of a hook document
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HookDocument {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    events: Option<Vec<String>>,
    configuration: Option<HookConfiguration>,
    script: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HookConfiguration {
    matcher: Option<String>,
    command: Option<String>,
}

impl From<HookDocument> for HookDefinition {
    fn from(doc: HookDocument) -> Self {
        let configuration = doc.configuration.unwrap_or_default();
        Self {
            id: trimmed(doc.id),
            name: trimmed(doc.name),
            description: trimmed(doc.description),
            events: doc
                .events
                .unwrap_or_default()
                .into_iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            matcher: configuration.matcher.unwrap_or_default(),
            command: configuration.command.unwrap_or_default(),
            script: trimmed(doc.script),
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Extract a hook definition from document text. Never fails.
pub fn parse_hook_document(content: &str) -> HookDefinition {
    let extracted = extract_by_patterns(content);
    match decode_document(content) {
        Some(doc) => extracted.fill_missing(doc.into()),
        None => extracted,
    }
}

fn decode_document(content: &str) -> Option<HookDocument> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| debug!(error = %e, "Document is not valid YAML, line patterns only"))
        .ok()?;

    if !value.is_mapping() {
        debug!("Document root is not a mapping, line patterns only");
        return None;
    }

    serde_yaml::from_value(value)
        .map_err(|e| debug!(error = %e, "Unexpected section types, line patterns only"))
        .ok()
}

/// Line-pattern extraction for the authoring layout:
///
/// ```yaml
/// id: format-on-save
/// name: Format on save
/// events:
///   - PostToolUse
/// configuration:
///   matcher: "Edit"
///   command: "format.sh"
/// script: |
///   cargo fmt
/// ```
pub fn extract_by_patterns(content: &str) -> HookDefinition {
    let lines: Vec<&str> = content.lines().collect();

    let mut definition = HookDefinition {
        id: scalar_field(&lines, "id"),
        name: scalar_field(&lines, "name"),
        description: scalar_field(&lines, "description"),
        events: events_block(&lines),
        script: script_block(&lines),
        ..HookDefinition::default()
    };

    let config = block_after(
        &lines,
        |l| l.trim_end() == "configuration:",
        |l| CONFIG_LINE.is_match(l),
    );
    if let Some(config) = config {
        definition.matcher = first_capture(config, &MATCHER_LINE).unwrap_or_default();
        definition.command = first_capture(config, &COMMAND_LINE).unwrap_or_default();
    }

    definition
}

/// First unindented `field: value` line with a non-blank value
fn scalar_field(lines: &[&str], field: &str) -> String {
    lines
        .iter()
        .filter_map(|line| line.strip_prefix(field)?.strip_prefix(':'))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn events_block(lines: &[&str]) -> Vec<String> {
    block_after(lines, |l| l.trim_end() == "events:", |l| EVENT_ITEM.is_match(l))
        .map(|items| {
            items
                .iter()
                .filter_map(|line| EVENT_ITEM.captures(line))
                .map(|caps| caps[1].trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn script_block(lines: &[&str]) -> String {
    let Some(body) = block_after(
        lines,
        |l| SCRIPT_HEADER.is_match(l),
        |l| l.starts_with("  ") || l.trim().is_empty(),
    ) else {
        return String::new();
    };

    body.iter()
        .map(|line| line.strip_prefix("  ").unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Lines following the first header line whose body has at least one
/// non-blank line. The body runs until the first line rejected by `member`.
fn block_after<'a>(
    lines: &'a [&'a str],
    header: impl Fn(&str) -> bool,
    member: impl Fn(&str) -> bool,
) -> Option<&'a [&'a str]> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        if !header(*line) {
            return None;
        }
        let rest = &lines[idx + 1..];
        let len = rest.iter().take_while(|l| member(**l)).count();
        let body = &rest[..len];
        body.iter().any(|l| !l.trim().is_empty()).then_some(body)
    })
}

fn first_capture(lines: &[&str], pattern: &Regex) -> Option<String> {
    lines
        .iter()
        .find_map(|line| pattern.captures(line))
        .map(|caps| caps[1].to_string())
}
