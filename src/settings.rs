// Merging generated hooks into an existing host settings document
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::HooksSettings;
use crate::error::{HooksError, Result, SettingsError};

/// Merge a `{"hooks": {...}}` document into `settings`.
///
/// Events missing from `settings` are inserted as-is. For an existing event,
/// each incoming matcher group is folded into the pre-existing group with the
/// same `matcher` (hooks appended), or appended as a new group. A settings
/// value that isn't an object is treated as `{}`.
pub fn merge_settings(settings: Value, incoming: &Value) -> Value {
    let mut settings = match settings {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let Some(new_events) = incoming.get("hooks").and_then(Value::as_object) else {
        return Value::Object(settings);
    };

    match settings.get_mut("hooks") {
        Some(Value::Object(existing)) => {
            for (event, groups) in new_events {
                merge_event(existing, event, groups);
            }
        }
        _ => {
            settings.insert("hooks".to_string(), Value::Object(new_events.clone()));
        }
    }

    Value::Object(settings)
}

fn merge_event(existing: &mut Map<String, Value>, event: &str, groups: &Value) {
    let Some(Value::Array(existing_groups)) = existing.get_mut(event) else {
        existing.insert(event.to_string(), groups.clone());
        return;
    };

    // Only groups present before this merge are candidates for folding
    let original_len = existing_groups.len();
    for group in groups.as_array().into_iter().flatten() {
        let matcher = group.get("matcher");
        let target = existing_groups[..original_len]
            .iter()
            .rposition(|g| g.get("matcher") == matcher);

        match target {
            Some(idx) => append_hooks(&mut existing_groups[idx], group),
            None => existing_groups.push(group.clone()),
        }
    }
}

fn append_hooks(target: &mut Value, group: &Value) {
    let new_hooks = group
        .get("hooks")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let Some(target) = target.as_object_mut() else {
        return;
    };
    match target.get_mut("hooks") {
        Some(Value::Array(hooks)) => hooks.extend(new_hooks),
        _ => {
            target.insert("hooks".to_string(), Value::Array(new_hooks));
        }
    }
}

/// Load `template_path` (or start from `{}` when it doesn't exist), merge the
/// generated hooks into it and write the result to `output_path`.
pub fn merge_with_settings(
    hooks: &HooksSettings,
    template_path: &Path,
    output_path: &Path,
) -> Result<Value> {
    let settings = load_settings(template_path)?;
    let merged = merge_settings(settings, &serde_json::to_value(hooks)?);

    let rendered = serde_json::to_string_pretty(&merged)?;
    write_settings(output_path, &rendered)?;

    info!(
        template = %template_path.display(),
        output = %output_path.display(),
        "Merged hooks into settings"
    );
    Ok(merged)
}

/// Parse a settings document, `{}` when the file is absent
pub fn load_settings(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "No settings template, starting from an empty document");
        return Ok(Value::Object(Map::new()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        HooksError::Settings(Box::new(SettingsError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        }))
    })
}

/// Write `content` to `path`, creating parent directories as needed
pub fn write_settings(path: &Path, content: &str) -> Result<()> {
    let write_failed = |e: std::io::Error| {
        HooksError::Settings(Box::new(SettingsError::WriteFailed {
            path: path.to_path_buf(),
            error: e.to_string(),
        }))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(path, content).map_err(write_failed)
}
