//! Shared helpers for command handlers.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::CliError;

/// Read and parse a JSON file for `--from-file` / `--prior-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Split a state document into identity and fields.
///
/// Accepts either the printed form `{"id": .., "fields": {..}}` or a bare
/// field object, where a top-level string `id` is taken as the identity.
pub fn split_state(
    source: &str,
    value: Value,
) -> Result<(Option<String>, BTreeMap<String, Value>), CliError> {
    let Value::Object(mut map) = value else {
        return Err(CliError::Validation {
            field: source.into(),
            reason: "expected a JSON object".into(),
        });
    };

    let id = match map.remove("id") {
        Some(Value::String(id)) => Some(id),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(CliError::Validation {
                field: source.into(),
                reason: format!("id must be a string, got {other}"),
            });
        }
    };

    let fields = match map.remove("fields") {
        Some(Value::Object(fields)) if map.is_empty() => fields.into_iter().collect(),
        Some(other) => {
            map.insert("fields".into(), other);
            map.into_iter().collect()
        }
        None => map.into_iter().collect(),
    };

    Ok((id, fields))
}

/// Drop empty entries left by `--channels ""`.
pub fn non_empty(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.is_empty()).collect()
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn split_state_accepts_printed_form() {
        let (id, fields) = split_state(
            "state",
            json!({"id": "C1", "fields": {"name": "general", "is_archived": false}}),
        )
        .unwrap();

        assert_eq!(id.as_deref(), Some("C1"));
        assert_eq!(fields.get("name"), Some(&json!("general")));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn split_state_accepts_bare_fields() {
        let (id, fields) =
            split_state("state", json!({"usergroup_id": "S1", "channels": ["C1"]})).unwrap();

        assert_eq!(id, None);
        assert_eq!(fields.get("channels"), Some(&json!(["C1"])));
    }

    #[test]
    fn split_state_rejects_non_objects() {
        assert!(split_state("state", json!(["C1"])).is_err());
        assert!(split_state("state", json!({"id": 7})).is_err());
    }

    #[test]
    fn non_empty_drops_blank_entries() {
        assert_eq!(non_empty(vec![String::new()]), Vec::<String>::new());
        assert_eq!(non_empty(vec!["C1".into(), String::new()]), vec!["C1"]);
    }
}
