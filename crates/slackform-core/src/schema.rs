// ── Declared-state schemas ──
//
// Each resource publishes the fields it accepts. The host uses this to
// decide which changes force a replacement and which are updated in place;
// reconcilers use it to reject malformed declared state before any call.

use serde::Serialize;
use serde_json::Value;
use strum::Display;

use crate::data::ResourceData;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    String,
    Bool,
    Int,
    StringList,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// Written by the reconciler, never declared.
    Computed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    /// A change to this field replaces the resource.
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
}

impl FieldSchema {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            force_new: false,
            default: None,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            force_new: false,
            default: None,
            description,
        }
    }

    pub const fn computed(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Computed,
            force_new: false,
            default: None,
            description,
        }
    }

    #[must_use]
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Field layout of one resource type.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<&'static str>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            deprecation_message: None,
        }
    }

    #[must_use]
    pub fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecation_message = Some(message);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields whose change forces replacement.
    pub fn force_new_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.force_new).map(|f| f.name)
    }

    /// Check declared fields against the schema.
    ///
    /// Unknown fields are rejected; computed fields are accepted so that a
    /// previously observed record can be fed back in.
    pub fn validate(&self, resource: &str, data: &ResourceData) -> Result<(), CoreError> {
        let invalid = |message: String| CoreError::ValidationFailed {
            resource: resource.to_owned(),
            message,
        };

        for (name, value) in &data.fields {
            let Some(field) = self.field(name) else {
                return Err(invalid(format!("unknown field '{name}'")));
            };
            if !value.is_null() && !field.kind.accepts(value) {
                return Err(invalid(format!("field '{name}' must be a {}", field.kind)));
            }
        }

        for field in &self.fields {
            if field.presence == Presence::Required && data.get(field.name).is_none() {
                return Err(invalid(format!("missing required field '{}'", field.name)));
            }
        }

        Ok(())
    }

    /// Fill unset optional fields that carry a default.
    pub fn apply_defaults(&self, data: &mut ResourceData) {
        for field in &self.fields {
            if let Some(default) = &field.default {
                if data.get(field.name).is_none() {
                    data.set(field.name, default.clone());
                }
            }
        }
    }
}
