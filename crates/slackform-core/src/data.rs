// ── Declared state record ──
//
// The host runtime hands each reconciler a flat field map plus an identity.
// Reconcilers only write back computed or observed fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared and observed state of one managed instance.
///
/// An empty `id` means the instance does not exist remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// Previously persisted fields, for change detection on update.
    #[serde(skip)]
    prior: Option<BTreeMap<String, Value>>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with an identity and no fields (import).
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Attach the previously persisted fields.
    #[must_use]
    pub fn with_prior(mut self, prior: BTreeMap<String, Value>) -> Self {
        self.prior = Some(prior);
        self
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn exists(&self) -> bool {
        !self.id.is_empty()
    }

    // ── Field access ─────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// List-of-string field. Non-string elements are skipped.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_owned(), value.into());
    }

    // ── Change detection ─────────────────────────────────────────────

    /// `true` if `key` differs from the prior snapshot.
    ///
    /// Without a prior snapshot every declared field counts as changed.
    pub fn has_change(&self, key: &str) -> bool {
        match &self.prior {
            None => self.get(key).is_some(),
            Some(prior) => {
                let before = prior.get(key).filter(|v| !v.is_null());
                before != self.get(key)
            }
        }
    }
}
