//! Merge of plugin schemas with persisted settings.
//!
//! Everything here except [`apply_write_plan`] is synchronous and free of side
//! effects: a form state is derived from a schema and a snapshot of the scope's
//! records, and a submitted form is diffed against that same snapshot.

mod apply;


pub use apply::{apply_write_plan, ApplyOutcome, ApplyReport, ApplyResult};

use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};
use shared_types::{
    FieldViolation, PluginSchema, SettingDefinition, SettingRecord, SettingType, WritePlanEntry,
};
use std::collections::HashMap;

/// Editable string-encoded values of one edit session, keyed by setting key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState(HashMap<String, String>);

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key`, treating an absent key as empty
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl From<HashMap<String, String>> for FormState {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// First record carrying `key`. Duplicates can only exist in stores without the
/// uniqueness constraint; the earliest one wins.
fn find_record<'a>(records: &'a [SettingRecord], key: &str) -> Option<&'a SettingRecord> {
    records.iter().find(|r| r.key == key)
}

/// Value a definition shows when an edit session opens
fn baseline_value(definition: &SettingDefinition, record: Option<&SettingRecord>) -> String {
    match record.and_then(|r| r.value.as_deref()) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => definition
            .default_value
            .as_ref()
            .map(|d| d.encode())
            .unwrap_or_default(),
    }
}

/// Build the editable form for a schema from the records already stored for
/// the scope.
///
/// Exactly one entry per schema key: a stored non-empty value wins over the
/// encoded default, which wins over the empty string. Records whose key is not
/// in the schema are ignored.
pub fn initialize_form_state(schema: &PluginSchema, records: &[SettingRecord]) -> FormState {
    schema
        .settings
        .iter()
        .map(|definition| {
            let record = find_record(records, &definition.key);
            (
                definition.key.clone(),
                baseline_value(definition, record),
            )
        })
        .collect()
}

fn check_value(definition: &SettingDefinition, value: &str) -> Option<FieldViolation> {
    let key = || definition.key.clone();

    if value.is_empty() {
        return definition
            .required
            .then(|| FieldViolation::MissingRequiredField { key: key() });
    }

    match definition.setting_type {
        SettingType::Text => None,
        SettingType::Enum if !definition.allows(value) => Some(FieldViolation::InvalidOption {
            key: key(),
            value: value.to_string(),
        }),
        SettingType::Enum => None,
        SettingType::Number => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => None,
            _ => Some(FieldViolation::InvalidNumber {
                key: key(),
                value: value.to_string(),
            }),
        },
        SettingType::Boolean => match value {
            "true" | "false" => None,
            _ => Some(FieldViolation::InvalidBoolean {
                key: key(),
                value: value.to_string(),
            }),
        },
    }
}

/// Check a submitted form against its schema.
///
/// Every definition is checked and all violations are returned together, in
/// schema order. Form keys unknown to the schema are ignored.
pub fn validate_submission(schema: &PluginSchema, form: &FormState) -> Result<(), ReconcileError> {
    let violations: Vec<FieldViolation> = schema
        .settings
        .iter()
        .filter_map(|definition| check_value(definition, form.value(&definition.key)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError::ValidationFailure { violations })
    }
}

/// Diff a submitted form against the records it was initialized from.
///
/// One entry per schema key present in the form, in schema order. A value
/// equal to what the form showed initially is left alone; otherwise an
/// existing record is updated and a missing one is created, except that an
/// empty value never creates a record.
pub fn build_write_plan(
    schema: &PluginSchema,
    records: &[SettingRecord],
    form: &FormState,
) -> Vec<WritePlanEntry> {
    schema
        .settings
        .iter()
        .filter_map(|definition| {
            let value = form.get(&definition.key)?;
            let record = find_record(records, &definition.key);
            let key = definition.key.clone();

            if value == baseline_value(definition, record) {
                return Some(WritePlanEntry::NoChange { key });
            }

            let entry = match record {
                Some(record) if record.value_or_empty() != value => WritePlanEntry::Update {
                    record_id: record.id,
                    key,
                    value: value.to_string(),
                    description: definition.description.clone(),
                },
                Some(_) => WritePlanEntry::NoChange { key },
                None if value.is_empty() => WritePlanEntry::NoChange { key },
                None => WritePlanEntry::Create {
                    category: schema.name.clone(),
                    key,
                    value: value.to_string(),
                    description: definition.description.clone(),
                },
            };
            Some(entry)
        })
        .collect()
}
