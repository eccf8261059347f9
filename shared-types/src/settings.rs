// Settings data model shared between the reconciliation engine, the api and the web frontend

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Declared type of a plugin setting.
///
/// Values always travel string-encoded; the type only decides how a
/// submitted string is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    /// Free text, including file system paths
    Text,
    /// Integer or decimal number
    Number,
    /// Literal `true` / `false`
    Boolean,
    /// One of a fixed list of options
    Enum,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Text => "text",
            SettingType::Number => "number",
            SettingType::Boolean => "boolean",
            SettingType::Enum => "enum",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed default value of a setting definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum DefaultValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl DefaultValue {
    /// String encoding used when the default seeds a form value.
    /// Whole numbers encode without a fractional part (`128`, not `128.0`).
    pub fn encode(&self) -> String {
        match self {
            DefaultValue::Boolean(value) => value.to_string(),
            DefaultValue::Number(value) => value.to_string(),
            DefaultValue::Text(value) => value.clone(),
        }
    }

    /// Whether this default is representable for the given setting type
    pub fn fits(&self, setting_type: SettingType) -> bool {
        matches!(
            (self, setting_type),
            (DefaultValue::Boolean(_), SettingType::Boolean)
                | (DefaultValue::Number(_), SettingType::Number)
                | (DefaultValue::Text(_), SettingType::Text)
                | (DefaultValue::Text(_), SettingType::Enum)
        )
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Boolean(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Number(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        DefaultValue::Number(f64::from(value))
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

/// One configurable setting declared by a DCC plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingDefinition {
    /// Unique key within the plugin schema
    pub key: String,
    /// Human-readable label
    pub label: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default)]
    pub required: bool,
    /// Allowed values, present only for `enum` settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SettingDefinition {
    fn new(key: &str, label: &str, setting_type: SettingType) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            setting_type,
            default_value: None,
            required: false,
            options: None,
            description: None,
        }
    }

    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, SettingType::Text)
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self::new(key, label, SettingType::Number)
    }

    pub fn boolean(key: &str, label: &str) -> Self {
        Self::new(key, label, SettingType::Boolean)
    }

    pub fn choice(key: &str, label: &str, options: &[&str]) -> Self {
        let mut definition = Self::new(key, label, SettingType::Enum);
        definition.options = Some(options.iter().map(|o| o.to_string()).collect());
        definition
    }

    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allows(&self, value: &str) -> bool {
        self.options
            .as_ref()
            .is_some_and(|options| options.iter().any(|o| o == value))
    }
}

/// Settings schema of a single DCC plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PluginSchema {
    /// Plugin identifier, also used as the settings category
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub settings: Vec<SettingDefinition>,
}

impl PluginSchema {
    pub fn definition(&self, key: &str) -> Option<&SettingDefinition> {
        self.settings.iter().find(|d| d.key == key)
    }

    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PluginSummary {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

/// A persisted setting value scoped to (user, project, category)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingRecord {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub user_id: i64,
    #[ts(type = "number")]
    pub project_id: i64,
    /// Plugin name the setting belongs to (e.g. "maya", "blender")
    pub category: String,
    pub key: String,
    /// String-encoded value; absent or empty means unset
    pub value: Option<String>,
    pub description: Option<String>,
    #[ts(type = "number")]
    pub created_at: i64,
    #[ts(type = "number | null")]
    pub updated_at: Option<i64>,
}

impl SettingRecord {
    /// Stored value with "unset" normalized to the empty string
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateSettingRequest {
    pub category: String,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateSettingRequest {
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingResponse {
    pub setting: SettingRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingListResponse {
    #[serde(default)]
    pub settings: Vec<SettingRecord>,
}

/// One store mutation (or deliberate no-op) computed from a form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WritePlanEntry {
    Create {
        category: String,
        key: String,
        value: String,
        description: Option<String>,
    },
    Update {
        #[ts(type = "number")]
        record_id: i64,
        key: String,
        value: String,
        description: Option<String>,
    },
    NoChange {
        key: String,
    },
}

impl WritePlanEntry {
    pub fn key(&self) -> &str {
        match self {
            WritePlanEntry::Create { key, .. }
            | WritePlanEntry::Update { key, .. }
            | WritePlanEntry::NoChange { key } => key,
        }
    }

    /// Whether applying this entry issues a store call
    pub fn is_write(&self) -> bool {
        !matches!(self, WritePlanEntry::NoChange { .. })
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldViolation {
    MissingRequiredField { key: String },
    InvalidOption { key: String, value: String },
    InvalidNumber { key: String, value: String },
    InvalidBoolean { key: String, value: String },
}

impl FieldViolation {
    pub fn key(&self) -> &str {
        match self {
            FieldViolation::MissingRequiredField { key }
            | FieldViolation::InvalidOption { key, .. }
            | FieldViolation::InvalidNumber { key, .. }
            | FieldViolation::InvalidBoolean { key, .. } => key,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::MissingRequiredField { key } => {
                write!(f, "'{key}' is required")
            }
            FieldViolation::InvalidOption { key, value } => {
                write!(f, "'{value}' is not an allowed option for '{key}'")
            }
            FieldViolation::InvalidNumber { key, value } => {
                write!(f, "'{value}' is not a number (field '{key}')")
            }
            FieldViolation::InvalidBoolean { key, value } => {
                write!(f, "'{value}' must be 'true' or 'false' (field '{key}')")
            }
        }
    }
}
