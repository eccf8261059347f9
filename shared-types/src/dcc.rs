use crate::settings::{
    FieldViolation, PluginSchema, PluginSummary, SettingDefinition, SettingRecord,
    WritePlanEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PluginListResponse {
    pub plugins: Vec<PluginSummary>,
}

/// Setting templates of every registered plugin, keyed by plugin name
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TemplatesResponse {
    pub templates: HashMap<String, Vec<SettingDefinition>>,
}

/// Editable state of one plugin's settings for the selected project
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormStateResponse {
    #[ts(type = "number")]
    pub project_id: i64,
    pub plugin: PluginSchema,
    pub values: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitFormRequest {
    pub values: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WritePlanResponse {
    pub plan: Vec<WritePlanEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStatus {
    Created,
    Updated,
    Unchanged,
    Failed,
}

/// Outcome of one write-plan entry after it was applied
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApplyResultItem {
    pub key: String,
    pub status: ApplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<SettingRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitFormResponse {
    pub plan: Vec<WritePlanEntry>,
    pub results: Vec<ApplyResultItem>,
}

/// Body of a 422 response listing every invalid field at once
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub violations: Vec<FieldViolation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FailedWrite {
    pub key: String,
    pub error: String,
}

/// Body of a 207 response when only part of a write plan was applied
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartialApplyResponse {
    pub error: String,
    pub message: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedWrite>,
}
