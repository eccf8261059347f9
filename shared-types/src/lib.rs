use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod auth;
pub mod dcc;
pub mod project;
pub mod settings;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use auth::{LoginRequest, RegisterRequest, TokenResponse, User, UserResponse};
pub use dcc::{
    ApplyResultItem, ApplyStatus, FailedWrite, FormStateResponse, PartialApplyResponse,
    PluginListResponse, SubmitFormRequest, SubmitFormResponse, TemplatesResponse,
    ValidationErrorResponse, WritePlanResponse,
};
pub use project::{
    CreateProjectRequest, Project, ProjectListResponse, ProjectResponse, ProjectRole,
    UpdateProjectRequest,
};
pub use settings::{
    CreateSettingRequest, DefaultValue, FieldViolation, PluginSchema, PluginSummary,
    SettingDefinition, SettingListResponse, SettingRecord, SettingResponse, SettingType,
    UpdateSettingRequest, WritePlanEntry,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
}
