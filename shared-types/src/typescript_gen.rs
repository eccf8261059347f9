/// Names of every type the frontend consumes, in output order
pub const API_TYPE_NAMES: &[&str] = &[
    "ErrorResponse",
    "HealthResponse",
    "RegisterRequest",
    "LoginRequest",
    "TokenResponse",
    "User",
    "UserResponse",
    "Project",
    "ProjectRole",
    "CreateProjectRequest",
    "UpdateProjectRequest",
    "ProjectResponse",
    "ProjectListResponse",
    "SettingType",
    "DefaultValue",
    "SettingDefinition",
    "PluginSchema",
    "PluginSummary",
    "SettingRecord",
    "CreateSettingRequest",
    "UpdateSettingRequest",
    "SettingResponse",
    "SettingListResponse",
    "WritePlanEntry",
    "FieldViolation",
    "PluginListResponse",
    "TemplatesResponse",
    "FormStateResponse",
    "SubmitFormRequest",
    "WritePlanResponse",
    "ApplyStatus",
    "ApplyResultItem",
    "SubmitFormResponse",
    "ValidationErrorResponse",
    "FailedWrite",
    "PartialApplyResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;
    use ts_rs::TS;

    let result = match name {
        "ErrorResponse" => ErrorResponse::export_to_string()?,
        "HealthResponse" => HealthResponse::export_to_string()?,

        "RegisterRequest" => RegisterRequest::export_to_string()?,
        "LoginRequest" => LoginRequest::export_to_string()?,
        "TokenResponse" => TokenResponse::export_to_string()?,
        "User" => User::export_to_string()?,
        "UserResponse" => UserResponse::export_to_string()?,

        "Project" => Project::export_to_string()?,
        "ProjectRole" => ProjectRole::export_to_string()?,
        "CreateProjectRequest" => CreateProjectRequest::export_to_string()?,
        "UpdateProjectRequest" => UpdateProjectRequest::export_to_string()?,
        "ProjectResponse" => ProjectResponse::export_to_string()?,
        "ProjectListResponse" => ProjectListResponse::export_to_string()?,

        "SettingType" => SettingType::export_to_string()?,
        "DefaultValue" => DefaultValue::export_to_string()?,
        "SettingDefinition" => SettingDefinition::export_to_string()?,
        "PluginSchema" => PluginSchema::export_to_string()?,
        "PluginSummary" => PluginSummary::export_to_string()?,
        "SettingRecord" => SettingRecord::export_to_string()?,
        "CreateSettingRequest" => CreateSettingRequest::export_to_string()?,
        "UpdateSettingRequest" => UpdateSettingRequest::export_to_string()?,
        "SettingResponse" => SettingResponse::export_to_string()?,
        "SettingListResponse" => SettingListResponse::export_to_string()?,
        "WritePlanEntry" => WritePlanEntry::export_to_string()?,
        "FieldViolation" => FieldViolation::export_to_string()?,

        "PluginListResponse" => PluginListResponse::export_to_string()?,
        "TemplatesResponse" => TemplatesResponse::export_to_string()?,
        "FormStateResponse" => FormStateResponse::export_to_string()?,
        "SubmitFormRequest" => SubmitFormRequest::export_to_string()?,
        "WritePlanResponse" => WritePlanResponse::export_to_string()?,
        "ApplyStatus" => ApplyStatus::export_to_string()?,
        "ApplyResultItem" => ApplyResultItem::export_to_string()?,
        "SubmitFormResponse" => SubmitFormResponse::export_to_string()?,
        "ValidationErrorResponse" => ValidationErrorResponse::export_to_string()?,
        "FailedWrite" => FailedWrite::export_to_string()?,
        "PartialApplyResponse" => PartialApplyResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

pub fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
