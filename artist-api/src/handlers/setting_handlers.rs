use super::project_handlers::require_member;
use super::{AppState, ProjectQuery};
use crate::auth::{current_user, AuthUser};
use crate::error::{AppError, AppResult};
use actix_web::{web, HttpRequest, HttpResponse};
use artist_settings::{NewSettingRecord, ReconcileError, SettingUpdate, StoreError};
use serde::Deserialize;
use shared_types::{
    CreateSettingRequest, SettingListResponse, SettingRecord, SettingResponse,
    UpdateSettingRequest,
};

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub project_id: Option<i64>,
    pub category: Option<String>,
}

fn selected_project(
    data: &AppState,
    user: &AuthUser,
    project_id: Option<i64>,
) -> AppResult<i64> {
    let project_id = project_id.ok_or(ReconcileError::NoProjectSelected)?;
    require_member(&data.database, project_id, user.id)?;
    Ok(project_id)
}

/// A record owned by the caller; anyone else's record is reported as missing
async fn owned_setting(data: &AppState, user: &AuthUser, id: i64) -> AppResult<SettingRecord> {
    match data.settings.get_by_id(id).await {
        Ok(record) if record.user_id == user.id => Ok(record),
        Ok(_) | Err(StoreError::NotFound(_)) => Err(AppError::NotFound(format!("Setting {id}"))),
        Err(e) => Err(e.into()),
    }
}

pub async fn list_settings(
    data: web::Data<AppState>,
    query: web::Query<SettingsQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let query = query.into_inner();
    let project_id = selected_project(&data, &user, query.project_id)?;

    let settings = data
        .settings
        .list_by_scope(user.id, project_id, query.category.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(SettingListResponse { settings }))
}

pub async fn create_setting(
    data: web::Data<AppState>,
    query: web::Query<ProjectQuery>,
    request: web::Json<CreateSettingRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let project_id = selected_project(&data, &user, query.project_id)?;
    let request = request.into_inner();

    if request.category.trim().is_empty() || request.key.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Setting category and key are required".to_string(),
        ));
    }

    let setting = data
        .settings
        .create(NewSettingRecord {
            user_id: user.id,
            project_id,
            category: request.category,
            key: request.key,
            value: request.value,
            description: request.description,
        })
        .await?;
    Ok(HttpResponse::Created().json(SettingResponse { setting }))
}

pub async fn get_setting(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let setting = owned_setting(&data, &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SettingResponse { setting }))
}

pub async fn update_setting(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    request: web::Json<UpdateSettingRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let id = path.into_inner();
    owned_setting(&data, &user, id).await?;

    let request = request.into_inner();
    let setting = data
        .settings
        .update_by_id(
            id,
            SettingUpdate {
                value: request.value,
                description: request.description,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(SettingResponse { setting }))
}

pub async fn delete_setting(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let id = path.into_inner();
    owned_setting(&data, &user, id).await?;

    data.settings.delete_by_id(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
