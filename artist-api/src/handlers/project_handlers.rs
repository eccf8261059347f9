use super::AppState;
use crate::auth::current_user;
use crate::error::{AppError, AppResult};
use crate::storage::Database;
use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{
    CreateProjectRequest, Project, ProjectListResponse, ProjectResponse, ProjectRole,
    UpdateProjectRequest,
};

/// Active project the user is a member of, with the user's role.
///
/// Missing, deactivated and foreign projects all look the same to the caller.
pub fn require_member(
    database: &Database,
    project_id: i64,
    user_id: i64,
) -> AppResult<(Project, ProjectRole)> {
    let role = database
        .get_member_role(project_id, user_id)?
        .ok_or(AppError::ProjectNotFound(project_id))?;

    let project = database.get_project_by_id(project_id)?;
    if !project.is_active {
        return Err(AppError::ProjectNotFound(project_id));
    }

    Ok((project, role))
}

pub async fn list_projects(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let projects = data.database.list_projects_for_user(user.id)?;
    Ok(HttpResponse::Ok().json(ProjectListResponse { projects }))
}

pub async fn create_project(
    data: web::Data<AppState>,
    request: web::Json<CreateProjectRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let request = request.into_inner();

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidRequest(
            "Project name cannot be empty".to_string(),
        ));
    }

    let project = data
        .database
        .create_project(name, request.description.as_deref(), user.id)?;
    Ok(HttpResponse::Created().json(ProjectResponse { project }))
}

pub async fn get_project(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let (project, _) = require_member(&data.database, path.into_inner(), user.id)?;
    Ok(HttpResponse::Ok().json(ProjectResponse { project }))
}

pub async fn update_project(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    request: web::Json<UpdateProjectRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let project_id = path.into_inner();
    let request = request.into_inner();

    let (_, role) = require_member(&data.database, project_id, user.id)?;
    if !role.can_edit() {
        return Err(AppError::Forbidden(format!(
            "Role '{role}' cannot edit project {project_id}"
        )));
    }

    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::InvalidRequest(
            "Project name cannot be empty".to_string(),
        ));
    }

    let project = data.database.update_project(
        project_id,
        request.name.as_deref().map(str::trim),
        request.description.as_deref(),
        request.is_active,
    )?;
    Ok(HttpResponse::Ok().json(ProjectResponse { project }))
}

pub async fn delete_project(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req)?;
    let project_id = path.into_inner();

    let (_, role) = require_member(&data.database, project_id, user.id)?;
    if role != ProjectRole::Owner {
        return Err(AppError::Forbidden(format!(
            "Only the owner can delete project {project_id}"
        )));
    }

    data.database.deactivate_project(project_id)?;
    Ok(HttpResponse::NoContent().finish())
}
