use super::project_handlers::require_member;
use super::{AppState, ProjectQuery};
use crate::auth::current_user;
use crate::error::{AppError, AppResult};
use actix_web::{web, HttpRequest, HttpResponse};
use artist_settings::{
    ApplyOutcome, ApplyReport, FormState, ReconcileError, SchemaCatalog, ScopeContext,
};
use shared_types::{
    ApplyResultItem, ApplyStatus, FormStateResponse, PluginListResponse, SubmitFormRequest,
    SubmitFormResponse, TemplatesResponse, WritePlanResponse,
};

/// Scope of a DCC form request. Membership is checked here so the engine only
/// ever sees projects the caller belongs to.
fn scope_context(
    data: &AppState,
    req: &HttpRequest,
    project_id: Option<i64>,
) -> AppResult<ScopeContext> {
    let user = current_user(req)?;
    if let Some(project_id) = project_id {
        require_member(&data.database, project_id, user.id)?;
    }
    Ok(ScopeContext::new(user.id, project_id))
}

fn result_items(report: ApplyReport) -> Vec<ApplyResultItem> {
    report
        .results
        .into_iter()
        .map(|result| {
            let (status, record, error) = match result.outcome {
                ApplyOutcome::Created(record) => (ApplyStatus::Created, Some(record), None),
                ApplyOutcome::Updated(record) => (ApplyStatus::Updated, Some(record), None),
                ApplyOutcome::Unchanged => (ApplyStatus::Unchanged, None, None),
                ApplyOutcome::Failed(e) => (ApplyStatus::Failed, None, Some(e.to_string())),
            };
            ApplyResultItem {
                key: result.key,
                status,
                record,
                error,
            }
        })
        .collect()
}

pub async fn list_plugins(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(PluginListResponse {
        plugins: data.registry.list_plugins(),
    }))
}

pub async fn get_templates(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(TemplatesResponse {
        templates: data.registry.all_templates(),
    }))
}

pub async fn get_template(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let schema = data
        .registry
        .get_schema(&path.into_inner())
        .map_err(ReconcileError::from)?;
    Ok(HttpResponse::Ok().json(schema))
}

pub async fn get_form(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ProjectQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = scope_context(&data, &req, query.project_id)?;
    let session = data.editor.open(&ctx, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(FormStateResponse {
        project_id: session.scope.project_id,
        plugin: session.schema,
        values: session.form.into_inner(),
    }))
}

pub async fn preview_form(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ProjectQuery>,
    request: web::Json<SubmitFormRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = scope_context(&data, &req, query.project_id)?;
    let form = FormState::from(request.into_inner().values);

    let plan = data.editor.preview(&ctx, &path.into_inner(), &form).await?;
    Ok(HttpResponse::Ok().json(WritePlanResponse { plan }))
}

pub async fn submit_form(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ProjectQuery>,
    request: web::Json<SubmitFormRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = scope_context(&data, &req, query.project_id)?;
    let plugin = path.into_inner();
    let form = FormState::from(request.into_inner().values);

    let outcome = data.editor.submit(&ctx, &plugin, &form).await?;
    tracing::info!(
        user_id = ctx.user_id,
        plugin = %plugin,
        writes = outcome.report.writes(),
        "Saved plugin settings"
    );

    Ok(HttpResponse::Ok().json(SubmitFormResponse {
        plan: outcome.plan,
        results: result_items(outcome.report),
    }))
}
