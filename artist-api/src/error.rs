use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use artist_settings::{ReconcileError, StoreError};
use shared_types::{ErrorResponse, FailedWrite, PartialApplyResponse, ValidationErrorResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ProjectNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::AuthenticationFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Store(e) => store_status(e),
            AppError::Reconcile(e) => match e {
                ReconcileError::SchemaNotFound(_) => StatusCode::NOT_FOUND,
                ReconcileError::NoProjectSelected => StatusCode::BAD_REQUEST,
                ReconcileError::ValidationFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ReconcileError::StoreUnavailable(e) => store_status(e),
                ReconcileError::PartialApplyFailure { .. } => StatusCode::MULTI_STATUS,
            },
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());

        match self {
            AppError::Reconcile(ReconcileError::ValidationFailure { violations }) => {
                response.json(ValidationErrorResponse {
                    error: self.error_type().to_string(),
                    message: self.to_string(),
                    violations: violations.clone(),
                })
            }
            AppError::Reconcile(ReconcileError::PartialApplyFailure { succeeded, failed }) => {
                response.json(PartialApplyResponse {
                    error: self.error_type().to_string(),
                    message: self.to_string(),
                    succeeded: succeeded.clone(),
                    failed: failed
                        .iter()
                        .map(|(key, e)| FailedWrite {
                            key: key.clone(),
                            error: e.to_string(),
                        })
                        .collect(),
                })
            }
            _ => response.json(ErrorResponse {
                error: self.error_type().to_string(),
                message: self.to_string(),
            }),
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::BAD_REQUEST,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn store_error_type(err: &StoreError) -> &'static str {
    match err {
        StoreError::NotFound(_) => "setting_not_found",
        StoreError::Conflict(_) => "setting_conflict",
        StoreError::Unavailable(_) => "store_unavailable",
    }
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Migration(_) => "migration_error",
            AppError::Config(_) => "config_error",
            AppError::Io(_) => "io_error",
            AppError::ProjectNotFound(_) => "project_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Internal(_) => "internal_error",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::AuthenticationFailed(_) => "authentication_failed",
            AppError::Forbidden(_) => "forbidden",
            AppError::Store(e) => store_error_type(e),
            AppError::Reconcile(e) => match e {
                ReconcileError::SchemaNotFound(_) => "schema_not_found",
                ReconcileError::NoProjectSelected => "no_project_selected",
                ReconcileError::ValidationFailure { .. } => "validation_failed",
                ReconcileError::StoreUnavailable(e) => store_error_type(e),
                ReconcileError::PartialApplyFailure { .. } => "partial_apply_failure",
            },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
