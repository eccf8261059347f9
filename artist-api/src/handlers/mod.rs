pub mod auth_handlers;
pub mod dcc_handlers;
pub mod project_handlers;
pub mod setting_handlers;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::storage::{Database, SqliteSettingsStore};
use actix_web::HttpResponse;
use artist_settings::{PluginRegistry, SettingsEditor, SettingsStore};
use serde::Deserialize;
use shared_types::HealthResponse;
use std::sync::Arc;

pub struct AppState {
    pub database: Arc<Database>,
    pub settings: Arc<dyn SettingsStore>,
    pub registry: Arc<PluginRegistry>,
    pub editor: SettingsEditor,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(database: Arc<Database>, registry: PluginRegistry, config: ApiConfig) -> Self {
        let settings: Arc<dyn SettingsStore> =
            Arc::new(SqliteSettingsStore::new(database.connection()));
        let registry = Arc::new(registry);
        let editor = SettingsEditor::new(registry.clone(), settings.clone());

        Self {
            database,
            settings,
            registry,
            editor,
            config: Arc::new(config),
        }
    }
}

/// `?project_id=` selecting the active project of a request
#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub project_id: Option<i64>,
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Artist Settings API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health_check() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
    }))
}
