use crate::config::ApiConfig;
use artist_settings::{PluginRegistry, SchemaError};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod storage;

pub type DbConnection = Arc<Mutex<Connection>>;

/// Built-in plugin schemas plus any TOML schemas from the configured
/// plugins directory. A schema loaded from disk replaces a built-in one with
/// the same name.
pub fn load_plugin_registry(config: &ApiConfig) -> Result<PluginRegistry, SchemaError> {
    let mut registry = PluginRegistry::with_builtin_plugins();

    if let Some(dir) = config.plugins_dir() {
        if dir.is_dir() {
            registry.load_dir(dir)?;
        } else {
            tracing::warn!("Plugins directory {} does not exist, skipping", dir.display());
        }
    }

    Ok(registry)
}
