mod builtin;

use crate::schema::{validate_schema, SchemaError};
use shared_types::{PluginSchema, PluginSummary, SettingDefinition};
use std::collections::HashMap;
use std::path::Path;

pub use builtin::{blender, builtin_plugins, houdini, maya};

/// Source of plugin setting schemas
pub trait SchemaCatalog: Send + Sync {
    fn get_schema(&self, plugin_name: &str) -> Result<PluginSchema, CatalogError>;
    fn list_plugins(&self) -> Vec<PluginSummary>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Plugin '{0}' not found")]
    NotFound(String),
}

/// In-process catalog of DCC plugin schemas, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<PluginSchema>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the Maya, Blender and Houdini schemas
    pub fn with_builtin_plugins() -> Self {
        let mut registry = Self::new();
        for schema in builtin_plugins() {
            if let Err(e) = registry.register(schema) {
                tracing::error!(error = %e, "Skipping invalid built-in plugin schema");
            }
        }
        registry
    }

    /// Register a schema, replacing any plugin with the same name
    pub fn register(&mut self, schema: PluginSchema) -> Result<(), SchemaError> {
        validate_schema(&schema)?;

        match self.plugins.iter_mut().find(|p| p.name == schema.name) {
            Some(existing) => {
                tracing::info!(plugin = %schema.name, "Replacing registered plugin schema");
                *existing = schema;
            }
            None => {
                tracing::debug!(plugin = %schema.name, settings = schema.settings.len(), "Registered plugin schema");
                self.plugins.push(schema);
            }
        }

        Ok(())
    }

    /// Load every `*.toml` plugin schema in `dir`, in file name order.
    ///
    /// Returns the names of the plugins that were registered. Every file is
    /// parsed and validated before any is registered, so a file that cannot
    /// be parsed or fails validation leaves the registry unchanged.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<String>, SchemaError> {
        let load_error = |path: &Path, message: String| SchemaError::Load {
            path: path.display().to_string(),
            message,
        };

        let entries = std::fs::read_dir(dir).map_err(|e| load_error(dir, e.to_string()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| load_error(dir, e.to_string()))?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut schemas = Vec::with_capacity(paths.len());
        for path in &paths {
            let contents =
                std::fs::read_to_string(path).map_err(|e| load_error(path, e.to_string()))?;
            let schema: PluginSchema =
                toml::from_str(&contents).map_err(|e| load_error(path, e.to_string()))?;
            validate_schema(&schema)?;
            schemas.push(schema);
        }

        let mut loaded = Vec::with_capacity(schemas.len());
        for schema in schemas {
            loaded.push(schema.name.clone());
            self.register(schema)?;
        }

        tracing::info!(dir = %dir.display(), count = loaded.len(), "Loaded plugin schemas");
        Ok(loaded)
    }

    pub fn get_plugin(&self, name: &str) -> Option<&PluginSchema> {
        self.plugins.iter().find(|p| p.name == name)
    }

    pub fn plugins(&self) -> &[PluginSchema] {
        &self.plugins
    }

    /// Setting templates of every plugin keyed by plugin name
    pub fn all_templates(&self) -> HashMap<String, Vec<SettingDefinition>> {
        self.plugins
            .iter()
            .map(|p| (p.name.clone(), p.settings.clone()))
            .collect()
    }
}

impl SchemaCatalog for PluginRegistry {
    fn get_schema(&self, plugin_name: &str) -> Result<PluginSchema, CatalogError> {
        self.get_plugin(plugin_name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(plugin_name.to_string()))
    }

    fn list_plugins(&self) -> Vec<PluginSummary> {
        self.plugins.iter().map(PluginSchema::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{DefaultValue, SettingType};

    #[test]
    fn test_builtin_plugins_are_registered_in_order() {
        let registry = PluginRegistry::with_builtin_plugins();
        let names: Vec<String> = registry.list_plugins().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["maya", "blender", "houdini"]);
    }

    #[test]
    fn test_unknown_plugin_is_not_found() {
        let registry = PluginRegistry::with_builtin_plugins();
        assert_eq!(
            registry.get_schema("cinema4d"),
            Err(CatalogError::NotFound("cinema4d".to_string()))
        );
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = PluginRegistry::with_builtin_plugins();
        let mut custom = maya();
        custom.display_name = "Maya (studio build)".to_string();
        registry.register(custom).unwrap();

        assert_eq!(registry.plugins().len(), 3);
        assert_eq!(
            registry.get_schema("maya").unwrap().display_name,
            "Maya (studio build)"
        );
    }

    #[test]
    fn test_all_templates_keyed_by_plugin() {
        let registry = PluginRegistry::with_builtin_plugins();
        let templates = registry.all_templates();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates["blender"][2].key, "samples");
    }

    #[test]
    fn test_load_dir_reads_toml_schemas() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("nuke.toml"),
            r#"
name = "nuke"
display_name = "Foundry Nuke"
description = "Configuration settings for Nuke"

[[settings]]
key = "fps"
label = "Frame Rate"
type = "number"
default_value = 24
required = true

[[settings]]
key = "colorspace"
label = "Working Colorspace"
type = "enum"
options = ["ACEScg", "sRGB"]
default_value = "ACEScg"
"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), "not a schema").unwrap();

        let mut registry = PluginRegistry::new();
        let loaded = registry.load_dir(dir.path()).unwrap();
        assert_eq!(loaded, vec!["nuke"]);

        let nuke = registry.get_schema("nuke").unwrap();
        assert_eq!(nuke.settings[0].setting_type, SettingType::Number);
        assert_eq!(nuke.settings[0].default_value, Some(DefaultValue::Number(24.0)));
        assert!(nuke.settings[0].required);
        assert!(nuke.settings[1].allows("sRGB"));
    }

    #[test]
    fn test_load_dir_rejects_invalid_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("broken.toml"),
            r#"
name = "broken"
display_name = "Broken"
description = "Enum without options"

[[settings]]
key = "renderer"
label = "Renderer"
type = "enum"
"#,
        )
        .unwrap();

        let mut registry = PluginRegistry::new();
        assert!(matches!(
            registry.load_dir(dir.path()),
            Err(SchemaError::MissingOptions { .. })
        ));
        assert!(registry.plugins().is_empty());
    }

    #[test]
    fn test_load_dir_rejects_non_finite_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("nuke.toml"),
            r#"
name = "nuke"
display_name = "Foundry Nuke"
description = "Non-finite number default"

[[settings]]
key = "gamma"
label = "Gamma"
type = "number"
default_value = nan
"#,
        )
        .unwrap();

        let mut registry = PluginRegistry::new();
        assert!(matches!(
            registry.load_dir(dir.path()),
            Err(SchemaError::InvalidDefault { key, .. }) if key == "gamma"
        ));
        assert!(registry.plugins().is_empty());
    }

    #[test]
    fn test_failed_load_registers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a_katana.toml"),
            r#"
name = "katana"
display_name = "Foundry Katana"
description = "Lighting settings"

[[settings]]
key = "renderer"
label = "Renderer"
type = "enum"
options = ["arnold", "prman"]
default_value = "arnold"
"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b_broken.toml"),
            r#"
name = "broken"
display_name = "Broken"
description = "Enum without options"

[[settings]]
key = "renderer"
label = "Renderer"
type = "enum"
"#,
        )
        .unwrap();

        let mut registry = PluginRegistry::with_builtin_plugins();
        assert!(registry.load_dir(dir.path()).is_err());
        assert!(registry.get_plugin("katana").is_none());
        assert_eq!(registry.plugins().len(), 3);
    }
}
