//! Built-in DCC plugin schemas.

use shared_types::{PluginSchema, SettingDefinition};

pub fn builtin_plugins() -> Vec<PluginSchema> {
    vec![maya(), blender(), houdini()]
}

/// Autodesk Maya
pub fn maya() -> PluginSchema {
    PluginSchema {
        name: "maya".to_string(),
        display_name: "Autodesk Maya".to_string(),
        description: "Configuration settings for Autodesk Maya".to_string(),
        settings: vec![
            SettingDefinition::text("workspace_path", "Workspace Path")
                .with_description("Default Maya workspace directory"),
            SettingDefinition::choice(
                "render_engine",
                "Render Engine",
                &["arnold", "vray", "redshift", "renderman"],
            )
            .with_default("arnold")
            .with_description("Default render engine"),
            SettingDefinition::number("ui_scale", "UI Scale")
                .with_default(1.0)
                .with_description("UI scaling factor"),
            SettingDefinition::boolean("auto_save_enabled", "Auto Save")
                .with_default(true)
                .with_description("Enable automatic saving"),
            SettingDefinition::number("auto_save_interval", "Auto Save Interval (minutes)")
                .with_default(10)
                .with_description("Auto save interval in minutes"),
        ],
    }
}

/// Blender
pub fn blender() -> PluginSchema {
    PluginSchema {
        name: "blender".to_string(),
        display_name: "Blender".to_string(),
        description: "Configuration settings for Blender".to_string(),
        settings: vec![
            SettingDefinition::text("project_path", "Project Path")
                .with_description("Default Blender project directory"),
            SettingDefinition::choice(
                "render_engine",
                "Render Engine",
                &["cycles", "eevee", "workbench"],
            )
            .with_default("cycles")
            .with_description("Default render engine"),
            SettingDefinition::number("samples", "Render Samples")
                .with_default(128)
                .with_description("Default render samples"),
            SettingDefinition::boolean("auto_save_enabled", "Auto Save")
                .with_default(true)
                .with_description("Enable automatic saving"),
            SettingDefinition::number("save_versions", "Save Versions")
                .with_default(3)
                .with_description("Number of backup versions to keep"),
        ],
    }
}

/// SideFX Houdini
pub fn houdini() -> PluginSchema {
    PluginSchema {
        name: "houdini".to_string(),
        display_name: "SideFX Houdini".to_string(),
        description: "Configuration settings for SideFX Houdini".to_string(),
        settings: vec![
            SettingDefinition::text("project_path", "Project Path")
                .with_description("Default Houdini project directory"),
            SettingDefinition::text("hip_directory", "HIP Directory")
                .with_description("Houdini scene file directory"),
            SettingDefinition::choice(
                "render_engine",
                "Render Engine",
                &["mantra", "karma", "redshift", "arnold"],
            )
            .with_default("mantra")
            .with_description("Default render engine"),
            SettingDefinition::text("cache_directory", "Cache Directory")
                .with_description("Default cache directory for simulations"),
            SettingDefinition::number("thread_count", "Thread Count")
                .with_default(0)
                .with_description("Number of threads (0 = auto)"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_schema;

    #[test]
    fn test_builtin_schemas_are_valid() {
        for schema in builtin_plugins() {
            assert_eq!(validate_schema(&schema), Ok(()), "{} is invalid", schema.name);
        }
    }

    #[test]
    fn test_numeric_defaults_encode_without_fraction() {
        let maya = maya();
        let encoded: Vec<String> = maya
            .settings
            .iter()
            .filter_map(|d| d.default_value.as_ref().map(|v| v.encode()))
            .collect();
        assert_eq!(encoded, vec!["arnold", "1", "true", "10"]);
    }
}
