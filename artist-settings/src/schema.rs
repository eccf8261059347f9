use shared_types::{DefaultValue, PluginSchema, SettingType};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchemaError {
    #[error("Plugin name must not be empty")]
    EmptyName,

    #[error("Plugin '{plugin}' declares key '{key}' more than once")]
    DuplicateKey { plugin: String, key: String },

    #[error("Plugin '{plugin}' has a setting with an empty key")]
    EmptyKey { plugin: String },

    #[error("Setting '{key}' in plugin '{plugin}' is an enum without options")]
    MissingOptions { plugin: String, key: String },

    #[error("Setting '{key}' in plugin '{plugin}' has options but is of type {setting_type}")]
    UnexpectedOptions {
        plugin: String,
        key: String,
        setting_type: SettingType,
    },

    #[error("Default of setting '{key}' in plugin '{plugin}' does not fit type {setting_type}")]
    InvalidDefault {
        plugin: String,
        key: String,
        setting_type: SettingType,
    },

    #[error("Failed to read plugin schema {path}: {message}")]
    Load { path: String, message: String },
}

/// Check the structural invariants of a plugin schema.
///
/// Keys are unique and non-empty, `options` is present (and non-empty) exactly
/// for enum settings, and defaults match their declared type. An enum default
/// must be one of the options.
pub fn validate_schema(schema: &PluginSchema) -> Result<(), SchemaError> {
    if schema.name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }

    let mut seen = HashSet::new();

    for definition in &schema.settings {
        let plugin = || schema.name.clone();
        let key = || definition.key.clone();

        if definition.key.trim().is_empty() {
            return Err(SchemaError::EmptyKey { plugin: plugin() });
        }

        if !seen.insert(definition.key.as_str()) {
            return Err(SchemaError::DuplicateKey {
                plugin: plugin(),
                key: key(),
            });
        }

        match (definition.setting_type, &definition.options) {
            (SettingType::Enum, None) => {
                return Err(SchemaError::MissingOptions {
                    plugin: plugin(),
                    key: key(),
                })
            }
            (SettingType::Enum, Some(options)) if options.is_empty() => {
                return Err(SchemaError::MissingOptions {
                    plugin: plugin(),
                    key: key(),
                })
            }
            (SettingType::Enum, Some(_)) => {}
            (setting_type, Some(_)) => {
                return Err(SchemaError::UnexpectedOptions {
                    plugin: plugin(),
                    key: key(),
                    setting_type,
                })
            }
            (_, None) => {}
        }

        if let Some(default) = &definition.default_value {
            let representable = match (definition.setting_type, default) {
                (SettingType::Enum, DefaultValue::Text(value)) => definition.allows(value),
                // the form would show "NaN" or "inf", which never validates
                (_, DefaultValue::Number(value)) => value.is_finite(),
                _ => true,
            };

            if !default.fits(definition.setting_type) || !representable {
                return Err(SchemaError::InvalidDefault {
                    plugin: plugin(),
                    key: key(),
                    setting_type: definition.setting_type,
                });
            }
        }
    }

    Ok(())
}
