use config::{Config, ConfigError, Environment, File};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 30;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: Option<AuthConfig>,
    pub cors: Option<CorsConfig>,
    pub plugins: Option<PluginsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_expire_minutes: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PluginsConfig {
    /// Directory of additional `*.toml` plugin schemas
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Write daily rolling log files here in addition to stdout
    pub directory: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                path: get_default_db_path(),
            },
            auth: None,
            cors: Some(CorsConfig {
                allowed_origins: default_allowed_origins(),
            }),
            plugins: None,
            logging: None,
        }
    }
}

impl ApiConfig {
    /// Load `~/.config/artist-config/api.toml`, writing a default file first if
    /// there is none, and make sure a JWT secret is configured.
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, default_config_file()).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
        }

        let mut config = Self::load_from_file(&config_path)?;
        config.ensure_jwt_secret(&config_path);

        Ok((config, config_path))
    }

    /// Load an explicit configuration file; `ARTIST__SECTION__KEY` environment
    /// variables override file values.
    pub fn load_from_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::Message(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .add_source(
                Environment::with_prefix("ARTIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;

        config.database.path = expand_tilde(&config.database.path);
        if let Some(plugins) = config.plugins.as_mut() {
            plugins.directory = plugins.directory.as_deref().map(expand_tilde);
        }
        if let Some(logging) = config.logging.as_mut() {
            logging.directory = logging.directory.as_deref().map(expand_tilde);
        }

        Ok(config)
    }

    pub fn jwt_secret(&self) -> Option<&str> {
        self.auth.as_ref().and_then(|a| a.jwt_secret.as_deref())
    }

    pub fn token_expire_minutes(&self) -> i64 {
        self.auth
            .as_ref()
            .and_then(|a| a.token_expire_minutes)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_MINUTES)
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors
            .as_ref()
            .map(|c| c.allowed_origins.clone())
            .unwrap_or_else(default_allowed_origins)
    }

    pub fn plugins_dir(&self) -> Option<&Path> {
        self.plugins.as_ref().and_then(|p| p.directory.as_deref())
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.logging.as_ref().and_then(|l| l.directory.as_deref())
    }

    /// Generate and persist a JWT secret when the loaded configuration has none
    pub fn ensure_jwt_secret(&mut self, config_path: &Path) {
        if self.jwt_secret().is_some() {
            return;
        }

        let new_secret = generate_jwt_secret();
        tracing::info!("Generated new JWT secret for authentication");
        self.auth.get_or_insert_with(AuthConfig::default).jwt_secret = Some(new_secret.clone());

        if let Err(e) = update_config_file_with_jwt_secret(config_path, &new_secret) {
            tracing::warn!("Failed to save JWT secret to config file: {e}");
            tracing::warn!("The JWT secret will be regenerated on next restart");
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_config_file() -> String {
    format!(
        r#"[server]
host = "127.0.0.1"
port = 8000

[database]
path = "{}"

[auth]
# jwt_secret = "generated on first start"
token_expire_minutes = {}

[cors]
allowed_origins = ["http://localhost:3000", "http://localhost:5173"]

[plugins]
# directory = "~/.config/artist-config/plugins"

[logging]
# directory = "~/.local/share/artist-config/logs"
"#,
        get_default_db_path().display(),
        DEFAULT_TOKEN_EXPIRE_MINUTES
    )
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            return PathBuf::from(path_str.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    path.to_path_buf()
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("artist-config/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("artist-config/artist.db")
    } else {
        PathBuf::from("artist.db")
    }
}

/// 48 random bytes, base64 encoded
fn generate_jwt_secret() -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..48).map(|_| rng.random()).collect();
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &random_bytes)
}

/// Write `jwt_secret` into the `[auth]` section, replacing a commented or
/// existing entry, and append the section if the file has none
fn update_config_file_with_jwt_secret(
    config_path: &Path,
    jwt_secret: &str,
) -> Result<(), std::io::Error> {
    let content = std::fs::read_to_string(config_path)?;
    let mut lines: Vec<String> = content.lines().map(|s| s.to_string()).collect();
    let secret_line = format!("jwt_secret = \"{}\"", jwt_secret);

    let auth_start = lines.iter().position(|l| l.trim() == "[auth]");

    match auth_start {
        Some(start) => {
            let section_end = lines[start + 1..]
                .iter()
                .position(|l| {
                    let l = l.trim();
                    l.starts_with('[') && l.ends_with(']')
                })
                .map(|offset| start + 1 + offset)
                .unwrap_or(lines.len());

            let existing = lines[start + 1..section_end].iter().position(|l| {
                let l = l.trim();
                l.starts_with("jwt_secret") || l.starts_with("# jwt_secret")
            });

            match existing {
                Some(offset) => lines[start + 1 + offset] = secret_line,
                None => lines.insert(start + 1, secret_line),
            }
        }
        None => {
            lines.push(String::new());
            lines.push("[auth]".to_string());
            lines.push(secret_line);
        }
    }

    std::fs::write(config_path, lines.join("\n") + "\n")
}
