use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use artist_api::config::ApiConfig;
use artist_api::handlers::AppState;
use artist_api::middleware::AuthenticationMiddleware;
use artist_api::routes::configure_routes;
use artist_api::storage::Database;
use artist_api::{load_plugin_registry, logging};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "artist-api", version, about = "Artist settings API server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<(ApiConfig, PathBuf)> {
    match &cli.config {
        Some(path) => {
            let mut config = ApiConfig::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            config.ensure_jwt_secret(path);
            Ok((config, path.clone()))
        }
        None => Ok(ApiConfig::load()?),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_path) = load_config(&cli)?;

    let _log_guard = logging::init_tracing(config.log_dir());
    tracing::info!("Starting artist settings API");
    tracing::info!("Loaded configuration from {}", config_path.display());

    let database = Arc::new(Database::new(&config.database.path)?);
    tracing::info!("Database initialized at {}", config.database.path.display());

    let registry = load_plugin_registry(&config)?;
    tracing::info!("Registered {} plugin schemas", registry.plugins().len());

    let server_addr = format!("{}:{}", config.server.host, config.server.port);
    let allowed_origins = config.allowed_origins();
    let app_state = web::Data::new(AppState::new(database, registry, config));

    tracing::info!("Starting HTTP server on {}", server_addr);
    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .wrap(AuthenticationMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
