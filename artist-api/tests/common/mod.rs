#![allow(dead_code)]

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use artist_api::config::{ApiConfig, AuthConfig};
use artist_api::handlers::AppState;
use artist_api::middleware::AuthenticationMiddleware;
use artist_api::routes::configure_routes;
use artist_api::storage::Database;
use artist_settings::PluginRegistry;
use serde::de::DeserializeOwned;
use shared_types::{Project, ProjectResponse, TokenResponse, User, UserResponse};
use std::sync::Arc;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub struct TestApp<S> {
    pub db: Arc<Database>,
    pub app: S,
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        auth: Some(AuthConfig {
            jwt_secret: Some("test-secret-for-integration-tests".to_string()),
            token_expire_minutes: Some(5),
        }),
        ..ApiConfig::default()
    }
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>>,
> {
    setup_test_app_with_registry(PluginRegistry::with_builtin_plugins()).await
}

pub async fn setup_test_app_with_registry(
    registry: PluginRegistry,
) -> anyhow::Result<
    TestApp<impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>>,
> {
    let db = Arc::new(Database::open_in_memory()?);
    let state = AppState::new(db.clone(), registry, test_config());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(AuthenticationMiddleware)
            .configure(configure_routes),
    )
    .await;

    Ok(TestApp { db, app })
}

pub async fn read_json<T: DeserializeOwned>(resp: ServiceResponse) -> anyhow::Result<T> {
    let body = test::read_body(resp).await;
    Ok(serde_json::from_slice(&body)?)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Register `username` and log in, returning the user and an access token
pub async fn signup<S>(app: &S, username: &str) -> anyhow::Result<(User, String)>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": username,
            "email": format!("{username}@studio.test"),
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    anyhow::ensure!(resp.status().is_success(), "register failed: {}", resp.status());
    let user = read_json::<UserResponse>(resp).await?.user;

    let token = login(app, username).await?;
    Ok((user, token))
}

pub async fn login<S>(app: &S, username: &str) -> anyhow::Result<String>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "username": username,
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    anyhow::ensure!(resp.status().is_success(), "login failed: {}", resp.status());
    Ok(read_json::<TokenResponse>(resp).await?.access_token)
}

pub async fn create_project<S>(app: &S, token: &str, name: &str) -> anyhow::Result<Project>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = TestRequest::post()
        .uri("/api/projects")
        .insert_header(bearer(token))
        .set_json(serde_json::json!({ "name": name }))
        .to_request();
    let resp = test::call_service(app, req).await;
    anyhow::ensure!(resp.status().is_success(), "create project failed: {}", resp.status());
    Ok(read_json::<ProjectResponse>(resp).await?.project)
}
