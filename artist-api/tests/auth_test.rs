mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::{bearer, read_json, setup_test_app, signup, TEST_PASSWORD};
use shared_types::{ErrorResponse, UserResponse};

#[actix_rt::test]
async fn test_health_is_public() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = read_json(resp).await?;
    assert_eq!(body["status"], "healthy");

    Ok(())
}

#[actix_rt::test]
async fn test_protected_route_requires_token() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get().uri("/api/projects").to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorResponse = read_json(resp).await?;
    assert_eq!(body.error, "unauthorized");

    let req = TestRequest::get()
        .uri("/api/projects")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[actix_rt::test]
async fn test_register_login_and_me() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (user, token) = signup(&test_app.app, "mira").await?;

    assert_eq!(user.username, "mira");
    assert!(user.is_active);

    let req = TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let me: UserResponse = read_json(resp).await?;
    assert_eq!(me.user.id, user.id);

    Ok(())
}

#[actix_rt::test]
async fn test_duplicate_registration_is_rejected() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    signup(&test_app.app, "mira").await?;

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "username": "mira",
            "email": "another@studio.test",
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[actix_rt::test]
async fn test_login_failures() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (user, _) = signup(&test_app.app, "mira").await?;

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "mira", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    test_app.db.set_user_active(user.id, false)?;
    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": "mira", "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
