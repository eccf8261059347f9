mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use artist_settings::PluginRegistry;
use common::{
    bearer, create_project, read_json, setup_test_app, setup_test_app_with_registry, signup,
};
use shared_types::{
    ApplyStatus, ErrorResponse, FieldViolation, FormStateResponse, PartialApplyResponse,
    PluginListResponse, PluginSchema, SettingDefinition, SettingListResponse, SubmitFormResponse, TemplatesResponse,
    ValidationErrorResponse, WritePlanEntry, WritePlanResponse,
};

#[actix_rt::test]
async fn test_list_plugins_and_templates() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, token) = signup(&test_app.app, "mira").await?;

    let req = TestRequest::get()
        .uri("/api/dcc/plugins")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let plugins: PluginListResponse = read_json(resp).await?;
    let names: Vec<_> = plugins.plugins.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["maya", "blender", "houdini"]);

    let req = TestRequest::get()
        .uri("/api/dcc/templates")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let templates: TemplatesResponse = read_json(resp).await?;
    assert_eq!(templates.templates.len(), 3);
    assert!(templates.templates["maya"]
        .iter()
        .any(|d| d.key == "render_engine"));

    let req = TestRequest::get()
        .uri("/api/dcc/templates/nuke")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = read_json(resp).await?;
    assert_eq!(body.error, "schema_not_found");

    Ok(())
}

#[actix_rt::test]
async fn test_form_requires_selected_project() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, token) = signup(&test_app.app, "mira").await?;

    let req = TestRequest::get()
        .uri("/api/dcc/maya/form")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = read_json(resp).await?;
    assert_eq!(body.error, "no_project_selected");

    Ok(())
}

#[actix_rt::test]
async fn test_form_of_foreign_project_is_not_found() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, owner_token) = signup(&test_app.app, "owner").await?;
    let (_, other_token) = signup(&test_app.app, "other").await?;
    let project = create_project(&test_app.app, &owner_token, "Shot 010").await?;

    let req = TestRequest::get()
        .uri(&format!("/api/dcc/maya/form?project_id={}", project.id))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[actix_rt::test]
async fn test_fresh_form_shows_defaults() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, token) = signup(&test_app.app, "mira").await?;
    let project = create_project(&test_app.app, &token, "Shot 010").await?;

    let req = TestRequest::get()
        .uri(&format!("/api/dcc/maya/form?project_id={}", project.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let form: FormStateResponse = read_json(resp).await?;
    assert_eq!(form.project_id, project.id);
    assert_eq!(form.plugin.name, "maya");
    assert_eq!(form.values["render_engine"], "arnold");
    assert_eq!(form.values["auto_save_enabled"], "true");
    assert_eq!(form.values["auto_save_interval"], "10");
    assert_eq!(form.values["workspace_path"], "");

    Ok(())
}

#[actix_rt::test]
async fn test_submit_then_resubmit_is_idempotent() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (user, token) = signup(&test_app.app, "mira").await?;
    let project = create_project(&test_app.app, &token, "Shot 010").await?;
    let form_uri = format!("/api/dcc/maya/form?project_id={}", project.id);

    let values = serde_json::json!({
        "values": {
            "workspace_path": "/shows/demo/maya",
            "render_engine": "redshift",
            "auto_save_enabled": "true",
        }
    });

    let req = TestRequest::post()
        .uri(&form_uri)
        .insert_header(bearer(&token))
        .set_json(&values)
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let submitted: SubmitFormResponse = read_json(resp).await?;
    let status_of = |key: &str| {
        submitted
            .results
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.status)
    };
    assert_eq!(status_of("workspace_path"), Some(ApplyStatus::Created));
    assert_eq!(status_of("render_engine"), Some(ApplyStatus::Created));
    // equal to the default, so nothing is stored
    assert_eq!(status_of("auto_save_enabled"), Some(ApplyStatus::Unchanged));

    let stored = test_app.db.connection();
    let count: i64 = stored
        .lock()
        .map_err(|e| anyhow::anyhow!("{e}"))?
        .query_row(
            "SELECT COUNT(*) FROM user_settings WHERE user_id = ?1 AND project_id = ?2",
            [user.id, project.id],
            |row| row.get(0),
        )?;
    assert_eq!(count, 2);

    let req = TestRequest::post()
        .uri(&form_uri)
        .insert_header(bearer(&token))
        .set_json(&values)
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let resubmitted: SubmitFormResponse = read_json(resp).await?;
    assert!(resubmitted
        .results
        .iter()
        .all(|r| r.status == ApplyStatus::Unchanged));

    let req = TestRequest::get()
        .uri(&form_uri)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let form: FormStateResponse = read_json(resp).await?;
    assert_eq!(form.values["render_engine"], "redshift");
    assert_eq!(form.values["workspace_path"], "/shows/demo/maya");

    Ok(())
}

#[actix_rt::test]
async fn test_preview_does_not_write() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, token) = signup(&test_app.app, "mira").await?;
    let project = create_project(&test_app.app, &token, "Shot 010").await?;

    let req = TestRequest::post()
        .uri(&format!("/api/dcc/maya/form/preview?project_id={}", project.id))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({ "values": { "ui_scale": "1.5" } }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let preview: WritePlanResponse = read_json(resp).await?;
    assert_eq!(
        preview.plan,
        vec![WritePlanEntry::Create {
            category: "maya".to_string(),
            key: "ui_scale".to_string(),
            value: "1.5".to_string(),
            description: Some("UI scaling factor".to_string()),
        }]
    );

    let req = TestRequest::get()
        .uri(&format!("/api/settings?project_id={}", project.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let list: SettingListResponse = read_json(resp).await?;
    assert!(list.settings.is_empty());

    Ok(())
}

#[actix_rt::test]
async fn test_invalid_submission_is_rejected_without_writes() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, token) = signup(&test_app.app, "mira").await?;
    let project = create_project(&test_app.app, &token, "Shot 010").await?;

    let req = TestRequest::post()
        .uri(&format!("/api/dcc/maya/form?project_id={}", project.id))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "values": {
                "workspace_path": "/shows/demo/maya",
                "render_engine": "cycles",
                "ui_scale": "big",
            }
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: ValidationErrorResponse = read_json(resp).await?;
    assert_eq!(body.error, "validation_failed");
    assert!(body.violations.contains(&FieldViolation::InvalidOption {
        key: "render_engine".to_string(),
        value: "cycles".to_string(),
    }));
    assert!(body.violations.contains(&FieldViolation::InvalidNumber {
        key: "ui_scale".to_string(),
        value: "big".to_string(),
    }));

    let req = TestRequest::get()
        .uri(&format!("/api/settings?project_id={}", project.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let list: SettingListResponse = read_json(resp).await?;
    assert!(list.settings.is_empty());

    Ok(())
}

#[actix_rt::test]
async fn test_required_field_with_custom_plugin() -> anyhow::Result<()> {
    let mut registry = PluginRegistry::new();
    registry.register(PluginSchema {
        name: "nuke".to_string(),
        display_name: "Foundry Nuke".to_string(),
        description: "Compositing settings".to_string(),
        settings: vec![
            SettingDefinition::text("license_server", "License Server").required(),
            SettingDefinition::number("proxy_scale", "Proxy Scale").with_default(0.5),
        ],
    })?;

    let test_app = setup_test_app_with_registry(registry).await?;
    let (_, token) = signup(&test_app.app, "mira").await?;
    let project = create_project(&test_app.app, &token, "Comp").await?;

    let req = TestRequest::post()
        .uri(&format!("/api/dcc/nuke/form?project_id={}", project.id))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({ "values": { "license_server": "", "proxy_scale": "0.25" } }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ValidationErrorResponse = read_json(resp).await?;
    assert_eq!(
        body.violations,
        vec![FieldViolation::MissingRequiredField {
            key: "license_server".to_string()
        }]
    );

    let req = TestRequest::post()
        .uri(&format!("/api/dcc/nuke/form?project_id={}", project.id))
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "values": { "license_server": "4101@licserver", "proxy_scale": "0.25" }
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let submitted: SubmitFormResponse = read_json(resp).await?;
    assert_eq!(submitted.plan.iter().filter(|e| e.is_write()).count(), 2);

    Ok(())
}

#[actix_rt::test]
async fn test_partially_applied_submission_reports_each_key() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let (_, token) = signup(&test_app.app, "mira").await?;
    let project = create_project(&test_app.app, &token, "Shot 010").await?;

    // the backend refuses one of the two inserts
    test_app
        .db
        .connection()
        .lock()
        .map_err(|e| anyhow::anyhow!("{e}"))?
        .execute_batch(
            "CREATE TRIGGER reject_render_engine BEFORE INSERT ON user_settings
             WHEN NEW.key = 'render_engine'
             BEGIN SELECT RAISE(ABORT, 'render engine is locked'); END;",
        )?;

    let form_uri = format!("/api/dcc/maya/form?project_id={}", project.id);
    let req = TestRequest::post()
        .uri(&form_uri)
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({
            "values": {
                "workspace_path": "/shows/demo/maya",
                "render_engine": "redshift",
            }
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), StatusCode::MULTI_STATUS);

    let body: PartialApplyResponse = read_json(resp).await?;
    assert_eq!(body.error, "partial_apply_failure");
    assert_eq!(body.succeeded, vec!["workspace_path".to_string()]);
    assert_eq!(body.failed.len(), 1);
    assert_eq!(body.failed[0].key, "render_engine");
    assert!(body.failed[0].error.contains("render engine is locked"));

    // the successful write stays applied
    let req = TestRequest::get()
        .uri(&form_uri)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    let form: FormStateResponse = read_json(resp).await?;
    assert_eq!(form.values["workspace_path"], "/shows/demo/maya");
    assert_eq!(form.values["render_engine"], "arnold");

    Ok(())
}
