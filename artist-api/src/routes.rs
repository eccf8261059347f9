//! Route table shared by the server binary and the integration tests.

use crate::handlers::{
    auth_handlers, dcc_handlers, health_check, index, project_handlers, setting_handlers,
};
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth_handlers::register))
                    .route("/login", web::post().to(auth_handlers::login))
                    .route("/me", web::get().to(auth_handlers::me)),
            )
            .service(
                web::scope("/projects")
                    .route("", web::get().to(project_handlers::list_projects))
                    .route("", web::post().to(project_handlers::create_project))
                    .route("/{id}", web::get().to(project_handlers::get_project))
                    .route("/{id}", web::put().to(project_handlers::update_project))
                    .route("/{id}", web::delete().to(project_handlers::delete_project)),
            )
            .service(
                web::scope("/settings")
                    .route("", web::get().to(setting_handlers::list_settings))
                    .route("", web::post().to(setting_handlers::create_setting))
                    .route("/{id}", web::get().to(setting_handlers::get_setting))
                    .route("/{id}", web::put().to(setting_handlers::update_setting))
                    .route("/{id}", web::delete().to(setting_handlers::delete_setting)),
            )
            .service(
                web::scope("/dcc")
                    .route("/plugins", web::get().to(dcc_handlers::list_plugins))
                    .route("/templates", web::get().to(dcc_handlers::get_templates))
                    .route(
                        "/templates/{plugin}",
                        web::get().to(dcc_handlers::get_template),
                    )
                    .route("/{plugin}/form", web::get().to(dcc_handlers::get_form))
                    .route("/{plugin}/form", web::post().to(dcc_handlers::submit_form))
                    .route(
                        "/{plugin}/form/preview",
                        web::post().to(dcc_handlers::preview_form),
                    ),
            ),
    );
}
