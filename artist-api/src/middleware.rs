use crate::auth::{validate_token, AuthUser};
use crate::error::AppError;
use crate::handlers::AppState;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

/// Paths reachable without a bearer token
const PUBLIC_PATHS: &[&str] = &["/", "/api/health", "/api/auth/login", "/api/auth/register"];

/// Authentication middleware that validates the bearer JWT and attaches the
/// caller as [`AuthUser`] to the request
pub struct AuthenticationMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthenticationMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthenticationMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddlewareService { service }))
    }
}

pub struct AuthenticationMiddlewareService<S> {
    service: S,
}

fn authenticate(req: &ServiceRequest) -> Result<AuthUser, AppError> {
    let jwt_secret = req
        .app_data::<web::Data<AppState>>()
        .and_then(|state| state.config.jwt_secret().map(str::to_string))
        .ok_or_else(|| AppError::Internal("JWT secret is not configured".to_string()))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized(
            "Invalid Authorization header format. Expected 'Bearer <token>'".to_string(),
        )
    })?;

    AuthUser::try_from(validate_token(token, &jwt_secret)?)
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(self.service.call(req));
        }

        match authenticate(&req) {
            Ok(user) => {
                tracing::debug!(user_id = user.id, path = %req.path(), "Authenticated request");
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), "Auth failed: {}", e);
                Box::pin(async move { Err(e.into()) })
            }
        }
    }
}
