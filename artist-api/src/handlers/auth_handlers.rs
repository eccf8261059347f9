use super::AppState;
use crate::auth::{self, current_user, Claims};
use crate::error::AppError;
use crate::storage::NewUser;
use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    let username_len = request.username.trim().chars().count();
    if !(3..=50).contains(&username_len) {
        return Err(AppError::InvalidRequest(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }

    let email_ok = request
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !email_ok {
        return Err(AppError::InvalidRequest("Invalid email address".to_string()));
    }

    if request.password.chars().count() < 8 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

pub async fn register(
    data: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    validate_registration(&request)?;

    let username = request.username.trim();
    if data.database.username_or_email_taken(username, &request.email)? {
        return Err(AppError::InvalidRequest(
            "Username or email already registered".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = data.database.create_user(&NewUser {
        username,
        email: &request.email,
        password_hash: &password_hash,
        full_name: request.full_name.as_deref(),
        section: request.section.as_deref(),
        unit: request.unit.as_deref(),
    })?;

    Ok(HttpResponse::Created().json(UserResponse { user }))
}

pub async fn login(
    data: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    let account = data.database.get_account_by_username(&request.username)?;
    let account = match account {
        Some(account) if auth::verify_password(&request.password, &account.password_hash)? => {
            account
        }
        _ => {
            tracing::warn!(username = %request.username, "Login failed");
            return Err(AppError::AuthenticationFailed(
                "Incorrect username or password".to_string(),
            ));
        }
    };

    if !account.user.is_active {
        return Err(AppError::InvalidRequest("Inactive user".to_string()));
    }

    let secret = data
        .config
        .jwt_secret()
        .ok_or_else(|| AppError::Internal("JWT secret is not configured".to_string()))?;
    let claims = Claims::new(
        account.user.id,
        account.user.username.clone(),
        data.config.token_expire_minutes(),
    );
    let token = auth::generate_token(&claims, secret)?;

    tracing::info!(user_id = account.user.id, "User logged in");
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

pub async fn me(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let caller = current_user(&req)?;
    let user = data.database.get_user_by_id(caller.id)?;
    Ok(HttpResponse::Ok().json(UserResponse { user }))
}
