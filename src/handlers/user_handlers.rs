use super::main_handlers::AppState;
use crate::auth;
use crate::error::AppError;
use crate::middleware::authenticated_user;
use crate::models::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest};
use actix_web::{web, HttpRequest, HttpResponse, Result};

fn issue_token(data: &AppState, user: &AuthenticatedUser) -> Result<String, AppError> {
    let jwt_secret = data
        .config
        .auth
        .as_ref()
        .and_then(|a| a.jwt_secret.as_ref())
        .ok_or_else(|| AppError::Internal("JWT secret not configured".to_string()))?;

    let claims = auth::Claims::new(
        user.id.clone(),
        user.username.clone(),
        user.email.clone(),
    );
    auth::generate_token(&claims, jwt_secret)
}

pub async fn register(
    data: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let register_req = request.into_inner();

    if register_req.password.len() < 6 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&register_req.password)?;
    let user = data
        .store
        .create_user(&register_req.username, &register_req.email, password_hash)?;

    tracing::info!("Registered new user: {}", user.username);

    let authenticated = AuthenticatedUser {
        id: user.id,
        username: user.username,
        email: user.email,
    };
    let token = issue_token(&data, &authenticated)?;

    let response = AuthResponse {
        token,
        user: authenticated,
    };

    Ok(HttpResponse::Created().json(response))
}

pub async fn login(
    data: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let login_req = request.into_inner();

    if login_req.username.trim().is_empty() || login_req.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = data
        .store
        .authenticate(login_req.username.trim(), &login_req.password)?;

    let authenticated = AuthenticatedUser {
        id: user.id,
        username: user.username,
        email: user.email,
    };
    let token = issue_token(&data, &authenticated)?;

    let response = AuthResponse {
        token,
        user: authenticated,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub async fn me(data: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let user = authenticated_user(&req)?;
    let stored = data.store.find_user(&user.id)?;

    let response = serde_json::json!({
        "authenticated": true,
        "user": {
            "id": stored.id,
            "username": stored.username,
            "email": stored.email,
            "created_at": stored.created_at,
            "last_login": stored.last_login_at,
        }
    });

    Ok(HttpResponse::Ok().json(response))
}
