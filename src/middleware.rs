use crate::auth::validate_token;
use crate::error::AppError;
use crate::models::AuthenticatedUser;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    web, Error, HttpMessage, HttpRequest,
};
use futures_util::future::{ready, Ready};

const PUBLIC_PATHS: &[&str] = &["/api/health", "/api/auth/login", "/api/auth/register"];

/// Authentication middleware that extracts the JWT bearer token and attaches
/// the authenticated user to request extensions
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

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future =
        futures_util::future::LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();

        // Registration, login, and health check stay reachable without a token
        if PUBLIC_PATHS.contains(&path.as_str()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let jwt_secret = req
            .app_data::<web::Data<crate::handlers::AppState>>()
            .and_then(|state| state.config.auth.as_ref())
            .and_then(|auth| auth.jwt_secret.clone());

        let jwt_secret = match jwt_secret {
            Some(secret) => secret,
            None => {
                tracing::error!("Auth failed: JWT secret not configured");
                return Box::pin(async {
                    Err(actix_web::error::ErrorInternalServerError(
                        "Authentication not configured",
                    ))
                });
            }
        };

        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let auth_header = match auth_header {
            Some(h) => h,
            None => {
                tracing::warn!("Auth failed: missing Authorization header");
                return Box::pin(async { Err(ErrorUnauthorized("Missing Authorization header")) });
            }
        };

        let token = match auth_header.strip_prefix("Bearer ") {
            Some(t) => t.to_string(),
            None => {
                tracing::warn!("Auth failed: invalid Authorization header format");
                return Box::pin(async {
                    Err(ErrorUnauthorized(
                        "Invalid Authorization header format. Expected 'Bearer <token>'",
                    ))
                });
            }
        };

        match validate_token(&token, &jwt_secret) {
            Ok(claims) => {
                let user = AuthenticatedUser {
                    id: claims.sub,
                    username: claims.username,
                    email: claims.email,
                };
                tracing::debug!("Auth successful for user: {}", user.username);
                req.extensions_mut().insert(user);

                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(_) => {
                tracing::warn!("Auth failed: invalid or expired token");
                Box::pin(async { Err(ErrorUnauthorized("Invalid or expired token")) })
            }
        }
    }
}

/// Extract the authenticated user from request extensions
pub fn authenticated_user(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}
