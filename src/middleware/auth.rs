use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::{self, Claims, SESSION_COOKIE};
use crate::error::ApiError;

/// Authenticated identity extracted from the session token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user_email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            user_email: claims.user_email,
        }
    }
}

/// Session gate: verifies the auth cookie and attaches the caller identity
/// to the request. Layered on every route except register/login/logout and
/// the public root.
pub async fn session_auth_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(request.headers());

    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            ApiError::unauthenticated("Unauthorized request: Missing authentication token")
        })?;

    let claims = auth::verify_token(&token).map_err(|e| {
        tracing::warn!("session token rejected: {}", e);
        ApiError::unauthenticated("Unauthorized request")
    })?;

    // A claim without a usable identity is treated the same as a bad signature
    if claims.user_id.is_nil() || claims.user_email.trim().is_empty() {
        return Err(ApiError::unauthenticated("Unauthorized request"));
    }

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
