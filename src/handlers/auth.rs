use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use super::normalize;
use crate::auth::{self, Claims, SESSION_COOKIE};
use crate::config;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::server::AppState;
use crate::store::models::User;
use crate::validation::{rules, Chain, Rule, RuleError};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/register - create an account and open a session.
///
/// Expected input: `{username, email, password}`. Responds 201 and sets the
/// session cookie; duplicate username/email responds 409.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(CookieJar, ApiResponse<()>), ApiError> {
    let store = state.store.clone();
    let username = normalize(payload.username.as_deref());
    let email = normalize(payload.email.as_deref());

    let username_unique = {
        let store = store.clone();
        let username = username.clone();
        async move {
            match store.find_user_by_username(&username).await {
                Ok(Some(_)) => Err(RuleError::Abort(ApiError::conflict(
                    "Username Already Exists",
                ))),
                Ok(None) => Ok(()),
                Err(e) => Err(RuleError::Abort(e.into())),
            }
        }
    };
    let email_unique = {
        let store = store.clone();
        let email = email.clone();
        async move {
            match store.find_user_by_email(&email).await {
                Ok(Some(_)) => Err(RuleError::Abort(ApiError::conflict("Email Already Exists"))),
                Ok(None) => Ok(()),
                Err(e) => Err(RuleError::Abort(e.into())),
            }
        }
    };

    Chain::new()
        .field(
            "username",
            vec![
                Rule::check(rules::required(
                    payload.username.as_deref(),
                    "Username is required",
                )),
                Rule::check(rules::min_len(
                    payload.username.as_deref(),
                    3,
                    "A username must be at least 3 characters",
                )),
                Rule::check(rules::alphanumeric(
                    payload.username.as_deref(),
                    "A username can contain letters and numbers only",
                )),
                Rule::lookup(username_unique),
            ],
        )
        .field(
            "email",
            vec![
                Rule::check(rules::required(payload.email.as_deref(), "Email is required")),
                Rule::check(rules::email(payload.email.as_deref(), "Invalid email format")),
                Rule::lookup(email_unique),
            ],
        )
        .field(
            "password",
            vec![
                Rule::check(rules::required(
                    payload.password.as_deref(),
                    "Password is required",
                )),
                Rule::check(rules::min_len(
                    payload.password.as_deref(),
                    8,
                    "Password must be at least 8 characters long",
                )),
            ],
        )
        .run()
        .await?;

    let password = payload.password.as_deref().unwrap_or_default();
    let user = User::register(&username, &email, password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Failed to secure credentials")
    })?;
    let user = store.insert_user(user).await?;

    tracing::info!(user = %user.id, "user registered");

    let token = auth::issue_token(&Claims::new(user.id, user.email.clone()))?;
    Ok((
        jar.add(session_cookie(token)),
        ApiResponse::created("User Registered"),
    ))
}

/// POST /api/auth/login - authenticate credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(CookieJar, ApiResponse<()>), ApiError> {
    Chain::new()
        .field(
            "username",
            vec![
                Rule::check(rules::required(
                    payload.username.as_deref(),
                    "Username is required",
                )),
                Rule::check(rules::min_len(
                    payload.username.as_deref(),
                    3,
                    "A username must be at least 3 characters",
                )),
                Rule::check(rules::alphanumeric(
                    payload.username.as_deref(),
                    "A username can contain letters and numbers only",
                )),
            ],
        )
        .field(
            "email",
            vec![
                Rule::check(rules::required(payload.email.as_deref(), "Email is required")),
                Rule::check(rules::email(payload.email.as_deref(), "Invalid email format")),
            ],
        )
        .field(
            "password",
            vec![
                Rule::check(rules::required(
                    payload.password.as_deref(),
                    "Password is required",
                )),
                Rule::check(rules::min_len(
                    payload.password.as_deref(),
                    8,
                    "Password must be at least 8 characters long",
                )),
            ],
        )
        .run()
        .await?;

    let username = normalize(payload.username.as_deref());
    let email = normalize(payload.email.as_deref());

    let user = state
        .store
        .find_user_by_identity(&username, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User Not Found"))?;

    if !user.verify_password(payload.password.as_deref().unwrap_or_default()) {
        tracing::warn!(user = %user.id, "login rejected: password mismatch");
        return Err(ApiError::unauthenticated("Invalid credentials"));
    }

    let token = auth::issue_token(&Claims::new(user.id, user.email.clone()))?;
    Ok((
        jar.add(session_cookie(token)),
        ApiResponse::message_only("User login succeeded"),
    ))
}

/// POST /api/auth/logout - close the session by clearing the cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<()>) {
    let cleared = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (cleared, ApiResponse::no_content())
}

/// Builds the session cookie carrying the signed token.
fn session_cookie(token: String) -> Cookie<'static> {
    let security = &config::config().security;

    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(security.cookie_secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::minutes(security.session_ttl_minutes as i64))
        .build()
}
