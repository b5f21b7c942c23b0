use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use super::normalize;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::server::AppState;
use crate::store::models::User;
use crate::validation::{rules, Chain, Rule, RuleError};

#[derive(Debug, Deserialize)]
pub struct UpdateUsernameRequest {
    pub username: Option<String>,
}

/// GET /api/users - the caller's own record. Credential fields are never
/// serialized.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state
        .store
        .find_user(auth_user.user_id)
        .await?
        .filter(|u| u.email == auth_user.user_email)
        .ok_or_else(|| ApiError::not_found("User Not Found"))?;

    Ok(ApiResponse::success("User Found", user))
}

/// PATCH /api/users - replace the caller's username.
pub async fn update_username(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateUsernameRequest>,
) -> ApiResult<()> {
    let store = state.store.clone();
    let username = normalize(payload.username.as_deref());

    let username_unique = {
        let store = store.clone();
        let username = username.clone();
        let caller = auth_user.user_id;
        async move {
            match store.find_user_by_username(&username).await {
                Ok(Some(existing)) if existing.id != caller => Err(RuleError::Abort(
                    ApiError::conflict("Username Already Exists"),
                )),
                Ok(_) => Ok(()),
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
                    "A username is required",
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
        .run()
        .await?;

    let outcome = store.update_username(auth_user.user_id, &username).await?;
    if outcome.matched == 0 {
        return Err(ApiError::not_found("User Not Found"));
    }

    // Matched with an unchanged name: idempotent success
    Ok(ApiResponse::no_content())
}
