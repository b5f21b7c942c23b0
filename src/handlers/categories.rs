use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::server::AppState;
use crate::services::ownership;
use crate::store::models::Category;
use crate::validation::{rules, Chain, Rule};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub new_label: Option<String>,
}

/// POST /api/categories - create a category for the caller.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateCategoryRequest>,
) -> ApiResult<()> {
    Chain::new()
        .field(
            "label",
            vec![
                Rule::check(rules::required(
                    payload.label.as_deref(),
                    "A label for the category is required",
                )),
                Rule::check(rules::alphanumeric(
                    payload.label.as_deref(),
                    "A label can contain letters and numbers only",
                )),
            ],
        )
        .run()
        .await?;

    let label = payload.label.as_deref().unwrap_or_default();
    state
        .store
        .insert_category(Category::new(label, auth_user.user_id))
        .await?;

    Ok(ApiResponse::created("Category successfully created"))
}

/// GET /api/categories - the caller's categories.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Category>> {
    let categories = state.store.list_categories(auth_user.user_id).await?;

    if categories.is_empty() {
        return Err(ApiError::not_found("No Categories Found"));
    }

    Ok(ApiResponse::success(
        "Categories successfully retrieved",
        categories,
    ))
}

/// PATCH /api/categories/:category_id - replace a category's label.
pub async fn update_label(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(category_id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> ApiResult<()> {
    let store = state.store.clone();

    let category_guard = {
        let store = store.clone();
        let raw = category_id.clone();
        let user_id = auth_user.user_id;
        async move { ownership::resolve_owned_category(store.as_ref(), &raw, user_id).await }
    };

    Chain::new()
        .field("categoryId", vec![Rule::guard(category_guard)])
        .field(
            "newLabel",
            vec![
                Rule::check(rules::required(
                    payload.new_label.as_deref(),
                    "A label for the category is required",
                )),
                Rule::check(rules::alphanumeric(
                    payload.new_label.as_deref(),
                    "A label can contain letters and numbers only",
                )),
            ],
        )
        .run()
        .await?;

    let label = payload
        .new_label
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let outcome = store
        .update_category_label(ownership::parse_id(&category_id)?, auth_user.user_id, &label)
        .await?;

    if outcome.matched == 0 {
        // Vanished between validation and write
        return Err(ApiError::not_found("Category Not Found"));
    }

    // Matched with an unchanged label: idempotent success
    Ok(ApiResponse::no_content())
}

/// DELETE /api/categories/:category_id - delete a category, detaching it
/// from every note that references it first.
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(category_id): Path<String>,
) -> ApiResult<()> {
    let category =
        ownership::resolve_owned_category(state.store.as_ref(), &category_id, auth_user.user_id)
            .await?;

    let detached = state
        .store
        .detach_category_from_notes(auth_user.user_id, category.id)
        .await?;
    if detached > 0 {
        tracing::debug!(category = %category.id, notes = detached, "category detached from notes");
    }

    let deleted = state
        .store
        .delete_category(category.id, auth_user.user_id)
        .await?;
    if deleted == 0 {
        // Vanished between validation and write
        return Err(ApiError::not_found("Category Not Found"));
    }

    Ok(ApiResponse::message_only("Category deleted successfully"))
}
