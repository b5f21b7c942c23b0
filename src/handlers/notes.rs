use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::server::AppState;
use crate::services::{note_fields, ownership};
use crate::store::models::Note;
use crate::store::NoteQuery;
use crate::validation::{rules, Chain, Rule};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub details: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListQuery {
    pub category_id: Option<String>,
    pub title: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub new_value: Option<String>,
}

/// POST /api/notes - create a note for the caller. A supplied categoryId
/// must resolve to a category the caller owns.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateNoteRequest>,
) -> ApiResult<()> {
    let store = state.store.clone();

    let mut chain = Chain::new().field(
        "title",
        vec![
            Rule::check(rules::required(
                payload.title.as_deref(),
                "A note must have a title",
            )),
            Rule::check(rules::alphanumeric(
                payload.title.as_deref(),
                "A title can contain letters and numbers only",
            )),
        ],
    );

    let category_id = payload
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty());

    if let Some(raw) = category_id {
        let category_guard = {
            let store = store.clone();
            let raw = raw.to_string();
            let user_id = auth_user.user_id;
            async move { ownership::resolve_owned_category(store.as_ref(), &raw, user_id).await }
        };
        chain = chain.field("categoryId", vec![Rule::guard(category_guard)]);
    }

    chain.run().await?;

    let mut note = Note::new(
        payload.title.as_deref().unwrap_or_default(),
        auth_user.user_id,
    );
    if let Some(details) = payload.details.as_deref().filter(|d| !d.trim().is_empty()) {
        note.details = note_fields::escape_details(details);
    }
    if let Some(raw) = category_id {
        note.category = Some(ownership::parse_id(raw)?);
    }

    store.insert_note(note).await?;

    Ok(ApiResponse::created("A note was successfully created"))
}

/// GET /api/notes - the caller's notes, with optional categoryId/title/
/// details filters.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<NoteListQuery>,
) -> ApiResult<Vec<Note>> {
    let store = state.store.clone();

    let category_id = query
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty());

    let mut chain = Chain::new();
    if let Some(raw) = category_id {
        let category_guard = {
            let store = store.clone();
            let raw = raw.to_string();
            let user_id = auth_user.user_id;
            async move { ownership::resolve_owned_category(store.as_ref(), &raw, user_id).await }
        };
        chain = chain.field("categoryId", vec![Rule::guard(category_guard)]);
    }
    chain.run().await?;

    let mut filter = NoteQuery::default();
    if let Some(raw) = category_id {
        filter.category = Some(ownership::parse_id(raw)?);
    }
    filter.title = query.title.clone().filter(|t| !t.trim().is_empty());
    filter.details = query.details.clone().filter(|d| !d.trim().is_empty());

    let notes = store.list_notes(auth_user.user_id, filter).await?;

    if notes.is_empty() {
        return Err(ApiError::not_found("Notes Not Found"));
    }

    Ok(ApiResponse::success("Notes Found", notes))
}

/// GET /api/notes/:note_id - a single note the caller owns.
pub async fn get_note(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(note_id): Path<String>,
) -> ApiResult<Note> {
    let note =
        ownership::resolve_owned_note(state.store.as_ref(), &note_id, auth_user.user_id).await?;

    Ok(ApiResponse::success("Note Found", note))
}

/// PATCH /api/notes/:note_id/:field_to_update - set one whitelisted field.
pub async fn update_field(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((note_id, field_to_update)): Path<(String, String)>,
    Json(payload): Json<UpdateNoteRequest>,
) -> ApiResult<()> {
    // The key must be present; an empty value is meaningful for `category`
    Chain::new()
        .field(
            "newValue",
            vec![Rule::check(rules::present(
                payload.new_value.as_deref(),
                "A new value is required",
            ))],
        )
        .run()
        .await?;

    note_fields::apply_field_update(
        state.store.as_ref(),
        &note_id,
        &field_to_update,
        payload.new_value.as_deref().unwrap_or_default(),
        auth_user.user_id,
    )
    .await?;

    Ok(ApiResponse::no_content())
}

/// DELETE /api/notes/:note_id - delete a note the caller owns.
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(note_id): Path<String>,
) -> ApiResult<()> {
    let note =
        ownership::resolve_owned_note(state.store.as_ref(), &note_id, auth_user.user_id).await?;

    let deleted = state.store.delete_note(note.id, auth_user.user_id).await?;
    if deleted == 0 {
        // Vanished between validation and write
        return Err(ApiError::not_found("Note Not Found"));
    }

    Ok(ApiResponse::no_content())
}
