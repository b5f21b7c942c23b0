//! Ownership-scoped resource resolution.
//!
//! Every route touching a specific category or note goes through one of the
//! resolvers here. The checks run in strict order, each failure
//! short-circuiting the rest:
//!
//! 1. the raw identifier must parse as a store key (`InvalidIdentifier`),
//! 2. the resource must exist, looked up by id alone (`NotFound`),
//! 3. the stored owner must equal the caller (`Unauthorized`).
//!
//! Existence is checked before ownership so absent and foreign resources
//! stay distinguishable (404 vs 403); the same policy applies to every
//! resource kind. The resolved record is returned so callers don't need a
//! second lookup.

use uuid::Uuid;

use crate::error::ApiError;
use crate::store::models::{Category, Note};
use crate::store::NoteStore;

/// Parses an opaque identifier into a store key.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::invalid_identifier("Invalid Id"))
}

/// Resolves a category the caller owns.
pub async fn resolve_owned_category(
    store: &dyn NoteStore,
    raw_id: &str,
    user_id: Uuid,
) -> Result<Category, ApiError> {
    let id = parse_id(raw_id)?;

    let category = store
        .find_category(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category Not Found"))?;

    if !category.is_owned_by(user_id) {
        tracing::warn!(category = %id, user = %user_id, "category access refused: not the owner");
        return Err(ApiError::unauthorized(
            "You're not authorized to perform this action",
        ));
    }

    Ok(category)
}

/// Resolves a note the caller owns.
pub async fn resolve_owned_note(
    store: &dyn NoteStore,
    raw_id: &str,
    user_id: Uuid,
) -> Result<Note, ApiError> {
    let id = parse_id(raw_id)?;

    let note = store
        .find_note(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Note Not Found"))?;

    if !note.is_owned_by(user_id) {
        tracing::warn!(note = %id, user = %user_id, "note access refused: not the owner");
        return Err(ApiError::unauthorized(
            "You're not authorized to perform this action",
        ));
    }

    Ok(note)
}
