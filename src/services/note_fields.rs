//! Field-level note updates.
//!
//! A PATCH names one whitelisted field and a replacement value. The
//! dispatcher checks the whitelist, resolves the note through the ownership
//! validator, runs the field-specific validation, then applies one
//! conditional write scoped by `{id, owner}`. A write that matches nothing
//! means the note vanished (or changed hands) after validation and reports
//! `NotFound`; a write that matches but changes nothing is an idempotent
//! success.

use uuid::Uuid;

use super::ownership;
use crate::error::ApiError;
use crate::store::models::{NoteChange, NoteStatus};
use crate::store::NoteStore;

/// Fields a PATCH may touch.
#[derive(Debug, Clone, Copy)]
enum NoteField {
    Title,
    Details,
    Category,
    Status,
}

impl NoteField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(NoteField::Title),
            "details" => Some(NoteField::Details),
            "category" => Some(NoteField::Category),
            "status" => Some(NoteField::Status),
            _ => None,
        }
    }
}

/// Applies one whitelisted field change to a note the caller owns.
pub async fn apply_field_update(
    store: &dyn NoteStore,
    raw_note_id: &str,
    field_name: &str,
    new_value: &str,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let field = NoteField::parse(field_name).ok_or_else(|| {
        ApiError::invalid_field(format!("'{}' is not an updatable note field", field_name))
    })?;

    let note = ownership::resolve_owned_note(store, raw_note_id, user_id).await?;

    let change = match field {
        NoteField::Title => NoteChange::Title(new_value.trim().to_lowercase()),
        NoteField::Details => NoteChange::Details(escape_details(new_value)),
        NoteField::Category => {
            let trimmed = new_value.trim();
            if trimmed.is_empty() {
                // Empty value clears the reference
                NoteChange::Category(None)
            } else {
                let category =
                    ownership::resolve_owned_category(store, trimmed, user_id).await?;
                NoteChange::Category(Some(category.id))
            }
        }
        NoteField::Status => match NoteStatus::parse(new_value) {
            Some(status) => NoteChange::Status(status),
            None => {
                return Err(ApiError::invalid_value(
                    "A note status is either 'ongoing' or 'finished'",
                ))
            }
        },
    };

    let outcome = store.update_note_field(note.id, user_id, change).await?;
    if outcome.matched == 0 {
        // Vanished between validation and write
        return Err(ApiError::not_found("Note Not Found"));
    }

    Ok(())
}

/// Entity-escapes details for safe storage and rendering, after trim and
/// lowercase normalization.
pub fn escape_details(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    let mut out = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{Category, Note};
    use crate::store::MemoryStore;

    async fn seeded_store() -> (MemoryStore, Uuid, Note) {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let note = store.insert_note(Note::new("draft", owner)).await.unwrap();
        (store, owner, note)
    }

    #[tokio::test]
    async fn unknown_field_is_rejected_first() {
        let (store, owner, _) = seeded_store().await;

        // Even a malformed note id is not inspected for an unlisted field
        let error = apply_field_update(&store, "not-a-key", "owner", "x", owner)
            .await
            .expect_err("should fail");
        assert_eq!(error.title(), "InvalidField");
    }

    #[tokio::test]
    async fn status_outside_enum_is_invalid_value() {
        let (store, owner, note) = seeded_store().await;

        let error = apply_field_update(&store, &note.id.to_string(), "status", "paused", owner)
            .await
            .expect_err("should fail");
        assert_eq!(error.title(), "InvalidValue");

        // Case-normalized values are accepted
        apply_field_update(&store, &note.id.to_string(), "status", "FINISHED", owner)
            .await
            .expect("should succeed");
        let stored = store.find_note(note.id).await.unwrap().unwrap();
        assert_eq!(stored.status, NoteStatus::Finished);
    }

    #[tokio::test]
    async fn repeating_an_update_is_idempotent() {
        let (store, owner, note) = seeded_store().await;

        for _ in 0..2 {
            apply_field_update(&store, &note.id.to_string(), "title", "final", owner)
                .await
                .expect("should succeed both times");
        }
        let stored = store.find_note(note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "final");
    }

    #[tokio::test]
    async fn category_update_requires_owning_the_category() {
        let (store, owner, note) = seeded_store().await;
        let foreign = store
            .insert_category(Category::new("theirs", Uuid::new_v4()))
            .await
            .unwrap();

        let error = apply_field_update(
            &store,
            &note.id.to_string(),
            "category",
            &foreign.id.to_string(),
            owner,
        )
        .await
        .expect_err("should fail");
        assert_eq!(error.title(), "Unauthorized");

        let stored = store.find_note(note.id).await.unwrap().unwrap();
        assert_eq!(stored.category, None);
    }

    #[tokio::test]
    async fn empty_category_value_clears_the_reference() {
        let (store, owner, note) = seeded_store().await;
        let category = store
            .insert_category(Category::new("work", owner))
            .await
            .unwrap();

        apply_field_update(
            &store,
            &note.id.to_string(),
            "category",
            &category.id.to_string(),
            owner,
        )
        .await
        .expect("set");
        assert_eq!(
            store.find_note(note.id).await.unwrap().unwrap().category,
            Some(category.id)
        );

        apply_field_update(&store, &note.id.to_string(), "category", "", owner)
            .await
            .expect("clear");
        assert_eq!(store.find_note(note.id).await.unwrap().unwrap().category, None);
    }

    #[tokio::test]
    async fn cross_owner_note_update_is_unauthorized() {
        let (store, _, note) = seeded_store().await;
        let stranger = Uuid::new_v4();

        let error = apply_field_update(&store, &note.id.to_string(), "status", "finished", stranger)
            .await
            .expect_err("should fail");
        assert_eq!(error.title(), "Unauthorized");
    }

    #[test]
    fn details_are_escaped_and_normalized() {
        assert_eq!(
            escape_details("  Buy <b>Milk</b> & eggs "),
            "buy &lt;b&gt;milk&lt;&#x2F;b&gt; &amp; eggs"
        );
    }
}
