//! Document store boundary.
//!
//! The persistence engine is an external collaborator reachable through
//! simple find/insert/update/delete-by-filter operations. Every mutation on
//! an owned resource is filtered by `{id, owner}`; that owner-scoped filter
//! is the sole mechanism preventing cross-user writes. Conditional updates
//! report how many records matched the filter and how many actually changed,
//! so callers can distinguish a vanished record from an idempotent no-op.

mod error;
mod memory;
pub mod models;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use models::{Category, Note, NoteChange, User};

/// Outcome of a conditional update: records matching the filter, and
/// records whose stored value actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Filter options for listing notes.
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    /// Filter by category reference.
    pub category: Option<Uuid>,
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Case-insensitive substring match on the details.
    pub details: Option<String>,
}

/// Trait for note store operations.
#[async_trait]
pub trait NoteStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by username.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Gets a user by email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Gets a user matching both username and email.
    async fn find_user_by_identity(&self, username: &str, email: &str)
        -> StoreResult<Option<User>>;

    /// Conditionally replaces a user's username.
    async fn update_username(&self, id: Uuid, username: &str) -> StoreResult<UpdateOutcome>;

    // =========================================================================
    // Category operations
    // =========================================================================

    /// Creates a new category.
    async fn insert_category(&self, category: Category) -> StoreResult<Category>;

    /// Gets a category by ID alone, without an owner filter.
    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;

    /// Lists the categories owned by a user.
    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>>;

    /// Replaces the label of the category matching `{id, owner}`.
    async fn update_category_label(
        &self,
        id: Uuid,
        owner: Uuid,
        label: &str,
    ) -> StoreResult<UpdateOutcome>;

    /// Deletes the category matching `{id, owner}`; returns the deleted count.
    async fn delete_category(&self, id: Uuid, owner: Uuid) -> StoreResult<u64>;

    // =========================================================================
    // Note operations
    // =========================================================================

    /// Creates a new note.
    async fn insert_note(&self, note: Note) -> StoreResult<Note>;

    /// Gets a note by ID alone, without an owner filter.
    async fn find_note(&self, id: Uuid) -> StoreResult<Option<Note>>;

    /// Lists a user's notes with optional filters.
    async fn list_notes(&self, owner: Uuid, query: NoteQuery) -> StoreResult<Vec<Note>>;

    /// Sets one field on the note matching `{id, owner}`.
    async fn update_note_field(
        &self,
        id: Uuid,
        owner: Uuid,
        change: NoteChange,
    ) -> StoreResult<UpdateOutcome>;

    /// Deletes the note matching `{id, owner}`; returns the deleted count.
    async fn delete_note(&self, id: Uuid, owner: Uuid) -> StoreResult<u64>;

    /// Clears the category reference on every note of `owner` pointing at
    /// `category`; returns how many notes were updated.
    async fn detach_category_from_notes(&self, owner: Uuid, category: Uuid) -> StoreResult<u64>;

    /// Liveness probe.
    async fn health_check(&self) -> StoreResult<()>;
}
