//! In-memory store engine.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Category, Note, NoteChange, User};
use super::{NoteQuery, NoteStore, StoreError, StoreResult, UpdateOutcome};

/// In-memory note store backed by per-collection maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_identity(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == username && u.email == email)
            .cloned())
    }

    async fn update_username(&self, id: Uuid, username: &str) -> StoreResult<UpdateOutcome> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            None => Ok(UpdateOutcome::default()),
            Some(user) if user.username == username => Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            }),
            Some(user) => {
                user.username = username.to_string();
                Ok(UpdateOutcome {
                    matched: 1,
                    modified: 1,
                })
            }
        }
    }

    // =========================================================================
    // Category operations
    // =========================================================================

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.id) {
            return Err(StoreError::already_exists(
                "Category",
                category.id.to_string(),
            ));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(result)
    }

    async fn update_category_label(
        &self,
        id: Uuid,
        owner: Uuid,
        label: &str,
    ) -> StoreResult<UpdateOutcome> {
        let mut categories = self.categories.write().await;
        match categories.get_mut(&id).filter(|c| c.owner == owner) {
            None => Ok(UpdateOutcome::default()),
            Some(category) if category.label == label => Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            }),
            Some(category) => {
                category.label = label.to_string();
                Ok(UpdateOutcome {
                    matched: 1,
                    modified: 1,
                })
            }
        }
    }

    async fn delete_category(&self, id: Uuid, owner: Uuid) -> StoreResult<u64> {
        let mut categories = self.categories.write().await;
        match categories.get(&id) {
            Some(category) if category.owner == owner => {
                categories.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    // =========================================================================
    // Note operations
    // =========================================================================

    async fn insert_note(&self, note: Note) -> StoreResult<Note> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(StoreError::already_exists("Note", note.id.to_string()));
        }
        notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find_note(&self, id: Uuid) -> StoreResult<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).cloned())
    }

    async fn list_notes(&self, owner: Uuid, query: NoteQuery) -> StoreResult<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut result: Vec<Note> = notes
            .values()
            .filter(|n| {
                let mut matches = n.owner == owner;
                if let Some(category) = query.category {
                    matches = matches && n.category == Some(category);
                }
                if let Some(title) = &query.title {
                    matches = matches && n.title.contains(&title.to_lowercase());
                }
                if let Some(details) = &query.details {
                    matches =
                        matches && n.details.to_lowercase().contains(&details.to_lowercase());
                }
                matches
            })
            .cloned()
            .collect();
        result.sort_by_key(|n| n.created_at);
        Ok(result)
    }

    async fn update_note_field(
        &self,
        id: Uuid,
        owner: Uuid,
        change: NoteChange,
    ) -> StoreResult<UpdateOutcome> {
        let mut notes = self.notes.write().await;
        let note = match notes.get_mut(&id).filter(|n| n.owner == owner) {
            None => return Ok(UpdateOutcome::default()),
            Some(note) => note,
        };

        let modified = match change {
            NoteChange::Title(title) => {
                if note.title == title {
                    0
                } else {
                    note.title = title;
                    1
                }
            }
            NoteChange::Details(details) => {
                if note.details == details {
                    0
                } else {
                    note.details = details;
                    1
                }
            }
            NoteChange::Category(category) => {
                if note.category == category {
                    0
                } else {
                    note.category = category;
                    1
                }
            }
            NoteChange::Status(status) => {
                if note.status == status {
                    0
                } else {
                    note.status = status;
                    1
                }
            }
        };

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete_note(&self, id: Uuid, owner: Uuid) -> StoreResult<u64> {
        let mut notes = self.notes.write().await;
        match notes.get(&id) {
            Some(note) if note.owner == owner => {
                notes.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn detach_category_from_notes(&self, owner: Uuid, category: Uuid) -> StoreResult<u64> {
        let mut notes = self.notes.write().await;
        let mut detached = 0;
        for note in notes.values_mut() {
            if note.owner == owner && note.category == Some(category) {
                note.category = None;
                detached += 1;
            }
        }
        Ok(detached)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::models::NoteStatus;
    use super::*;

    fn user(name: &str) -> User {
        User::register(name, &format!("{}@example.com", name), "password1").expect("register")
    }

    #[tokio::test]
    async fn test_user_lookup_by_identity() {
        let store = MemoryStore::new();
        let alice = store.insert_user(user("alice")).await.unwrap();

        let found = store
            .find_user_by_identity("alice", "alice@example.com")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(alice.id));

        let missing = store
            .find_user_by_identity("alice", "bob@example.com")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_username_outcomes() {
        let store = MemoryStore::new();
        let alice = store.insert_user(user("alice")).await.unwrap();

        let changed = store.update_username(alice.id, "alice2").await.unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        // Same value again: matched but not modified
        let unchanged = store.update_username(alice.id, "alice2").await.unwrap();
        assert_eq!(unchanged, UpdateOutcome { matched: 1, modified: 0 });

        let missing = store.update_username(Uuid::new_v4(), "ghost").await.unwrap();
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_category_crud_is_owner_scoped() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let category = store
            .insert_category(Category::new("work", owner))
            .await
            .unwrap();

        // Lookup by id alone ignores ownership
        assert!(store.find_category(category.id).await.unwrap().is_some());

        // Updates and deletes filtered by {id, owner} refuse the stranger
        let refused = store
            .update_category_label(category.id, stranger, "play")
            .await
            .unwrap();
        assert_eq!(refused, UpdateOutcome::default());
        assert_eq!(store.delete_category(category.id, stranger).await.unwrap(), 0);

        assert_eq!(store.delete_category(category.id, owner).await.unwrap(), 1);
        assert!(store.find_category(category.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_note_field_update_outcomes() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let note = store.insert_note(Note::new("draft", owner)).await.unwrap();

        let changed = store
            .update_note_field(note.id, owner, NoteChange::Status(NoteStatus::Finished))
            .await
            .unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        let unchanged = store
            .update_note_field(note.id, owner, NoteChange::Status(NoteStatus::Finished))
            .await
            .unwrap();
        assert_eq!(unchanged, UpdateOutcome { matched: 1, modified: 0 });

        let stranger = store
            .update_note_field(note.id, Uuid::new_v4(), NoteChange::Title("mine".into()))
            .await
            .unwrap();
        assert_eq!(stranger, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_list_notes_filters() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let category = store
            .insert_category(Category::new("work", owner))
            .await
            .unwrap();

        let mut tagged = Note::new("meeting agenda", owner);
        tagged.category = Some(category.id);
        store.insert_note(tagged).await.unwrap();
        store.insert_note(Note::new("groceries", owner)).await.unwrap();
        store
            .insert_note(Note::new("their note", Uuid::new_v4()))
            .await
            .unwrap();

        let all = store.list_notes(owner, NoteQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_category = store
            .list_notes(
                owner,
                NoteQuery {
                    category: Some(category.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].title, "meeting agenda");

        let by_title = store
            .list_notes(
                owner,
                NoteQuery {
                    title: Some("AGENDA".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_title.len(), 1);
    }

    #[tokio::test]
    async fn test_detach_category_from_notes() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let category = store
            .insert_category(Category::new("work", owner))
            .await
            .unwrap();

        for title in ["one", "two"] {
            let mut note = Note::new(title, owner);
            note.category = Some(category.id);
            store.insert_note(note).await.unwrap();
        }
        store.insert_note(Note::new("three", owner)).await.unwrap();

        let detached = store
            .detach_category_from_notes(owner, category.id)
            .await
            .unwrap();
        assert_eq!(detached, 2);

        let notes = store.list_notes(owner, NoteQuery::default()).await.unwrap();
        assert!(notes.iter().all(|n| n.category.is_none()));
    }
}
