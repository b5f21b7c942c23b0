use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub label: String,
    /// Immutable after creation.
    #[serde(skip_serializing)]
    pub owner: Uuid,
}

impl Category {
    pub fn new(label: &str, owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.trim().to_lowercase(),
            owner,
        }
    }

    /// Owner comparison by canonical id value equality. All raw identifiers
    /// are parsed into `Uuid` before reaching this point, so both sides share
    /// one representation.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }
}
