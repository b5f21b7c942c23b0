use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Ongoing,
    Finished,
}

impl NoteStatus {
    /// Case-insensitive parse; anything outside the two statuses is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ongoing" => Some(NoteStatus::Ongoing),
            "finished" => Some(NoteStatus::Finished),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Ongoing => "ongoing",
            NoteStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
    /// Immutable after creation.
    #[serde(skip_serializing)]
    pub owner: Uuid,
    /// When set, references a category with the same owner.
    pub category: Option<Uuid>,
    pub status: NoteStatus,
}

impl Note {
    pub fn new(title: &str, owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_lowercase(),
            details: String::new(),
            created_at: Utc::now(),
            owner,
            category: None,
            status: NoteStatus::Ongoing,
        }
    }

    /// Owner comparison by canonical id value equality.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }
}

/// A single whitelisted field change, produced by the field-update
/// dispatcher and applied as one conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteChange {
    Title(String),
    Details(String),
    Category(Option<Uuid>),
    Status(NoteStatus),
}
