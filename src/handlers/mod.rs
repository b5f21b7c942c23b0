pub mod auth;
pub mod categories;
pub mod notes;
pub mod users;

/// Lowercases and trims an optional request field.
pub(crate) fn normalize(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_lowercase()
}
