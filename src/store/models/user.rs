use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt output. The raw password never reaches the store.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Creates a user record from registration input.
    ///
    /// The password is hashed here, exactly once; this is the only place a
    /// raw password becomes a stored value. Username and email are
    /// normalized to lowercase, trimmed form.
    pub fn register(username: &str, email: &str, password: &str) -> Result<Self, bcrypt::BcryptError> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.trim().to_lowercase(),
            email: email.trim().to_lowercase(),
            password_hash,
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
