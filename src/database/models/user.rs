use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// bcrypt hash, never serialized to clients
    #[serde(skip_serializing, default)]
    pub password: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new user record. `password` must already be hashed.
    pub fn new(name: String, email: String, password: String, avatar: Option<String>) -> Self {
        let email = normalize_email(&email);
        let avatar = avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| gravatar_url(&email));

        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password,
            avatar: Some(avatar),
            created_at: Utc::now(),
        }
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Default avatar for users who did not supply one
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_email(email).as_bytes());
    let hash = hasher.finalize();
    format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", hash)
}
