//! User-facing identity, distinct from the authentication account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile of a writer or reader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,

    /// Authentication account this profile belongs to (one-to-one)
    pub user_id: Uuid,

    /// Display name
    pub name: String,

    /// Unique handle, compared case-insensitively
    pub username: String,

    pub bio: Option<String>,

    pub avatar_url: Option<String>,

    pub banner_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: Uuid, name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            username: username.into(),
            bio: None,
            avatar_url: None,
            banner_url: None,
            created_at: Utc::now(),
        }
    }

    /// Set the biography
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Usernames are 3-30 characters of ASCII letters, digits, `_`, `.` or `-`
    pub fn is_valid_username(username: &str) -> bool {
        (3..=30).contains(&username.len())
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    }

    /// Whether this profile answers to the given handle
    pub fn matches_username(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }
}
