//! Interaction records joining a user to a work or profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest comment body accepted, in characters
pub const MAX_COMMENT_CHARS: usize = 2000;

/// A like, bookmark or follow: one user acting on one target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interaction {
    pub user_id: Uuid,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Set of interactions uniquely keyed by the (user, target) pair
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct InteractionSet {
    entries: Vec<Interaction>,
}

impl InteractionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pair. Returns false when it was already present.
    pub fn insert(&mut self, user_id: Uuid, target_id: Uuid) -> bool {
        if self.contains(user_id, target_id) {
            return false;
        }
        self.entries.push(Interaction {
            user_id,
            target_id,
            created_at: Utc::now(),
        });
        true
    }

    /// Remove the pair. Returns false when it was not present.
    pub fn remove(&mut self, user_id: Uuid, target_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.user_id == user_id && e.target_id == target_id));
        self.entries.len() != before
    }

    /// Drop every record pointing at or coming from the given id
    pub fn purge(&mut self, id: Uuid) {
        self.entries
            .retain(|e| e.user_id != id && e.target_id != id);
    }

    pub fn contains(&self, user_id: Uuid, target_id: Uuid) -> bool {
        self.entries
            .iter()
            .any(|e| e.user_id == user_id && e.target_id == target_id)
    }

    /// Number of users who acted on the target
    pub fn count_for(&self, target_id: Uuid) -> usize {
        self.entries
            .iter()
            .filter(|e| e.target_id == target_id)
            .count()
    }

    /// Targets the user acted on, oldest first
    pub fn targets_of(&self, user_id: Uuid) -> Vec<Uuid> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.target_id)
            .collect()
    }

    /// Users who acted on the target, oldest first
    pub fn users_of(&self, target_id: Uuid) -> Vec<Uuid> {
        self.entries
            .iter()
            .filter(|e| e.target_id == target_id)
            .map(|e| e.user_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A comment on a work. Comments are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub work_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(work_id: Uuid, user_id: Uuid, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_id,
            user_id,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}
