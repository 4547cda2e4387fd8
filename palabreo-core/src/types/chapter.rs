//! Chapter type representing a titled subdivision of a work

use serde::{Deserialize, Serialize};

/// A single chapter of a work
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Raw markdown body
    #[serde(default)]
    pub content: String,
}

impl Chapter {
    /// Create a new chapter with a title and no body
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
        }
    }

    /// Set the chapter body
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Whether the body holds anything besides whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of whitespace-separated words in the body
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
