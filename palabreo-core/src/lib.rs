//! Palabreo Core Library
//!
//! This crate provides the domain types and reading pipeline for the Palabreo
//! writing platform: works and chapters, the markdown renderer that turns a
//! chapter into trusted HTML, reading preferences with change notification,
//! chapter navigation, and the in-memory catalog of works, profiles and
//! interactions.

pub mod catalog;
pub mod error;
pub mod reading;
pub mod render;
pub mod storage;
pub mod types;

pub use catalog::{Catalog, Page, WorkQuery, WorkSort};
pub use error::{CatalogError, PalabreoError, PreferencesError, Result, StorageError};
pub use reading::{
    PreferencesStore, PreferencesSubscription, PreferencesUpdate, ReadingPreferences,
    ReadingSession,
};
pub use render::{render_markdown_html, TrustedHtml};
pub use types::{Chapter, Comment, Genre, Interaction, Profile, Work};
