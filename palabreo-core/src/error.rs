//! Error types for Palabreo Core

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using PalabreoError
pub type Result<T> = std::result::Result<T, PalabreoError>;

/// Top-level error type for all Palabreo operations
#[derive(Debug, Error)]
pub enum PalabreoError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by catalog operations on works, profiles and interactions
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Work not found: {0}")]
    WorkNotFound(Uuid),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Profile already exists for account: {0}")]
    AccountHasProfile(Uuid),

    #[error("Profiles cannot follow themselves")]
    SelfFollow,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while reading, updating or persisting reading preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Unknown preference: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence failed: {0}")]
    Storage(#[from] StorageError),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
