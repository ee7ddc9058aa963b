//! Domain Layer - Core Entity Trait and Errors
//!
//! Every cached entity carries an opaque, backend-assigned string id.

use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
///
/// The caches do not branch on the variant; they only surface the message.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The backend could not be reached or rejected the call.
    #[error("{0}")]
    Transport(String),

    /// The backend rejected a create/update payload.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A mutation targeted an id the backend does not know.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomainError {
    /// Message suitable for the store's error field.
    ///
    /// Returns `None` when the failure carries no usable text, so callers can
    /// substitute an operation-specific fallback.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Transport(msg) | Self::Validation(msg) | Self::NotFound(msg) | Self::Config(msg)
                if msg.trim().is_empty() =>
            {
                None
            }
            other => Some(other.to_string()),
        }
    }
}
