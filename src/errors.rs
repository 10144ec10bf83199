//! Unified error types for scout-hub.
//!
//! Validation errors never reach the backend, gateway errors carry the raw
//! backend message, and partial failures report which sub-steps already
//! completed so the caller can tell the user what was left behind.

use thiserror::Error;

/// Every error the library and the bot can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Required form input is missing or malformed. No request was issued.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// Backend read/write failure, carrying the backend's own message.
    #[error("Database error: {0}")]
    Database(String),

    /// A record addressed by id does not exist in the named collection.
    #[error("No record with id {id} in {collection}")]
    NotFound {
        /// Collection name (e.g. `badges`)
        collection: &'static str,
        /// Requested id
        id: i64,
    },

    /// Object storage upload failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable description
        message: String,
    },

    /// A multi-step write stopped partway; completed steps were not rolled back.
    #[error("Stopped after updating {} of {total} users; user {failed} failed: {message}", completed.len())]
    PartialFailure {
        /// User ids whose points were already updated
        completed: Vec<i64>,
        /// User id whose update failed
        failed: i64,
        /// Number of users in the request
        total: usize,
        /// Underlying error message
        message: String,
    },

    /// Applying a points delta would leave a user below zero.
    #[error("Cannot apply {delta} points to a balance of {current}")]
    InvalidPoints {
        /// Current balance
        current: i32,
        /// Requested delta
        delta: i32,
    },

    /// The caller has no active session.
    #[error("You need to sign in first. Use `/login` or `/register`.")]
    NotSignedIn,

    /// The caller's auth identity is already bound to a user.
    #[error("An account is already registered for this identity")]
    AlreadyRegistered,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting error while rendering output
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
