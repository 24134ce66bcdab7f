//! Error types for SideChat Core

use thiserror::Error;

/// Main error type for SideChat operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Invalid document {id}: {reason}")]
    InvalidDocument { id: String, reason: String },
}

/// Authentication/session errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Session is still loading")]
    Loading,
}

/// Settings errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse settings {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(StoreError::Database(err.to_string()))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Store(StoreError::Pool(err.to_string()))
    }
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
