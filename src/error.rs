use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the wheelhouse backend
#[derive(Error, Debug)]
pub enum WheelhouseError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Caller supplied no query text (or a non-string value at the API boundary)
    #[error("query is required")]
    InvalidQuery,

    /// Vehicle lookup miss
    #[error("Car not found: {id}")]
    CarNotFound { id: i64 },

    /// Registration conflict
    #[error("User already exists: {email}")]
    UserExists { email: String },

    /// Bad email/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing or stale session token
    #[error("Invalid or expired token")]
    Unauthorized,

    /// Review rating outside the 1..=5 range
    #[error("Rating must be between 1 and 5, got {rating}")]
    InvalidRating { rating: i64 },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// API server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WheelhouseError {
    /// True for errors caused by the request rather than the service; the
    /// server reports these to the client and keeps running.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WheelhouseError::InvalidQuery
                | WheelhouseError::CarNotFound { .. }
                | WheelhouseError::UserExists { .. }
                | WheelhouseError::InvalidCredentials
                | WheelhouseError::Unauthorized
                | WheelhouseError::InvalidRating { .. }
        )
    }
}

/// Result type for wheelhouse operations
pub type Result<T> = std::result::Result<T, WheelhouseError>;
