//! Error types for the Campus Market client.

use thiserror::Error;

/// A shared error type for the entire client.
///
/// Two classes matter to callers: application-level failures reported by the
/// backend envelope (`Api`, `InvalidCredentials`) and transport-level failures
/// (`Transport`). Everything else is raised locally before or after a request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// The backend answered `success: false`.
    #[error("{0}")]
    Api(String),

    /// Login rejected by the backend.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Network unreachable, malformed body, or a non-2xx status without a
    /// readable envelope.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Input rejected locally; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The operation needs a logged-in user.
    #[error("Please log in first")]
    Unauthenticated,

    /// Entity not found error with type information
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport(detail.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// True for failures the backend reported through the envelope.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Api(_) | Self::InvalidCredentials(_))
    }

    /// True for connectivity and malformed-response failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True when the request was never sent because local checks failed.
    pub fn is_local_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Unauthenticated)
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MarketError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MarketError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MarketError>`.
pub type Result<T> = std::result::Result<T, MarketError>;
