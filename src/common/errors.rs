//! Exchange failure taxonomy shared by both controllers.
//!
//! Every variant carries the text shown to the user. Server-supplied
//! messages win over the generic fallbacks; the constructors below
//! apply that preference in one place.

use thiserror::Error;

/// A failure anywhere in the exchange flow. No variant is fatal: each
/// one leaves the owning session in a state the user can recover from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Input rejected before any network call was made.
    #[error("{0}")]
    Validation(String),
    /// Upload exceeds the configured size ceiling.
    #[error("{0}")]
    Oversize(String),
    /// Identifier has no matching file, or the file expired.
    #[error("{0}")]
    NotFound(String),
    /// Wrong password for a protected file.
    #[error("{0}")]
    AccessDenied(String),
    /// Network or server failure of unspecified cause.
    #[error("{0}")]
    Transient(String),
}

impl ExchangeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn oversize(server_message: Option<String>) -> Self {
        Self::Oversize(
            server_message
                .unwrap_or_else(|| "File exceeds the maximum upload size.".to_string()),
        )
    }

    pub fn not_found(server_message: Option<String>) -> Self {
        Self::NotFound(server_message.unwrap_or_else(|| {
            "File not found or has expired. Please check the ID and try again.".to_string()
        }))
    }

    pub fn access_denied(server_message: Option<String>) -> Self {
        Self::AccessDenied(server_message.unwrap_or_else(|| "Incorrect password.".to_string()))
    }

    pub fn transient(server_message: Option<String>) -> Self {
        Self::Transient(
            server_message.unwrap_or_else(|| "An error occurred. Please try again.".to_string()),
        )
    }

    /// User-facing message for the notification sink.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::Oversize(m)
            | Self::NotFound(m)
            | Self::AccessDenied(m)
            | Self::Transient(m) => m,
        }
    }

    /// Stable kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Oversize(_) => "oversize",
            Self::NotFound(_) => "not-found",
            Self::AccessDenied(_) => "access-denied",
            Self::Transient(_) => "transient",
        }
    }
}
