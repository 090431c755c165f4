//! Centralized error types for the inquiry pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ctrlcraft-inquiry library.
#[derive(Error, Debug)]
pub enum InquiryError {
    /// One or more required form fields are empty. Lists every one of them.
    #[error("Please fill in all required fields: {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    /// The email field does not have a `local@domain.tld` shape.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// The relay transport has not been initialized yet.
    #[error("Email service is not ready. Please wait a moment and try again.")]
    ServiceNotReady,

    /// The relay call failed or reported a non-success result.
    #[error("{0}")]
    Transport(String),

    /// A single file could not be read or encoded.
    #[error("Failed to read '{name}': {reason}")]
    Decode { name: String, reason: String },

    /// The file is not an image.
    #[error("'{name}' is not an image ({mime_type})")]
    UnsupportedType { name: String, mime_type: String },

    /// The file exceeds the configured size limit.
    #[error("'{name}' is too large ({size} bytes, limit {limit} bytes)")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// The batch would push the collection past its capacity.
    #[error("Too many images: {attempted} selected, only {remaining} slot(s) remaining")]
    TooManyAttachments { remaining: usize, attempted: usize },

    /// Another ingestion is still in flight.
    #[error("Images are still being processed")]
    IntakeBusy,

    /// No attachment exists at the given position.
    #[error("No attachment at position {0}")]
    InvalidPosition(usize),

    /// A remove handler was bound to a preview list that has since been rebuilt.
    #[error("Preview list changed; refresh before removing")]
    StaleBinding,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, InquiryError>`.
pub type Result<T> = std::result::Result<T, InquiryError>;

impl InquiryError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Decode` variant for the named file.
    pub fn decode(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for InquiryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(format!("Failed to send email: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_every_field() {
        let err = InquiryError::Validation {
            fields: vec!["Email".into(), "Design description".into()],
        };
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields: Email, Design description"
        );
    }

    #[test]
    fn test_transport_message_is_passed_through() {
        let err = InquiryError::Transport("Failed to send email: quota".into());
        assert_eq!(err.to_string(), "Failed to send email: quota");
    }
}
