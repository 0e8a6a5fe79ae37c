//! Error types for topic-to-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or writing a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The generative service call failed (network fault, HTTP error, bad payload).
    #[error("Content service error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Service {
        /// HTTP status, when the failure came back as a response.
        status: Option<u16>,
        message: String,
    },

    /// The service reported it is temporarily overloaded.
    #[error("Content service overloaded: {0}")]
    ServiceOverloaded(String),

    /// The service answered but the expected part was missing.
    #[error("Empty response from content service: {0}")]
    EmptyResponse(String),

    /// A generated list did not follow the numbered "N. text" layout.
    #[error("Unexpected list format: {0:?}")]
    UnexpectedFormat(String),

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    ImageError(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Build a service error without an HTTP status.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            status: None,
            message: message.into(),
        }
    }

    /// Whether this is a failure of the generative service itself.
    pub fn is_service(&self) -> bool {
        matches!(
            self,
            Self::Service { .. } | Self::ServiceOverloaded(_) | Self::EmptyResponse(_)
        )
    }

    /// Whether the service reported temporary overload.
    pub fn is_overload(&self) -> bool {
        matches!(self, Self::ServiceOverloaded(_))
    }
}
