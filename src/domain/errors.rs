//! Domain error types
//!
//! This module defines the error hierarchy for geodoc. Every failure the
//! export pipeline can produce maps onto one of these types, and none of
//! them expose third-party error types (reqwest, serde, toml) directly.

use thiserror::Error;

/// Main geodoc error type
///
/// This is the primary error type used throughout the application.
/// It wraps the component-specific errors and adds the local failure
/// categories (configuration, invalid input, state machine misuse).
#[derive(Debug, Error)]
pub enum GeodocError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed derivation inputs (empty path segments, bad form fields)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend API errors (download trigger, bulk fetch, event stream)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Rendering capability failures while merging overlays
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Upload transport or backend persistence failures
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Malformed status or progress notifications
    #[error("Notification error: {0}")]
    NotificationParse(#[from] NotificationParseError),

    /// Illegal state machine transitions (cursor or status channel)
    #[error("State error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Backend API errors
///
/// Errors that occur when talking to the export backend (`/download`,
/// `/fetch-all-data` and the notification stream).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Failed to reach the backend
    #[error("Failed to connect to backend: {0}")]
    ConnectionFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Notification stream ended with a transport error
    #[error("Notification stream failed: {0}")]
    StreamFailed(String),
}

impl BackendError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            BackendError::ServerError { status, message }
        } else {
            BackendError::ClientError { status, message }
        }
    }

    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::ConnectionFailed(_) | BackendError::ServerError { .. }
        )
    }
}

/// Annotation merge errors
///
/// Raised when the rendering capability cannot load a document, import an
/// overlay or serialize the merged result. A merge error aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// Document content could not be decoded (corrupt or empty bytes)
    #[error("Invalid document content: {0}")]
    InvalidDocument(String),

    /// The renderer refused or failed to load the document
    #[error("Document failed to load: {0}")]
    LoadFailed(String),

    /// Importing one overlay failed
    #[error("Overlay {index} could not be imported: {reason}")]
    ImportFailed { index: usize, reason: String },

    /// Exporting the accumulated overlay state failed
    #[error("Overlay state export failed: {0}")]
    ExportFailed(String),

    /// Serializing the merged document failed
    #[error("Document serialization failed: {0}")]
    SerializeFailed(String),

    /// Renderer transport or protocol failure
    #[error("Renderer error: {0}")]
    Renderer(String),
}

/// Upload errors
///
/// Uploads are never retried automatically; either variant halts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Backend answered with a non-success status
    #[error("Upload rejected with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Request never completed
    #[error("Upload network error: {0}")]
    Network(String),

    /// Request could not be built (bad file name, MIME type)
    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),
}

/// Notification parse errors
///
/// A malformed notification is logged and dropped; it never stops the
/// status channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationParseError {
    /// Event name is not one of `status`, `progress`, `state`
    #[error("Unknown notification event: {0}")]
    UnknownEvent(String),

    /// Payload is missing a field or has the wrong type
    #[error("Invalid payload for '{event}' notification: {reason}")]
    InvalidPayload { event: String, reason: String },

    /// Line on the wire is not a JSON event envelope
    #[error("Malformed notification: {0}")]
    Malformed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for GeodocError {
    fn from(err: std::io::Error) -> Self {
        GeodocError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GeodocError {
    fn from(err: serde_json::Error) -> Self {
        GeodocError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GeodocError {
    fn from(err: toml::de::Error) -> Self {
        GeodocError::Configuration(format!("TOML parse error: {err}"))
    }
}
