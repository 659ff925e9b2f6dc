//! Error taxonomy for the interview core and its collaborators.
//!
//! Collaborator errors (`StoreError`, `GenerationError`) are defined here so
//! the engine can classify failures without string matching. They fold into
//! the public `InterviewError` taxonomy at the operation boundary; no error
//! is retried internally and every message propagates to the caller intact.

use thiserror::Error;

/// Errors surfaced by core interview operations.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// No active user context was supplied.
    #[error("user is not authenticated")]
    NotAuthenticated,

    /// A referenced interview, attempt, question, or answer is absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller does not own the referenced interview.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The AI collaborator failed to generate questions or feedback.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// The underlying document store failed.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
}

impl InterviewError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        InterviewError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<StoreError> for InterviewError {
    fn from(err: StoreError) -> Self {
        InterviewError::PersistenceFailed(err.to_string())
    }
}

impl From<GenerationError> for InterviewError {
    fn from(err: GenerationError) -> Self {
        InterviewError::GenerationFailed(err.to_string())
    }
}

/// Errors from a document-store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The target document does not exist (for operations that require it).
    #[error("document not found: {0}")]
    NotFound(String),

    /// A conditional update lost to a concurrent writer.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend returned an error response.
    #[error("store backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// A local file read or write failed.
    #[error("io error: {0}")]
    Io(String),

    /// A stored document could not be decoded into its model type.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Errors from the AI question/feedback generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The model's output could not be parsed into the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
