//! Error types for enumeration.

use thiserror::Error;

/// Errors that can occur while enumerating resources.
///
/// Failures to release a cursor are never reported here; they are logged
/// and dropped so they cannot mask the outcome the caller cares about.
#[derive(Error, Debug)]
pub enum EnumerationError {
    /// The filter could not be compiled.
    #[error("Filter error: {0}")]
    Filter(#[from] rmquery::FilterError),

    /// The service answered Enumerate or Pull with a fault.
    #[error("Service fault {code}: {reason}")]
    Fault {
        /// Fault code reported by the service.
        code: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The transport failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A raw record could not be converted into the caller's type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A paged session was asked for a page after the last one.
    #[error("Enumeration sequence is exhausted")]
    SequenceExhausted,

    /// The service signalled more data but issued no context to pull it with.
    #[error("Response signalled more data without an enumeration context")]
    MissingContext,

    /// The streaming worker thread could not be started.
    #[error("Failed to spawn enumeration worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

impl EnumerationError {
    /// Creates a service fault.
    pub fn fault(code: impl Into<String>, reason: impl Into<String>) -> Self {
        EnumerationError::Fault {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for enumeration operations.
pub type EnumerationResult<T> = std::result::Result<T, EnumerationError>;
