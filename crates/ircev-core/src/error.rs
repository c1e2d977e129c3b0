//! Error types for the ircev core.
//!
//! Registry, dispatch and CTCP paths never fail; the only fallible seam in
//! this crate is the outbound [`Sender`](crate::integration::Sender).

use thiserror::Error;

// =============================================================================
// Send Errors
// =============================================================================

/// Errors that can occur when handing a line to the outbound collaborator.
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// The outbound side has shut down.
    #[error("outbound channel closed")]
    Closed,

    /// The outbound collaborator refused the line.
    #[error("line rejected: {0}")]
    Rejected(String),
}

impl SendError {
    /// Creates a rejection error.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for outbound send operations.
pub type SendResult<T> = Result<T, SendError>;
