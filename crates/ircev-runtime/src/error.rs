//! Runtime error types.

use ircev_core::SendError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while setting up or driving a client.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A line could not be handed to the outbound side.
    #[error(transparent)]
    Send(#[from] SendError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
