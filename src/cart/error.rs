use thiserror::Error;

/// Cart operations themselves never fail; the only error is losing the service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
