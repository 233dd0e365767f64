use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Actor task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error("Cart service unreachable: {0}")]
    Cart(#[from] crate::cart::CartError),
}
