//! Gateway error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("node not found: {node_id}")]
    NotFound { node_id: String },

    #[error("validation error: {0}")]
    Validation(String),
}

impl GatewayError {
    /// Whether this failure was produced locally, before any network call.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
