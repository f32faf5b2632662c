//! Session coordinator error types

use lineage_gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("empty command")]
    EmptyCommand,

    #[error("a command is already awaiting the agent")]
    CommandInFlight,

    #[error("an upload is already in flight")]
    UploadInFlight,

    #[error("no file selected")]
    NoFileSelected,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
