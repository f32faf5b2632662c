//! lineage_gateway - Remote operations against the lineage backend
//!
//! A thin asynchronous interface over the backend's five endpoints. The
//! gateway returns structured results or typed failures and never
//! interprets them; there are no retries at this layer, and recovery is
//! entirely the caller's decision.

mod config;
mod error;
mod gateway_trait;
mod http;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway_trait::LineageGateway;
pub use http::HttpLineageGateway;
