//! Gateway configuration

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
const API_BASE_ENV: &str = "CHRONICLE_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayConfig {
    /// Build from the environment, falling back to the local default.
    pub fn new() -> Self {
        let base_url = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}
