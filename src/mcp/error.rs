//! Error types for the Breathe HR MCP implementation.
//!
//! This module contains the error type shared by the HTTP client and the tools:
//! - `BreatheError`: one variant per failure kind (configuration, upstream status
//!   classes, decoding, validation, transport)
//! - Conversions from `reqwest`, `reqwest_middleware` and `serde_json` errors
//! - Conversion to RMCP's `ErrorData` for MCP protocol compliance

use rmcp::{ErrorData, model::ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreatheError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Authentication failed. Please check your Breathe HR API key.")]
    Authentication,

    #[error("Access forbidden. Please check your API permissions.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Breathe HR API request failed: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid JSON response from Breathe HR API: {0}")]
    Decode(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BreatheError> for ErrorData {
    fn from(err: BreatheError) -> Self {
        let code = match err {
            BreatheError::InvalidParams(_) => ErrorCode::INVALID_PARAMS,
            BreatheError::NotFound(_) => ErrorCode::RESOURCE_NOT_FOUND,
            _ => ErrorCode::INTERNAL_ERROR,
        };
        Self::new(code, err.to_string(), None)
    }
}
