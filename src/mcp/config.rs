//! Process-wide configuration for the Breathe HR MCP server.
//!
//! Values are read from the environment once in `main` (after `.env` has been
//! loaded) and then handed to the HTTP client and router explicitly.

use std::{env, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.breathehr.com/v1";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct BreatheConfig {
    /// Root of the Breathe HR REST API, e.g. `https://api.breathehr.com/v1`.
    pub base_url: String,
    /// Upstream secret. Kept optional so a missing key surfaces on the first
    /// tool call instead of preventing the server from starting.
    pub api_key: Option<String>,
    /// Bearer token required on `/mcp` when set.
    pub mcp_api_key: Option<String>,
    pub bind_address: String,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl BreatheConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = read("BREATHE_HR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = reqwest::Url::parse(&base_url)
            .with_context(|| format!("BREATHE_HR_BASE_URL is not a valid URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("BREATHE_HR_BASE_URL must use http or https: {base_url}");
        }

        let log_format = match read("LOG_FORMAT").as_deref() {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            base_url,
            api_key: read("BREATHE_HR_API_KEY"),
            mcp_api_key: read("MCP_API_KEY"),
            bind_address: read("MCP_BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            request_timeout: REQUEST_TIMEOUT,
            log_format,
        })
    }

    /// Configuration pointing at an arbitrary upstream, used by tests.
    #[cfg(test)]
    pub fn for_upstream(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            mcp_api_key: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            log_format: LogFormat::Pretty,
        }
    }
}
