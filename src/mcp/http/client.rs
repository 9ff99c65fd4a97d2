//! Authenticated HTTP client for the Breathe HR REST API.
//!
//! This module provides:
//! - A shared `reqwest` client with the fixed request timeout
//! - OpenTelemetry-friendly request spans through `reqwest-tracing`
//! - URL joining, bearer authentication and response classification used by
//!   every tool

use http::Extensions;
use reqwest::{Method, Request, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Result as MiddlewareResult};
use reqwest_tracing::{
    ReqwestOtelSpanBackend, TracingMiddleware, default_on_request_end, reqwest_otel_span,
};
use serde_json::Value;
use tracing::{Span, debug};

use crate::mcp::{config::BreatheConfig, error::BreatheError};

/// Ordered query string pairs sent with a request.
pub type QueryParams = Vec<(&'static str, String)>;

// Custom Tracing Backend for Reqwest to integrate with OpenTelemetry
#[allow(dead_code)]
struct CustomTracing;

impl ReqwestOtelSpanBackend for CustomTracing {
    fn on_request_start(req: &Request, _extension: &mut Extensions) -> Span {
        reqwest_otel_span!(name = "breathe-hr-request", req)
    }

    fn on_request_end(
        span: &Span,
        outcome: &MiddlewareResult<Response>,
        _extension: &mut Extensions,
    ) {
        default_on_request_end(span, outcome);
    }
}

/// Client for the Breathe HR API, built once at startup and shared by all
/// MCP sessions.
#[derive(Clone)]
pub struct BreatheClient {
    http: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

impl BreatheClient {
    /// Builds the underlying HTTP client with the configured timeout.
    ///
    /// # Errors
    /// Returns `BreatheError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: &BreatheConfig) -> Result<Self, BreatheError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let http = ClientBuilder::new(client)
            .with(TracingMiddleware::<CustomTracing>::new())
            .build();

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Joins the base URL and an endpoint path with exactly one slash.
    pub fn url_for(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    /// Makes an authenticated request to the Breathe HR REST API.
    ///
    /// # Arguments
    /// * `endpoint` - Path relative to the base URL, e.g. `employees/42`
    /// * `method` - HTTP method (GET or POST)
    /// * `query` - Optional query string pairs
    /// * `body` - Optional JSON body, used by POST requests
    ///
    /// # Errors
    /// * `MissingConfig` - `BREATHE_HR_API_KEY` is not set (checked before any network call)
    /// * `Authentication` / `Forbidden` / `NotFound` / `RateLimited` - 401, 403, 404 and 429
    /// * `Upstream` - any other non-2xx status
    /// * `Decode` - a successful response whose body is not JSON
    /// * `Http` / `HttpMiddleware` - transport failures, including the 30 second timeout
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        query: Option<&[(&str, String)]>,
        body: Option<&Value>,
    ) -> Result<Value, BreatheError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            BreatheError::MissingConfig(
                "BREATHE_HR_API_KEY environment variable is required".to_string(),
            )
        })?;

        let url = self.url_for(endpoint);
        let mut request_builder = match method {
            Method::GET => self.http.get(&url),
            Method::POST => self.http.post(&url),
            _ => {
                return Err(BreatheError::InvalidParams(
                    "Unsupported HTTP method".to_string(),
                ));
            }
        };

        request_builder = request_builder
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(query) = query {
            request_builder = request_builder.query(&query);
        }
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        debug!(%method, %url, "calling Breathe HR");
        let response = request_builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        classify(endpoint, status, &text)
    }

    pub async fn get(
        &self,
        endpoint: &str,
        query: Option<&[(&str, String)]>,
    ) -> Result<Value, BreatheError> {
        self.request(endpoint, Method::GET, query, None).await
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Maps a status and body onto the error taxonomy, or parses the success body.
fn classify(endpoint: &str, status: StatusCode, text: &str) -> Result<Value, BreatheError> {
    match status {
        StatusCode::UNAUTHORIZED => Err(BreatheError::Authentication),
        StatusCode::FORBIDDEN => Err(BreatheError::Forbidden),
        StatusCode::NOT_FOUND => Err(BreatheError::NotFound(endpoint.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Err(BreatheError::RateLimited),
        s if !s.is_success() => Err(BreatheError::Upstream {
            status: s.as_u16(),
            message: upstream_message(s, text),
        }),
        _ => serde_json::from_str(text).map_err(|_| BreatheError::Decode(text.to_string())),
    }
}

/// Best-effort error text: `message`, then `error`, then the raw body, then `HTTP <code>`.
fn upstream_message(status: StatusCode, text: &str) -> String {
    let from_json = serde_json::from_str::<Value>(text).ok().and_then(|json| {
        ["message", "error"]
            .iter()
            .find_map(|field| json.get(field).filter(|v| !v.is_null()))
            .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
    });

    from_json.unwrap_or_else(|| {
        if text.trim().is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            text.to_string()
        }
    })
}
