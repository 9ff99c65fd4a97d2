//! HTTP serving boundary: the MCP endpoint, a liveness route and the optional
//! bearer-token gate in front of `/mcp`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use rmcp::transport::{
    StreamableHttpServerConfig, StreamableHttpService,
    streamable_http_server::session::local::LocalSessionManager,
};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::mcp::{BreatheHrMcp, config::BreatheConfig, http::BreatheClient};

/// SHA-256 digest of the secret a caller must present as
/// `Authorization: Bearer <key>`.
#[derive(Clone)]
struct AccessKey(Arc<[u8; 32]>);

impl AccessKey {
    fn new(key: &str) -> Self {
        Self(Arc::new(digest(key)))
    }

    /// Compares digests over their full, fixed length so the time taken does
    /// not depend on how much of the token matches.
    fn matches(&self, token: &str) -> bool {
        digest(token)
            .iter()
            .zip(self.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Builds the application router: `/mcp` (gated when `MCP_API_KEY` is set)
/// and an open `/health`.
pub fn router(config: &BreatheConfig, client: Arc<BreatheClient>) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(BreatheHrMcp::new(client.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let mcp = Router::new().nest_service("/mcp", service);
    let mcp = match config.mcp_api_key.as_deref() {
        Some(key) => gated(mcp, key),
        None => mcp,
    };

    Router::new().route("/health", get(health)).merge(mcp)
}

fn gated(routes: Router, key: &str) -> Router {
    routes.layer(middleware::from_fn_with_state(
        AccessKey::new(key),
        require_bearer,
    ))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "breathe-hr-mcp" }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

async fn require_bearer(State(key): State<AccessKey>, request: Request, next: Next) -> Response {
    if bearer_token(request.headers()).is_some_and(|token| key.matches(token)) {
        return next.run(request).await;
    }

    warn!(uri = %request.uri(), "rejected request with invalid or missing API key");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(json!({ "detail": "Invalid or missing API key" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::{body::Body, http::Request as HttpRequest};
    use tower::ServiceExt;

    use super::*;

    fn protected() -> Router {
        gated(Router::new().route("/mcp", get(|| async { "ok" })), "gate-secret")
    }

    async fn status_of(app: Router, auth: Option<&str>) -> StatusCode {
        let mut request = HttpRequest::builder().uri("/mcp");
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }
        app.oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn gate_accepts_matching_bearer_token() {
        assert_eq!(status_of(protected(), Some("Bearer gate-secret")).await, StatusCode::OK);
        assert_eq!(status_of(protected(), Some("bearer gate-secret")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_rejects_missing_or_wrong_token() {
        assert_eq!(status_of(protected(), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(protected(), Some("Bearer nope")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(protected(), Some("Basic gate-secret")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn rejection_advertises_bearer_scheme() {
        let response = protected()
            .oneshot(HttpRequest::builder().uri("/mcp").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn access_key_matches_only_the_exact_secret() {
        let key = AccessKey::new("gate-secret");
        assert!(key.matches("gate-secret"));
        assert!(!key.matches("gate-secre"));
        assert!(!key.matches("gate-secret2"));
        assert!(!key.matches(""));
    }

    #[tokio::test]
    async fn mcp_is_open_without_gate_secret() {
        let config = BreatheConfig::for_upstream("http://localhost", Some("key"));
        assert!(config.mcp_api_key.is_none());
        let client = Arc::new(BreatheClient::new(&config).unwrap());

        let response = router(&config, client)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_is_open_even_when_gated() {
        let mut config = BreatheConfig::for_upstream("http://localhost", Some("key"));
        config.mcp_api_key = Some("gate-secret".to_string());
        let client = Arc::new(BreatheClient::new(&config).unwrap());
        let app = router(&config, client);

        let response = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
