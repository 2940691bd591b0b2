//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the hello and health handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown token fires
//!
//! # Endpoints
//! - `GET /hello`: greeting in the configured language
//! - `GET /healthz`: 200 while checks are enabled, 410 otherwise
//! - `PUT /health/pass`, `PUT /health/fail`: toggle checks

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::SharedConfig;
use crate::http::greeting::Greeting;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: SharedConfig,
}

/// HTTP server for the hello service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            router: build_router(AppState { config }),
        }
    }

    /// Run the server on `listener` until `shutdown` is cancelled.
    pub async fn run(self, listener: TcpListener, shutdown: CancellationToken) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hello", get(handle_hello))
        .route("/healthz", get(handle_health))
        .route("/health/pass", put(enable_health))
        .route("/health/fail", put(disable_health))
        .with_state(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn handle_hello(State(state): State<AppState>) -> String {
    let greeting = Greeting::for_language(&state.config.language());
    format!("{}\n", greeting.text())
}

async fn handle_health(State(state): State<AppState>) -> Response {
    if state.config.checks_enabled() {
        (StatusCode::OK, "I'm alive\n").into_response()
    } else {
        StatusCode::GONE.into_response()
    }
}

async fn enable_health(State(state): State<AppState>) -> &'static str {
    state.config.set_checks_enabled(true);
    tracing::info!("Health checks enabled via HTTP");
    "Health endpoint enabled.\n"
}

async fn disable_health(State(state): State<AppState>) -> &'static str {
    state.config.set_checks_enabled(false);
    tracing::info!("Health checks disabled via HTTP");
    "Health endpoint disabled.\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    async fn call(router: &Router, method: Method, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn router() -> (Router, SharedConfig) {
        let config = SharedConfig::new(Settings::default());
        (build_router(AppState { config: config.clone() }), config)
    }

    #[tokio::test]
    async fn test_hello_follows_language() {
        let (router, config) = router();
        assert_eq!(call(&router, Method::GET, "/hello").await, (StatusCode::OK, "Hello World\n".into()));

        config.set_language("french");
        assert_eq!(call(&router, Method::GET, "/hello").await.1, "Bonjour Monde\n");

        config.set_language("dutch");
        assert_eq!(call(&router, Method::GET, "/hello").await.1, "Hello World\n");
    }

    #[tokio::test]
    async fn test_health_toggle() {
        let (router, config) = router();
        assert_eq!(call(&router, Method::GET, "/healthz").await, (StatusCode::OK, "I'm alive\n".into()));

        let (status, body) = call(&router, Method::PUT, "/health/fail").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Health endpoint disabled.\n");
        assert!(!config.checks_enabled());
        assert_eq!(call(&router, Method::GET, "/healthz").await.0, StatusCode::GONE);

        call(&router, Method::PUT, "/health/pass").await;
        assert!(config.checks_enabled());
        assert_eq!(call(&router, Method::GET, "/healthz").await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_set() {
        let (router, _) = router();
        let request = Request::builder().uri("/hello").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let (router, _) = router();
        assert_eq!(
            call(&router, Method::POST, "/hello").await.0,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
