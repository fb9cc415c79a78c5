//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (IP gate, tracing, limits, timeout, request ID)
//! - Bind server to listener with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{HeaderName, HeaderValue, X_CONTENT_TYPE_OPTIONS};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::crypto::cipher::WeakSecret;
use crate::crypto::CipherService;
use crate::http::handlers;
use crate::http::middleware::ip_restriction::ip_restriction_middleware;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::security::AccessGuard;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cipher: Arc<CipherService>,
    pub max_text_chars: usize,
}

/// HTTP server for the crypto API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Build the server from validated configuration. Fails only when the
    /// configured secret is too weak to derive a key from.
    pub fn new(config: ServerConfig) -> Result<Self, WeakSecret> {
        let cipher = Arc::new(CipherService::new(&config.encryption.secret)?);
        let guard = Arc::new(AccessGuard::new(&config.access.allowed_ips));

        let state = AppState {
            cipher,
            max_text_chars: config.limits.max_text_chars,
        };

        let router = Self::build_router(&config, state, guard);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState, guard: Arc<AccessGuard>) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/api/crypto/encrypt", post(handlers::encrypt))
            .route("/api/crypto/decrypt", post(handlers::decrypt))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(middleware::from_fn_with_state(
                guard,
                ip_restriction_middleware,
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(SetResponseHeaderLayer::if_not_present(
                X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
