//! IP restriction middleware.
//!
//! Rejects any request whose peer address is not on the configured
//! allow-list before it reaches a handler. Denial is a normal outcome,
//! logged and answered with 401, never an internal error.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::security::AccessGuard;

pub async fn ip_restriction_middleware(
    State(guard): State<Arc<AccessGuard>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client_ip = addr.ip().to_string();
    debug!(client = %client_ip, "Request received");

    if !guard.allow(Some(&client_ip)) {
        warn!(client = %client_ip, "Unauthorized access attempt");
        metrics::record_denied();
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}
