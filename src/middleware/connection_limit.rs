//! WebSocket connection admission control
//!
//! Enforces the global and per-IP connection caps before a WebSocket
//! upgrade is accepted. Rejections are cheap HTTP responses (503 when the
//! server is full, 429 when one address hogs it); admitted connections get
//! a [`ClientIp`] extension so the handler can release the slot when the
//! socket closes. Non-upgrade requests pass through untouched.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::state::{AppState, ConnectionLimitError};

/// The admitted client's IP, injected for the handler to release later.
#[derive(Clone, Debug)]
pub struct ClientIp(pub IpAddr);

/// Middleware enforcing WebSocket connection limits.
pub async fn connection_limit_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let is_ws_upgrade = request
        .headers()
        .get("upgrade")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false);

    if !is_ws_upgrade {
        return next.run(request).await;
    }

    let client_ip = addr.ip();
    match state.try_acquire_connection(client_ip) {
        Ok(()) => {
            request.extensions_mut().insert(ClientIp(client_ip));
            next.run(request).await
        }
        Err(ConnectionLimitError::GlobalLimitReached) => {
            warn!(ip = %client_ip, "rejecting connection: global limit reached");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Server at capacity. Please try again later.",
            )
                .into_response()
        }
        Err(ConnectionLimitError::PerIpLimitReached) => {
            warn!(ip = %client_ip, "rejecting connection: per-IP limit reached");
            (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many connections from your IP address.",
            )
                .into_response()
        }
    }
}
