//! Axum middleware entry points.
//!
//! Use with `axum::middleware::from_fn_with_state(Arc<AddressGate>, ..)`.
//! Gates stacked this way combine with AND semantics.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::gate::AddressGate;

/// Forward only requests whose remote address is on the gate's list.
pub async fn admit_on_match(
    State(gate): State<Arc<AddressGate>>,
    req: Request,
    next: Next,
) -> Response {
    gate.admit_on_match(req, next).await
}

/// Deny requests whose remote address is on the gate's list.
pub async fn deny_on_match(
    State(gate): State<Arc<AddressGate>>,
    req: Request,
    next: Next,
) -> Response {
    gate.deny_on_match(req, next).await
}

/// Connection-level peer address of a request, as a string.
///
/// Requires the router to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn remote_address(req: &Request) -> Option<String> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}
