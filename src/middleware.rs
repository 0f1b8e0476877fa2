//! Axum adapter for the gate.
//!
//! The gate itself is framework-neutral over `http::Request`; this module
//! embeds it in an axum middleware pipeline.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::gate::decision::Decision;
use crate::gate::Gate;

/// Middleware function evaluating the gate for every request.
///
/// On `Continue` the resolved identity is attached to request extensions and
/// the passthrough headers are merged onto the response; on `Deny` the
/// denial is rendered and the inner service never runs.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match gate.evaluate(&request) {
        Decision::Continue(pass) => {
            if let Some(identity) = pass.identity {
                request.extensions_mut().insert(identity);
            }
            let mut response = next.run(request).await;
            for (name, value) in pass.response_headers.iter() {
                response.headers_mut().insert(name.clone(), value.clone());
            }
            response
        }
        Decision::Deny(denial) => denial.into_response(),
    }
}

/// Wrap a router with the gate and HTTP tracing.
pub fn protect(router: Router, gate: Arc<Gate>) -> Router {
    router
        .layer(axum::middleware::from_fn_with_state(gate, gate_middleware))
        .layer(TraceLayer::new_for_http())
}
