//! Request dispatch: inbound request → registry → response.
//!
//! # Responsibilities
//! - Normalize the request and resolve it against the registry
//! - Render the matched stub's response
//! - Fall back to a fixed 404 when nothing matches
//! - Count hits per stub and unmatched requests
//!
//! # Design Decisions
//! - Single pass: no retries, no timeouts, no body buffering
//! - Hit counting lives here so `Registry::resolve` stays side-effect-free

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
};

use crate::http::request::IncomingRequest;
use crate::observability::metrics::{self, Outcome};
use crate::registry::{HitLedger, Registry};
use crate::stub::response::not_found;

/// State shared by every request handler of one server.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub hits: Arc<HitLedger>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, hits: Arc<HitLedger>) -> Self {
        Self { registry, hits }
    }

    /// Clear every stub and every counter.
    pub fn reset(&self) {
        self.registry.clear();
        self.hits.clear();
    }
}

/// Catch-all handler for stubbed traffic.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    let incoming = IncomingRequest::from_parts(&parts.method, &parts.uri, &parts.headers);
    respond(&state, &incoming)
}

/// Resolve `incoming` and build the response to write back.
pub fn respond(state: &AppState, incoming: &IncomingRequest) -> Response {
    match state.registry.resolve(incoming) {
        Some(stub) => {
            state.hits.record(stub.id());
            metrics::record_request(&incoming.method, Outcome::Matched);
            tracing::debug!(
                stub_id = %stub.id(),
                method = %incoming.method,
                path = %incoming.path,
                status = stub.response().status().as_u16(),
                "Stub matched"
            );
            stub.response().to_response()
        }
        None => {
            state.hits.record_unmatched();
            metrics::record_request(&incoming.method, Outcome::Unmatched);
            tracing::debug!(
                method = %incoming.method,
                path = %incoming.path,
                "No stub matched"
            );
            not_found()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{with_response, Stub, StubOptions};
    use axum::http::StatusCode;

    fn state_with(stubs: Vec<Stub>) -> AppState {
        let state = AppState::default();
        state.registry.extend(stubs);
        state
    }

    #[test]
    fn test_match_renders_stub_response() {
        let no_headers: [(&str, &str); 0] = [];
        let stub = Stub::new("GET", "/get", "", &with_response(401, "No permissions", no_headers)).unwrap();
        let id = stub.id();
        let state = state_with(vec![stub]);

        let response = respond(&state, &IncomingRequest::new("GET", "/get"));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.hits.hits(id), 1);
        assert_eq!(state.hits.unmatched(), 0);
    }

    #[test]
    fn test_miss_is_plain_404() {
        let state = state_with(vec![Stub::new("GET", "/abc", "ok", &StubOptions::default()).unwrap()]);

        let response = respond(&state, &IncomingRequest::new("GET", "/other"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().is_empty());
        assert_eq!(state.hits.unmatched(), 1);
    }
}
