//! Admin API for driving a running mock server over HTTP.
//!
//! Mounted under the configured prefix, ahead of the stub catch-all.
//!
//! Admin routes shadow stubs registered at the same paths: with the admin API
//! enabled, `/{prefix}/status` and `/{prefix}/stubs` never reach the registry,
//! and a method the admin route does not handle (e.g. `PUT {prefix}/stubs`)
//! gets `405 Method Not Allowed` rather than a stub response or the 404
//! fallback. Pick a prefix no stubbed API uses.

pub mod handlers;

use axum::{routing::get, Router};

use crate::http::AppState;
use self::handlers::*;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/stubs", get(list_stubs).post(create_stub).delete(reset_stubs))
}
