//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, lifecycle)
//!     → [admin routes, if enabled]
//!     → dispatcher.rs (catch-all handler)
//!     → request.rs (normalize method, path, query, headers)
//!     → Registry::resolve
//!     → stub response or 404
//! ```

pub mod dispatcher;
pub mod request;
pub mod server;

pub use dispatcher::AppState;
pub use request::IncomingRequest;
pub use server::{MockServer, ServerError};
