//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry / dispatcher / cassette loader produce:
//!     → tracing events (structured fields: method, path, stub_id)
//!     → metrics.rs (request and registration counters)
//!
//! Consumers:
//!     → logging.rs subscriber (binary only)
//!     → Prometheus endpoint (binary only, opt-in)
//! ```
//!
//! # Design Decisions
//! - The library emits events but never installs a subscriber or recorder
//! - Unmatched requests are logged at debug; a miss is not an error

pub mod logging;
pub mod metrics;
