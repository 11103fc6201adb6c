//! Embeddable HTTP test double.
//!
//! Start an in-process server, register canned responses, and point a real
//! HTTP client at it:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use webmock::{with_headers, MockServer};
//!
//! let mut server = MockServer::new()?;
//! server.start()?;
//!
//! server.stub("GET", "/abc", "ok")?;
//! server.stub_with("GET", "/get", "ok with headers", with_headers("Accept-Encoding: gzip,deflate"))?;
//! server.load_cassettes("./fixtures")?;
//!
//! let body = reqwest::get(server.url_for("/abc")).await?.text().await?;
//! assert_eq!(body, "ok");
//!
//! server.reset();
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod cassette;
pub mod config;
pub mod http;
pub mod observability;
pub mod registry;
pub mod stub;

pub use cassette::CassetteError;
pub use config::ServerConfig;
pub use http::{MockServer, ServerError};
pub use registry::Registry;
pub use stub::{with_headers, with_response, Stub, StubError, StubId, StubOptions};
