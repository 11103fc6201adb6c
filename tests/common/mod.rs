//! Shared utilities for integration testing.

use std::path::PathBuf;

use webmock::MockServer;

/// A started server on an ephemeral port.
pub fn start_server() -> MockServer {
    let mut server = MockServer::new().expect("bind mock server");
    server.start().expect("start mock server");
    server
}

/// A client that never reuses connections, so `stop()` is never held up by idle sockets.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .expect("build client")
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
