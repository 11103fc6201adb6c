//! Mock server lifecycle.
//!
//! # Responsibilities
//! - Bind the listener up front so the base URL is known before `start()`
//! - Create the Axum Router (admin routes, stub catch-all, tracing layer)
//! - Serve on the caller's tokio runtime until `stop()` or drop
//! - Expose registration, cassette loading and reset
//!
//! # Design Decisions
//! - One registry per server; several servers can run in one process
//! - Registration and loading errors are returned from the call that caused them

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::path::Path;
use std::sync::Arc;

use axum::{routing::any, Router};
use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::cassette::{load_path, load_paths, CassetteError, CassetteWatcher};
use crate::config::{validate_config, AdminConfig, ServerConfig, ValidationError};
use crate::http::dispatcher::{dispatch, AppState};
use crate::stub::{Stub, StubError, StubId, StubOptions};

/// Error type for server lifecycle operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0:?}")]
    InvalidConfig(Vec<ValidationError>),

    #[error("failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    #[error("server was already started")]
    AlreadyStarted,

    #[error("server must be started from within a tokio runtime")]
    NoRuntime,

    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("server task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Cassette(#[from] CassetteError),

    #[error("failed to watch cassettes: {0}")]
    Watch(#[from] notify::Error),
}

struct Running {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// An in-process HTTP server answering requests from its stub registry.
pub struct MockServer {
    state: AppState,
    config: ServerConfig,
    address: SocketAddr,
    listener: Option<StdTcpListener>,
    running: Option<Running>,
    _watcher: Option<RecommendedWatcher>,
}

impl MockServer {
    /// Bind an ephemeral port on localhost with default settings.
    pub fn new() -> Result<Self, ServerError> {
        Self::with_config(ServerConfig::default())
    }

    /// Bind according to `config` and load its cassettes.
    pub fn with_config(config: ServerConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ServerError::InvalidConfig)?;

        let bind_address: SocketAddr = config.listener.bind_address.parse().map_err(|_| {
            ServerError::InvalidConfig(vec![ValidationError::BindAddress(
                config.listener.bind_address.clone(),
            )])
        })?;

        let listener = StdTcpListener::bind(bind_address).map_err(ServerError::Bind)?;
        listener.set_nonblocking(true).map_err(ServerError::Bind)?;
        let address = listener.local_addr().map_err(ServerError::Bind)?;

        let state = AppState::default();
        let paths = &config.cassettes.paths;
        if !paths.is_empty() {
            state.registry.extend(load_paths(paths)?);
        }

        let watcher = if config.cassettes.watch && !paths.is_empty() {
            Some(
                CassetteWatcher::new(paths.clone(), state.registry.clone(), state.hits.clone())
                    .run()?,
            )
        } else {
            None
        };

        tracing::info!(
            address = %address,
            stubs = state.registry.len(),
            admin = config.admin.enabled,
            "Mock server bound"
        );

        Ok(Self {
            state,
            config,
            address,
            listener: Some(listener),
            running: None,
            _watcher: watcher,
        })
    }

    /// Base URL, e.g. `http://127.0.0.1:49152`. Valid before `start()`.
    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// `url()` joined with `path`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Begin serving on the current tokio runtime. Each connection is handled
    /// on its own task.
    pub fn start(&mut self) -> Result<(), ServerError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| ServerError::NoRuntime)?;
        let std_listener = self.listener.take().ok_or(ServerError::AlreadyStarted)?;
        let listener = TcpListener::from_std(std_listener).map_err(ServerError::Bind)?;

        let router = build_router(self.state.clone(), &self.config.admin);
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let task = handle.spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        self.running = Some(Running { shutdown, task });
        tracing::info!(address = %self.address, "Mock server started");
        Ok(())
    }

    /// Stop accepting, finish in-flight requests and release the listener.
    ///
    /// A server that was never started only releases its bound socket.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        drop(self.listener.take());
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        let _ = running.shutdown.send(());
        running.task.await?.map_err(ServerError::Serve)?;
        tracing::info!(address = %self.address, "Mock server stopped");
        Ok(())
    }

    /// Register a stub answering `200` with `body`.
    pub fn stub(&self, method: &str, url: &str, body: impl Into<String>) -> Result<StubId, StubError> {
        self.stub_with(method, url, body, StubOptions::default())
    }

    /// Register a stub with header requirements and/or a response override.
    pub fn stub_with(
        &self,
        method: &str,
        url: &str,
        body: impl Into<String>,
        options: StubOptions,
    ) -> Result<StubId, StubError> {
        let stub = Stub::new(method, url, body, &options)?;
        Ok(self.register(stub))
    }

    /// Register an already built stub.
    pub fn register(&self, stub: Stub) -> StubId {
        self.state.registry.add(stub).id()
    }

    /// Load a cassette file or directory. Either every stub is registered or none.
    pub fn load_cassettes(&self, path: impl AsRef<Path>) -> Result<usize, CassetteError> {
        let stubs = load_path(path.as_ref())?;
        Ok(self.state.registry.extend(stubs))
    }

    /// Remove every stub and reset hit counters.
    pub fn reset(&self) {
        self.state.reset();
        tracing::info!(address = %self.address, "Mock server reset");
    }

    /// Number of requests answered by stub `id` since the last reset.
    pub fn hits(&self, id: StubId) -> usize {
        self.state.hits.hits(id)
    }

    /// Number of requests answered with the 404 fallback since the last reset.
    pub fn unmatched(&self) -> usize {
        self.state.hits.unmatched()
    }

    /// Registered stubs in match order.
    pub fn stubs(&self) -> Vec<Arc<Stub>> {
        self.state.registry.snapshot().as_ref().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
        }
    }
}

/// Build the Axum router: admin routes (if enabled) ahead of the stub catch-all.
pub fn build_router(state: AppState, admin_config: &AdminConfig) -> Router {
    let mut router = Router::new()
        .route("/", any(dispatch))
        .route("/{*path}", any(dispatch));

    if admin_config.enabled {
        router = router.nest(&admin_config.prefix, admin::router());
    }

    router.with_state(state).layer(TraceLayer::new_for_http())
}
