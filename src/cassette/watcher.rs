//! Cassette watcher for hot reload.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::cassette::loader::load_paths;
use crate::registry::{HitLedger, Registry};

/// Watches cassette paths and swaps the registry contents when they change.
pub struct CassetteWatcher {
    paths: Vec<PathBuf>,
    registry: Arc<Registry>,
    hits: Arc<HitLedger>,
}

impl CassetteWatcher {
    pub fn new(paths: Vec<PathBuf>, registry: Arc<Registry>, hits: Arc<HitLedger>) -> Self {
        Self {
            paths,
            registry,
            hits,
        }
    }

    /// Reload every watched path and replace the registry contents.
    /// Hit counters of replaced stubs are dropped with them.
    ///
    /// On failure the current stubs are kept.
    pub fn reload(&self) -> bool {
        reload(&self.paths, &self.registry, &self.hits)
    }

    /// Start watching. The returned handle must be kept alive; dropping it stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let paths = self.paths.clone();
        let registry = self.registry.clone();
        let hits = self.hits.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        tracing::info!("Cassette change detected, reloading...");
                        reload(&paths, &registry, &hits);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for path in &self.paths {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(paths = ?self.paths, "Cassette watcher started");
        Ok(watcher)
    }
}

fn reload(paths: &[PathBuf], registry: &Registry, hits: &HitLedger) -> bool {
    match load_paths(paths) {
        Ok(stubs) => {
            registry.replace(stubs);
            hits.retain_stubs(&registry.snapshot());
            true
        }
        Err(e) => {
            tracing::error!("Failed to reload cassettes: {}. Keeping current stubs.", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::IncomingRequest;
    use std::fs;

    #[test]
    fn test_reload_replaces_and_keeps_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stubs.yml");
        fs::write(&file, "- method: GET\n  url: /v1\n").unwrap();

        let registry = Arc::new(Registry::new());
        let hits = Arc::new(HitLedger::new());
        let watcher = CassetteWatcher::new(
            vec![dir.path().to_path_buf()],
            registry.clone(),
            hits.clone(),
        );
        assert!(watcher.reload());
        let v1 = registry.resolve(&IncomingRequest::new("GET", "/v1")).unwrap();
        hits.record(v1.id());
        hits.record_unmatched();

        fs::write(&file, "- method: GET\n  url: /v2\n").unwrap();
        assert!(watcher.reload());
        assert!(registry.resolve(&IncomingRequest::new("GET", "/v1")).is_none());
        let v2 = registry.resolve(&IncomingRequest::new("GET", "/v2")).unwrap();
        assert_eq!(hits.hits(v1.id()), 0);
        assert_eq!(hits.tracked(), 0);
        assert_eq!(hits.unmatched(), 1);

        hits.record(v2.id());

        fs::write(&file, "- method: [broken\n").unwrap();
        assert!(!watcher.reload());
        assert!(registry.resolve(&IncomingRequest::new("GET", "/v2")).is_some());
        assert_eq!(hits.hits(v2.id()), 1);
    }
}
