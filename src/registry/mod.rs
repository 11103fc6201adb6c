//! Stub registry.
//!
//! # Responsibilities
//! - Store registered stubs in registration order
//! - Resolve an incoming request to the first matching stub
//! - Append, bulk-append, swap and clear atomically
//!
//! # Design Decisions
//! - Copy-on-write `Vec` behind `ArcSwap`: readers never lock, writers
//!   publish a complete new sequence
//! - Resolution works on a snapshot, so an in-flight request never sees a
//!   half-applied registration or reset
//! - O(n) linear scan (tens to low hundreds of stubs per test run)
//! - First registered wins; a broad stub added early shadows a narrow one

pub mod hits;

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::http::request::IncomingRequest;
use crate::observability::metrics;
use crate::stub::Stub;

pub use hits::HitLedger;

/// Ordered, thread-safe collection of stubs.
#[derive(Debug, Default)]
pub struct Registry {
    stubs: ArcSwap<Vec<Arc<Stub>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stub after every existing one.
    pub fn add(&self, stub: Stub) -> Arc<Stub> {
        let stub = Arc::new(stub);
        self.stubs.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(stub.clone());
            next
        });
        metrics::record_registered(1);
        tracing::debug!(
            stub_id = %stub.id(),
            method = %stub.method(),
            path = %stub.path(),
            "Stub registered"
        );
        stub
    }

    /// Append a batch in one step; a concurrent resolve sees all of it or none.
    pub fn extend(&self, batch: Vec<Stub>) -> usize {
        let batch: Vec<Arc<Stub>> = batch.into_iter().map(Arc::new).collect();
        let count = batch.len();
        if count == 0 {
            return 0;
        }
        self.stubs.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + batch.len());
            next.extend(current.iter().cloned());
            next.extend(batch.iter().cloned());
            next
        });
        metrics::record_registered(count);
        tracing::debug!(count, "Stub batch registered");
        count
    }

    /// Swap the whole sequence for `batch`.
    pub fn replace(&self, batch: Vec<Stub>) {
        let next: Vec<Arc<Stub>> = batch.into_iter().map(Arc::new).collect();
        metrics::record_registered(next.len());
        tracing::debug!(count = next.len(), "Stub set replaced");
        self.stubs.store(Arc::new(next));
    }

    /// Remove every stub.
    pub fn clear(&self) {
        self.stubs.store(Arc::new(Vec::new()));
    }

    /// First stub, in registration order, that matches `req`.
    pub fn resolve(&self, req: &IncomingRequest) -> Option<Arc<Stub>> {
        let snapshot = self.stubs.load();
        snapshot.iter().find(|stub| stub.matches(req)).cloned()
    }

    /// The current sequence. Later registrations do not affect it.
    pub fn snapshot(&self) -> Arc<Vec<Arc<Stub>>> {
        self.stubs.load_full()
    }

    pub fn len(&self) -> usize {
        self.stubs.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.load().is_empty()
    }
}
