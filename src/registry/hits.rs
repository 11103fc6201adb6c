//! Per-stub hit counters, kept outside the registry so resolution stays pure.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::stub::{Stub, StubId};

#[derive(Debug, Default)]
pub struct HitLedger {
    per_stub: DashMap<StubId, usize>,
    unmatched: AtomicUsize,
}

impl HitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: StubId) {
        *self.per_stub.entry(id).or_insert(0) += 1;
    }

    pub fn record_unmatched(&self) {
        self.unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self, id: StubId) -> usize {
        self.per_stub.get(&id).map(|count| *count).unwrap_or(0)
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched.load(Ordering::Relaxed)
    }

    /// Drop counters of stubs no longer in `live`. The unmatched count is kept.
    pub fn retain_stubs(&self, live: &[Arc<Stub>]) {
        let live: HashSet<StubId> = live.iter().map(|stub| stub.id()).collect();
        self.per_stub.retain(|id, _| live.contains(id));
    }

    pub fn tracked(&self) -> usize {
        self.per_stub.len()
    }

    pub fn clear(&self) {
        self.per_stub.clear();
        self.unmatched.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubOptions;

    #[test]
    fn test_counts_per_stub() {
        let ledger = HitLedger::new();
        let (a, b) = (StubId::new(), StubId::new());

        ledger.record(a);
        ledger.record(a);
        ledger.record(b);
        ledger.record_unmatched();

        assert_eq!(ledger.hits(a), 2);
        assert_eq!(ledger.hits(b), 1);
        assert_eq!(ledger.hits(StubId::new()), 0);
        assert_eq!(ledger.unmatched(), 1);

        ledger.clear();
        assert_eq!(ledger.hits(a), 0);
        assert_eq!(ledger.unmatched(), 0);
    }

    #[test]
    fn test_retain_drops_replaced_stubs() {
        let kept = Arc::new(Stub::new("GET", "/kept", "", &StubOptions::default()).unwrap());
        let gone = StubId::new();
        let ledger = HitLedger::new();

        ledger.record(kept.id());
        ledger.record(gone);
        ledger.record_unmatched();

        ledger.retain_stubs(&[kept.clone()]);
        assert_eq!(ledger.hits(kept.id()), 1);
        assert_eq!(ledger.hits(gone), 0);
        assert_eq!(ledger.tracked(), 1);
        assert_eq!(ledger.unmatched(), 1);
    }
}
