//! Engine statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Engine-wide counters, updated with relaxed atomics
pub struct EngineStats {
    pub transactions_begun: AtomicU64,
    pub transactions_committed: AtomicU64,
    pub transactions_reset: AtomicU64,
    pub operations_submitted: AtomicU64,
    pub operations_committed: AtomicU64,
    pub operations_reverted: AtomicU64,
    pub commit_failures: AtomicU64,
    pub revert_failures: AtomicU64,
    pub events_dispatched: AtomicU64,
    pub events_deduplicated: AtomicU64,
    pub dispatch_failures: AtomicU64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self {
            transactions_begun: AtomicU64::new(0),
            transactions_committed: AtomicU64::new(0),
            transactions_reset: AtomicU64::new(0),
            operations_submitted: AtomicU64::new(0),
            operations_committed: AtomicU64::new(0),
            operations_reverted: AtomicU64::new(0),
            commit_failures: AtomicU64::new(0),
            revert_failures: AtomicU64::new(0),
            events_dispatched: AtomicU64::new(0),
            events_deduplicated: AtomicU64::new(0),
            dispatch_failures: AtomicU64::new(0),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            transactions_begun: self.transactions_begun.load(Ordering::Relaxed),
            transactions_committed: self.transactions_committed.load(Ordering::Relaxed),
            transactions_reset: self.transactions_reset.load(Ordering::Relaxed),
            operations_submitted: self.operations_submitted.load(Ordering::Relaxed),
            operations_committed: self.operations_committed.load(Ordering::Relaxed),
            operations_reverted: self.operations_reverted.load(Ordering::Relaxed),
            commit_failures: self.commit_failures.load(Ordering::Relaxed),
            revert_failures: self.revert_failures.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_deduplicated: self.events_deduplicated.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for EngineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of [`EngineStats`]
#[derive(Clone, Debug)]
pub struct EngineStatsSnapshot {
    pub transactions_begun: u64,
    pub transactions_committed: u64,
    pub transactions_reset: u64,
    pub operations_submitted: u64,
    pub operations_committed: u64,
    pub operations_reverted: u64,
    pub commit_failures: u64,
    pub revert_failures: u64,
    pub events_dispatched: u64,
    pub events_deduplicated: u64,
    pub dispatch_failures: u64,
}
