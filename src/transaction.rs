//! Transaction object and commit protocol

use crate::collate::collate;
use crate::state::{OpStatus, QueuedOp};
use crate::stats::EngineStats;
use crate::target::same_target;
use crate::{Operation, Target, TxnError, TxnEvent, TxnId, TxnObserver};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// An ordered queue of pending operations plus commit/rollback orchestration.
///
/// The depth counter tracks nested begin/commit pairs: depth > 0 means the
/// transaction is open and more nested calls are expected before the real
/// commit happens. The queue is append-safe across threads, but ordering
/// guarantees assume single-threaded submission; the commit lock only
/// prevents two concurrent sweeps of the same instance if a reference
/// escapes its creating thread.
pub struct Transaction {
    id: TxnId,
    depth: AtomicU32,
    queue: Mutex<Vec<QueuedOp>>,
    commit_lock: Mutex<()>,
}

impl Transaction {
    pub(crate) fn new() -> Self {
        Self {
            id: TxnId::next(),
            depth: AtomicU32::new(0),
            queue: Mutex::new(Vec::new()),
            commit_lock: Mutex::new(()),
        }
    }

    /// This transaction's identifier
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Current nesting depth
    pub fn depth(&self) -> u32 {
        self.depth.load(Ordering::Acquire)
    }

    /// Number of operations waiting for the next real commit
    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }

    pub(crate) fn enter(&self) -> u32 {
        self.depth.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn exit(&self) -> u32 {
        self.depth.fetch_sub(1, Ordering::AcqRel) - 1
    }

    pub(crate) fn enqueue(&self, op: Box<dyn Operation>) {
        self.queue.lock().push(QueuedOp::new(op));
    }

    /// Drop all queued operations without committing or reverting anything.
    /// Returns how many were discarded.
    pub(crate) fn discard(&self) -> usize {
        let mut queue = self.queue.lock();
        let discarded = queue.len();
        queue.clear();
        discarded
    }

    /// Run the full commit protocol over the queued operations.
    ///
    /// Runs on the calling thread, under this transaction's commit lock.
    /// Either every operation commits and the collated events are delivered,
    /// or the failure is propagated after completed work has been reverted.
    /// The queue is cleared in both cases.
    pub(crate) fn run_commit(
        &self,
        observer: &dyn TxnObserver,
        stats: &EngineStats,
    ) -> Result<(), TxnError> {
        let _sweep = self.commit_lock.lock();

        let mut ops: Vec<QueuedOp> = std::mem::take(&mut *self.queue.lock());
        let targets = distinct_targets(&ops);

        observer.on_commit_started(self.id, ops.len());
        dispatch_to_all(&targets, &TxnEvent::CommitBegin, stats);

        // Drain strictly in submission order; stop at the first failure.
        let mut completed: Vec<usize> = Vec::new();
        let mut failure: Option<TxnError> = None;
        for idx in 0..ops.len() {
            let entry = &mut ops[idx];
            entry.status = OpStatus::Committing;
            match entry.op.commit(&mut entry.result) {
                Ok(()) => {
                    entry.status = OpStatus::Committed;
                    completed.push(idx);
                    observer.on_operation_committed(self.id, entry.id, entry.op.label());
                    EngineStats::bump(&stats.operations_committed);
                }
                Err(source) => {
                    entry.status = OpStatus::Failed;
                    observer.on_operation_failed(
                        self.id,
                        entry.id,
                        entry.op.label(),
                        &source.to_string(),
                    );
                    EngineStats::bump(&stats.commit_failures);
                    failure = Some(TxnError::CommitFailed {
                        label: entry.label(),
                        source,
                    });
                    break;
                }
            }
        }

        let outcome = match failure {
            Some(commit_err) => {
                let rollback_err = self.rollback(&mut ops, &completed, observer, stats);
                dispatch_to_all(&targets, &TxnEvent::CommitFail, stats);
                // A revert failure supersedes the commit failure; the commit
                // cause has already been logged above.
                Err(rollback_err.unwrap_or(commit_err))
            }
            None => {
                self.deliver(&mut ops, stats);
                dispatch_to_all(&targets, &TxnEvent::CommitSuccess, stats);
                Ok(())
            }
        };

        dispatch_to_all(&targets, &TxnEvent::CommitEnd, stats);
        observer.on_commit_finished(self.id, outcome.is_ok());
        outcome
    }

    /// Revert completed operations, in completion order.
    ///
    /// Forward order (not reverse) matches the reference behavior. A revert
    /// failure abandons the remaining rollback.
    fn rollback(
        &self,
        ops: &mut [QueuedOp],
        completed: &[usize],
        observer: &dyn TxnObserver,
        stats: &EngineStats,
    ) -> Option<TxnError> {
        observer.on_rollback_started(self.id, completed.len());

        for &idx in completed {
            let entry = &mut ops[idx];
            if entry.status != OpStatus::Committed {
                continue;
            }
            entry.status = OpStatus::Reverting;
            match entry.op.revert() {
                Ok(()) => {
                    entry.status = OpStatus::Reverted;
                    observer.on_operation_reverted(self.id, entry.id, entry.op.label());
                    EngineStats::bump(&stats.operations_reverted);
                }
                Err(source) => {
                    entry.status = OpStatus::Failed;
                    observer.on_operation_failed(
                        self.id,
                        entry.id,
                        entry.op.label(),
                        &source.to_string(),
                    );
                    EngineStats::bump(&stats.revert_failures);
                    return Some(TxnError::RevertFailed {
                        label: entry.label(),
                        source,
                    });
                }
            }
        }

        None
    }

    /// Collate and deliver the events produced by a fully committed sweep
    fn deliver(&self, ops: &mut [QueuedOp], stats: &EngineStats) {
        let mut produced = 0usize;
        let merged = collate(ops.iter_mut().map(|entry| {
            let stream = entry.result.take();
            produced += stream.len();
            stream
        }));

        let delivered: usize = merged.iter().map(|(_, events)| events.len()).sum();
        stats
            .events_deduplicated
            .fetch_add((produced - delivered) as u64, Ordering::Relaxed);

        for (target, events) in &merged {
            for event in events {
                dispatch_one(target, event, stats);
            }
        }
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("depth", &self.depth())
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Targets referenced by the queued operations, in order of first appearance
fn distinct_targets(ops: &[QueuedOp]) -> Vec<Arc<dyn Target>> {
    let mut targets: Vec<Arc<dyn Target>> = Vec::new();
    for entry in ops {
        let target = entry.op.target();
        if !targets.iter().any(|t| same_target(t, &target)) {
            targets.push(target);
        }
    }
    targets
}

fn dispatch_to_all(targets: &[Arc<dyn Target>], event: &TxnEvent, stats: &EngineStats) {
    for target in targets {
        dispatch_one(target, event, stats);
    }
}

/// Deliver one event; a failing target is logged and never blocks the others
fn dispatch_one(target: &Arc<dyn Target>, event: &TxnEvent, stats: &EngineStats) {
    match target.dispatch(event) {
        Ok(()) => EngineStats::bump(&stats.events_dispatched),
        Err(error) => {
            EngineStats::bump(&stats.dispatch_failures);
            tracing::warn!(
                target_name = %target.name(),
                event = %event.event_type(),
                error = %error,
                "Target dispatch failed"
            );
        }
    }
}
