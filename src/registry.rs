//! Per-context transaction registry

use crate::stats::EngineStats;
use crate::{NoOpObserver, Operation, Transaction, TxnError, TxnObserver};
use std::cell::RefCell;
use std::sync::Arc;

/// Per-context stack of active transactions.
///
/// One registry per thread by construction: the interior `RefCell` keeps it
/// out of shared ownership across threads, so callers obtain a registry via
/// context passing rather than ambient global storage. The top of the stack
/// is the active transaction and every entry point operates on the top.
///
/// # Quick start
///
/// ```rust,ignore
/// let registry = TxnRegistry::new();
/// {
///     let scope = registry.begin();
///     registry.submit(Box::new(InsertRow { .. }))?;
///     registry.submit(Box::new(UpdateIndex { .. }))?;
///     scope.commit()?; // single sweep, collated events delivered
/// }
/// ```
pub struct TxnRegistry {
    stack: RefCell<Vec<Arc<Transaction>>>,
    observer: Arc<dyn TxnObserver>,
    stats: Arc<EngineStats>,
}

impl TxnRegistry {
    /// Create a registry with no observer
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoOpObserver))
    }

    /// Create a registry that reports protocol steps to `observer`
    pub fn with_observer(observer: Arc<dyn TxnObserver>) -> Self {
        Self {
            stack: RefCell::new(Vec::new()),
            observer,
            stats: Arc::new(EngineStats::new()),
        }
    }

    /// Engine counters for this registry
    pub fn stats(&self) -> Arc<EngineStats> {
        self.stats.clone()
    }

    /// Continue the current transaction, or start one if none is active.
    ///
    /// Increments the active transaction's depth, letting a deeply nested
    /// call chain append to an in-progress transaction transparently. The
    /// returned guard commits on normal scope exit.
    pub fn begin(&self) -> TxnGuard<'_> {
        self.begin_inner(false)
    }

    /// Start an isolated transaction even when one is already active.
    ///
    /// The new transaction commits independently of its caller's eventual
    /// commit or reset.
    pub fn begin_nested(&self) -> TxnGuard<'_> {
        self.begin_inner(true)
    }

    fn begin_inner(&self, nested: bool) -> TxnGuard<'_> {
        let mut stack = self.stack.borrow_mut();
        let reuse = if nested { None } else { stack.last().cloned() };
        let txn = match reuse {
            Some(top) => top,
            None => {
                let txn = Arc::new(Transaction::new());
                stack.push(txn.clone());
                EngineStats::bump(&self.stats.transactions_begun);
                txn
            }
        };
        txn.enter();
        TxnGuard {
            registry: self,
            txn,
            resolved: false,
        }
    }

    /// Enqueue an operation on the active transaction.
    ///
    /// Fails fast with [`TxnError::Inactive`] when no transaction is active.
    pub fn submit(&self, op: Box<dyn Operation>) -> Result<(), TxnError> {
        let txn = self.active().ok_or(TxnError::Inactive)?;
        txn.enqueue(op);
        EngineStats::bump(&self.stats.operations_submitted);
        Ok(())
    }

    /// Close the innermost begin scope.
    ///
    /// Decrements the active transaction's depth. While the depth stays above
    /// zero this is a bookkeeping step only: the transaction remains active
    /// and its queue pending for the eventual outer commit. At depth zero the
    /// transaction is popped and the full commit protocol runs on this
    /// thread.
    pub fn commit(&self) -> Result<(), TxnError> {
        let txn = {
            let mut stack = self.stack.borrow_mut();
            let top = stack.last().ok_or(TxnError::Inactive)?;
            if top.exit() > 0 {
                return Ok(());
            }
            // Pop before the sweep so operation code can open a fresh
            // transaction on this registry.
            stack.pop().ok_or(TxnError::Inactive)?
        };

        let outcome = txn.run_commit(self.observer.as_ref(), &self.stats);
        if outcome.is_ok() {
            EngineStats::bump(&self.stats.transactions_committed);
        }
        outcome
    }

    /// Discard the entire stacked chain without committing or reverting.
    ///
    /// Queued operations at every level are dropped. No-op when no
    /// transaction is active.
    pub fn reset(&self) {
        let chain: Vec<Arc<Transaction>> = self.stack.borrow_mut().drain(..).collect();
        if chain.is_empty() {
            return;
        }

        let mut discarded = 0usize;
        for txn in chain {
            discarded += txn.discard();
            EngineStats::bump(&self.stats.transactions_reset);
        }
        self.observer.on_reset(discarded);
    }

    /// The active (top-of-stack) transaction, if any
    pub fn active(&self) -> Option<Arc<Transaction>> {
        self.stack.borrow().last().cloned()
    }
}

impl Default for TxnRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TxnRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxnRegistry")
            .field("depth", &self.stack.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Scoped handle over a begin/commit pair.
///
/// Dropping the guard on normal scope exit calls `commit()`, so operations
/// submitted inside the scope are committed even without an explicit call; a
/// commit failure on this path is logged, never panicked. During unwinding
/// the guard does nothing: a propagated panic leaves the transaction in
/// place until an explicit [`TxnRegistry::reset`].
pub struct TxnGuard<'r> {
    registry: &'r TxnRegistry,
    txn: Arc<Transaction>,
    resolved: bool,
}

impl TxnGuard<'_> {
    /// The transaction this scope participates in
    pub fn transaction(&self) -> Arc<Transaction> {
        self.txn.clone()
    }

    /// Close this scope explicitly, surfacing any commit failure
    pub fn commit(mut self) -> Result<(), TxnError> {
        self.resolved = true;
        self.registry.commit()
    }
}

impl Drop for TxnGuard<'_> {
    fn drop(&mut self) {
        if self.resolved || std::thread::panicking() {
            return;
        }
        if let Err(error) = self.registry.commit() {
            tracing::error!(txn_id = %self.txn.id(), error = %error, "Implicit commit failed");
        }
    }
}

impl std::fmt::Debug for TxnGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxnGuard")
            .field("txn", &self.txn.id())
            .field("resolved", &self.resolved)
            .finish()
    }
}
