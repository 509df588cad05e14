//! Engine observer trait

use crate::{OpId, TxnId};

/// Observer trait for external observability
pub trait TxnObserver: Send + Sync + 'static {
    fn on_commit_started(&self, txn: TxnId, pending: usize);
    fn on_operation_committed(&self, txn: TxnId, op: OpId, label: &str);
    fn on_operation_failed(&self, txn: TxnId, op: OpId, label: &str, error: &str);
    fn on_rollback_started(&self, txn: TxnId, completed: usize);
    fn on_operation_reverted(&self, txn: TxnId, op: OpId, label: &str);
    fn on_commit_finished(&self, txn: TxnId, success: bool);
    fn on_reset(&self, discarded: usize);
}

/// No-op observer
pub struct NoOpObserver;

impl TxnObserver for NoOpObserver {
    fn on_commit_started(&self, _txn: TxnId, _pending: usize) {}
    fn on_operation_committed(&self, _txn: TxnId, _op: OpId, _label: &str) {}
    fn on_operation_failed(&self, _txn: TxnId, _op: OpId, _label: &str, _error: &str) {}
    fn on_rollback_started(&self, _txn: TxnId, _completed: usize) {}
    fn on_operation_reverted(&self, _txn: TxnId, _op: OpId, _label: &str) {}
    fn on_commit_finished(&self, _txn: TxnId, _success: bool) {}
    fn on_reset(&self, _discarded: usize) {}
}

/// Tracing-based observer
pub struct TracingObserver;

impl TxnObserver for TracingObserver {
    fn on_commit_started(&self, txn: TxnId, pending: usize) {
        tracing::info!(txn_id = %txn, pending = pending, "Commit sweep started");
    }

    fn on_operation_committed(&self, txn: TxnId, op: OpId, label: &str) {
        tracing::debug!(txn_id = %txn, op_id = %op, label = %label, "Operation committed");
    }

    fn on_operation_failed(&self, txn: TxnId, op: OpId, label: &str, error: &str) {
        tracing::warn!(txn_id = %txn, op_id = %op, label = %label, error = %error, "Operation failed");
    }

    fn on_rollback_started(&self, txn: TxnId, completed: usize) {
        tracing::error!(txn_id = %txn, completed = completed, "Rolling back completed operations");
    }

    fn on_operation_reverted(&self, txn: TxnId, op: OpId, label: &str) {
        tracing::info!(txn_id = %txn, op_id = %op, label = %label, "Operation reverted");
    }

    fn on_commit_finished(&self, txn: TxnId, success: bool) {
        tracing::info!(txn_id = %txn, success = success, "Commit sweep finished");
    }

    fn on_reset(&self, discarded: usize) {
        tracing::info!(discarded = discarded, "Transaction chain reset");
    }
}
