//! Per-operation status machine and queue entries

use crate::{OpId, Operation, OperationResult};

/// Status of an operation across one commit attempt.
///
/// Forward path: `Waiting -> Committing -> Committed`, or `Failed` if the
/// commit step throws. Rollback path: `Committed -> Reverting -> Reverted`,
/// or `Failed` if the revert step throws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpStatus {
    /// Queued, commit not yet attempted
    Waiting,
    /// Commit step in progress
    Committing,
    /// Commit step succeeded
    Committed,
    /// Commit or revert step failed
    Failed,
    /// Revert step in progress
    Reverting,
    /// Revert step succeeded
    Reverted,
}

impl OpStatus {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Reverted)
    }

    /// Whether the operation's mutation is currently applied
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Committed | Self::Reverting)
    }

    /// Stable name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::Failed => "failed",
            Self::Reverting => "reverting",
            Self::Reverted => "reverted",
        }
    }
}

/// A queued operation together with its engine-side bookkeeping.
///
/// Belongs to exactly one transaction's queue; discarded when that
/// transaction is committed or reset.
pub(crate) struct QueuedOp {
    pub(crate) id: OpId,
    pub(crate) status: OpStatus,
    pub(crate) op: Box<dyn Operation>,
    pub(crate) result: OperationResult,
}

impl QueuedOp {
    pub(crate) fn new(op: Box<dyn Operation>) -> Self {
        Self {
            id: OpId::next(),
            status: OpStatus::Waiting,
            op,
            result: OperationResult::new(),
        }
    }

    pub(crate) fn label(&self) -> Box<str> {
        self.op.label().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(OpStatus::Failed.is_terminal());
        assert!(OpStatus::Reverted.is_terminal());
        assert!(!OpStatus::Committed.is_terminal());
        assert!(!OpStatus::Waiting.is_terminal());
    }

    #[test]
    fn applied_states() {
        assert!(OpStatus::Committed.is_applied());
        assert!(OpStatus::Reverting.is_applied());
        assert!(!OpStatus::Reverted.is_applied());
    }
}
