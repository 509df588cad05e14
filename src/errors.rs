//! Error types for transaction coordination

/// Failure raised by an operation's commit or revert step.
///
/// Operations surface whatever domain error they like; the engine only wraps
/// and propagates it.
pub type OpError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the engine entry points
#[derive(Debug, thiserror::Error)]
pub enum TxnError {
    /// `submit` or `commit` called with no active transaction on this registry
    #[error("no active transaction")]
    Inactive,

    /// An operation's commit step failed; completed work was rolled back
    #[error("operation `{label}` failed to commit")]
    CommitFailed {
        /// Label of the failing operation
        label: Box<str>,
        /// The operation's own failure
        #[source]
        source: OpError,
    },

    /// An operation's revert step failed during rollback.
    ///
    /// Remaining rollback was abandoned; the original commit failure is
    /// logged rather than carried here.
    #[error("operation `{label}` failed to revert")]
    RevertFailed {
        /// Label of the failing operation
        label: Box<str>,
        /// The operation's own failure
        #[source]
        source: OpError,
    },
}

impl TxnError {
    /// Check if this is the inactive-transaction usage error
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Inactive)
    }

    /// Check if rollback itself failed
    pub fn is_revert_failure(&self) -> bool {
        matches!(self, Self::RevertFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn commit_failure_keeps_source() {
        let err = TxnError::CommitFailed {
            label: "write_row".into(),
            source: "disk full".into(),
        };
        assert!(!err.is_inactive());
        assert_eq!(err.source().unwrap().to_string(), "disk full");
        assert!(err.to_string().contains("write_row"));
    }
}
