//! Engine events delivered to targets

/// Events the engine dispatches to targets during and after a commit sweep.
///
/// The four lifecycle kinds bracket every sweep; `Domain` events are produced
/// by operations and carried through collation opaquely. Equality on the whole
/// enum drives deduplication: two domain events are duplicates when their kind
/// and payload match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TxnEvent {
    /// A commit sweep is about to run over this target's operations
    CommitBegin,
    /// Every operation in the sweep committed
    CommitSuccess,
    /// An operation failed and completed work was rolled back
    CommitFail,
    /// The sweep finished, successfully or not
    CommitEnd,
    /// A domain event attached by an operation's commit step
    Domain {
        /// Caller-defined event kind
        kind: Box<str>,
        /// Opaque payload, uninterpreted by the engine
        payload: Vec<u8>,
    },
}

impl TxnEvent {
    /// Build a domain event
    pub fn domain(kind: impl Into<Box<str>>, payload: Vec<u8>) -> Self {
        Self::Domain {
            kind: kind.into(),
            payload,
        }
    }

    /// Stable name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommitBegin => "commit_begin",
            Self::CommitSuccess => "commit_success",
            Self::CommitFail => "commit_fail",
            Self::CommitEnd => "commit_end",
            Self::Domain { .. } => "domain",
        }
    }

    /// Whether this is one of the four lifecycle kinds
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, Self::Domain { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_covers_kind_and_payload() {
        let a = TxnEvent::domain("row_changed", vec![1, 2]);
        let b = TxnEvent::domain("row_changed", vec![1, 2]);
        let c = TxnEvent::domain("row_changed", vec![3]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, TxnEvent::CommitBegin);
    }

    #[test]
    fn lifecycle_predicate() {
        assert!(TxnEvent::CommitEnd.is_lifecycle());
        assert!(!TxnEvent::domain("x", vec![]).is_lifecycle());
    }
}
