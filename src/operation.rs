//! Operation authoring surface

use crate::{OpError, Target, TxnEvent};
use std::sync::Arc;

/// A unit of work queued into a transaction.
///
/// Authors supply two actions: `commit` performs the mutation and may record
/// events into the result; `revert` undoes exactly what `commit` did and is
/// called only if `commit` succeeded. Neither action is invoked outside the
/// commit protocol.
///
/// # Example
///
/// ```rust,ignore
/// struct InsertRow { table: Arc<TableTarget>, row: Row }
///
/// impl Operation for InsertRow {
///     fn label(&self) -> &str { "insert_row" }
///     fn target(&self) -> Arc<dyn Target> { self.table.clone() }
///
///     fn commit(&mut self, result: &mut OperationResult) -> Result<(), OpError> {
///         self.table.insert(&self.row)?;
///         result.record(self.table.clone(), TxnEvent::domain("row_inserted", self.row.key()));
///         Ok(())
///     }
///
///     fn revert(&mut self) -> Result<(), OpError> {
///         self.table.remove(&self.row)
///     }
/// }
/// ```
pub trait Operation: Send + 'static {
    /// Short name used in logs and error messages
    fn label(&self) -> &str;

    /// The target this operation addresses.
    ///
    /// A back-reference used only for lifecycle dispatch; the engine does not
    /// own or mutate the target.
    fn target(&self) -> Arc<dyn Target>;

    /// Perform the mutation, optionally recording events into `result`
    fn commit(&mut self, result: &mut OperationResult) -> Result<(), OpError>;

    /// Undo the mutation performed by a successful `commit`
    fn revert(&mut self) -> Result<(), OpError>;
}

/// Events accumulated by one operation's commit step.
///
/// Populated only during that operation's commit call, read once during
/// collation, then discarded with the transaction.
#[derive(Default)]
pub struct OperationResult {
    events: Vec<(Arc<dyn Target>, TxnEvent)>,
}

impl OperationResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Record an event to announce to `target` after the sweep succeeds
    pub fn record(&mut self, target: Arc<dyn Target>, event: TxnEvent) {
        self.events.push((target, event));
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events were recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<(Arc<dyn Target>, TxnEvent)> {
        std::mem::take(&mut self.events)
    }
}

impl std::fmt::Debug for OperationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationResult")
            .field("events", &self.events.len())
            .finish()
    }
}

/// Convenience operation wrapping a plain side-effecting closure.
///
/// For steps where rollback is not meaningful; `revert` is a no-op.
pub struct FnOperation<F> {
    label: Box<str>,
    target: Arc<dyn Target>,
    action: F,
}

impl<F> FnOperation<F>
where
    F: FnMut(&mut OperationResult) -> Result<(), OpError> + Send + 'static,
{
    /// Wrap `action` as an operation addressed to `target`
    pub fn new(label: impl Into<Box<str>>, target: Arc<dyn Target>, action: F) -> Self {
        Self {
            label: label.into(),
            target,
            action,
        }
    }
}

impl<F> Operation for FnOperation<F>
where
    F: FnMut(&mut OperationResult) -> Result<(), OpError> + Send + 'static,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn target(&self) -> Arc<dyn Target> {
        self.target.clone()
    }

    fn commit(&mut self, result: &mut OperationResult) -> Result<(), OpError> {
        (self.action)(result)
    }

    fn revert(&mut self) -> Result<(), OpError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DispatchError;

    struct Sink;

    impl Target for Sink {
        fn name(&self) -> &str {
            "sink"
        }

        fn dispatch(&self, _event: &TxnEvent) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    #[test]
    fn fn_operation_records_events() {
        let target: Arc<dyn Target> = Arc::new(Sink);
        let recorded = target.clone();
        let mut op = FnOperation::new("touch", target, move |result| {
            result.record(recorded.clone(), TxnEvent::domain("touched", vec![]));
            Ok(())
        });

        let mut result = OperationResult::new();
        op.commit(&mut result).unwrap();
        assert_eq!(result.len(), 1);
        assert!(op.revert().is_ok());
    }
}
