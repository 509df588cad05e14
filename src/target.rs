//! Dispatch capability consumed from domain objects

use crate::TxnEvent;
use std::sync::Arc;

/// Capability to receive engine events.
///
/// Implemented by external domain objects; the engine never constructs or
/// interprets a target's business state. Targets are always handled as
/// `Arc<dyn Target>` and two references denote the same target exactly when
/// they point at the same allocation.
pub trait Target: Send + Sync + 'static {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Deliver one event to this target.
    ///
    /// Failures are logged by the engine and never affect the commit outcome
    /// or delivery to other targets.
    fn dispatch(&self, event: &TxnEvent) -> Result<(), DispatchError>;
}

/// Failure raised by a target's event handling
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The target rejected or failed to process the event
    #[error("Target rejected event: {0}")]
    Rejected(Box<str>),
}

/// Pointer identity of a target reference.
///
/// `Arc::ptr_eq` on trait objects also compares vtable pointers; comparing
/// thin data pointers is what "same logical target" means here.
pub(crate) fn same_target(a: &Arc<dyn Target>, b: &Arc<dyn Target>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl Target for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        fn dispatch(&self, _event: &TxnEvent) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    #[test]
    fn identity_is_per_allocation() {
        let a: Arc<dyn Target> = Arc::new(Silent);
        let b = Arc::clone(&a);
        let c: Arc<dyn Target> = Arc::new(Silent);
        assert!(same_target(&a, &b));
        assert!(!same_target(&a, &c));
    }
}
