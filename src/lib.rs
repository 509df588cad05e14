//! Thread-Scoped Transaction Coordination
//!
//! Batches a sequence of mutating operations so they appear to occur as a
//! single unit: all-or-nothing application in submission order, rollback of
//! partial work on failure, and consolidated, deduplicated event dispatch to
//! the targets the operations touched.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // 1. Obtain a registry for the current context (one per thread)
//! let registry = TxnRegistry::new();
//!
//! // 2. Open a scope and submit operations
//! let scope = registry.begin();
//! registry.submit(Box::new(InsertRow { .. }))?;
//! registry.submit(Box::new(UpdateIndex { .. }))?;
//!
//! // 3. Commit: one sweep, collated events delivered per target
//! scope.commit()?;
//! ```
//!
//! Nested `begin()` calls on the same registry join the in-progress
//! transaction; `begin_nested()` forces an isolated one. `reset()` abandons
//! all speculative work without running commit or revert steps.

#![warn(missing_docs)]

// === Core Types ===
mod errors;
mod events;
mod ids;
mod state;

// === Authoring Surface ===
mod operation;
mod target;

// === Engine ===
mod collate;
mod registry;
mod transaction;

// === Observability ===
mod observer;
mod stats;

// === Re-exports ===

// Types
pub use events::TxnEvent;
pub use ids::{OpId, TxnId};
pub use state::OpStatus;

// Errors
pub use errors::{OpError, TxnError};

// Authoring surface
pub use operation::{FnOperation, Operation, OperationResult};
pub use target::{DispatchError, Target};

// Engine
pub use registry::{TxnGuard, TxnRegistry};
pub use transaction::Transaction;

// Observability
pub use observer::{NoOpObserver, TracingObserver, TxnObserver};
pub use stats::{EngineStats, EngineStatsSnapshot};
