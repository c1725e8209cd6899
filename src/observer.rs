//! Observer trait for watching graph transactions.

use crate::float::Float;
use crate::transaction::GraphDiff;

/// Trait for host state that must not see a graph mid-edit.
///
/// A selection or inspector suspends itself in `on_suspend` and restores
/// itself once the transaction ends. All methods have default no-op
/// implementations.
pub trait TransactionObserver<F: Float> {
    /// Called when a transaction begins, before any backend call.
    fn on_suspend(&mut self, _label: &str) {}

    /// Called once after every op of `diff` reached the backend.
    fn on_commit(&mut self, _label: &str, _diff: &GraphDiff<F>) {}

    /// Called once after a failed transaction was undone.
    fn on_rollback(&mut self, _label: &str) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpObserver;

impl<F: Float> TransactionObserver<F> for NoOpObserver {}
