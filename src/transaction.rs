//! Graph diffs and all-or-nothing application to a physics backend.
//!
//! Graph edits are planned as a [`GraphDiff`] of before/after pairs. A
//! [`Transaction`] pushes each op to the host's [`PhysicsBackend`] and keeps
//! an undo log; if any op is rejected, everything already applied is undone
//! in reverse order.

use crate::error::BackendError;
use crate::float::Float;
use crate::graph::{Body, Edge, EdgeKey, InstanceId, Owner, Shape, SoftbodyInstance};
use crate::observer::TransactionObserver;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec as AllocVec;

/// Capability interface of the host rigid-body engine.
///
/// `upsert_*` creates the object if absent and overwrites its settings
/// otherwise.
pub trait PhysicsBackend<F: Float> {
    fn upsert_body(&mut self, instance: InstanceId, owner: Owner, body: &Body<F>) -> Result<(), BackendError>;
    fn remove_body(&mut self, instance: InstanceId, owner: Owner) -> Result<(), BackendError>;
    fn upsert_shape(&mut self, instance: InstanceId, owner: Owner, shape: &Shape<F>) -> Result<(), BackendError>;
    fn remove_shape(&mut self, instance: InstanceId, owner: Owner) -> Result<(), BackendError>;
    fn upsert_edge(&mut self, instance: InstanceId, key: EdgeKey, edge: &Edge<F>) -> Result<(), BackendError>;
    fn remove_edge(&mut self, instance: InstanceId, key: EdgeKey) -> Result<(), BackendError>;
}

/// Backend that accepts everything and keeps nothing.
pub struct NullBackend;

impl<F: Float> PhysicsBackend<F> for NullBackend {
    fn upsert_body(&mut self, _: InstanceId, _: Owner, _: &Body<F>) -> Result<(), BackendError> { Ok(()) }
    fn remove_body(&mut self, _: InstanceId, _: Owner) -> Result<(), BackendError> { Ok(()) }
    fn upsert_shape(&mut self, _: InstanceId, _: Owner, _: &Shape<F>) -> Result<(), BackendError> { Ok(()) }
    fn remove_shape(&mut self, _: InstanceId, _: Owner) -> Result<(), BackendError> { Ok(()) }
    fn upsert_edge(&mut self, _: InstanceId, _: EdgeKey, _: &Edge<F>) -> Result<(), BackendError> { Ok(()) }
    fn remove_edge(&mut self, _: InstanceId, _: EdgeKey) -> Result<(), BackendError> { Ok(()) }
}

/// In-memory mirror of everything pushed to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryBackend<F: Float> {
    bodies: BTreeMap<(InstanceId, Owner), Body<F>>,
    shapes: BTreeMap<(InstanceId, Owner), Shape<F>>,
    edges: BTreeMap<(InstanceId, EdgeKey), Edge<F>>,
}

impl<F: Float> MemoryBackend<F> {
    pub fn new() -> Self {
        MemoryBackend { bodies: BTreeMap::new(), shapes: BTreeMap::new(), edges: BTreeMap::new() }
    }

    pub fn body(&self, instance: InstanceId, owner: Owner) -> Option<&Body<F>> {
        self.bodies.get(&(instance, owner))
    }

    pub fn shape(&self, instance: InstanceId, owner: Owner) -> Option<&Shape<F>> {
        self.shapes.get(&(instance, owner))
    }

    pub fn edge(&self, instance: InstanceId, key: EdgeKey) -> Option<&Edge<F>> {
        self.edges.get(&(instance, key))
    }

    pub fn body_count(&self) -> usize { self.bodies.len() }
    pub fn shape_count(&self) -> usize { self.shapes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.shapes.is_empty() && self.edges.is_empty()
    }
}

impl<F: Float> PhysicsBackend<F> for MemoryBackend<F> {
    fn upsert_body(&mut self, instance: InstanceId, owner: Owner, body: &Body<F>) -> Result<(), BackendError> {
        self.bodies.insert((instance, owner), *body);
        Ok(())
    }

    fn remove_body(&mut self, instance: InstanceId, owner: Owner) -> Result<(), BackendError> {
        self.bodies.remove(&(instance, owner));
        Ok(())
    }

    fn upsert_shape(&mut self, instance: InstanceId, owner: Owner, shape: &Shape<F>) -> Result<(), BackendError> {
        self.shapes.insert((instance, owner), *shape);
        Ok(())
    }

    fn remove_shape(&mut self, instance: InstanceId, owner: Owner) -> Result<(), BackendError> {
        self.shapes.remove(&(instance, owner));
        Ok(())
    }

    fn upsert_edge(&mut self, instance: InstanceId, key: EdgeKey, edge: &Edge<F>) -> Result<(), BackendError> {
        self.edges.insert((instance, key), *edge);
        Ok(())
    }

    fn remove_edge(&mut self, instance: InstanceId, key: EdgeKey) -> Result<(), BackendError> {
        self.edges.remove(&(instance, key));
        Ok(())
    }
}

/// One change to a graph object. `None` on either side means "absent".
#[derive(Clone, Debug, PartialEq)]
pub enum GraphOp<F: Float> {
    Body { instance: InstanceId, owner: Owner, before: Option<Body<F>>, after: Option<Body<F>> },
    Shape { instance: InstanceId, owner: Owner, before: Option<Shape<F>>, after: Option<Shape<F>> },
    Edge { instance: InstanceId, key: EdgeKey, before: Option<Edge<F>>, after: Option<Edge<F>> },
}

impl<F: Float> GraphOp<F> {
    /// The op that restores the `before` state.
    pub fn inverse(&self) -> Self {
        match self.clone() {
            GraphOp::Body { instance, owner, before, after } => {
                GraphOp::Body { instance, owner, before: after, after: before }
            }
            GraphOp::Shape { instance, owner, before, after } => {
                GraphOp::Shape { instance, owner, before: after, after: before }
            }
            GraphOp::Edge { instance, key, before, after } => {
                GraphOp::Edge { instance, key, before: after, after: before }
            }
        }
    }

    pub fn is_creation(&self) -> bool {
        match self {
            GraphOp::Body { before, after, .. } => before.is_none() && after.is_some(),
            GraphOp::Shape { before, after, .. } => before.is_none() && after.is_some(),
            GraphOp::Edge { before, after, .. } => before.is_none() && after.is_some(),
        }
    }

    pub fn is_removal(&self) -> bool {
        match self {
            GraphOp::Body { before, after, .. } => before.is_some() && after.is_none(),
            GraphOp::Shape { before, after, .. } => before.is_some() && after.is_none(),
            GraphOp::Edge { before, after, .. } => before.is_some() && after.is_none(),
        }
    }

    pub fn apply<B: PhysicsBackend<F> + ?Sized>(&self, backend: &mut B) -> Result<(), BackendError> {
        match self {
            GraphOp::Body { instance, owner, after: Some(body), .. } => backend.upsert_body(*instance, *owner, body),
            GraphOp::Body { instance, owner, after: None, .. } => backend.remove_body(*instance, *owner),
            GraphOp::Shape { instance, owner, after: Some(shape), .. } => backend.upsert_shape(*instance, *owner, shape),
            GraphOp::Shape { instance, owner, after: None, .. } => backend.remove_shape(*instance, *owner),
            GraphOp::Edge { instance, key, after: Some(edge), .. } => backend.upsert_edge(*instance, *key, edge),
            GraphOp::Edge { instance, key, after: None, .. } => backend.remove_edge(*instance, *key),
        }
    }
}

/// Ordered set of ops turning one graph state into another.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphDiff<F: Float> {
    ops: AllocVec<GraphOp<F>>,
}

impl<F: Float> GraphDiff<F> {
    pub fn new() -> Self {
        GraphDiff { ops: AllocVec::new() }
    }

    /// Ops that take `old` to `new`. Unchanged objects produce no op.
    ///
    /// Removals come first so a backend never holds a stale edge next to its
    /// replacement.
    pub fn between(old: &SoftbodyInstance<F>, new: &SoftbodyInstance<F>) -> Self {
        let instance = new.id();
        let mut removals = AllocVec::new();
        let mut writes = AllocVec::new();

        let keys: BTreeSet<EdgeKey> = old
            .edges()
            .chain(new.edges())
            .map(|(key, _)| *key)
            .collect();
        for key in keys {
            let before = old.edge(key.source, key.kind).copied();
            let after = new.edge(key.source, key.kind).copied();
            if before != after {
                let op = GraphOp::Edge { instance, key, before, after };
                if op.is_removal() { removals.push(op) } else { writes.push(op) }
            }
        }

        for owner in new.owners() {
            let before = old.body(owner).copied();
            let after = new.body(owner).copied();
            if before != after {
                let op = GraphOp::Body { instance, owner, before, after };
                if op.is_removal() { removals.push(op) } else { writes.push(op) }
            }
            let before = old.shape(owner).copied();
            let after = new.shape(owner).copied();
            if before != after {
                let op = GraphOp::Shape { instance, owner, before, after };
                if op.is_removal() { removals.push(op) } else { writes.push(op) }
            }
        }

        // Bodies and shapes must exist before the edges that reference them.
        writes.sort_by_key(|op| matches!(op, GraphOp::Edge { .. }));
        removals.extend(writes);
        GraphDiff { ops: removals }
    }

    pub fn extend(&mut self, other: GraphDiff<F>) {
        self.ops.extend(other.ops);
    }

    pub fn ops(&self) -> &[GraphOp<F>] { &self.ops }
    pub fn len(&self) -> usize { self.ops.len() }
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    pub fn created_bodies(&self) -> usize {
        self.count(|op| matches!(op, GraphOp::Body { .. }) && op.is_creation())
    }

    pub fn created_shapes(&self) -> usize {
        self.count(|op| matches!(op, GraphOp::Shape { .. }) && op.is_creation())
    }

    pub fn created_edges(&self) -> usize {
        self.count(|op| matches!(op, GraphOp::Edge { .. }) && op.is_creation())
    }

    pub fn removed_edges(&self) -> usize {
        self.count(|op| matches!(op, GraphOp::Edge { .. }) && op.is_removal())
    }

    /// Ops that overwrite an existing object.
    pub fn updates(&self) -> usize {
        self.count(|op| !op.is_creation() && !op.is_removal())
    }

    fn count(&self, pred: impl Fn(&GraphOp<F>) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

/// A unit of work against a backend with all-or-nothing semantics.
///
/// Dropping an uncommitted transaction rolls it back.
pub struct Transaction<'a, F, B, O>
where
    F: Float,
    B: PhysicsBackend<F> + ?Sized,
    O: TransactionObserver<F> + ?Sized,
{
    label: &'static str,
    backend: &'a mut B,
    observer: &'a mut O,
    applied: AllocVec<GraphOp<F>>,
    finished: bool,
}

impl<'a, F, B, O> Transaction<'a, F, B, O>
where
    F: Float,
    B: PhysicsBackend<F> + ?Sized,
    O: TransactionObserver<F> + ?Sized,
{
    pub fn begin(label: &'static str, backend: &'a mut B, observer: &'a mut O) -> Self {
        observer.on_suspend(label);
        Transaction { label, backend, observer, applied: AllocVec::new(), finished: false }
    }

    /// Push every op of `diff` to the backend, stopping at the first failure.
    pub fn apply(&mut self, diff: &GraphDiff<F>) -> Result<(), BackendError> {
        for op in diff.ops() {
            op.apply(&mut *self.backend)?;
            self.applied.push(op.clone());
        }
        Ok(())
    }

    pub fn commit(mut self, diff: &GraphDiff<F>) {
        self.finished = true;
        self.observer.on_commit(self.label, diff);
        tracing::debug!(label = self.label, ops = diff.len(), "transaction committed");
    }

    pub fn rollback(mut self) {
        self.undo();
    }

    fn undo(&mut self) {
        self.finished = true;
        tracing::warn!(label = self.label, ops = self.applied.len(), "rolling back transaction");
        while let Some(op) = self.applied.pop() {
            if let Err(err) = op.inverse().apply(&mut *self.backend) {
                tracing::warn!(label = self.label, %err, "backend refused undo op");
            }
        }
        self.observer.on_rollback(self.label);
    }
}

impl<'a, F, B, O> Drop for Transaction<'a, F, B, O>
where
    F: Float,
    B: PhysicsBackend<F> + ?Sized,
    O: TransactionObserver<F> + ?Sized,
{
    fn drop(&mut self) {
        if !self.finished {
            self.undo();
        }
    }
}
