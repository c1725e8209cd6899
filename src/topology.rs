//! Ring topology synthesis: turns a node array into a soft-body constraint
//! graph.
//!
//! Every ring node gets five edges:
//! - RingDistance to its successor
//! - BraceLeft / BraceRight to the nodes two steps away
//! - Diametric spring (or Strut) to the opposite node, or to the hub
//! - RotationCorrection to the root
//!
//! The root gets a shape, a body and a zero-force RootLink to node 0.
//!
//! Rest lengths are measured from the node positions at build time, so the
//! graph keeps whatever rest shape the skeleton encodes.

use crate::error::BuildError;
use crate::float::Float;
use crate::graph::{
    Body, Bracing, Edge, EdgeKey, EdgeKind, Joint, Owner, Shape, SoftbodyInstance, Topology,
};
use crate::observer::TransactionObserver;
use crate::profile::Profile;
use crate::ring::Ring;
use crate::transaction::{GraphDiff, PhysicsBackend, Transaction};
use crate::vec::Vec;
use alloc::collections::BTreeSet;

/// Inputs of a build besides the instance itself.
///
/// ```
/// use softring::{BuildRequest, Profile};
///
/// let request: BuildRequest<f32> = BuildRequest::new()
///     .with_central(true)
///     .with_profile(Profile::new());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuildRequest<F: Float> {
    /// Node 0 is a hub at the centre rather than a ring node.
    pub has_central: bool,
    pub profile: Option<Profile<F>>,
}

impl<F: Float> BuildRequest<F> {
    pub fn new() -> Self {
        BuildRequest { has_central: false, profile: None }
    }

    pub fn with_central(mut self, has_central: bool) -> Self {
        self.has_central = has_central;
        self
    }

    pub fn with_profile(mut self, profile: Profile<F>) -> Self {
        self.profile = Some(profile);
        self
    }
}

impl<F: Float> Default for BuildRequest<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds and rebuilds ring constraint graphs.
pub struct TopologyBuilder;

impl TopologyBuilder {
    /// Build `instance` in place and push the changes to `backend`.
    ///
    /// Re-running on a built instance only adds what is missing. On any
    /// error the instance and the backend are left as they were.
    pub fn build<F, B, O>(
        instance: &mut SoftbodyInstance<F>,
        request: &BuildRequest<F>,
        backend: &mut B,
        observer: &mut O,
    ) -> Result<GraphDiff<F>, BuildError>
    where
        F: Float,
        B: PhysicsBackend<F> + ?Sized,
        O: TransactionObserver<F> + ?Sized,
    {
        let (next, diff) = Self::plan(instance, request).inspect_err(|err| {
            tracing::warn!(instance = instance.name(), %err, "aborting soft body build");
        })?;

        let mut tx = Transaction::begin("build soft body", backend, observer);
        if let Err(err) = tx.apply(&diff) {
            tx.rollback();
            return Err(err.into());
        }
        tx.commit(&diff);

        tracing::debug!(
            instance = next.name(),
            nodes = next.node_count(),
            edges = next.edge_count(),
            created_edges = diff.created_edges(),
            "built soft body"
        );
        *instance = next;
        Ok(diff)
    }

    /// Compute the built graph and the diff from `existing` without touching
    /// anything.
    pub fn plan<F: Float>(
        existing: &SoftbodyInstance<F>,
        request: &BuildRequest<F>,
    ) -> Result<(SoftbodyInstance<F>, GraphDiff<F>), BuildError> {
        let profile = request.profile.ok_or(BuildError::MissingProfile)?.sanitized();
        if existing.nodes().is_empty() {
            return Err(BuildError::EmptySkeleton);
        }
        let ring = Ring::new(existing.node_count(), request.has_central);
        if ring.len() < 3 {
            return Err(BuildError::InsufficientRingNodes { ring_len: ring.len() });
        }

        let bracing = if profile.use_anti_compression_strut { Bracing::Strut } else { Bracing::Diametric };
        let mut plan = Plan { graph: existing.clone(), wanted: BTreeSet::new() };

        // The hub is never ring-processed but must own a body to be braced to.
        // Its body and shape do not follow the profile, so tweaks can skip it.
        if let Some(hub) = ring.hub() {
            plan.set_body(Owner::Node(hub), Body::root());
            plan.set_shape(Owner::Node(hub), Shape::hub());
        }

        for r in 0..ring.len() {
            let node = Owner::Node(ring.to_node_index(r));
            plan.configure_node(node, &profile);

            plan.ensure_edge(node, EdgeKind::RingDistance, Owner::Node(ring.step(r, 1)), |distance| {
                Joint::Distance { distance, max_distance_only: false, enable_collision: false }
            });
            plan.ensure_edge(node, EdgeKind::BraceLeft, Owner::Node(ring.step(r, -2)), |distance| {
                Joint::spring(distance, &profile)
            });
            plan.ensure_edge(node, EdgeKind::BraceRight, Owner::Node(ring.step(r, 2)), |distance| {
                Joint::spring(distance, &profile)
            });

            let opposite = Owner::Node(ring.opposite(r));
            match bracing {
                Bracing::Diametric => plan.ensure_edge(node, EdgeKind::Diametric, opposite, |distance| {
                    Joint::spring(distance, &profile)
                }),
                Bracing::Strut => plan.ensure_edge(node, EdgeKind::Strut, opposite, |distance| {
                    Joint::Distance { distance, max_distance_only: false, enable_collision: true }
                }),
            }

            plan.ensure_edge(node, EdgeKind::RotationCorrection, Owner::Root, |_| Joint::rotation_correction());
        }

        let bound_radius = existing.bound_radius();
        plan.set_shape(Owner::Root, Shape::root(bound_radius));
        plan.set_body(Owner::Root, Body::root());
        plan.ensure_edge(Owner::Root, EdgeKind::RootLink, Owner::Node(0), |_| Joint::passive_link());

        let Plan { mut graph, wanted } = plan;
        graph.edges_mut().retain(|key, _| wanted.contains(key));
        graph.set_topology(Topology { ring, bracing });

        let diff = GraphDiff::between(existing, &graph);
        Ok((graph, diff))
    }
}

/// Working copy of a graph being built, plus the edge keys the new topology
/// wants. Anything not wanted is dropped at the end.
struct Plan<F: Float> {
    graph: SoftbodyInstance<F>,
    wanted: BTreeSet<EdgeKey>,
}

impl<F: Float> Plan<F> {
    fn configure_node(&mut self, owner: Owner, profile: &Profile<F>) {
        self.set_body(owner, Body::from_profile(profile));
        self.set_shape(owner, Shape::from_profile(profile));
    }

    fn set_body(&mut self, owner: Owner, body: Body<F>) {
        if let Some(slot) = self.graph.body_slot(owner) {
            *slot = Some(body);
        }
    }

    fn set_shape(&mut self, owner: Owner, shape: Shape<F>) {
        if let Some(slot) = self.graph.shape_slot(owner) {
            *slot = Some(shape);
        }
    }

    /// Insert or refresh the `(source, kind)` edge toward `target`.
    ///
    /// An edge already pointing at `target` keeps its rest length; otherwise
    /// the rest length is the current separation of the two ends.
    fn ensure_edge(
        &mut self,
        source: Owner,
        kind: EdgeKind,
        target: Owner,
        joint: impl FnOnce(F) -> Joint<F>,
    ) {
        let key = EdgeKey::new(source, kind);
        self.wanted.insert(key);

        let kept = self
            .graph
            .edge(source, kind)
            .filter(|edge| edge.target == target)
            .and_then(|edge| edge.joint.distance());
        let distance = kept.unwrap_or_else(|| self.separation(source, target));

        self.graph.edges_mut().insert(key, Edge::new(target, joint(distance)));
    }

    fn separation(&self, a: Owner, b: Owner) -> F {
        match (self.graph.position_of(a), self.graph.position_of(b)) {
            (Some(pa), Some(pb)) => pa.distance(pb),
            _ => F::zero(),
        }
    }
}
