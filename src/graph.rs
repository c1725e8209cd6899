//! Constraint graph data: nodes, bodies, shapes and edges of a soft body.

use crate::float::Float;
use crate::profile::{CollisionDetection, Interpolation, Profile};
use crate::ring::Ring;
use crate::vec::{Vec, Vec2};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec as AllocVec;

/// Collision layer bit carried by every bone shape.
pub const BONE_LAYER: u32 = 1 << 8;
/// Collision layer bit of ordinary scene objects.
pub const DEFAULT_LAYER: u32 = 1;

/// Root collider radius as a fraction of the sprite bound radius.
pub const ROOT_SHAPE_SCALE: f32 = 0.9;
/// Torque cap of the rotation-correction edges.
pub const ROTATION_CORRECTION_MAX_TORQUE: f32 = 1000.0;

/// Host-side identifier of a soft-body instance.
///
/// Backends key everything they store by this id, so the host must give
/// every live instance a distinct one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceId(pub u32);

/// Something that owns a body, a shape, or the source/target end of an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Owner {
    /// The sprite's own object, which tracks the aggregate transform.
    Root,
    /// Node `i` of the skeleton.
    Node(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionFilter {
    /// Layers this shape belongs to.
    pub membership: u32,
    /// Layers this shape never collides with.
    pub excludes: u32,
}

impl CollisionFilter {
    pub fn bone() -> Self {
        CollisionFilter { membership: BONE_LAYER, excludes: 0 }
    }

    /// Root filter: skips the bone layer so the root never overlaps the ring.
    pub fn root() -> Self {
        CollisionFilter { membership: DEFAULT_LAYER, excludes: BONE_LAYER }
    }

    pub fn collides_with(&self, other: &CollisionFilter) -> bool {
        self.excludes & other.membership == 0 && other.excludes & self.membership == 0
    }
}

/// Rigid-body settings pushed to the host engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body<F: Float> {
    pub mass: F,
    pub linear_drag: F,
    pub angular_drag: F,
    pub freeze_rotation: bool,
    pub interpolation: Interpolation,
    pub collision_detection: CollisionDetection,
}

impl<F: Float> Body<F> {
    pub fn from_profile(profile: &Profile<F>) -> Self {
        Body {
            mass: profile.body_mass,
            linear_drag: profile.linear_drag,
            angular_drag: profile.angular_drag,
            freeze_rotation: profile.freeze_rotation,
            interpolation: profile.interpolation,
            collision_detection: profile.collision_detection,
        }
    }

    /// Body of the root object and the hub: unit mass, no drag, rotation
    /// locked. Independent of any profile.
    pub fn root() -> Self {
        Body {
            mass: F::one(),
            linear_drag: F::zero(),
            angular_drag: F::zero(),
            freeze_rotation: true,
            interpolation: Interpolation::default(),
            collision_detection: CollisionDetection::default(),
        }
    }
}

/// Circle collider.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape<F: Float> {
    pub radius: F,
    pub offset: Vec2<F>,
    pub filter: CollisionFilter,
}

impl<F: Float> Shape<F> {
    /// Bone shape. With `use_collider_offset` the circle sits half a radius
    /// along local +x.
    pub fn from_profile(profile: &Profile<F>) -> Self {
        let radius = profile.collider_radius;
        let offset = if profile.use_collider_offset {
            Vec2::new(radius * F::half(), F::zero())
        } else {
            Vec2::zero()
        };
        Shape { radius, offset, filter: CollisionFilter::bone() }
    }

    /// Hub shape: a centred bone-layer circle of radius 0.5, independent of
    /// any profile.
    pub fn hub() -> Self {
        Shape { radius: F::half(), offset: Vec2::zero(), filter: CollisionFilter::bone() }
    }

    /// Root shape, slightly smaller than the sprite bound.
    pub fn root(bound_radius: F) -> Self {
        Shape {
            radius: bound_radius * F::from_f32(ROOT_SHAPE_SCALE),
            offset: Vec2::zero(),
            filter: CollisionFilter::root(),
        }
    }
}

/// Role of an edge in the ring topology.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    /// Distance edge to the next ring node.
    RingDistance,
    /// Spring to the ring node two steps back.
    BraceLeft,
    /// Spring to the ring node two steps ahead.
    BraceRight,
    /// Spring across the ring, or to the hub.
    Diametric,
    /// Rigid distance edge across the ring, or to the hub.
    Strut,
    /// Torque-only edge toward the root orientation.
    RotationCorrection,
    /// Zero-force edge from the root to the first bone.
    RootLink,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 7] = [
        EdgeKind::RingDistance,
        EdgeKind::BraceLeft,
        EdgeKind::BraceRight,
        EdgeKind::Diametric,
        EdgeKind::Strut,
        EdgeKind::RotationCorrection,
        EdgeKind::RootLink,
    ];

    /// Kinds whose joint is a spring and follows the profile's spring settings.
    pub fn is_spring(self) -> bool {
        matches!(self, EdgeKind::BraceLeft | EdgeKind::BraceRight | EdgeKind::Diametric)
    }
}

/// Map key of an edge: at most one edge per source and kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKey {
    pub source: Owner,
    pub kind: EdgeKind,
}

impl EdgeKey {
    pub fn new(source: Owner, kind: EdgeKind) -> Self {
        EdgeKey { source, kind }
    }

    pub fn node(index: usize, kind: EdgeKind) -> Self {
        EdgeKey { source: Owner::Node(index), kind }
    }
}

/// Joint parameters of an edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint<F: Float> {
    Distance {
        distance: F,
        max_distance_only: bool,
        enable_collision: bool,
    },
    Spring {
        distance: F,
        frequency: F,
        damping_ratio: F,
        enable_collision: bool,
    },
    Relative {
        linear_offset: Vec2<F>,
        angular_offset: F,
        max_force: F,
        max_torque: F,
        correction_scale: F,
    },
}

impl<F: Float> Joint<F> {
    /// Rest length of distance and spring joints.
    pub fn distance(&self) -> Option<F> {
        match *self {
            Joint::Distance { distance, .. } | Joint::Spring { distance, .. } => Some(distance),
            Joint::Relative { .. } => None,
        }
    }

    pub fn spring(distance: F, profile: &Profile<F>) -> Self {
        Joint::Spring {
            distance,
            frequency: profile.spring_frequency,
            damping_ratio: profile.spring_damping_ratio,
            enable_collision: profile.spring_enable_collision,
        }
    }

    /// Purely rotational correction toward the connected body.
    pub fn rotation_correction() -> Self {
        Joint::Relative {
            linear_offset: Vec2::zero(),
            angular_offset: F::zero(),
            max_force: F::zero(),
            max_torque: F::from_f32(ROTATION_CORRECTION_MAX_TORQUE),
            correction_scale: F::one(),
        }
    }

    /// Relative joint that applies no force at all.
    pub fn passive_link() -> Self {
        Joint::Relative {
            linear_offset: Vec2::zero(),
            angular_offset: F::zero(),
            max_force: F::zero(),
            max_torque: F::zero(),
            correction_scale: F::one(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge<F: Float> {
    pub target: Owner,
    /// Anchor in the source's local frame.
    pub anchor: Vec2<F>,
    /// Anchor in the target's local frame.
    pub connected_anchor: Vec2<F>,
    pub joint: Joint<F>,
}

impl<F: Float> Edge<F> {
    /// Edge anchored at both local origins.
    pub fn new(target: Owner, joint: Joint<F>) -> Self {
        Edge { target, anchor: Vec2::zero(), connected_anchor: Vec2::zero(), joint }
    }
}

/// A skeleton node and the physics objects it owns once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<F: Float> {
    pub name: String,
    pub local_position: Vec2<F>,
    pub local_rotation: F,
    /// `None` when attached to the synthetic root.
    pub parent: Option<usize>,
    /// World position; owned by the physics engine after build.
    pub position: Vec2<F>,
    pub rotation: F,
    pub body: Option<Body<F>>,
    pub shape: Option<Shape<F>>,
}

impl<F: Float> Node<F> {
    /// Free node at a world position, with no parent and no rotation.
    pub fn at(name: impl Into<String>, position: Vec2<F>) -> Self {
        Node {
            name: name.into(),
            local_position: position,
            local_rotation: F::zero(),
            parent: None,
            position,
            rotation: F::zero(),
            body: None,
            shape: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RootNode<F: Float> {
    pub position: Vec2<F>,
    pub body: Option<Body<F>>,
    pub shape: Option<Shape<F>>,
}

/// How ring nodes are braced across the ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bracing {
    Diametric,
    Strut,
}

impl Bracing {
    pub fn edge_kind(self) -> EdgeKind {
        match self {
            Bracing::Diametric => EdgeKind::Diametric,
            Bracing::Strut => EdgeKind::Strut,
        }
    }
}

/// The topology an instance was last built with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    pub ring: Ring,
    pub bracing: Bracing,
}

/// A soft body: root, nodes, and the constraint graph between them.
#[derive(Clone, Debug, PartialEq)]
pub struct SoftbodyInstance<F: Float> {
    id: InstanceId,
    name: String,
    bound_radius: F,
    root: RootNode<F>,
    nodes: AllocVec<Node<F>>,
    edges: BTreeMap<EdgeKey, Edge<F>>,
    topology: Option<Topology>,
}

impl<F: Float> SoftbodyInstance<F> {
    /// Unbuilt instance `id` over `nodes`, rooted at the origin.
    pub fn new(id: InstanceId, nodes: AllocVec<Node<F>>) -> Self {
        SoftbodyInstance {
            id,
            name: String::from("Softbody"),
            bound_radius: F::half(),
            root: RootNode { position: Vec2::zero(), body: None, shape: None },
            nodes,
            edges: BTreeMap::new(),
            topology: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_root_position(mut self, position: Vec2<F>) -> Self {
        self.root.position = position;
        self
    }

    /// Sprite bound radius, `max(extents.x, extents.y)`.
    pub fn with_bound_radius(mut self, radius: F) -> Self {
        self.bound_radius = radius;
        self
    }

    pub fn id(&self) -> InstanceId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn bound_radius(&self) -> F { self.bound_radius }
    pub fn root(&self) -> &RootNode<F> { &self.root }
    pub fn nodes(&self) -> &[Node<F>] { &self.nodes }
    pub fn node(&self, index: usize) -> Option<&Node<F>> { self.nodes.get(index) }
    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn topology(&self) -> Option<&Topology> { self.topology.as_ref() }
    pub fn is_built(&self) -> bool { self.topology.is_some() }

    /// Update a node's world position, as reported by the physics engine.
    pub fn set_node_position(&mut self, index: usize, position: Vec2<F>) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.position = position;
        }
    }

    pub fn position_of(&self, owner: Owner) -> Option<Vec2<F>> {
        match owner {
            Owner::Root => Some(self.root.position),
            Owner::Node(i) => self.nodes.get(i).map(|n| n.position),
        }
    }

    pub fn body(&self, owner: Owner) -> Option<&Body<F>> {
        match owner {
            Owner::Root => self.root.body.as_ref(),
            Owner::Node(i) => self.nodes.get(i)?.body.as_ref(),
        }
    }

    pub fn shape(&self, owner: Owner) -> Option<&Shape<F>> {
        match owner {
            Owner::Root => self.root.shape.as_ref(),
            Owner::Node(i) => self.nodes.get(i)?.shape.as_ref(),
        }
    }

    /// Root followed by every node.
    pub fn owners(&self) -> impl Iterator<Item = Owner> {
        core::iter::once(Owner::Root).chain((0..self.nodes.len()).map(Owner::Node))
    }

    pub fn edge(&self, source: Owner, kind: EdgeKind) -> Option<&Edge<F>> {
        self.edges.get(&EdgeKey::new(source, kind))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Edge<F>)> {
        self.edges.iter()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = (&EdgeKey, &Edge<F>)> {
        self.edges.iter().filter(move |(key, _)| key.kind == kind)
    }

    pub fn edges_from(&self, source: Owner) -> impl Iterator<Item = (&EdgeKey, &Edge<F>)> {
        self.edges.iter().filter(move |(key, _)| key.source == source)
    }

    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn body_count(&self) -> usize {
        self.owners().filter(|&o| self.body(o).is_some()).count()
    }

    pub fn shape_count(&self) -> usize {
        self.owners().filter(|&o| self.shape(o).is_some()).count()
    }

    pub(crate) fn body_slot(&mut self, owner: Owner) -> Option<&mut Option<Body<F>>> {
        match owner {
            Owner::Root => Some(&mut self.root.body),
            Owner::Node(i) => self.nodes.get_mut(i).map(|n| &mut n.body),
        }
    }

    pub(crate) fn shape_slot(&mut self, owner: Owner) -> Option<&mut Option<Shape<F>>> {
        match owner {
            Owner::Root => Some(&mut self.root.shape),
            Owner::Node(i) => self.nodes.get_mut(i).map(|n| &mut n.shape),
        }
    }

    pub(crate) fn edges_mut(&mut self) -> &mut BTreeMap<EdgeKey, Edge<F>> {
        &mut self.edges
    }

    pub(crate) fn set_topology(&mut self, topology: Topology) {
        self.topology = Some(topology);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_filter_skips_bones() {
        assert!(!CollisionFilter::root().collides_with(&CollisionFilter::bone()));
        assert!(CollisionFilter::bone().collides_with(&CollisionFilter::bone()));
    }

    #[test]
    fn offset_is_half_radius() {
        let profile: Profile<f32> = Profile::new().with_collider_radius(0.8);
        let shape = Shape::from_profile(&profile);
        assert_eq!(shape.offset, Vec2::new(0.4, 0.0));

        let flat = Shape::from_profile(&profile.with_collider_offset(false));
        assert_eq!(flat.offset, Vec2::zero());
    }

    #[test]
    fn only_brace_and_diametric_are_springs() {
        let springs: AllocVec<EdgeKind> =
            EdgeKind::ALL.iter().copied().filter(|k| k.is_spring()).collect();
        assert_eq!(springs, [EdgeKind::BraceLeft, EdgeKind::BraceRight, EdgeKind::Diametric]);
    }
}
