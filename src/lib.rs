//! Ring soft bodies for 2D sprites.
//!
//! `softring` turns a sprite skeleton into a ring-shaped constraint graph
//! (distance links, spring braces, a diametric spring or anti-compression
//! strut, rotation correction) and drives the visual wobble and squash of the
//! sprite from collision impulses.
//!
//! # Features
//!
//! - **Topology synthesis**: idempotent rebuilds that only add what is missing
//! - **Transactions**: every graph change reaches the physics backend as one
//!   undoable unit, rolled back on failure
//! - **Profile tweaking**: retune springs and bodies without touching topology
//! - **Visual feedback**: damped wobble/squash springs published as shader parameters
//! - **Control-point relaxation**: a lightweight deformation alternative
//! - **`no_std` compatible**: works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod spring;
pub mod profile;
pub mod config;
pub mod error;
pub mod ring;
pub mod graph;
pub mod skeleton;
pub mod observer;
pub mod transaction;
pub mod topology;
pub mod tweak;
pub mod feedback;
pub mod relaxation;
pub mod tool;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Scalar, Vec2};
pub use spring::{ZeroSpring, ZeroSpring1D, ZeroSpring2D, Integrator};
pub use profile::{Profile, Interpolation, CollisionDetection};
pub use config::{FeedbackConfig, RelaxationConfig};
pub use error::{BuildError, TweakError, ImportError, BackendError};
pub use ring::Ring;
pub use graph::{
    Body, Bracing, CollisionFilter, Edge, EdgeKey, EdgeKind, InstanceId, Joint, Node, Owner,
    RootNode, Shape, SoftbodyInstance, Topology,
};
pub use skeleton::Bone;
pub use observer::{TransactionObserver, NoOpObserver};
pub use transaction::{GraphDiff, GraphOp, MemoryBackend, NullBackend, PhysicsBackend, Transaction};
pub use topology::{BuildRequest, TopologyBuilder};
pub use tweak::{TweakEngine, TweakReport};
pub use feedback::{CollisionEvent, ParameterSink, ShaderParams, WobbleFeedback};
pub use relaxation::{ControlPoint, ControlPointRelaxation};
pub use tool::{apply_profile_to_selection, create_soft_body, Diagnostic, Sprite};
