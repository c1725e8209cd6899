//! Error types for soft-body graph operations.
//!
//! Every variant is a rejected operation: preconditions are checked before
//! anything is mutated, and backend failures are rolled back.

use thiserror::Error;

/// Errors raised by the skeleton importer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The sprite carries no bone metadata.
    #[error("sprite has no bones")]
    NoBones,
    /// A bone refers to a parent that is not earlier in the array.
    #[error("bone {bone} refers to parent {parent}, which does not precede it")]
    ParentOutOfOrder { bone: usize, parent: usize },
}

/// Errors reported by a [`PhysicsBackend`](crate::transaction::PhysicsBackend).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The host engine refused to create or update an object.
    #[error("physics backend rejected {what}")]
    Rejected { what: &'static str },
}

/// Errors raised by the topology builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The instance has no nodes to build a ring from.
    #[error("skeleton is empty")]
    EmptySkeleton,
    /// Skeleton import yielded zero nodes.
    #[error("no bones assigned to the sprite")]
    NoBonesAssigned,
    /// No physics profile was supplied.
    #[error("no physics profile assigned")]
    MissingProfile,
    /// Fewer than three ring nodes; no closed ring can be formed.
    #[error("ring needs at least 3 nodes, found {ring_len}")]
    InsufficientRingNodes { ring_len: usize },
    /// Any import failure other than a missing skeleton.
    #[error("skeleton import failed: {0}")]
    Import(ImportError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<ImportError> for BuildError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::NoBones => BuildError::NoBonesAssigned,
            other => BuildError::Import(other),
        }
    }
}

/// Errors raised by the tweak engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TweakError {
    /// No physics profile was supplied.
    #[error("no physics profile assigned")]
    MissingProfile,
    /// The selection is empty or holds no built soft body.
    #[error("no built soft body in the selection")]
    NoValidInstances,
    #[error(transparent)]
    Backend(#[from] BackendError),
}
