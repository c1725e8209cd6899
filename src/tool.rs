//! Editor-facing operations: create a soft body from a sprite, and push a
//! profile onto a selection.
//!
//! These wrap [`TopologyBuilder`] and [`TweakEngine`] and turn their errors
//! into a [`Diagnostic`] fit for showing to the user.

use crate::error::{BuildError, TweakError};
use crate::float::Float;
use crate::graph::{InstanceId, SoftbodyInstance};
use crate::observer::TransactionObserver;
use crate::profile::Profile;
use crate::skeleton::{self, Bone};
use crate::topology::{BuildRequest, TopologyBuilder};
use crate::transaction::PhysicsBackend;
use crate::tweak::{TweakEngine, TweakReport};
use crate::vec::Vec2;
use alloc::string::String;
use alloc::vec::Vec as AllocVec;
use thiserror::Error;

/// A sprite with its bone metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sprite<F: Float> {
    pub id: InstanceId,
    pub name: String,
    /// World position; becomes the root position.
    pub position: Vec2<F>,
    /// Half-size of the sprite bounds.
    pub extents: Vec2<F>,
    pub bones: AllocVec<Bone<F>>,
}

impl<F: Float> Sprite<F> {
    /// `id` becomes the id of the created instance and must be unique
    /// among the host's sprites.
    pub fn new(id: InstanceId, name: impl Into<String>, extents: Vec2<F>, bones: AllocVec<Bone<F>>) -> Self {
        Sprite {
            id,
            name: name.into(),
            position: Vec2::new(F::zero(), F::zero()),
            extents,
            bones,
        }
    }

    pub fn with_position(mut self, position: Vec2<F>) -> Self {
        self.position = position;
        self
    }

    /// `max(extents.x, extents.y)`.
    pub fn bound_radius(&self) -> F {
        self.extents.x.max(self.extents.y)
    }
}

/// A message for the user explaining why a tool did nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("Please assign a Sprite.")]
    MissingSprite,
    #[error("Assign a Physics Profile.")]
    MissingProfile,
    #[error("Select at least one built soft body.")]
    NoValidSelection,
    #[error("Could not build the soft body: {0}")]
    Build(BuildError),
    #[error("Could not apply the profile: {0}")]
    Tweak(TweakError),
}

impl From<BuildError> for Diagnostic {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::MissingProfile => Diagnostic::MissingProfile,
            other => Diagnostic::Build(other),
        }
    }
}

impl From<TweakError> for Diagnostic {
    fn from(err: TweakError) -> Self {
        match err {
            TweakError::MissingProfile => Diagnostic::MissingProfile,
            TweakError::NoValidInstances => Diagnostic::NoValidSelection,
            other => Diagnostic::Tweak(other),
        }
    }
}

/// Import `sprite`'s skeleton and build a ring soft body from it.
///
/// Nothing reaches `backend` unless the whole build succeeds.
pub fn create_soft_body<F, B, O>(
    sprite: Option<&Sprite<F>>,
    profile: Option<&Profile<F>>,
    has_central: bool,
    backend: &mut B,
    observer: &mut O,
) -> Result<SoftbodyInstance<F>, Diagnostic>
where
    F: Float,
    B: PhysicsBackend<F> + ?Sized,
    O: TransactionObserver<F> + ?Sized,
{
    let sprite = sprite.ok_or(Diagnostic::MissingSprite)?;
    let profile = profile.ok_or(Diagnostic::MissingProfile)?;

    let nodes = skeleton::import(&sprite.bones, sprite.position).map_err(BuildError::from)?;
    let mut instance = SoftbodyInstance::new(sprite.id, nodes)
        .with_name(sprite.name.clone())
        .with_root_position(sprite.position)
        .with_bound_radius(sprite.bound_radius());

    let request = BuildRequest::new().with_central(has_central).with_profile(*profile);
    TopologyBuilder::build(&mut instance, &request, backend, observer).inspect_err(|err| {
        tracing::warn!(sprite = sprite.name.as_str(), %err, "create soft body failed");
    })?;
    tracing::info!(sprite = sprite.name.as_str(), nodes = instance.node_count(), "created soft body");
    Ok(instance)
}

/// Write `profile` onto every built soft body in `selection`.
pub fn apply_profile_to_selection<F, B, O>(
    selection: &mut [&mut SoftbodyInstance<F>],
    profile: Option<&Profile<F>>,
    backend: &mut B,
    observer: &mut O,
) -> Result<TweakReport, Diagnostic>
where
    F: Float,
    B: PhysicsBackend<F> + ?Sized,
    O: TransactionObserver<F> + ?Sized,
{
    let report = TweakEngine::apply(selection, profile, backend, observer)?;
    tracing::info!(instances = report.instances, springs = report.springs, "applied profile to selection");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use alloc::string::ToString;

    #[test]
    fn messages_read_as_instructions() {
        assert_eq!(Diagnostic::MissingSprite.to_string(), "Please assign a Sprite.");
        assert_eq!(Diagnostic::MissingProfile.to_string(), "Assign a Physics Profile.");
    }

    #[test]
    fn no_bones_maps_to_no_bones_assigned() {
        let diag = Diagnostic::from(BuildError::from(ImportError::NoBones));
        assert_eq!(diag, Diagnostic::Build(BuildError::NoBonesAssigned));
    }
}
