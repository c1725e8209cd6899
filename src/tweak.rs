//! Re-apply a profile to already built soft bodies.

use crate::error::TweakError;
use crate::float::Float;
use crate::graph::{Body, EdgeKey, EdgeKind, Joint, Owner, Shape, SoftbodyInstance};
use crate::observer::TransactionObserver;
use crate::profile::Profile;
use crate::transaction::{GraphDiff, PhysicsBackend, Transaction};
use alloc::vec::Vec as AllocVec;

/// What a tweak wrote.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TweakReport {
    /// Built instances that were updated.
    pub instances: usize,
    pub bodies: usize,
    pub shapes: usize,
    /// Spring edges rewritten.
    pub springs: usize,
    /// Values that actually changed.
    pub changed: usize,
}

/// Overwrites body, shape and spring settings without touching topology,
/// positions or rest lengths.
pub struct TweakEngine;

impl TweakEngine {
    /// Apply `profile` to every built instance in `instances` as one
    /// transaction. Unbuilt instances are skipped.
    pub fn apply<F, B, O>(
        instances: &mut [&mut SoftbodyInstance<F>],
        profile: Option<&Profile<F>>,
        backend: &mut B,
        observer: &mut O,
    ) -> Result<TweakReport, TweakError>
    where
        F: Float,
        B: PhysicsBackend<F> + ?Sized,
        O: TransactionObserver<F> + ?Sized,
    {
        let profile = profile.ok_or_else(|| {
            tracing::warn!("tweak aborted: no profile");
            TweakError::MissingProfile
        })?;
        let profile = profile.sanitized();

        let mut report = TweakReport::default();
        let mut diff = GraphDiff::new();
        let mut staged = AllocVec::new();
        for (slot, instance) in instances.iter().enumerate() {
            if !instance.is_built() {
                tracing::debug!(instance = instance.name(), "skipping unbuilt soft body");
                continue;
            }
            let next = Self::retune(instance, &profile, &mut report);
            diff.extend(GraphDiff::between(instance, &next));
            staged.push((slot, next));
        }
        if staged.is_empty() {
            tracing::warn!(selected = instances.len(), "tweak aborted: no built soft body selected");
            return Err(TweakError::NoValidInstances);
        }
        report.instances = staged.len();
        report.changed = diff.len();

        let mut tx = Transaction::begin("apply soft body profile", backend, observer);
        if let Err(err) = tx.apply(&diff) {
            tx.rollback();
            return Err(err.into());
        }
        tx.commit(&diff);

        for (slot, next) in staged {
            *instances[slot] = next;
        }
        tracing::debug!(instances = report.instances, changed = report.changed, "applied profile");
        Ok(report)
    }

    /// Copy of `instance` with `profile` written over every ring node.
    pub fn retune<F: Float>(
        instance: &SoftbodyInstance<F>,
        profile: &Profile<F>,
        report: &mut TweakReport,
    ) -> SoftbodyInstance<F> {
        let mut next = instance.clone();
        let Some(topology) = instance.topology() else {
            return next;
        };

        for index in topology.ring.nodes() {
            let owner = Owner::Node(index);
            if let Some(Some(body)) = next.body_slot(owner) {
                *body = Body::from_profile(profile);
                report.bodies += 1;
            }
            if let Some(Some(shape)) = next.shape_slot(owner) {
                *shape = Shape::from_profile(profile);
                report.shapes += 1;
            }
            for kind in EdgeKind::ALL.into_iter().filter(|k| k.is_spring()) {
                let key = EdgeKey::new(owner, kind);
                if let Some(edge) = next.edges_mut().get_mut(&key) {
                    if let Joint::Spring { frequency, damping_ratio, enable_collision, .. } = &mut edge.joint {
                        *frequency = profile.spring_frequency;
                        *damping_ratio = profile.spring_damping_ratio;
                        *enable_collision = profile.spring_enable_collision;
                        report.springs += 1;
                    }
                }
            }
        }
        next
    }
}
