//! Wobble and squash feedback driven by collision impulses.
//!
//! A purely visual layer: collisions kick a 2D wobble offset and a scalar
//! squash, springs pull both back to zero every frame, and the result is
//! published to a material as shader parameters.

use crate::config::FeedbackConfig;
use crate::float::Float;
use crate::spring::{ZeroSpring1D, ZeroSpring2D};
use crate::vec::{Scalar, Vec, Vec2};

/// Shader parameter receiving the wobble offset (`x`, `y`, 0, 0).
pub const WOBBLE_PROPERTY: &str = "_Wobble";
/// Shader parameter receiving the squash amount.
pub const SQUASH_PROPERTY: &str = "_Squash";
/// Shader parameter receiving the body radius.
pub const RADIUS_PROPERTY: &str = "_Radius";

/// Wobble gained per unit of impulse, before clamping to [0, 1].
const WOBBLE_PER_IMPULSE: f32 = 0.02;
/// Scale applied to `impulse * squash_impact`.
const SQUASH_PER_IMPULSE: f32 = 0.01;
/// Largest squash a single collision can add.
const MAX_SQUASH_KICK: f32 = 0.6;

/// A collision reported by the rigid-body engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionEvent<F: Float> {
    /// Contact normal, unit length.
    pub normal: Vec2<F>,
    /// Relative velocity magnitude at impact.
    pub impulse: F,
}

impl<F: Float> CollisionEvent<F> {
    pub fn new(normal: Vec2<F>, impulse: F) -> Self {
        CollisionEvent { normal, impulse }
    }

    /// Event from raw contact data: the first contact's normal and the
    /// magnitude of the relative velocity. `None` without contacts.
    pub fn from_contacts(normals: &[Vec2<F>], relative_velocity: Vec2<F>) -> Option<Self> {
        let normal = *normals.first()?;
        Some(CollisionEvent { normal, impulse: relative_velocity.length() })
    }
}

/// Values a material reads each frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShaderParams<F: Float> {
    pub wobble: Vec2<F>,
    pub squash: F,
    pub radius: F,
}

impl<F: Float> ShaderParams<F> {
    /// Write into `sink` under [`WOBBLE_PROPERTY`], [`SQUASH_PROPERTY`] and
    /// [`RADIUS_PROPERTY`].
    pub fn publish<S: ParameterSink + ?Sized>(&self, sink: &mut S) {
        sink.set_vector(WOBBLE_PROPERTY, [self.wobble.x.to_f32(), self.wobble.y.to_f32(), 0.0, 0.0]);
        sink.set_float(SQUASH_PROPERTY, self.squash.to_f32());
        sink.set_float(RADIUS_PROPERTY, self.radius.to_f32());
    }
}

/// Per-renderer material parameter block.
pub trait ParameterSink {
    fn set_vector(&mut self, name: &str, value: [f32; 4]);
    fn set_float(&mut self, name: &str, value: f32);
}

/// Wobble/squash state of one sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct WobbleFeedback<F: Float> {
    wobble: ZeroSpring2D<F>,
    squash: ZeroSpring1D<F>,
    radius: F,
    config: FeedbackConfig<F>,
}

impl<F: Float> WobbleFeedback<F> {
    /// Feedback at rest with `config.radius`.
    pub fn new(config: FeedbackConfig<F>) -> Self {
        WobbleFeedback {
            wobble: ZeroSpring2D::default(),
            squash: ZeroSpring1D::default(),
            radius: config.radius,
            config,
        }
    }

    /// Feedback whose radius is the larger sprite half-extent.
    pub fn from_extents(extents: Vec2<F>, config: FeedbackConfig<F>) -> Self {
        let mut feedback = Self::new(config);
        feedback.radius = extents.x.max(extents.y);
        feedback
    }

    /// Advance both springs. Does nothing when `dt <= 0`.
    pub fn step(&mut self, dt: F) {
        let FeedbackConfig { frequency, damping, integrator, .. } = self.config;
        self.wobble.update(dt, frequency, damping, integrator);
        self.squash.update(dt, frequency, damping, integrator);
    }

    /// Kick the wobble away from the contact normal and add squash.
    pub fn on_collision(&mut self, event: &CollisionEvent<F>) {
        let wobble_kick = (event.impulse * F::from_f32(WOBBLE_PER_IMPULSE)).clamp01();
        self.wobble.kick(-event.normal.scale(wobble_kick));

        let max = F::from_f32(MAX_SQUASH_KICK);
        let squash_kick = (event.impulse * self.config.squash_impact * F::from_f32(SQUASH_PER_IMPULSE))
            .clamp(-max, max);
        self.squash.kick(Scalar(squash_kick));
    }

    pub fn wobble(&self) -> Vec2<F> { self.wobble.value() }
    pub fn wobble_velocity(&self) -> Vec2<F> { self.wobble.velocity() }
    pub fn squash(&self) -> F { self.squash.value().0 }
    pub fn squash_velocity(&self) -> F { self.squash.velocity().0 }
    pub fn radius(&self) -> F { self.radius }
    pub fn config(&self) -> &FeedbackConfig<F> { &self.config }

    pub fn params(&self) -> ShaderParams<F> {
        ShaderParams { wobble: self.wobble(), squash: self.squash(), radius: self.radius }
    }

    pub fn is_settled(&self, eps: F) -> bool {
        self.wobble.is_settled(eps, eps) && self.squash.is_settled(eps, eps)
    }

    pub fn reset(&mut self) {
        self.wobble.reset();
        self.squash.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wobble_kick_is_clamped() {
        let mut fx: WobbleFeedback<f32> = WobbleFeedback::new(FeedbackConfig::new());
        fx.on_collision(&CollisionEvent::new(Vec2::new(0.0, 1.0), 500.0));
        assert_eq!(fx.wobble(), Vec2::new(0.0, -1.0));
        assert!((fx.squash() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn small_hit_scales_linearly() {
        let mut fx: WobbleFeedback<f32> = WobbleFeedback::new(FeedbackConfig::new());
        fx.on_collision(&CollisionEvent::new(Vec2::new(1.0, 0.0), 10.0));
        assert!((fx.wobble().x + 0.2).abs() < 1e-6);
        assert!((fx.squash() - 10.0 * 0.35 * 0.01).abs() < 1e-6);
    }

    #[test]
    fn no_contacts_no_event() {
        let event = CollisionEvent::<f32>::from_contacts(&[], Vec2::new(3.0, 4.0));
        assert!(event.is_none());

        let event = CollisionEvent::from_contacts(&[Vec2::new(0.0f32, 1.0)], Vec2::new(3.0, 4.0)).unwrap();
        assert!((event.impulse - 5.0).abs() < 1e-6);
    }
}
