//! Configuration types for the per-frame feedback systems.

use crate::float::Float;
use crate::spring::Integrator;

/// Configuration for [`WobbleFeedback`](crate::feedback::WobbleFeedback).
///
/// # Builder Pattern
/// ```
/// use softring::config::FeedbackConfig;
/// use softring::Integrator;
///
/// let config: FeedbackConfig<f32> = FeedbackConfig::new()
///     .with_frequency(3.0)
///     .with_damping(1.0)
///     .with_squash_impact(0.5)
///     .with_integrator(Integrator::Analytic);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeedbackConfig<F: Float> {
    /// Wobble frequency in Hz, shared by wobble and squash. Default: 10.
    pub frequency: F,
    /// Damping ratio; how fast the wobble dies. Default: 6.
    pub damping: F,
    /// Squash intensity per unit of collision impulse. Default: 0.35.
    pub squash_impact: F,
    /// Fallback radius when the sprite extents are unknown. Default: 0.5.
    pub radius: F,
    /// Default: [`Integrator::SemiImplicit`].
    pub integrator: Integrator,
}

impl<F: Float> FeedbackConfig<F> {
    pub fn new() -> Self {
        FeedbackConfig {
            frequency: F::from_f32(10.0),
            damping: F::from_f32(6.0),
            squash_impact: F::from_f32(0.35),
            radius: F::half(),
            integrator: Integrator::SemiImplicit,
        }
    }

    pub fn with_frequency(mut self, frequency: F) -> Self {
        self.frequency = frequency.max(F::zero());
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping.max(F::zero());
        self
    }

    pub fn with_squash_impact(mut self, squash_impact: F) -> Self {
        self.squash_impact = squash_impact;
        self
    }

    pub fn with_radius(mut self, radius: F) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }
}

impl<F: Float> Default for FeedbackConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`ControlPointRelaxation`](crate::relaxation::ControlPointRelaxation).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RelaxationConfig<F: Float> {
    /// Pull toward the rest offset per second. Default: 8.
    pub stiffness: F,
    /// Per-frame velocity retention factor. Default: 0.9.
    pub damping: F,
}

impl<F: Float> RelaxationConfig<F> {
    pub fn new() -> Self {
        RelaxationConfig {
            stiffness: F::from_f32(8.0),
            damping: F::from_f32(0.9),
        }
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }
}

impl<F: Float> Default for RelaxationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
