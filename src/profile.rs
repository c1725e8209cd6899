//! Reusable bundles of physical parameters for soft-body graphs.

use crate::float::Float;

/// How the host engine smooths a body's rendered transform between steps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    None,
    #[default]
    Interpolate,
    Extrapolate,
}

/// Collision detection mode requested from the host engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionDetection {
    Discrete,
    #[default]
    Continuous,
}

/// Immutable physical parameters applied to every ring node and spring edge.
///
/// Built with the `with_*` setters, which clamp into the accepted ranges:
/// frequency ≥ 0, damping ratio in [0, 1], mass and drags ≥ 0, collider
/// radius ≥ 0.1.
///
/// ```
/// use softring::Profile;
///
/// let jelly: Profile<f32> = Profile::new()
///     .with_spring_frequency(4.0)
///     .with_spring_damping_ratio(0.5)
///     .with_anti_compression_strut(true);
/// assert!(jelly.use_anti_compression_strut);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Profile<F: Float> {
    /// Brace and diametric spring damping ratio. Default: 0.8.
    pub spring_damping_ratio: F,
    /// Brace and diametric spring frequency in Hz. Default: 6.
    pub spring_frequency: F,
    /// Whether bodies joined by a spring collide with each other. Default: false.
    pub spring_enable_collision: bool,
    /// Replace diametric springs with rigid struts. Default: false.
    pub use_anti_compression_strut: bool,
    /// Default: 1.
    pub body_mass: F,
    /// Default: 0.
    pub linear_drag: F,
    /// Default: 7.5.
    pub angular_drag: F,
    /// Default: true.
    pub freeze_rotation: bool,
    pub interpolation: Interpolation,
    pub collision_detection: CollisionDetection,
    /// Circle collider radius per node. Default: 0.5.
    pub collider_radius: F,
    /// Shift each collider by half its radius along local +x. Default: true.
    pub use_collider_offset: bool,
}

impl<F: Float> Profile<F> {
    /// Smallest collider radius a profile accepts.
    pub fn min_collider_radius() -> F {
        F::from_f32(0.1)
    }

    /// Create a profile with default values.
    pub fn new() -> Self {
        Profile {
            spring_damping_ratio: F::from_f32(0.8),
            spring_frequency: F::from_f32(6.0),
            spring_enable_collision: false,
            use_anti_compression_strut: false,
            body_mass: F::one(),
            linear_drag: F::zero(),
            angular_drag: F::from_f32(7.5),
            freeze_rotation: true,
            interpolation: Interpolation::Interpolate,
            collision_detection: CollisionDetection::Continuous,
            collider_radius: F::from_f32(0.5),
            use_collider_offset: true,
        }
    }

    pub fn with_spring_damping_ratio(mut self, ratio: F) -> Self {
        self.spring_damping_ratio = ratio.clamp01();
        self
    }

    pub fn with_spring_frequency(mut self, frequency: F) -> Self {
        self.spring_frequency = frequency.max(F::zero());
        self
    }

    pub fn with_spring_collision(mut self, enabled: bool) -> Self {
        self.spring_enable_collision = enabled;
        self
    }

    pub fn with_anti_compression_strut(mut self, enabled: bool) -> Self {
        self.use_anti_compression_strut = enabled;
        self
    }

    pub fn with_body_mass(mut self, mass: F) -> Self {
        self.body_mass = mass.max(F::zero());
        self
    }

    pub fn with_drag(mut self, linear: F, angular: F) -> Self {
        self.linear_drag = linear.max(F::zero());
        self.angular_drag = angular.max(F::zero());
        self
    }

    pub fn with_freeze_rotation(mut self, frozen: bool) -> Self {
        self.freeze_rotation = frozen;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_collision_detection(mut self, mode: CollisionDetection) -> Self {
        self.collision_detection = mode;
        self
    }

    pub fn with_collider_radius(mut self, radius: F) -> Self {
        self.collider_radius = radius.max(Self::min_collider_radius());
        self
    }

    pub fn with_collider_offset(mut self, enabled: bool) -> Self {
        self.use_collider_offset = enabled;
        self
    }

    /// Return a copy with every field clamped into range.
    ///
    /// Profiles deserialized from assets bypass the setters; the builder and
    /// tweak engine run them through this first.
    pub fn sanitized(self) -> Self {
        let Profile {
            spring_damping_ratio,
            spring_frequency,
            body_mass,
            linear_drag,
            angular_drag,
            collider_radius,
            ..
        } = self;
        self.with_spring_damping_ratio(spring_damping_ratio)
            .with_spring_frequency(spring_frequency)
            .with_body_mass(body_mass)
            .with_drag(linear_drag, angular_drag)
            .with_collider_radius(collider_radius)
    }
}

impl<F: Float> Default for Profile<F> {
    fn default() -> Self {
        Self::new()
    }
}
