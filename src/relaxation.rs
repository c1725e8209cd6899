//! Loose control points sprung back toward a captured rest pose.

use crate::config::RelaxationConfig;
use crate::float::Float;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// Default impulse of [`ControlPointRelaxation::nudge_default`].
pub const DEFAULT_NUDGE: f32 = 0.2;

/// A control point, as an offset from the body centre.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlPoint<F: Float> {
    pub offset: Vec2<F>,
    pub rest_offset: Vec2<F>,
    pub velocity: Vec2<F>,
}

impl<F: Float> ControlPoint<F> {
    /// Point at rest at `offset`.
    pub fn at_rest(offset: Vec2<F>) -> Self {
        ControlPoint { offset, rest_offset: offset, velocity: Vec2::zero() }
    }

    /// Explicit spring toward the rest offset.
    pub fn integrate(&mut self, dt: F, stiffness: F, damping: F) {
        let to_rest = self.rest_offset - self.offset;
        self.velocity = self.velocity.scale(damping) + to_rest.scale(stiffness * dt);
        self.offset = self.offset + self.velocity.scale(dt);
    }

    /// Direction from the body centre through this point.
    pub fn outward(&self) -> Vec2<F> {
        self.offset.normalize()
    }
}

/// Explicit (not critically damped) spring relaxation for a set of points.
pub struct ControlPointRelaxation<F: Float> {
    points: AllocVec<ControlPoint<F>>,
    config: RelaxationConfig<F>,
}

impl<F: Float> ControlPointRelaxation<F> {
    /// Capture `offsets` as the rest pose.
    pub fn new(offsets: &[Vec2<F>], config: RelaxationConfig<F>) -> Self {
        let points = offsets.iter().copied().map(ControlPoint::at_rest).collect();
        ControlPointRelaxation { points, config }
    }

    /// Advance every point. Does nothing when `dt <= 0`.
    pub fn step(&mut self, dt: F) {
        if dt <= F::zero() {
            return;
        }
        let RelaxationConfig { stiffness, damping } = self.config;
        for p in self.points.iter_mut() {
            p.integrate(dt, stiffness, damping);
        }
    }

    /// React to an impact with contact normal `normal`.
    ///
    /// Every point is pushed along `-normal`, weighted by how much it faces
    /// the impact: `clamp01(dot(outward, -normal))`.
    pub fn nudge(&mut self, normal: Vec2<F>, amount: F) {
        let push = -normal;
        for p in self.points.iter_mut() {
            let influence = p.outward().dot(push).clamp01();
            p.velocity = p.velocity + push.scale(amount * influence);
        }
    }

    pub fn nudge_default(&mut self, normal: Vec2<F>) {
        self.nudge(normal, F::from_f32(DEFAULT_NUDGE));
    }

    /// Displace a point, e.g. when the physics engine moved it.
    pub fn set_offset(&mut self, index: usize, offset: Vec2<F>) {
        if let Some(p) = self.points.get_mut(index) {
            p.offset = offset;
        }
    }

    /// Snap every point back to rest and stop it.
    pub fn reset(&mut self) {
        for p in self.points.iter_mut() {
            p.offset = p.rest_offset;
            p.velocity = Vec2::zero();
        }
    }

    pub fn points(&self) -> &[ControlPoint<F>] { &self.points }
    pub fn point(&self, index: usize) -> Option<&ControlPoint<F>> { self.points.get(index) }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn offsets(&self) -> AllocVec<Vec2<F>> {
        self.points.iter().map(|p| p.offset).collect()
    }

    pub fn velocities(&self) -> AllocVec<Vec2<F>> {
        self.points.iter().map(|p| p.velocity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_rest_stays_put() {
        let mut relax = ControlPointRelaxation::new(
            &[Vec2::new(1.0f32, 0.0), Vec2::new(-1.0, 0.0)],
            RelaxationConfig::new(),
        );
        for _ in 0..10 {
            relax.step(1.0 / 60.0);
        }
        assert_eq!(relax.point(0).unwrap().offset, Vec2::new(1.0, 0.0));
        assert_eq!(relax.point(1).unwrap().offset, Vec2::new(-1.0, 0.0));
        assert!(relax.point(2).is_none());
    }

    #[test]
    fn integrate_matches_formula() {
        let mut p = ControlPoint::at_rest(Vec2::new(1.0f64, 0.0));
        p.offset = Vec2::new(2.0, 0.0);
        p.velocity = Vec2::new(0.5, 0.0);
        p.integrate(0.1, 8.0, 0.9);
        let v = 0.5 * 0.9 + (1.0 - 2.0) * 8.0 * 0.1;
        assert!((p.velocity.x - v).abs() < 1e-12);
        assert!((p.offset.x - (2.0 + v * 0.1)).abs() < 1e-12);
    }
}
