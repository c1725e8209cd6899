//! Damped springs that pull a value back to zero.

use crate::float::Float;
use crate::vec::Vec;
use crate::vec::{Scalar, Vec2};

/// Upper bound on `c·h` and `k·h` for one semi-implicit sub-step.
pub const MAX_STEP_STIFFNESS: f32 = 0.5;

/// Sub-steps per frame before the semi-implicit path hands over to the
/// closed form.
pub const MAX_SUBSTEPS: usize = 256;

/// How a [`ZeroSpring`] advances one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Integrator {
    /// Semi-implicit Euler on `x'' = -k²x - c·x'`: velocity first, then
    /// position with the new velocity.
    ///
    /// A frame is split into equal sub-steps `h` with `c·h` and `k·h` at most
    /// [`MAX_STEP_STIFFNESS`]. Frames that would need more than
    /// [`MAX_SUBSTEPS`] sub-steps use the closed form instead.
    #[default]
    SemiImplicit,
    /// Closed-form solution of the same oscillator. Stable for any `dt`.
    Analytic,
}

/// A damped harmonic oscillator whose rest value is zero.
///
/// `frequency_hz` sets the angular frequency `k = 2π·freq`, `damping` is the
/// damping ratio so that the damping coefficient is `c = 2·damping·k`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ZeroSpring<V: Vec> {
    value: V,
    velocity: V,
}

impl<V: Vec> ZeroSpring<V> {
    pub fn new(value: V) -> Self {
        ZeroSpring { value, velocity: V::zero() }
    }

    /// Advance by `dt`. Does nothing when `dt <= 0`.
    pub fn update(
        &mut self,
        dt: V::Scalar,
        frequency_hz: V::Scalar,
        damping: V::Scalar,
        integrator: Integrator,
    ) {
        if dt <= V::Scalar::zero() {
            return;
        }
        let k = V::Scalar::tau() * frequency_hz;
        match integrator {
            Integrator::SemiImplicit => {
                let c = V::Scalar::two() * damping * k;
                let limit = V::Scalar::from_f32(MAX_STEP_STIFFNESS);
                let needed = (c.max(k) * dt / limit).ceil().to_f32();
                if needed.is_nan() || needed > MAX_SUBSTEPS as f32 {
                    self.update_analytic(dt, k, damping);
                    return;
                }
                let steps = (needed as usize).max(1);
                let h = dt / V::Scalar::from_f32(steps as f32);
                for _ in 0..steps {
                    self.step_semi_implicit(h, k, c);
                }
            }
            Integrator::Analytic => self.update_analytic(dt, k, damping),
        }
    }

    fn step_semi_implicit(&mut self, h: V::Scalar, k: V::Scalar, c: V::Scalar) {
        let accel = self.value.scale(-k * k) - self.velocity.scale(c);
        self.velocity = self.velocity + accel.scale(h);
        self.value = self.value + self.velocity.scale(h);
    }

    fn update_analytic(&mut self, dt: V::Scalar, w: V::Scalar, zeta: V::Scalar) {
        let x0 = self.value;
        let v0 = self.velocity;
        let one = V::Scalar::one();
        let eps = V::Scalar::from_f32(1e-4);

        if w.is_near_zero(V::Scalar::from_f32(1e-10)) {
            self.value = x0 + v0.scale(dt);
            return;
        }

        let (new_x, new_v) = if (zeta - one).is_near_zero(eps) {
            let exp_term = (-w * dt).exp();
            let c2 = v0 + x0.scale(w);
            let new_x = (x0 + c2.scale(dt)).scale(exp_term);
            let new_v = (v0 - c2.scale(w * dt)).scale(exp_term);
            (new_x, new_v)
        } else if zeta < one {
            let zeta = zeta.max(V::Scalar::zero());
            let wd = w * (one - zeta * zeta).sqrt();
            let exp_term = (-zeta * w * dt).exp();
            let cos_term = (wd * dt).cos();
            let sin_term = (wd * dt).sin();

            let a = x0;
            let b = (v0 + x0.scale(zeta * w)).scale(one / wd);

            let new_x = (a.scale(cos_term) + b.scale(sin_term)).scale(exp_term);

            let v_cos_coeff = b.scale(wd) - a.scale(zeta * w);
            let v_sin_coeff = a.scale(wd) + b.scale(zeta * w);
            let new_v = (v_cos_coeff.scale(cos_term) - v_sin_coeff.scale(sin_term))
                .scale(exp_term);
            (new_x, new_v)
        } else {
            let s = (zeta * zeta - one).sqrt();
            let r1 = -w * (zeta - s);
            let r2 = -w * (zeta + s);
            let denom = one / (r2 - r1);

            let c1 = (x0.scale(r2) - v0).scale(denom);
            let c2 = (v0 - x0.scale(r1)).scale(denom);

            let exp1 = (r1 * dt).exp();
            let exp2 = (r2 * dt).exp();

            (
                c1.scale(exp1) + c2.scale(exp2),
                c1.scale(r1 * exp1) + c2.scale(r2 * exp2),
            )
        };

        self.value = new_x;
        self.velocity = new_v;
    }

    /// Add an instantaneous displacement.
    pub fn kick(&mut self, delta: V) {
        self.value = self.value + delta;
    }

    pub fn value(&self) -> V { self.value }
    pub fn velocity(&self) -> V { self.velocity }

    pub fn is_settled(&self, eps_pos: V::Scalar, eps_vel: V::Scalar) -> bool {
        self.value.length_sq() < eps_pos * eps_pos
            && self.velocity.length_sq() < eps_vel * eps_vel
    }

    pub fn reset(&mut self) {
        self.value = V::zero();
        self.velocity = V::zero();
    }
}

pub type ZeroSpring1D<F> = ZeroSpring<Scalar<F>>;
pub type ZeroSpring2D<F> = ZeroSpring<Vec2<F>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semi_implicit_matches_hand_step() {
        // c·dt ≈ 0.13, a single sub-step.
        let mut s: ZeroSpring1D<f64> = ZeroSpring::new(Scalar(1.0));
        let dt = 0.005;
        s.update(dt, 2.0, 1.0, Integrator::SemiImplicit);

        let k = 2.0 * core::f64::consts::PI * 2.0;
        let c = 2.0 * 1.0 * k;
        let v = (-k * k * 1.0 - c * 0.0) * dt;
        let x = 1.0 + v * dt;
        assert!((s.velocity().0 - v).abs() < 1e-12);
        assert!((s.value().0 - x).abs() < 1e-12);
    }

    #[test]
    fn stiff_frame_is_split_into_sub_steps() {
        // 10 Hz, damping 6: c·dt ≈ 12.6 at 60 fps, so 26 sub-steps.
        let dt = 1.0 / 60.0;
        let k = 2.0 * core::f64::consts::PI * 10.0;
        let c = 2.0 * 6.0 * k;
        let steps = 26;
        let h = dt / steps as f64;
        let (mut x, mut v) = (1.0f64, 0.0f64);
        for _ in 0..steps {
            v += (-k * k * x - c * v) * h;
            x += v * h;
        }

        let mut s: ZeroSpring1D<f64> = ZeroSpring::new(Scalar(1.0));
        s.update(dt, 10.0, 6.0, Integrator::SemiImplicit);
        assert!((s.value().0 - x).abs() < 1e-12);
        assert!((s.velocity().0 - v).abs() < 1e-12);
        assert!(x > 0.0 && x < 1.0);
    }

    #[test]
    fn huge_frames_fall_back_to_closed_form() {
        let mut s: ZeroSpring1D<f32> = ZeroSpring::new(Scalar(1.0));
        s.update(1.0e6, 10.0, 6.0, Integrator::SemiImplicit);
        assert!(s.value().0.abs() < 1e-3);

        let mut s: ZeroSpring1D<f32> = ZeroSpring::new(Scalar(1.0));
        s.update(f32::INFINITY, 10.0, 6.0, Integrator::SemiImplicit);
        assert!(s.value().0.abs() < 1e-3);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut s: ZeroSpring2D<f32> = ZeroSpring::new(Vec2::new(0.5, -0.5));
        s.update(-1.0, 10.0, 6.0, Integrator::Analytic);
        assert_eq!(s.value(), Vec2::new(0.5, -0.5));
        assert_eq!(s.velocity(), Vec2::zero());
    }

    #[test]
    fn analytic_handles_stiff_settings() {
        let mut s: ZeroSpring1D<f32> = ZeroSpring::new(Scalar(1.0));
        for _ in 0..120 {
            s.update(1.0 / 60.0, 10.0, 6.0, Integrator::Analytic);
            assert!(s.value().0.is_finite());
            assert!(s.value().0 >= 0.0);
        }
        assert!(s.value().0 < 0.5);
    }
}
