//! Damped parameter models.
//!
//! A [`DampedQuantity`] moves its *current* value toward a *target* under a
//! [`DampingLaw`]. Event handlers only ever write targets; the frame loop is
//! the single place where current values advance.
//!
//! The exponential and friction laws are integrated in closed form so the
//! result is independent of how a time span is split into frames and never
//! overshoots. The spring law may overshoot.

use crate::constants::{
    MIN_DISTANCE, SETTLE_EPSILON, SETTLE_VELOCITY_EPSILON, SPRING_MAX_STEP_SEC,
    SPRING_MAX_SUBSTEP_SEC,
};
use glam::Vec2;
use std::ops::{Add, Mul, Sub};

/// Blend factor for exponential smoothing over `dt` with time constant `tau`.
///
/// `current += (target - current) * smoothing_alpha(dt, tau)` converges at the
/// same wall-clock rate whatever the frame rate.
#[inline]
pub fn smoothing_alpha(dt: f32, tau: f32) -> f32 {
    if !(dt > 0.0) || !dt.is_finite() {
        return 0.0;
    }
    if !(tau > 0.0) || !tau.is_finite() {
        return 1.0;
    }
    1.0 - (-dt / tau).exp()
}

/// One exponential smoothing step.
#[inline]
pub fn exp_smooth(current: f32, target: f32, dt: f32, tau: f32) -> f32 {
    current + (target - current) * smoothing_alpha(dt, tau)
}

#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Softly limits `value` to the open interval `(-|max|, |max|)`.
///
/// Returns 0 when `max` is 0 or either argument is not a number.
pub fn decay(value: f32, max: f32) -> f32 {
    let limit = max.abs();
    if limit == 0.0 || value.is_nan() || limit.is_nan() {
        return 0.0;
    }
    if limit.is_infinite() {
        return 0.0;
    }
    let raw = limit * (2.0 * sigmoid(value / limit) - 1.0);
    // sigmoid saturates to exactly 1.0 in f32; keep the bound strict
    let inner = f32::from_bits(limit.to_bits() - 1);
    raw.clamp(-inner, inner)
}

/// Value types a [`DampedQuantity`] can animate.
pub trait Animatable:
    Copy + Default + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
    fn magnitude(self) -> f32;
    fn finite(self) -> bool;
}

impl Animatable for f32 {
    fn magnitude(self) -> f32 {
        self.abs()
    }

    fn finite(self) -> bool {
        self.is_finite()
    }
}

impl Animatable for Vec2 {
    fn magnitude(self) -> f32 {
        self.length()
    }

    fn finite(self) -> bool {
        self.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DampingLaw {
    /// First-order lag with time constant `tau` seconds.
    Exponential { tau: f32 },
    /// Mass-spring-damper; may overshoot when underdamped.
    Spring {
        stiffness: f32,
        damping: f32,
        mass: f32,
    },
    /// Velocity decaying as `exp(-coefficient * t)`; the target is the rest point.
    Friction { coefficient: f32 },
}

impl DampingLaw {
    pub fn exponential(tau: f32) -> Self {
        DampingLaw::Exponential { tau }
    }

    pub fn spring(stiffness: f32, damping: f32) -> Self {
        DampingLaw::Spring {
            stiffness,
            damping,
            mass: 1.0,
        }
    }

    pub fn friction(coefficient: f32) -> Self {
        DampingLaw::Friction { coefficient }
    }

    /// Bouncy return used for released overdrag.
    pub fn wobbly() -> Self {
        Self::spring(180.0, 12.0)
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, DampingLaw::Spring { .. })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DampedQuantity<T: Animatable> {
    law: DampingLaw,
    current: T,
    target: T,
    velocity: T,
}

impl<T: Animatable> DampedQuantity<T> {
    pub fn new(initial: T, law: DampingLaw) -> Self {
        Self {
            law,
            current: initial,
            target: initial,
            velocity: T::default(),
        }
    }

    pub fn current(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn velocity(&self) -> T {
        self.velocity
    }

    pub fn law(&self) -> DampingLaw {
        self.law
    }

    /// Switch the law, keeping current value and velocity.
    pub fn set_law(&mut self, law: DampingLaw) {
        if let DampingLaw::Friction { coefficient } = law {
            // Friction carries its own rest point; derive the velocity that reaches it.
            self.velocity = (self.target - self.current) * coefficient.max(0.0);
        }
        self.law = law;
    }

    /// Non-finite targets are ignored.
    pub fn set_target(&mut self, target: T) {
        if !target.finite() {
            return;
        }
        self.target = target;
        if let DampingLaw::Friction { coefficient } = self.law {
            self.velocity = (target - self.current) * coefficient.max(0.0);
        }
    }

    /// Launch with `velocity` under the friction law; the target becomes the rest point.
    pub fn fling(&mut self, velocity: T, coefficient: f32) {
        if !velocity.finite() || !(coefficient > 0.0) {
            return;
        }
        self.law = DampingLaw::Friction { coefficient };
        self.velocity = velocity;
        self.target = self.current + velocity * (1.0 / coefficient);
    }

    /// Jump to `value` with no motion.
    pub fn snap(&mut self, value: T) {
        if !value.finite() {
            return;
        }
        self.current = value;
        self.target = value;
        self.velocity = T::default();
    }

    pub fn is_settled(&self) -> bool {
        (self.target - self.current).magnitude() < SETTLE_EPSILON
            && self.velocity.magnitude() < SETTLE_VELOCITY_EPSILON
    }

    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        match self.law {
            DampingLaw::Exponential { tau } => {
                let previous = self.current;
                let alpha = smoothing_alpha(dt, tau);
                self.current = self.current + (self.target - self.current) * alpha;
                self.velocity = (self.current - previous) * (1.0 / dt);
            }
            DampingLaw::Friction { coefficient } => {
                if !(coefficient > 0.0) {
                    self.snap(self.target);
                    return;
                }
                // x(t) = target - (target - x0) * e^{-ct}
                let keep = (-coefficient * dt).exp();
                self.current = self.target - (self.target - self.current) * keep;
                self.velocity = self.velocity * keep;
            }
            DampingLaw::Spring {
                stiffness,
                damping,
                mass,
            } => {
                if self.is_settled() {
                    self.current = self.target;
                    self.velocity = T::default();
                    return;
                }
                // integrate at most SPRING_MAX_STEP_SEC per call
                let span = dt.min(SPRING_MAX_STEP_SEC);
                let steps = (span / SPRING_MAX_SUBSTEP_SEC).ceil().max(1.0) as u32;
                let h = span / steps as f32;
                let mass = mass.max(MIN_DISTANCE);
                for _ in 0..steps {
                    self.rk4(h, stiffness, damping, mass);
                }
            }
        }
        if !self.current.finite() || !self.velocity.finite() {
            log::warn!("[damping] non-finite state, snapping to target");
            self.snap(self.target);
        } else if self.is_settled() {
            self.current = self.target;
            self.velocity = T::default();
        }
    }

    fn rk4(&mut self, dt: f32, stiffness: f32, damping: f32, mass: f32) {
        let target = self.target;
        let accel = |x: T, v: T| -> T { ((target - x) * stiffness - v * damping) * (1.0 / mass) };
        let x = self.current;
        let v = self.velocity;

        let k1_v = accel(x, v);
        let k1_x = v;
        let k2_v = accel(x + k1_x * (dt * 0.5), v + k1_v * (dt * 0.5));
        let k2_x = v + k1_v * (dt * 0.5);
        let k3_v = accel(x + k2_x * (dt * 0.5), v + k2_v * (dt * 0.5));
        let k3_x = v + k2_v * (dt * 0.5);
        let k4_v = accel(x + k3_x * dt, v + k3_v * dt);
        let k4_x = v + k3_v * dt;

        self.velocity = v + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0);
        self.current = x + (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * (dt / 6.0);
    }
}

/// Clamp a velocity vector to `max` length; non-finite input becomes zero.
#[inline]
pub fn clamp_velocity(velocity: Vec2, max: f32) -> Vec2 {
    if !velocity.is_finite() {
        return Vec2::ZERO;
    }
    velocity.clamp_length_max(max.max(0.0))
}
