//! Pointer and touch normalisation.
//!
//! Mouse, pen and single-touch input share one sample type and one mapping
//! path. Leaving the host produces [`PointerState::Inactive`] rather than a
//! stale coordinate so effects can fade interaction out.

use crate::constants::{POINTER_MAX_SPEED, POINTER_PRESENCE_TAU_SEC, POINTER_SMOOTHING_TAU_SEC};
use crate::damping::{clamp_velocity, DampedQuantity, DampingLaw};
use crate::resize::HostRect;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

/// A raw input event as delivered by the host environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub phase: PointerPhase,
    /// Viewport coordinates in CSS pixels.
    pub client: Vec2,
    /// Host bounding box at the time of the event.
    pub rect: HostRect,
    /// Event time in seconds.
    pub time: f64,
}

/// Position relative to the host's top-left corner, in CSS pixels.
#[inline]
pub fn to_local(client: Vec2, rect: &HostRect) -> Vec2 {
    Vec2::new(client.x - rect.left, client.y - rect.top)
}

/// Backing-store pixel coordinates.
#[inline]
pub fn to_pixels(local: Vec2, dpr: f32) -> Vec2 {
    local * dpr
}

/// Normalised device coordinates in \[-1, 1\] with Y pointing up.
#[inline]
pub fn to_ndc(local: Vec2, rect: &HostRect) -> Vec2 {
    if !rect.has_extent() {
        return Vec2::ZERO;
    }
    Vec2::new(
        (local.x / rect.width) * 2.0 - 1.0,
        1.0 - (local.y / rect.height) * 2.0,
    )
}

/// Texture coordinates in \[0, 1\] with Y pointing up.
#[inline]
pub fn to_uv(local: Vec2, rect: &HostRect) -> Vec2 {
    if !rect.has_extent() {
        return Vec2::splat(0.5);
    }
    Vec2::new(
        (local.x / rect.width).clamp(0.0, 1.0),
        1.0 - (local.y / rect.height).clamp(0.0, 1.0),
    )
}

/// Where an active pointer is, in every space an effect may need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPoint {
    pub local: Vec2,
    pub pixels: Vec2,
    pub ndc: Vec2,
    pub uv: Vec2,
    pub pressed: bool,
    pub kind: PointerKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Inactive,
    Active(PointerPoint),
}

impl PointerState {
    pub fn point(&self) -> Option<&PointerPoint> {
        match self {
            PointerState::Active(p) => Some(p),
            PointerState::Inactive => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PointerState::Active(_))
    }
}

/// Normalised event handed to effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub state: PointerState,
    /// CSS pixels per second, clamped.
    pub velocity: Vec2,
}

#[derive(Debug)]
pub struct PointerNormalizer {
    max_speed: f32,
    state: PointerState,
    velocity: Vec2,
    last: Option<(Vec2, f64)>,
    smoothed: DampedQuantity<Vec2>,
    presence: DampedQuantity<f32>,
    seeded: bool,
}

impl Default for PointerNormalizer {
    fn default() -> Self {
        Self::new(POINTER_MAX_SPEED, POINTER_SMOOTHING_TAU_SEC)
    }
}

impl PointerNormalizer {
    pub fn new(max_speed: f32, smoothing_tau: f32) -> Self {
        Self {
            max_speed,
            state: PointerState::Inactive,
            velocity: Vec2::ZERO,
            last: None,
            smoothed: DampedQuantity::new(Vec2::ZERO, DampingLaw::exponential(smoothing_tau)),
            presence: DampedQuantity::new(0.0, DampingLaw::exponential(POINTER_PRESENCE_TAU_SEC)),
            seeded: false,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Smoothed local position (CSS pixels).
    pub fn smoothed(&self) -> Vec2 {
        self.smoothed.current()
    }

    /// 1 while a pointer is present, easing to 0 after it leaves.
    pub fn presence(&self) -> f32 {
        self.presence.current()
    }

    pub fn set_smoothing(&mut self, tau: f32) {
        self.smoothed.set_law(DampingLaw::exponential(tau));
    }

    /// Seeds the smoothed position without a pointer being present.
    pub fn seed(&mut self, local: Vec2) {
        self.smoothed.snap(local);
        self.seeded = true;
    }

    /// Map one raw sample. Only targets are touched; [`PointerNormalizer::step`]
    /// advances the smoothed values.
    pub fn apply(&mut self, sample: &PointerSample, dpr: f32) -> PointerEvent {
        if sample.phase == PointerPhase::Leave || !sample.client.is_finite() {
            self.state = PointerState::Inactive;
            self.velocity = Vec2::ZERO;
            self.last = None;
            self.presence.set_target(0.0);
            return PointerEvent {
                phase: PointerPhase::Leave,
                state: self.state,
                velocity: Vec2::ZERO,
            };
        }

        let local = to_local(sample.client, &sample.rect);
        let was_pressed = self.state.point().map(|p| p.pressed).unwrap_or(false);
        let pressed = match sample.phase {
            PointerPhase::Down => true,
            PointerPhase::Up => false,
            _ => was_pressed,
        };

        self.velocity = match self.last {
            Some((prev, t)) if sample.time > t => {
                let dt = (sample.time - t) as f32;
                clamp_velocity((local - prev) / dt, self.max_speed)
            }
            Some(_) => self.velocity,
            None => Vec2::ZERO,
        };
        self.last = Some((local, sample.time));

        let point = PointerPoint {
            local,
            pixels: to_pixels(local, dpr),
            ndc: to_ndc(local, &sample.rect),
            uv: to_uv(local, &sample.rect),
            pressed,
            kind: sample.kind,
        };
        self.state = PointerState::Active(point);
        if !self.seeded {
            self.smoothed.snap(local);
            self.seeded = true;
        }
        self.smoothed.set_target(local);
        self.presence.set_target(1.0);

        PointerEvent {
            phase: sample.phase,
            state: self.state,
            velocity: self.velocity,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.smoothed.step(dt);
        self.presence.step(dt);
    }
}
