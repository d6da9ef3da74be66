//! Impulse-then-spring-return elements.
//!
//! A qualifying input (fast pointer pass, click shock) pushes each affected
//! element toward an offset with an ease-out curve, then springs it back to
//! rest. While an element's impulse is in flight further impulses skip it.

use crate::constants::{MAX_GRID_CELLS, MIN_DISTANCE};
use crate::damping::clamp_velocity;
use crate::easing::Easing;
use crate::resize::GridCounts;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpulseConfig {
    /// Seconds to reach the pushed offset.
    pub push_duration: f32,
    /// Seconds to spring back to rest.
    pub return_duration: f32,
    /// Pointer speed (CSS px/s) above which a pass pushes elements.
    pub speed_trigger: f32,
    /// Radius of a pointer pass, CSS px.
    pub proximity: f32,
    pub max_speed: f32,
    /// Seconds of pointer velocity added to a pass push.
    pub velocity_scale: f32,
    pub push_easing: Easing,
    pub return_easing: Easing,
}

impl Default for ImpulseConfig {
    fn default() -> Self {
        Self {
            push_duration: 0.3,
            return_duration: 1.5,
            speed_trigger: 100.0,
            proximity: 150.0,
            max_speed: 5000.0,
            velocity_scale: 0.005,
            push_easing: Easing::Power3Out,
            return_easing: Easing::SPRINGY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImpulsePhase {
    Idle,
    Pushing { from: Vec2, to: Vec2, t: f32 },
    Returning { from: Vec2, t: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpulseElement {
    pub home: Vec2,
    pub offset: Vec2,
    pub phase: ImpulsePhase,
    /// Set from the moment an impulse starts until its return completes.
    pub impulse_applied: bool,
}

impl ImpulseElement {
    pub fn at(home: Vec2) -> Self {
        Self {
            home,
            offset: Vec2::ZERO,
            phase: ImpulsePhase::Idle,
            impulse_applied: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.home + self.offset
    }

    fn start(&mut self, to: Vec2) -> bool {
        if self.impulse_applied || !to.is_finite() {
            return false;
        }
        self.impulse_applied = true;
        self.phase = ImpulsePhase::Pushing {
            from: self.offset,
            to,
            t: 0.0,
        };
        true
    }

    fn step(&mut self, dt: f32, cfg: &ImpulseConfig) {
        let mut remaining = dt;
        // one call may cross both the push/return and return/rest boundaries
        for _ in 0..3 {
            if remaining <= 0.0 {
                return;
            }
            match self.phase {
                ImpulsePhase::Idle => return,
                ImpulsePhase::Pushing { from, to, t } => {
                    let duration = cfg.push_duration.max(MIN_DISTANCE);
                    let used = remaining.min((1.0 - t) * duration);
                    let t = (t + used / duration).min(1.0);
                    remaining -= used;
                    self.offset = from + (to - from) * cfg.push_easing.apply(t);
                    self.phase = if t >= 1.0 {
                        ImpulsePhase::Returning { from: to, t: 0.0 }
                    } else {
                        ImpulsePhase::Pushing { from, to, t }
                    };
                }
                ImpulsePhase::Returning { from, t } => {
                    let duration = cfg.return_duration.max(MIN_DISTANCE);
                    let used = remaining.min((1.0 - t) * duration);
                    let t = (t + used / duration).min(1.0);
                    remaining -= used;
                    if t >= 1.0 {
                        self.offset = Vec2::ZERO;
                        self.phase = ImpulsePhase::Idle;
                        self.impulse_applied = false;
                        return;
                    }
                    self.offset = from * (1.0 - cfg.return_easing.apply(t));
                    self.phase = ImpulsePhase::Returning { from, t };
                }
            }
        }
    }
}

/// Shock strength falloff: 1 at the centre, 0 at and beyond `radius`.
#[inline]
pub fn radial_falloff(distance: f32, radius: f32) -> f32 {
    if !(radius > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    (1.0 - distance / radius).max(0.0)
}

#[derive(Clone, Debug, Default)]
pub struct ImpulseGrid {
    config: ImpulseConfig,
    elements: Vec<ImpulseElement>,
    counts: GridCounts,
}

impl ImpulseGrid {
    pub fn new(config: ImpulseConfig) -> Self {
        Self {
            config,
            elements: Vec::new(),
            counts: GridCounts::default(),
        }
    }

    pub fn config(&self) -> &ImpulseConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ImpulseConfig) {
        self.config = config;
    }

    pub fn elements(&self) -> &[ImpulseElement] {
        &self.elements
    }

    pub fn counts(&self) -> GridCounts {
        self.counts
    }

    /// Replaces the element buffer with a centred lattice. Previous elements
    /// are discarded rather than resized.
    pub fn layout(&mut self, counts: GridCounts, cell: f32, gap: f32, area: Vec2) {
        let counts = counts.capped(MAX_GRID_CELLS);
        let pitch = cell + gap;
        let grid_w = pitch * counts.cols as f32 - gap;
        let grid_h = pitch * counts.rows as f32 - gap;
        let origin = Vec2::new(
            (area.x - grid_w) * 0.5 + cell * 0.5,
            (area.y - grid_h) * 0.5 + cell * 0.5,
        );
        let mut elements = Vec::with_capacity(counts.len());
        for row in 0..counts.rows {
            for col in 0..counts.cols {
                let home = origin + Vec2::new(col as f32 * pitch, row as f32 * pitch);
                elements.push(ImpulseElement::at(home));
            }
        }
        self.elements = elements;
        self.counts = counts;
    }

    /// Number of elements with an impulse in flight.
    pub fn active(&self) -> usize {
        self.elements.iter().filter(|e| e.impulse_applied).count()
    }

    /// A fast pointer pass pushes nearby elements away from the pointer.
    /// Returns how many elements started an impulse.
    pub fn pointer_impulse(&mut self, pointer: Vec2, velocity: Vec2) -> usize {
        let velocity = clamp_velocity(velocity, self.config.max_speed);
        if velocity.length() <= self.config.speed_trigger || !pointer.is_finite() {
            return 0;
        }
        let proximity = self.config.proximity;
        let scale = self.config.velocity_scale;
        let mut started = 0;
        for e in &mut self.elements {
            let delta = e.position() - pointer;
            if delta.length() >= proximity {
                continue;
            }
            let push = delta + velocity * scale;
            if e.start(push) {
                started += 1;
            }
        }
        started
    }

    /// A click shock pushes every element within `radius` outward, scaled by
    /// `strength` and a linear falloff. Elements exactly at the centre are
    /// pushed upward.
    pub fn shock(&mut self, center: Vec2, radius: f32, strength: f32) -> usize {
        if !center.is_finite() || !strength.is_finite() {
            return 0;
        }
        let mut started = 0;
        for e in &mut self.elements {
            let delta = e.home - center;
            let dist = delta.length();
            let falloff = radial_falloff(dist, radius);
            if falloff <= 0.0 {
                continue;
            }
            let push = if dist > MIN_DISTANCE {
                delta * (strength * falloff)
            } else {
                Vec2::new(0.0, -1.0) * (strength * falloff)
            };
            if e.start(push) {
                started += 1;
            }
        }
        started
    }

    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }
        let cfg = self.config;
        for e in &mut self.elements {
            e.step(dt, &cfg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falloff_is_linear_and_clamped() {
        assert_eq!(radial_falloff(0.0, 100.0), 1.0);
        assert_eq!(radial_falloff(50.0, 100.0), 0.5);
        assert_eq!(radial_falloff(150.0, 100.0), 0.0);
        assert_eq!(radial_falloff(10.0, 0.0), 0.0);
    }

    #[test]
    fn single_element_pushes_then_returns() {
        let mut grid = ImpulseGrid::new(ImpulseConfig::default());
        grid.layout(GridCounts { cols: 1, rows: 1 }, 10.0, 0.0, Vec2::new(10.0, 10.0));
        let home = grid.elements()[0].home;
        assert_eq!(grid.shock(home + Vec2::new(-10.0, 0.0), 100.0, 2.0), 1);
        grid.step(0.3);
        let pushed = grid.elements()[0].offset;
        assert!((pushed.x - 18.0).abs() < 1e-3, "{pushed}");
        grid.step(1.5);
        assert_eq!(grid.elements()[0].offset, Vec2::ZERO);
        assert!(!grid.elements()[0].impulse_applied);
    }

    #[test]
    fn slow_pointer_does_not_push() {
        let mut grid = ImpulseGrid::new(ImpulseConfig::default());
        grid.layout(GridCounts { cols: 3, rows: 3 }, 10.0, 10.0, Vec2::new(50.0, 50.0));
        assert_eq!(grid.pointer_impulse(Vec2::new(25.0, 25.0), Vec2::new(50.0, 0.0)), 0);
        assert!(grid.pointer_impulse(Vec2::new(25.0, 25.0), Vec2::new(500.0, 0.0)) > 0);
    }
}
