use super::{Effect, EffectKind};
use crate::config::{EffectConfig, PlasmaConfig};
use crate::damping::{DampedQuantity, DampingLaw};
use crate::easing::Easing;
use crate::pointer::{PointerEvent, PointerPhase};
use crate::render_state::{RenderState, Scene, ShaderUniforms};
use crate::resize::ResizeObservation;
use glam::Vec2;

/// Full-surface shader background.
///
/// Three animations run side by side on disjoint uniforms: the pointer
/// follow, the hue ping-pong and the click pulse. None of them reads the
/// others' state.
#[derive(Debug)]
pub struct Plasma {
    config: PlasmaConfig,
    follow: DampedQuantity<Vec2>,
    hue: DampedQuantity<f32>,
    hue_clock: f32,
    pulse: Option<f32>,
}

impl Plasma {
    pub fn new(config: PlasmaConfig) -> Self {
        Self {
            follow: DampedQuantity::new(
                Vec2::splat(0.5),
                DampingLaw::exponential(config.follow_tau),
            ),
            hue: DampedQuantity::new(0.0, DampingLaw::exponential(config.hue_tau)),
            hue_clock: 0.0,
            pulse: None,
            config,
        }
    }

    /// Smoothed pointer position in UV space.
    pub fn follow(&self) -> Vec2 {
        self.follow.current()
    }

    pub fn hue(&self) -> f32 {
        self.hue.current()
    }

    /// Remaining pulse amplitude, 0 when no pulse is running.
    pub fn pulse(&self) -> f32 {
        match self.pulse {
            Some(t) => 1.0 - Easing::Power2Out.apply(t / self.config.pulse_duration),
            None => 0.0,
        }
    }

    fn step_hue(&mut self, dt: f32) {
        self.hue_clock += dt;
        let period = self.config.hue_period;
        if self.hue_clock >= period {
            self.hue_clock %= period;
            let next = if self.hue.target() > 0.5 { 0.0 } else { 1.0 };
            self.hue.set_target(next);
        }
        self.hue.step(dt);
    }

    fn step_pulse(&mut self, dt: f32) {
        if let Some(t) = self.pulse {
            let t = t + dt;
            self.pulse = (t < self.config.pulse_duration).then_some(t);
        }
    }
}

impl Effect for Plasma {
    fn kind(&self) -> EffectKind {
        EffectKind::Plasma
    }

    fn init(&mut self, observation: &ResizeObservation) {
        if observation.first {
            self.follow.snap(Vec2::splat(0.5));
        }
    }

    fn pointer(&mut self, event: &PointerEvent) {
        if !self.config.mouse_interactive {
            return;
        }
        if let Some(point) = event.state.point() {
            self.follow.set_target(point.uv);
        }
        if event.phase == PointerPhase::Down {
            self.pulse = Some(0.0);
        }
    }

    fn step(&mut self, dt: f32, state: &mut RenderState) {
        self.follow.step(dt);
        self.step_hue(dt);
        self.step_pulse(dt);

        let presence = if self.config.mouse_interactive {
            state.pointer_presence
        } else {
            0.0
        };
        state.scene = Scene::Shader {
            color: self.config.color,
            uniforms: ShaderUniforms {
                pointer_uv: self.follow.current(),
                pointer_presence: presence,
                hue: self.hue.current(),
                pulse: self.pulse(),
                speed: self.config.speed,
                scale: self.config.scale,
            },
        };
    }

    fn hot_patch(&mut self, config: &EffectConfig) {
        if let EffectConfig::Plasma(c) = config {
            self.follow.set_law(DampingLaw::exponential(c.follow_tau));
            self.hue.set_law(DampingLaw::exponential(c.hue_tau));
            if !c.mouse_interactive {
                self.follow.set_target(Vec2::splat(0.5));
            }
            self.config = c.clone();
        }
    }

    fn dispose(&mut self) {
        self.pulse = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_ping_pongs_between_ends() {
        let mut p = Plasma::new(PlasmaConfig {
            hue_period: 1.0,
            hue_tau: 0.05,
            ..PlasmaConfig::default()
        });
        let mut state = RenderState::default();
        for _ in 0..90 {
            p.step(1.0 / 60.0, &mut state);
        }
        assert!(p.hue() > 0.9, "{}", p.hue());
        for _ in 0..60 {
            p.step(1.0 / 60.0, &mut state);
        }
        assert!(p.hue() < 0.1, "{}", p.hue());
    }
}
