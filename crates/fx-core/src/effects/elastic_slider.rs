use super::{Effect, EffectKind};
use crate::config::{EffectConfig, ElasticSliderConfig};
use crate::damping::{decay, DampedQuantity, DampingLaw};
use crate::pointer::{PointerEvent, PointerPhase};
use crate::render_state::{RenderState, Scene, SliderView};
use crate::resize::ResizeObservation;

// Track thickness as a fraction of the host height, capped in CSS px
const TRACK_HEIGHT_FRACTION: f32 = 0.25;
const TRACK_HEIGHT_MAX: f32 = 8.0;

/// Horizontal slider with rubber-band overdrag.
///
/// Dragging past either end stretches the track by `decay(distance, max_overflow)`;
/// releasing springs the stretch back and lets the value coast to rest under
/// friction.
#[derive(Debug)]
pub struct ElasticSlider {
    config: ElasticSliderConfig,
    value: DampedQuantity<f32>,
    overflow: DampedQuantity<f32>,
    dragging: bool,
    drag_velocity: f32,
    track_left: f32,
    track_width: f32,
    track_height: f32,
}

impl ElasticSlider {
    pub fn new(config: ElasticSliderConfig) -> Self {
        Self {
            value: DampedQuantity::new(config.default_value, DampingLaw::friction(config.friction)),
            overflow: DampedQuantity::new(0.0, DampingLaw::wobbly()),
            config,
            dragging: false,
            drag_velocity: 0.0,
            track_left: 0.0,
            track_width: 0.0,
            track_height: 0.0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value.current()
    }

    pub fn overflow(&self) -> f32 {
        self.overflow.current()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn range(&self) -> f32 {
        self.config.max - self.config.min
    }

    fn fraction(&self) -> f32 {
        ((self.value.current() - self.config.min) / self.range()).clamp(0.0, 1.0)
    }

    fn drag_to(&mut self, x: f32) {
        if !(self.track_width > 0.0) {
            return;
        }
        let right = self.track_left + self.track_width;
        let past = if x < self.track_left {
            x - self.track_left
        } else if x > right {
            x - right
        } else {
            0.0
        };
        self.overflow.snap(decay(past, self.config.max_overflow));
        let t = ((x - self.track_left) / self.track_width).clamp(0.0, 1.0);
        self.value.snap(self.config.min + t * self.range());
    }

    fn release(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.overflow.set_target(0.0);
        // coast only while inside the range; an overdragged release just springs back
        if self.overflow.current() == 0.0 {
            self.value.fling(self.drag_velocity, self.config.friction);
        }
        let rest = self.value.target().clamp(self.config.min, self.config.max);
        self.value.set_target(rest);
        self.drag_velocity = 0.0;
    }
}

impl Effect for ElasticSlider {
    fn kind(&self) -> EffectKind {
        EffectKind::ElasticSlider
    }

    fn init(&mut self, observation: &ResizeObservation) {
        let size = observation.size;
        self.track_left = self.config.padding;
        self.track_width = (size.css_width - 2.0 * self.config.padding).max(0.0);
        self.track_height = (size.css_height * TRACK_HEIGHT_FRACTION).min(TRACK_HEIGHT_MAX);
    }

    fn pointer(&mut self, event: &PointerEvent) {
        let point = event.state.point().copied();
        match (event.phase, point) {
            (PointerPhase::Down, Some(p)) => {
                self.dragging = true;
                self.drag_velocity = 0.0;
                self.drag_to(p.local.x);
            }
            (PointerPhase::Move, Some(p)) if self.dragging => {
                self.drag_to(p.local.x);
                if self.track_width > 0.0 {
                    self.drag_velocity = event.velocity.x / self.track_width * self.range();
                }
            }
            (PointerPhase::Up, _) | (PointerPhase::Leave, _) => self.release(),
            _ => {}
        }
    }

    fn step(&mut self, dt: f32, state: &mut RenderState) {
        if !self.dragging {
            self.value.step(dt);
            self.overflow.step(dt);
        }
        state.scene = Scene::Slider {
            view: SliderView {
                fraction: self.fraction(),
                overflow: self.overflow.current(),
                track_left: self.track_left,
                track_width: self.track_width,
                track_height: self.track_height,
            },
            track: self.config.track_color,
            fill: self.config.fill_color,
        };
    }

    fn hot_patch(&mut self, config: &EffectConfig) {
        if let EffectConfig::ElasticSlider(c) = config {
            self.config = c.clone();
            let v = self.value.current();
            let clamped = v.clamp(c.min, c.max);
            if clamped != v {
                self.value.snap(clamped);
            }
            self.value.set_law(DampingLaw::friction(c.friction));
        }
    }

    fn dispose(&mut self) {
        self.dragging = false;
        self.overflow.snap(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::{PointerKind, PointerPoint, PointerState};
    use crate::resize::{HostRect, ResizeObservation};
    use crate::surface::SurfaceSize;
    use glam::Vec2;

    fn event(phase: PointerPhase, x: f32, vx: f32) -> PointerEvent {
        PointerEvent {
            phase,
            state: PointerState::Active(PointerPoint {
                local: Vec2::new(x, 10.0),
                pixels: Vec2::new(x, 10.0),
                ndc: Vec2::ZERO,
                uv: Vec2::ZERO,
                pressed: phase != PointerPhase::Up,
                kind: PointerKind::Mouse,
            }),
            velocity: Vec2::new(vx, 0.0),
        }
    }

    fn slider() -> ElasticSlider {
        let mut s = ElasticSlider::new(ElasticSliderConfig::default());
        s.init(&ResizeObservation {
            size: SurfaceSize {
                css_width: 248.0,
                css_height: 20.0,
                width: 248,
                height: 20,
                dpr: 1.0,
            },
            rect: HostRect::sized(248.0, 20.0),
            grid: None,
            first: true,
        });
        s
    }

    #[test]
    fn overdrag_is_soft_clamped_and_springs_back() {
        let mut s = slider();
        s.pointer(&event(PointerPhase::Down, 100.0, 0.0));
        s.pointer(&event(PointerPhase::Move, 10_000.0, 0.0));
        assert!(s.overflow() > 0.0 && s.overflow() < 50.0);
        assert_eq!(s.value(), 100.0);
        s.pointer(&event(PointerPhase::Up, 10_000.0, 0.0));
        let mut state = RenderState::default();
        for _ in 0..240 {
            s.step(1.0 / 60.0, &mut state);
        }
        assert!(s.overflow().abs() < 1e-2, "{}", s.overflow());
        assert_eq!(s.value(), 100.0);
    }

    #[test]
    fn fling_coasts_within_range() {
        let mut s = slider();
        s.pointer(&event(PointerPhase::Down, 124.0, 0.0));
        s.pointer(&event(PointerPhase::Move, 124.0, 400.0));
        s.pointer(&event(PointerPhase::Up, 124.0, 0.0));
        let mut state = RenderState::default();
        for _ in 0..300 {
            s.step(1.0 / 60.0, &mut state);
        }
        assert!(s.value() > 50.0 && s.value() <= 100.0, "{}", s.value());
    }
}
