use super::{Effect, EffectKind};
use crate::config::{DotGridConfig, EffectConfig};
use crate::impulse::{ImpulseConfig, ImpulseGrid};
use crate::pointer::{PointerEvent, PointerPhase};
use crate::render_state::{DotView, RenderState, Scene};
use crate::resize::{grid_counts, GridCounts, ResizeObservation};
use glam::Vec2;

/// Lattice of dots pushed away by fast pointer passes and click shocks.
/// Dots near the pointer blend toward the active colour.
#[derive(Debug)]
pub struct DotGrid {
    config: DotGridConfig,
    grid: ImpulseGrid,
    pointer: Option<Vec2>,
}

fn impulse_config(c: &DotGridConfig) -> ImpulseConfig {
    ImpulseConfig {
        push_duration: c.push_duration,
        return_duration: c.return_duration,
        speed_trigger: c.speed_trigger,
        proximity: c.proximity,
        max_speed: c.max_speed,
        ..ImpulseConfig::default()
    }
}

impl DotGrid {
    pub fn new(config: DotGridConfig) -> Self {
        Self {
            grid: ImpulseGrid::new(impulse_config(&config)),
            config,
            pointer: None,
        }
    }

    pub fn grid(&self) -> &ImpulseGrid {
        &self.grid
    }

    fn heat(&self, position: Vec2) -> f32 {
        let Some(pointer) = self.pointer else {
            return 0.0;
        };
        if !(self.config.proximity > 0.0) {
            return 0.0;
        }
        (1.0 - position.distance(pointer) / self.config.proximity).clamp(0.0, 1.0)
    }
}

impl Effect for DotGrid {
    fn kind(&self) -> EffectKind {
        EffectKind::DotGrid
    }

    fn init(&mut self, observation: &ResizeObservation) {
        let size = observation.size;
        let counts = observation.grid.unwrap_or_else(|| {
            grid_counts(
                size.css_width,
                size.css_height,
                self.config.dot_size,
                self.config.gap,
            )
        });
        self.grid.layout(
            counts,
            self.config.dot_size,
            self.config.gap,
            Vec2::new(size.css_width, size.css_height),
        );
        log::debug!("[dot-grid] {}x{} dots", counts.cols, counts.rows);
    }

    fn pointer(&mut self, event: &PointerEvent) {
        let Some(point) = event.state.point() else {
            self.pointer = None;
            return;
        };
        self.pointer = Some(point.local);
        match event.phase {
            PointerPhase::Move => {
                self.grid.pointer_impulse(point.local, event.velocity);
            }
            PointerPhase::Down => {
                let hit = self.grid.shock(
                    point.local,
                    self.config.shock_radius,
                    self.config.shock_strength,
                );
                log::debug!("[dot-grid] shock moved {} dots", hit);
            }
            PointerPhase::Up | PointerPhase::Leave => {}
        }
    }

    fn step(&mut self, dt: f32, state: &mut RenderState) {
        self.grid.step(dt);
        let mut dots = match &mut state.scene {
            Scene::Dots { dots, .. } => std::mem::take(dots),
            _ => Vec::new(),
        };
        dots.clear();
        for e in self.grid.elements() {
            dots.push(DotView {
                center: e.position(),
                heat: self.heat(e.home),
            });
        }
        state.scene = Scene::Dots {
            radius: self.config.dot_size * 0.5,
            base: self.config.base_color,
            active: self.config.active_color,
            dots,
        };
    }

    fn hot_patch(&mut self, config: &EffectConfig) {
        if let EffectConfig::DotGrid(c) = config {
            self.grid.set_config(impulse_config(c));
            self.config = c.clone();
        }
    }

    fn dispose(&mut self) {
        self.grid.layout(GridCounts::default(), 0.0, 0.0, Vec2::ZERO);
        self.pointer = None;
    }
}
