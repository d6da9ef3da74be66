use super::{Effect, EffectKind};
use crate::config::{EffectConfig, GridDistortionConfig};
use crate::damping::{DampedQuantity, DampingLaw};
use crate::field::{DistortionField, FieldConfig, FieldPointer};
use crate::pointer::{PointerEvent, PointerState};
use crate::render_state::{RenderState, Scene};
use crate::resize::{GridCounts, ResizeObservation};
use glam::Vec2;

// Pointer velocity fades to zero between events on this time constant
const VELOCITY_FADE_TAU_SEC: f32 = 0.1;

/// Image-warp style lattice driven by a relaxation field.
#[derive(Debug)]
pub struct GridDistortion {
    config: GridDistortionConfig,
    field: DistortionField,
    area: Vec2,
    uv: Option<Vec2>,
    velocity: DampedQuantity<Vec2>,
}

fn field_config(c: &GridDistortionConfig) -> FieldConfig {
    FieldConfig {
        relaxation: c.relaxation,
        strength: c.strength,
        radius: c.mouse,
        ..FieldConfig::default()
    }
}

fn counts(c: &GridDistortionConfig) -> GridCounts {
    let side = c.grid as usize;
    GridCounts {
        cols: side,
        rows: side,
    }
}

impl GridDistortion {
    pub fn new(config: GridDistortionConfig) -> Self {
        Self {
            field: DistortionField::new(field_config(&config), counts(&config)),
            config,
            area: Vec2::ZERO,
            uv: None,
            velocity: DampedQuantity::new(
                Vec2::ZERO,
                DampingLaw::exponential(VELOCITY_FADE_TAU_SEC),
            ),
        }
    }

    pub fn field(&self) -> &DistortionField {
        &self.field
    }
}

impl Effect for GridDistortion {
    fn kind(&self) -> EffectKind {
        EffectKind::GridDistortion
    }

    fn init(&mut self, observation: &ResizeObservation) {
        self.area = Vec2::new(observation.size.css_width, observation.size.css_height);
        self.field.reallocate(counts(&self.config));
    }

    fn pointer(&mut self, event: &PointerEvent) {
        match event.state {
            PointerState::Active(point) => {
                self.uv = Some(point.uv);
                if self.area.x > 0.0 && self.area.y > 0.0 {
                    // UV Y points up, screen Y points down
                    let v = Vec2::new(
                        event.velocity.x / self.area.x,
                        -event.velocity.y / self.area.y,
                    );
                    self.velocity.snap(v);
                    self.velocity.set_target(Vec2::ZERO);
                }
            }
            PointerState::Inactive => {
                self.uv = None;
                self.velocity.snap(Vec2::ZERO);
            }
        }
    }

    fn step(&mut self, dt: f32, state: &mut RenderState) {
        let pointer = self.uv.map(|uv| FieldPointer {
            uv,
            velocity: self.velocity.current(),
        });
        self.field.step(dt, pointer);
        self.velocity.step(dt);

        let counts = self.field.counts();
        let mut offsets = match &mut state.scene {
            Scene::Field { offsets, .. } => std::mem::take(offsets),
            _ => Vec::new(),
        };
        offsets.clear();
        offsets.extend_from_slice(self.field.cells());
        state.scene = Scene::Field {
            cols: counts.cols,
            rows: counts.rows,
            offsets,
            color: self.config.color,
        };
    }

    fn hot_patch(&mut self, config: &EffectConfig) {
        if let EffectConfig::GridDistortion(c) = config {
            self.field.set_config(field_config(c));
            self.config = c.clone();
        }
    }

    fn dispose(&mut self) {
        self.field.reallocate(GridCounts::default());
        self.uv = None;
    }
}
