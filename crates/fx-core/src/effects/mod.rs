//! The closed set of effect strategies.
//!
//! Every effect shares the lifecycle in [`crate::lifecycle`] and differs only
//! in what it does at `init`, on pointer events and per `step`. The variant
//! is selected by the config's `kind` discriminant through [`EffectStrategy`].

mod dot_grid;
mod elastic_slider;
mod grid_distortion;
mod plasma;
mod staggered_menu;

pub use dot_grid::DotGrid;
pub use elastic_slider::ElasticSlider;
pub use grid_distortion::GridDistortion;
pub use plasma::Plasma;
pub use staggered_menu::{MenuChoreography, StaggeredMenu};

use crate::config::EffectConfig;
use crate::pointer::PointerEvent;
use crate::render_state::RenderState;
use crate::resize::ResizeObservation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    DotGrid,
    GridDistortion,
    Plasma,
    ElasticSlider,
    StaggeredMenu,
}

impl EffectKind {
    pub fn of(config: &EffectConfig) -> Self {
        match config {
            EffectConfig::DotGrid(_) => EffectKind::DotGrid,
            EffectConfig::GridDistortion(_) => EffectKind::GridDistortion,
            EffectConfig::Plasma(_) => EffectKind::Plasma,
            EffectConfig::ElasticSlider(_) => EffectKind::ElasticSlider,
            EffectConfig::StaggeredMenu(_) => EffectKind::StaggeredMenu,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::DotGrid => "dot-grid",
            EffectKind::GridDistortion => "grid-distortion",
            EffectKind::Plasma => "plasma",
            EffectKind::ElasticSlider => "elastic-slider",
            EffectKind::StaggeredMenu => "staggered-menu",
        }
    }
}

pub trait Effect {
    fn kind(&self) -> EffectKind;

    /// Called with every new geometry. Size-dependent buffers are rebuilt
    /// from scratch here.
    fn init(&mut self, observation: &ResizeObservation);

    fn pointer(&mut self, event: &PointerEvent);

    /// Advances internal state by `dt` and writes the drawable scene.
    fn step(&mut self, dt: f32, state: &mut RenderState);

    /// Applies cosmetic config changes in place. Configs of another kind are ignored.
    fn hot_patch(&mut self, config: &EffectConfig);

    fn dispose(&mut self);
}

#[derive(Debug)]
pub enum EffectStrategy {
    DotGrid(DotGrid),
    GridDistortion(GridDistortion),
    Plasma(Plasma),
    ElasticSlider(ElasticSlider),
    StaggeredMenu(StaggeredMenu),
}

impl EffectStrategy {
    pub fn from_config(config: &EffectConfig) -> Self {
        match config {
            EffectConfig::DotGrid(c) => EffectStrategy::DotGrid(DotGrid::new(c.clone())),
            EffectConfig::GridDistortion(c) => {
                EffectStrategy::GridDistortion(GridDistortion::new(c.clone()))
            }
            EffectConfig::Plasma(c) => EffectStrategy::Plasma(Plasma::new(c.clone())),
            EffectConfig::ElasticSlider(c) => {
                EffectStrategy::ElasticSlider(ElasticSlider::new(c.clone()))
            }
            EffectConfig::StaggeredMenu(c) => {
                EffectStrategy::StaggeredMenu(StaggeredMenu::new(c.clone()))
            }
        }
    }

    fn inner(&self) -> &dyn Effect {
        match self {
            EffectStrategy::DotGrid(e) => e,
            EffectStrategy::GridDistortion(e) => e,
            EffectStrategy::Plasma(e) => e,
            EffectStrategy::ElasticSlider(e) => e,
            EffectStrategy::StaggeredMenu(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Effect {
        match self {
            EffectStrategy::DotGrid(e) => e,
            EffectStrategy::GridDistortion(e) => e,
            EffectStrategy::Plasma(e) => e,
            EffectStrategy::ElasticSlider(e) => e,
            EffectStrategy::StaggeredMenu(e) => e,
        }
    }
}

impl Effect for EffectStrategy {
    fn kind(&self) -> EffectKind {
        self.inner().kind()
    }

    fn init(&mut self, observation: &ResizeObservation) {
        self.inner_mut().init(observation)
    }

    fn pointer(&mut self, event: &PointerEvent) {
        self.inner_mut().pointer(event)
    }

    fn step(&mut self, dt: f32, state: &mut RenderState) {
        self.inner_mut().step(dt, state)
    }

    fn hot_patch(&mut self, config: &EffectConfig) {
        self.inner_mut().hot_patch(config)
    }

    fn dispose(&mut self) {
        self.inner_mut().dispose()
    }
}
