//! Per-effect configuration and change classification.
//!
//! Fields are split ahead of time into structural ones, which change the
//! size of some buffer and need a full reinitialisation, and cosmetic ones,
//! which a running instance can absorb in place.

use crate::constants::MIN_GRID_CELL;
use crate::error::FxError;
use crate::render_state::Rgba;
use crate::resize::GridPitch;
use crate::surface::Backend;
use serde::Deserialize;

fn hex(s: &str) -> Rgba {
    Rgba::from_hex(s).unwrap_or(Rgba::rgb(1.0, 1.0, 1.0))
}

fn positive(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotGridConfig {
    pub dot_size: f32,
    pub gap: f32,
    pub base_color: Rgba,
    pub active_color: Rgba,
    pub proximity: f32,
    pub speed_trigger: f32,
    pub shock_radius: f32,
    pub shock_strength: f32,
    pub max_speed: f32,
    pub push_duration: f32,
    pub return_duration: f32,
}

impl Default for DotGridConfig {
    fn default() -> Self {
        Self {
            dot_size: 16.0,
            gap: 32.0,
            base_color: hex("#5227FF"),
            active_color: hex("#5227FF"),
            proximity: 150.0,
            speed_trigger: 100.0,
            shock_radius: 250.0,
            shock_strength: 5.0,
            max_speed: 5000.0,
            push_duration: 0.3,
            return_duration: 1.5,
        }
    }
}

impl DotGridConfig {
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        self.dot_size = positive(self.dot_size, d.dot_size).max(MIN_GRID_CELL);
        self.gap = non_negative(self.gap);
        self.proximity = non_negative(self.proximity);
        self.speed_trigger = non_negative(self.speed_trigger);
        self.shock_radius = non_negative(self.shock_radius);
        self.shock_strength = if self.shock_strength.is_finite() {
            self.shock_strength
        } else {
            d.shock_strength
        };
        self.max_speed = positive(self.max_speed, d.max_speed);
        self.push_duration = positive(self.push_duration, d.push_duration);
        self.return_duration = positive(self.return_duration, d.return_duration);
        self
    }

    fn requires_reinit(&self, next: &Self) -> bool {
        self.dot_size != next.dot_size || self.gap != next.gap
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridDistortionConfig {
    /// Cells per side.
    pub grid: u32,
    /// Pointer influence radius as a fraction of the grid.
    pub mouse: f32,
    pub strength: f32,
    pub relaxation: f32,
    pub color: Rgba,
}

impl Default for GridDistortionConfig {
    fn default() -> Self {
        Self {
            grid: 15,
            mouse: 0.1,
            strength: 0.15,
            relaxation: 0.9,
            color: hex("#ffffff"),
        }
    }
}

impl GridDistortionConfig {
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        self.grid = self.grid.clamp(1, 256);
        self.mouse = positive(self.mouse, d.mouse);
        self.strength = non_negative(self.strength);
        if !(self.relaxation > 0.0 && self.relaxation < 1.0) {
            self.relaxation = d.relaxation;
        }
        self
    }

    fn requires_reinit(&self, next: &Self) -> bool {
        self.grid != next.grid
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlasmaConfig {
    pub color: Rgba,
    pub speed: f32,
    pub scale: f32,
    pub mouse_interactive: bool,
    /// Pointer-follow time constant, seconds.
    pub follow_tau: f32,
    /// Seconds between hue ping-pong reversals.
    pub hue_period: f32,
    /// Hue easing time constant, seconds.
    pub hue_tau: f32,
    /// Length of the click pulse, seconds.
    pub pulse_duration: f32,
}

impl Default for PlasmaConfig {
    fn default() -> Self {
        Self {
            color: hex("#ff6b35"),
            speed: 1.0,
            scale: 1.0,
            mouse_interactive: true,
            follow_tau: 0.12,
            hue_period: 6.0,
            hue_tau: 0.6,
            pulse_duration: 0.8,
        }
    }
}

impl PlasmaConfig {
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        self.speed = non_negative(self.speed);
        self.scale = positive(self.scale, d.scale);
        self.follow_tau = positive(self.follow_tau, d.follow_tau);
        self.hue_period = positive(self.hue_period, d.hue_period);
        self.hue_tau = positive(self.hue_tau, d.hue_tau);
        self.pulse_duration = positive(self.pulse_duration, d.pulse_duration);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElasticSliderConfig {
    pub min: f32,
    pub max: f32,
    pub default_value: f32,
    /// Largest visual overdrag, CSS px.
    pub max_overflow: f32,
    /// Velocity decay rate of a released fling, 1/s.
    pub friction: f32,
    /// Horizontal inset of the track, CSS px.
    pub padding: f32,
    pub track_color: Rgba,
    pub fill_color: Rgba,
}

impl Default for ElasticSliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            default_value: 50.0,
            max_overflow: 50.0,
            friction: 6.0,
            padding: 24.0,
            track_color: hex("#3a3a3a"),
            fill_color: hex("#ffffff"),
        }
    }
}

impl ElasticSliderConfig {
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        if !self.min.is_finite() {
            self.min = d.min;
        }
        if !self.max.is_finite() || self.max <= self.min {
            self.max = self.min + 1.0;
        }
        self.default_value = if self.default_value.is_finite() {
            self.default_value.clamp(self.min, self.max)
        } else {
            self.min
        };
        self.max_overflow = non_negative(self.max_overflow);
        self.friction = positive(self.friction, d.friction);
        self.padding = non_negative(self.padding);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaggeredMenuConfig {
    pub item_count: u32,
    pub prelayer_colors: Vec<Rgba>,
    pub panel_color: Rgba,
    pub item_color: Rgba,
    pub backdrop: Rgba,
    /// Panel slides in from the right edge when true.
    pub position_right: bool,
    /// Fraction of the host width covered by the open panel.
    pub panel_width: f32,
}

impl Default for StaggeredMenuConfig {
    fn default() -> Self {
        Self {
            item_count: 5,
            prelayer_colors: vec![hex("#B19EEF"), hex("#5227FF")],
            panel_color: hex("#ffffff"),
            item_color: hex("#111111"),
            backdrop: Rgba::new(0.0, 0.0, 0.0, 0.0),
            position_right: true,
            panel_width: 0.6,
        }
    }
}

impl StaggeredMenuConfig {
    fn sanitized(mut self) -> Self {
        self.item_count = self.item_count.min(32);
        self.prelayer_colors.truncate(8);
        self.panel_width = if self.panel_width.is_finite() {
            self.panel_width.clamp(0.1, 1.0)
        } else {
            Self::default().panel_width
        };
        self
    }

    fn requires_reinit(&self, next: &Self) -> bool {
        self.item_count != next.item_count
            || self.prelayer_colors.len() != next.prelayer_colors.len()
            || self.position_right != next.position_right
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EffectConfig {
    DotGrid(DotGridConfig),
    GridDistortion(GridDistortionConfig),
    Plasma(PlasmaConfig),
    ElasticSlider(ElasticSliderConfig),
    StaggeredMenu(StaggeredMenuConfig),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigChange {
    Unchanged,
    HotPatch,
    Reinit,
}

impl ConfigChange {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigChange::Unchanged => "unchanged",
            ConfigChange::HotPatch => "hot-patch",
            ConfigChange::Reinit => "reinit",
        }
    }
}

impl EffectConfig {
    /// Parses the JSON the UI layer hands over and sanitizes it.
    pub fn from_json(json: &str) -> Result<Self, FxError> {
        serde_json::from_str::<EffectConfig>(json)
            .map(EffectConfig::sanitized)
            .map_err(|e| FxError::Config(e.to_string()))
    }

    /// Clamps degenerate values to usable ones.
    pub fn sanitized(self) -> Self {
        match self {
            EffectConfig::DotGrid(c) => EffectConfig::DotGrid(c.sanitized()),
            EffectConfig::GridDistortion(c) => EffectConfig::GridDistortion(c.sanitized()),
            EffectConfig::Plasma(c) => EffectConfig::Plasma(c.sanitized()),
            EffectConfig::ElasticSlider(c) => EffectConfig::ElasticSlider(c.sanitized()),
            EffectConfig::StaggeredMenu(c) => EffectConfig::StaggeredMenu(c.sanitized()),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            EffectConfig::Plasma(_) => Backend::Gpu,
            _ => Backend::Canvas2d,
        }
    }

    /// Lattice the resize adapter derives counts for, if any.
    pub fn grid_pitch(&self) -> Option<GridPitch> {
        match self {
            EffectConfig::DotGrid(c) => Some(GridPitch {
                cell: c.dot_size,
                gap: c.gap,
            }),
            _ => None,
        }
    }

    pub fn classify(&self, next: &EffectConfig) -> ConfigChange {
        if self == next {
            return ConfigChange::Unchanged;
        }
        let reinit = match (self, next) {
            (EffectConfig::DotGrid(a), EffectConfig::DotGrid(b)) => a.requires_reinit(b),
            (EffectConfig::GridDistortion(a), EffectConfig::GridDistortion(b)) => {
                a.requires_reinit(b)
            }
            (EffectConfig::Plasma(_), EffectConfig::Plasma(_)) => false,
            (EffectConfig::ElasticSlider(_), EffectConfig::ElasticSlider(_)) => false,
            (EffectConfig::StaggeredMenu(a), EffectConfig::StaggeredMenu(b)) => {
                a.requires_reinit(b)
            }
            _ => true,
        };
        if reinit {
            ConfigChange::Reinit
        } else {
            ConfigChange::HotPatch
        }
    }
}
