//! Per-frame snapshot handed to a surface.
//!
//! The lifecycle owns the single [`RenderState`] of an instance and rewrites
//! it every tick; surfaces only read it while drawing.

use crate::pointer::PointerState;
use crate::surface::SurfaceSize;
use glam::Vec2;
use serde::Deserialize;

/// Straight-alpha colour with components in \[0, 1\].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let nibble = |i: usize| u8::from_str_radix(digits.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        let (r, g, b, a) = match digits.len() {
            3 => (nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17, 255),
            6 => (byte(0)?, byte(2)?, byte(4)?, 255),
            8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            _ => return None,
        };
        Some(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `rgba(r, g, b, a)` for canvas style strings.
    pub fn to_css(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {:.3})",
            c(self.r),
            c(self.g),
            c(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value).ok_or_else(|| format!("not a hex colour: {value:?}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotView {
    /// Centre in CSS pixels, offset included.
    pub center: Vec2,
    /// 0 = base colour, 1 = active colour.
    pub heat: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShaderUniforms {
    pub pointer_uv: Vec2,
    pub pointer_presence: f32,
    pub hue: f32,
    pub pulse: f32,
    pub speed: f32,
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SliderView {
    /// Normalised value in \[0, 1\].
    pub fraction: f32,
    /// Signed overdrag in CSS pixels.
    pub overflow: f32,
    pub track_left: f32,
    pub track_width: f32,
    pub track_height: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerView {
    pub translate_x: f32,
    pub translate_y: f32,
    pub opacity: f32,
    pub color: Option<Rgba>,
    /// Layout box in CSS pixels before translation.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Effect-specific drawable content.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Scene {
    #[default]
    Empty,
    Dots {
        radius: f32,
        base: Rgba,
        active: Rgba,
        dots: Vec<DotView>,
    },
    Field {
        cols: usize,
        rows: usize,
        /// Row-major displacements in UV units.
        offsets: Vec<Vec2>,
        color: Rgba,
    },
    Shader {
        color: Rgba,
        uniforms: ShaderUniforms,
    },
    Slider {
        view: SliderView,
        track: Rgba,
        fill: Rgba,
    },
    Layers {
        backdrop: Rgba,
        layers: Vec<LayerView>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct RenderState {
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub size: SurfaceSize,
    pub pointer: PointerState,
    /// Smoothed pointer position in CSS pixels.
    pub pointer_smoothed: Vec2,
    /// 1 while a pointer is present, fading to 0 after it leaves.
    pub pointer_presence: f32,
    pub scene: Scene,
}

impl RenderState {
    pub fn clear(&mut self) {
        self.scene = Scene::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms_parse() {
        assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::rgb(1.0, 1.0, 1.0)));
        assert_eq!(Rgba::from_hex("000000"), Some(Rgba::rgb(0.0, 0.0, 0.0)));
        let c = Rgba::from_hex("#5227FF80").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn css_string_clamps() {
        assert_eq!(
            Rgba::new(2.0, -1.0, 0.5, 1.0).to_css(),
            "rgba(255, 0, 128, 1.000)"
        );
    }
}
