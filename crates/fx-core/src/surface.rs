//! Draw surface contracts.
//!
//! A surface is owned by exactly one effect instance. Implementations live
//! in the platform layer; the lifecycle only talks to these traits.

use crate::error::FxError;
use crate::render_state::RenderState;
use crate::resize::ResizeObservation;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Canvas2d,
    Gpu,
}

/// Backing-store dimensions of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f32,
    pub css_height: f32,
    /// Device pixels.
    pub width: u32,
    pub height: u32,
    pub dpr: f32,
}

impl SurfaceSize {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

pub trait Surface {
    fn size(&self) -> SurfaceSize;

    fn resize(&mut self, size: SurfaceSize);

    /// Writes one frame. Out-of-range state is clamped by the implementation;
    /// drawing after [`Surface::release`] is a no-op.
    fn draw(&mut self, state: &RenderState) -> Result<(), FxError>;

    /// Frees backend resources and detaches the drawing target. Idempotent.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

pub trait SurfaceProvider {
    type Surface: Surface;

    /// Fails with [`FxError::SurfaceUnavailable`] when the host has no extent
    /// or the backend context cannot be created.
    fn acquire(
        &mut self,
        observation: &ResizeObservation,
        backend: Backend,
    ) -> Result<Self::Surface, FxError>;
}
