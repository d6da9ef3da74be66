use crate::core::{
    Backend, FxError, RenderState, ResizeObservation, Surface, SurfaceProvider, SurfaceSize,
};
use crate::dom;
use web_sys as web;

mod canvas2d;
mod gpu;

pub use canvas2d::CanvasSurface;
pub use gpu::GpuSurface;

/// Creates a canvas inside the host for each acquisition.
pub struct WebSurfaceProvider {
    host: web::HtmlElement,
}

impl WebSurfaceProvider {
    pub fn new(host: web::HtmlElement) -> Self {
        Self { host }
    }
}

impl SurfaceProvider for WebSurfaceProvider {
    type Surface = WebSurface;

    fn acquire(
        &mut self,
        observation: &ResizeObservation,
        backend: Backend,
    ) -> Result<WebSurface, FxError> {
        if !observation.has_extent() {
            return Err(FxError::unavailable("host has zero extent"));
        }
        let canvas =
            dom::create_canvas(&self.host).map_err(|e| FxError::unavailable(e.to_string()))?;
        dom::sync_canvas_backing_size(&canvas, observation.size);
        let surface = match backend {
            Backend::Canvas2d => {
                CanvasSurface::new(canvas.clone(), observation.size).map(WebSurface::Canvas)
            }
            Backend::Gpu => Ok(WebSurface::Gpu(GpuSurface::new(
                canvas.clone(),
                observation.size,
            ))),
        };
        if surface.is_err() {
            canvas.remove();
        }
        surface
    }
}

pub enum WebSurface {
    Canvas(CanvasSurface),
    Gpu(GpuSurface),
}

impl Surface for WebSurface {
    fn size(&self) -> SurfaceSize {
        match self {
            WebSurface::Canvas(s) => s.size(),
            WebSurface::Gpu(s) => s.size(),
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        match self {
            WebSurface::Canvas(s) => s.resize(size),
            WebSurface::Gpu(s) => s.resize(size),
        }
    }

    fn draw(&mut self, state: &RenderState) -> Result<(), FxError> {
        match self {
            WebSurface::Canvas(s) => s.draw(state),
            WebSurface::Gpu(s) => s.draw(state),
        }
    }

    fn release(&mut self) {
        match self {
            WebSurface::Canvas(s) => s.release(),
            WebSurface::Gpu(s) => s.release(),
        }
    }

    fn is_released(&self) -> bool {
        match self {
            WebSurface::Canvas(s) => s.is_released(),
            WebSurface::Gpu(s) => s.is_released(),
        }
    }
}
