use crate::constants::CANVAS_CLASS;
use crate::core::{HostMetrics, HostRect, SurfaceSize};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn host_rect(host: &web::HtmlElement) -> HostRect {
    let rect = host.get_bounding_client_rect();
    HostRect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Host box plus the window's device pixel ratio; the core caps the ratio.
pub fn host_metrics(host: &web::HtmlElement) -> HostMetrics {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0);
    HostMetrics::new(host_rect(host), dpr)
}

/// Appends a canvas that fills the host.
pub fn create_canvas(host: &web::HtmlElement) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_class_name(CANVAS_CLASS);
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    _ = style.set_property("touch-action", "none");
    host.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// Backing store follows the observed device-pixel size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: SurfaceSize) {
    let w_px = size.width.max(1);
    let h_px = size.height.max(1);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
}
