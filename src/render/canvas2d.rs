use crate::constants::{FIELD_LINE_ALPHA, FIELD_LINE_WIDTH, SLIDER_KNOB_SCALE};
use crate::core::{
    DotView, FxError, LayerView, RenderState, Rgba, Scene, SliderView, Surface, SurfaceSize,
};
use crate::dom;
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

type Ctx = web::CanvasRenderingContext2d;

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: Ctx,
    size: SurfaceSize,
    released: bool,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement, size: SurfaceSize) -> Result<Self, FxError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| FxError::unavailable(format!("{:?}", e)))?
            .ok_or_else(|| FxError::unavailable("2d context unavailable"))?
            .dyn_into::<Ctx>()
            .map_err(|_| FxError::unavailable("unexpected 2d context type"))?;
        Ok(Self {
            canvas,
            ctx,
            size,
            released: false,
        })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        if self.released {
            return;
        }
        self.size = size;
        dom::sync_canvas_backing_size(&self.canvas, size);
    }

    fn draw(&mut self, state: &RenderState) -> Result<(), FxError> {
        if self.released {
            return Ok(());
        }
        let dpr = self.size.dpr as f64;
        let w = self.size.css_width as f64;
        let h = self.size.css_height as f64;
        // draw in CSS pixels
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(|e| FxError::backend(format!("{:?}", e)))?;
        self.ctx.clear_rect(0.0, 0.0, w, h);
        match &state.scene {
            Scene::Empty => Ok(()),
            Scene::Dots {
                radius,
                base,
                active,
                dots,
            } => paint_dots(&self.ctx, *radius, *base, *active, dots),
            Scene::Field {
                cols,
                rows,
                offsets,
                color,
            } => {
                paint_field(&self.ctx, *cols, *rows, offsets, *color, w, h);
                Ok(())
            }
            Scene::Shader { color, .. } => {
                // no fragment programs on this backend; a flat fill stands in
                self.ctx.set_fill_style_str(&color.to_css());
                self.ctx.fill_rect(0.0, 0.0, w, h);
                Ok(())
            }
            Scene::Slider { view, track, fill } => {
                paint_slider(&self.ctx, view, *track, *fill, h)
            }
            Scene::Layers { backdrop, layers } => {
                paint_layers(&self.ctx, *backdrop, layers, w, h);
                Ok(())
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.canvas.remove();
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

fn circle(ctx: &Ctx, center: Vec2, radius: f64) -> Result<(), FxError> {
    ctx.begin_path();
    ctx.arc(center.x as f64, center.y as f64, radius.max(0.0), 0.0, TAU)
        .map_err(|e| FxError::backend(format!("{:?}", e)))?;
    ctx.fill();
    Ok(())
}

fn paint_dots(
    ctx: &Ctx,
    radius: f32,
    base: Rgba,
    active: Rgba,
    dots: &[DotView],
) -> Result<(), FxError> {
    for dot in dots {
        ctx.set_fill_style_str(&base.lerp(active, dot.heat).to_css());
        circle(ctx, dot.center, radius as f64)?;
    }
    Ok(())
}

/// Lattice lines through every displaced cell centre. Rows are stored
/// top-down; offsets are UV units with Y up.
fn paint_field(
    ctx: &Ctx,
    cols: usize,
    rows: usize,
    offsets: &[Vec2],
    color: Rgba,
    w: f64,
    h: f64,
) {
    if cols == 0 || rows == 0 || offsets.len() < cols * rows {
        return;
    }
    let point = |x: usize, y: usize| {
        let u = (x as f64 + 0.5) / cols as f64;
        let v = (y as f64 + 0.5) / rows as f64;
        let o = offsets[y * cols + x];
        ((u + o.x as f64) * w, (v - o.y as f64) * h)
    };
    ctx.set_stroke_style_str(&color.with_alpha(color.a * FIELD_LINE_ALPHA).to_css());
    ctx.set_line_width(FIELD_LINE_WIDTH);
    ctx.begin_path();
    for y in 0..rows {
        let (x0, y0) = point(0, y);
        ctx.move_to(x0, y0);
        for x in 1..cols {
            let (px, py) = point(x, y);
            ctx.line_to(px, py);
        }
    }
    for x in 0..cols {
        let (x0, y0) = point(x, 0);
        ctx.move_to(x0, y0);
        for y in 1..rows {
            let (px, py) = point(x, y);
            ctx.line_to(px, py);
        }
    }
    ctx.stroke();
}

/// Overdrag stretches the track toward the side being pulled.
fn paint_slider(
    ctx: &Ctx,
    view: &SliderView,
    track: Rgba,
    fill: Rgba,
    h: f64,
) -> Result<(), FxError> {
    let overflow = view.overflow as f64;
    let left = view.track_left as f64 + overflow.min(0.0);
    let width = view.track_width as f64 + overflow.abs();
    let th = view.track_height as f64;
    let top = (h - th) * 0.5;
    ctx.set_fill_style_str(&track.to_css());
    ctx.fill_rect(left, top, width, th);

    let fill_end = if overflow > 0.0 {
        left + width
    } else {
        view.track_left as f64 + view.fraction.clamp(0.0, 1.0) as f64 * view.track_width as f64
    };
    ctx.set_fill_style_str(&fill.to_css());
    ctx.fill_rect(left, top, (fill_end - left).max(0.0), th);
    circle(
        ctx,
        Vec2::new(fill_end as f32, (h * 0.5) as f32),
        th * SLIDER_KNOB_SCALE * 0.5,
    )
}

fn paint_layers(ctx: &Ctx, backdrop: Rgba, layers: &[LayerView], w: f64, h: f64) {
    if backdrop.a > 0.0 {
        ctx.set_fill_style_str(&backdrop.to_css());
        ctx.fill_rect(0.0, 0.0, w, h);
    }
    for layer in layers {
        let Some(color) = layer.color else {
            continue;
        };
        let opacity = layer.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            continue;
        }
        ctx.set_global_alpha(opacity as f64);
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill_rect(
            (layer.x + layer.translate_x) as f64,
            (layer.y + layer.translate_y) as f64,
            layer.width as f64,
            layer.height as f64,
        );
    }
    ctx.set_global_alpha(1.0);
}
