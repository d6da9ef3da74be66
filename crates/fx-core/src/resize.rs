//! Host size tracking and size-derived structures.

use crate::constants::{MAX_DEVICE_PIXEL_RATIO, MAX_GRID_CELLS};
use crate::surface::SurfaceSize;

/// Host element bounding box in CSS pixels, relative to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl HostRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn has_extent(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// One measurement of the host: box plus the display's pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostMetrics {
    pub rect: HostRect,
    pub dpr: f32,
}

impl HostMetrics {
    pub fn new(rect: HostRect, dpr: f32) -> Self {
        Self { rect, dpr }
    }
}

/// Cell size and spacing of a size-derived lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPitch {
    pub cell: f32,
    pub gap: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridCounts {
    pub cols: usize,
    pub rows: usize,
}

impl GridCounts {
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shrinks both axes by the same factor until at most `max` cells remain.
    pub fn capped(self, max: usize) -> GridCounts {
        let len = self.cols.saturating_mul(self.rows);
        if len <= max {
            return self;
        }
        let scale = (max as f64 / len as f64).sqrt();
        let cols = ((self.cols as f64 * scale).floor() as usize).clamp(1, max.max(1));
        let rows = ((self.rows as f64 * scale).floor() as usize).clamp(1, (max / cols).max(1));
        GridCounts { cols, rows }
    }
}

/// Derived state of one observed resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeObservation {
    pub size: SurfaceSize,
    pub rect: HostRect,
    pub grid: Option<GridCounts>,
    /// Set on the first observation of an adapter's lifetime only.
    pub first: bool,
}

impl ResizeObservation {
    pub fn has_extent(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    /// Same geometry, ignoring the one-shot flag and the host's page offset.
    fn same_geometry(&self, other: &ResizeObservation) -> bool {
        self.size == other.size && self.grid == other.grid
    }
}

/// Pixel ratio used for backing stores: non-finite or non-positive becomes 1.
#[inline]
pub fn effective_dpr(dpr: f32, cap: f32) -> f32 {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let cap = if cap.is_finite() && cap >= 1.0 { cap } else { 1.0 };
    dpr.min(cap)
}

/// How many cells of `cell` separated by `gap` fit in `size`.
#[inline]
pub fn grid_count(size: f32, cell: f32, gap: f32) -> usize {
    let pitch = cell + gap;
    if !(size > 0.0) || !(pitch > 0.0) || !size.is_finite() || !pitch.is_finite() {
        return 0;
    }
    ((size + gap) / pitch).floor().max(0.0) as usize
}

/// Lattice for a `width × height` area, bounded by [`MAX_GRID_CELLS`].
pub fn grid_counts(width: f32, height: f32, cell: f32, gap: f32) -> GridCounts {
    GridCounts {
        cols: grid_count(width, cell, gap),
        rows: grid_count(height, cell, gap),
    }
    .capped(MAX_GRID_CELLS)
}

#[derive(Debug)]
pub struct ResizeAdapter {
    dpr_cap: f32,
    grid: Option<GridPitch>,
    last: Option<ResizeObservation>,
    seeded: bool,
}

impl Default for ResizeAdapter {
    fn default() -> Self {
        Self::new(MAX_DEVICE_PIXEL_RATIO)
    }
}

impl ResizeAdapter {
    pub fn new(dpr_cap: f32) -> Self {
        Self {
            dpr_cap,
            grid: None,
            last: None,
            seeded: false,
        }
    }

    pub fn set_grid(&mut self, grid: Option<GridPitch>) {
        if self.grid != grid {
            self.grid = grid;
            self.last = None;
        }
    }

    /// Forget the last observation so the next one is reported even if unchanged.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&ResizeObservation> {
        self.last.as_ref()
    }

    /// Returns `None` when the derived geometry equals the previous observation.
    pub fn observe(&mut self, metrics: HostMetrics) -> Option<ResizeObservation> {
        let rect = metrics.rect;
        let dpr = effective_dpr(metrics.dpr, self.dpr_cap);
        let css_width = if rect.width.is_finite() { rect.width.max(0.0) } else { 0.0 };
        let css_height = if rect.height.is_finite() { rect.height.max(0.0) } else { 0.0 };
        let size = SurfaceSize {
            css_width,
            css_height,
            width: (css_width * dpr).floor() as u32,
            height: (css_height * dpr).floor() as u32,
            dpr,
        };
        let grid = self
            .grid
            .map(|g| grid_counts(css_width, css_height, g.cell, g.gap));
        let mut observation = ResizeObservation {
            size,
            rect,
            grid,
            first: false,
        };
        if let Some(last) = &mut self.last {
            if last.same_geometry(&observation) {
                last.rect = rect;
                return None;
            }
        }
        if !self.seeded && observation.has_extent() {
            observation.first = true;
            self.seeded = true;
        }
        log::debug!(
            "[resize] {}x{} css -> {}x{} px @{:.2}",
            css_width,
            css_height,
            size.width,
            size.height,
            dpr
        );
        self.last = Some(observation);
        Some(observation)
    }
}
