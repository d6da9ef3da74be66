//! Diffusive relaxation field used by the grid distortion warp.
//!
//! Each cell holds a displacement in UV units. Every frame all cells relax
//! toward zero, then cells near a moving pointer are pushed along its
//! velocity with an inverse-distance falloff.

use crate::constants::{FIELD_GAIN, FIELD_MAX_POWER, FIELD_REFERENCE_FPS, MIN_DISTANCE};
use crate::damping::clamp_velocity;
use crate::resize::GridCounts;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Fraction of a cell's displacement kept per reference frame, in (0, 1).
    pub relaxation: f32,
    pub strength: f32,
    /// Influence radius as a fraction of the grid size.
    pub radius: f32,
    /// Clamp for pointer velocity in UV units per second.
    pub max_velocity: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            relaxation: 0.9,
            strength: 0.15,
            radius: 0.1,
            max_velocity: 4.0,
        }
    }
}

/// Pointer input for one field update: UV position (Y up) and UV velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPointer {
    pub uv: Vec2,
    pub velocity: Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct DistortionField {
    config: FieldConfig,
    counts: GridCounts,
    cells: Vec<Vec2>,
}

impl DistortionField {
    pub fn new(config: FieldConfig, counts: GridCounts) -> Self {
        let mut field = Self {
            config,
            counts: GridCounts::default(),
            cells: Vec::new(),
        };
        field.reallocate(counts);
        field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FieldConfig) {
        self.config = config;
    }

    pub fn counts(&self) -> GridCounts {
        self.counts
    }

    pub fn cells(&self) -> &[Vec2] {
        &self.cells
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Vec2> {
        if col >= self.counts.cols {
            return None;
        }
        self.cells.get(row * self.counts.cols + col).copied()
    }

    /// Discards the old buffer and starts from an undisturbed field.
    pub fn reallocate(&mut self, counts: GridCounts) {
        self.counts = counts;
        self.cells = vec![Vec2::ZERO; counts.len()];
    }

    /// Largest displacement magnitude currently in the field.
    pub fn peak(&self) -> f32 {
        self.cells.iter().map(|c| c.length()).fold(0.0, f32::max)
    }

    /// Relaxes every cell, then applies the pointer disturbance if any.
    pub fn step(&mut self, dt: f32, pointer: Option<FieldPointer>) {
        if !(dt > 0.0) || !dt.is_finite() || self.cells.is_empty() {
            return;
        }
        let relaxation = self.config.relaxation.clamp(0.0, 0.999_999);
        let keep = relaxation.powf(dt * FIELD_REFERENCE_FPS);
        for c in &mut self.cells {
            *c *= keep;
        }

        let Some(pointer) = pointer else {
            return;
        };
        if !pointer.uv.is_finite() {
            return;
        }
        let velocity = clamp_velocity(pointer.velocity, self.config.max_velocity);
        if velocity == Vec2::ZERO {
            return;
        }
        let cols = self.counts.cols;
        let rows = self.counts.rows;
        let size = cols.max(rows) as f32;
        let max_dist = (size * self.config.radius).max(MIN_DISTANCE);
        let max_dist_sq = max_dist * max_dist;
        // cell (col, row) is centred at uv ((col + 0.5) / cols, 1 - (row + 0.5) / rows);
        // rows are stored top-down while UV Y points up
        let grid_x = pointer.uv.x * cols as f32 - 0.5;
        let grid_y = (1.0 - pointer.uv.y) * rows as f32 - 0.5;
        let push = velocity * (self.config.strength * FIELD_GAIN * dt);

        for row in 0..rows {
            for col in 0..cols {
                let dx = grid_x - col as f32;
                let dy = grid_y - row as f32;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq >= max_dist_sq {
                    continue;
                }
                let power =
                    (max_dist / dist_sq.sqrt().max(MIN_DISTANCE)).clamp(0.0, FIELD_MAX_POWER);
                let cell = &mut self.cells[row * cols + col];
                *cell += push * power;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_at_cell_centre_stays_finite() {
        let counts = GridCounts { cols: 10, rows: 10 };
        let mut field = DistortionField::new(FieldConfig::default(), counts);
        field.step(
            1.0 / 60.0,
            Some(FieldPointer {
                uv: Vec2::new(0.45, 0.55),
                velocity: Vec2::new(1.0, 0.0),
            }),
        );
        assert!(field.cells().iter().all(|c| c.is_finite()));
        assert!(field.peak() > 0.0);
    }

    #[test]
    fn runaway_velocity_is_clamped() {
        let cfg = FieldConfig::default();
        let mut a = DistortionField::new(cfg, GridCounts { cols: 4, rows: 4 });
        let mut b = DistortionField::new(cfg, GridCounts { cols: 4, rows: 4 });
        let pointer = |v: f32| {
            Some(FieldPointer {
                uv: Vec2::new(0.375, 0.625),
                velocity: Vec2::new(v, 0.0),
            })
        };
        a.step(0.016, pointer(cfg.max_velocity));
        b.step(0.016, pointer(1.0e6));
        assert!(a.peak() > 0.0);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn pointer_over_a_cell_centre_moves_that_cell() {
        // radius 0.1 of a 5-wide grid reaches half a cell
        let counts = GridCounts { cols: 5, rows: 4 };
        let mut field = DistortionField::new(FieldConfig::default(), counts);
        // centre of column 2, row 1 (rows counted from the top)
        field.step(
            1.0 / 60.0,
            Some(FieldPointer {
                uv: Vec2::new(0.5, 0.625),
                velocity: Vec2::new(1.0, 0.0),
            }),
        );
        for (i, cell) in field.cells().iter().enumerate() {
            if i == 5 + 2 {
                assert!(cell.x > 0.0);
            } else {
                assert_eq!(*cell, Vec2::ZERO, "cell {i} moved");
            }
        }
    }
}
