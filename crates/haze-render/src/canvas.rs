//! Character-cell rasterizer for previewing the effect in a terminal

use haze_core::{Color, Viewport};
use haze_particles::curves::lerp_f32;
use haze_particles::Surface;

/// Dark to bright
pub const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A `cols`x`rows` grid of brightness values covering the viewport.
///
/// Each cell holds the source-over composite of everything drawn on it,
/// reduced to luminance. Cells are not square; their pixel size is simply
/// the viewport divided by the grid.
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    viewport: Viewport,
    cols: usize,
    rows: usize,
    cells: Vec<f32>,
}

impl AsciiCanvas {
    pub fn new(viewport: Viewport, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            viewport,
            cols,
            rows,
            cells: vec![0.0; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Brightness of one cell in [0, 1]
    pub fn cell(&self, col: usize, row: usize) -> f32 {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col]
        } else {
            0.0
        }
    }

    /// Mean brightness of the whole grid
    pub fn coverage(&self) -> f32 {
        self.cells.iter().sum::<f32>() / self.cells.len() as f32
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols) {
            for &v in row {
                let idx = (v.clamp(0.0, 1.0) * (RAMP.len() - 1) as f32).round() as usize;
                out.push(RAMP[idx.min(RAMP.len() - 1)]);
            }
            out.push('\n');
        }
        out
    }

    fn cell_size(&self) -> (f32, f32) {
        (
            self.viewport.width / self.cols as f32,
            self.viewport.height / self.rows as f32,
        )
    }

    fn blend(&mut self, col: usize, row: usize, color: Color, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let src = color.with_alpha(1.0).luminance();
        let dst = &mut self.cells[row * self.cols + col];
        *dst = src * alpha + *dst * (1.0 - alpha);
    }

    /// Column/row range of cells touched by the pixel span `[lo, hi]`
    fn span(lo: f32, hi: f32, cell: f32, count: usize) -> Option<(usize, usize)> {
        if !(cell > 0.0) || hi < 0.0 {
            return None;
        }
        let first = (lo.max(0.0) / cell).floor() as usize;
        let last = ((hi / cell).floor() as usize).min(count - 1);
        (first <= last).then_some((first, last))
    }
}

impl Surface for AsciiCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The grid keeps its dimensions; only the pixel-to-cell mapping changes.
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.clear();
    }

    fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        let (cw, ch) = self.cell_size();
        let Some((c0, c1)) = Self::span(x - radius, x + radius, cw, self.cols) else {
            return;
        };
        let Some((r0, r1)) = Self::span(y - radius, y + radius, ch, self.rows) else {
            return;
        };

        // Dots are usually smaller than a cell: the cell holding the center
        // gets the dot's share of its area, cells fully reached get it all.
        let partial = (std::f32::consts::PI * radius * radius / (cw * ch)).min(1.0);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let cx = (col as f32 + 0.5) * cw;
                let cy = (row as f32 + 0.5) * ch;
                let inside = (cx - x).powi(2) + (cy - y).powi(2) <= radius * radius;
                let holds_center = (x / cw).floor() as i64 == col as i64
                    && (y / ch).floor() as i64 == row as i64;
                let weight = if inside {
                    1.0
                } else if holds_center {
                    partial
                } else {
                    continue;
                };
                self.blend(col, row, color, color.a * weight);
            }
        }
    }

    fn fill_vertical_gradient(
        &mut self,
        top: f32,
        bottom: f32,
        color: Color,
        top_alpha: f32,
        bottom_alpha: f32,
    ) {
        let (_, ch) = self.cell_size();
        let band = bottom - top;
        if !(band > 0.0) {
            return;
        }
        for row in 0..self.rows {
            let cy = (row as f32 + 0.5) * ch;
            if cy < top || cy >= bottom {
                continue;
            }
            let alpha = lerp_f32(top_alpha, bottom_alpha, (cy - top) / band);
            for col in 0..self.cols {
                self.blend(col, row, color, alpha);
            }
        }
    }
}
