//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The image is split into a grid of tiles. Each tile gets a 256-entry
//! remap table built from its clipped histogram, anchored at the tile
//! center. Output pixels blend the tables of the nearest tile centers:
//! directly in the corners, linearly along the borders and bilinearly in
//! the interior, all with truncating integer division.

use super::error::RenderError;

/// Histogram bins, one per 8-bit intensity.
pub const BINS: usize = 256;

/// Largest tile grid on either axis.
pub const MAX_TILES: usize = 16;

/// Default tiles per axis.
pub const DEFAULT_TILES: usize = 8;

/// Default clip limit, in units of the uniform bin mass `1/256`.
pub const DEFAULT_CLIP_LIMIT: u8 = 3;

/// Intensity remap table.
pub type Lut = [u8; BINS];

/// CLAHE parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equalizer {
    tiles_y: usize,
    tiles_x: usize,
    clip_limit: u8,
}

impl Default for Equalizer {
    fn default() -> Self {
        Self {
            tiles_y: DEFAULT_TILES,
            tiles_x: DEFAULT_TILES,
            clip_limit: DEFAULT_CLIP_LIMIT,
        }
    }
}

impl Equalizer {
    /// Create an equalizer with a `tiles_y x tiles_x` grid.
    ///
    /// Both axes must be in `1..=16`.
    pub fn new(tiles_y: usize, tiles_x: usize, clip_limit: u8) -> Result<Self, RenderError> {
        let valid = 1..=MAX_TILES;
        if !valid.contains(&tiles_y) || !valid.contains(&tiles_x) {
            return Err(RenderError::InvalidTileGrid { tiles_y, tiles_x });
        }
        Ok(Self {
            tiles_y,
            tiles_x,
            clip_limit,
        })
    }

    /// Tile grid as `(tiles_y, tiles_x)`.
    pub fn tiles(&self) -> (usize, usize) {
        (self.tiles_y, self.tiles_x)
    }

    pub fn clip_limit(&self) -> u8 {
        self.clip_limit
    }

    /// Build the per-tile remap tables for a `width x height` image.
    pub fn tile_grid(&self, pixels: &[u8], width: usize, height: usize) -> TileGrid {
        let rows = tile_bounds(height, self.tiles_y);
        let cols = tile_bounds(width, self.tiles_x);

        let mut luts = Vec::with_capacity(rows.len() * cols.len());
        for &(i0, i1) in &rows {
            for &(j0, j1) in &cols {
                luts.push(tile_lut(pixels, width, (i0, j0), (i1, j1), self.clip_limit));
            }
        }

        TileGrid {
            tiles_x: cols.len(),
            luts,
            row_centers: rows.iter().map(|&(a, b)| (a + b) / 2).collect(),
            col_centers: cols.iter().map(|&(a, b)| (a + b) / 2).collect(),
        }
    }

    /// Equalize a `width x height` image in place.
    ///
    /// Every table is built from the untouched input before any pixel is
    /// rewritten. Empty images are left alone; a buffer shorter than
    /// `width * height` is rejected without touching it.
    pub fn apply(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
    ) -> Result<(), RenderError> {
        let required = width.saturating_mul(height);
        if pixels.len() < required {
            return Err(RenderError::PixelBufferTooSmall {
                width,
                height,
                required,
                provided: pixels.len(),
            });
        }
        if required == 0 {
            return Ok(());
        }

        let grid = self.tile_grid(pixels, width, height);
        let col_spans: Vec<Span> = (0..width).map(|j| span(&grid.col_centers, j)).collect();

        for (i, row) in pixels.chunks_exact_mut(width).take(height).enumerate() {
            let row_span = span(&grid.row_centers, i);
            for (j, pixel) in row.iter_mut().enumerate() {
                *pixel = grid.blend(row_span, col_spans[j], i, j, *pixel);
            }
        }
        Ok(())
    }
}

/// Inclusive `(start, end)` bounds of each tile along one axis.
///
/// Neighbouring tiles share their boundary line.
fn tile_bounds(len: usize, tiles: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }
    (0..tiles)
        .map(|t| {
            let start = t * len / tiles;
            let end = ((t + 1) * len / tiles).min(len - 1);
            (start, end)
        })
        .collect()
}

/// Remap table for the inclusive tile `top_left..=bottom_right`.
///
/// Bins above `clip_limit / 256` are capped in one pass over the bins, and
/// each cap immediately spreads its excess evenly over all 256 bins. The
/// pass is not repeated until no bin exceeds the limit.
pub fn tile_lut(
    pixels: &[u8],
    stride: usize,
    top_left: (usize, usize),
    bottom_right: (usize, usize),
    clip_limit: u8,
) -> Lut {
    let (i0, j0) = top_left;
    let (i1, j1) = bottom_right;
    let area = ((i1 - i0 + 1) * (j1 - j0 + 1)) as f64;

    // Accumulated per pixel so rounding matches the trained preprocessing
    let mut hist = [0.0f64; BINS];
    for i in i0..=i1 {
        for &value in &pixels[i * stride + j0..=i * stride + j1] {
            hist[value as usize] += 1.0 / area;
        }
    }

    let limit = clip_limit as f64 / BINS as f64;
    for k in 0..BINS {
        if hist[k] >= limit {
            let excess = hist[k] - limit;
            hist[k] = limit;
            for bin in hist.iter_mut() {
                *bin += excess / BINS as f64;
            }
        }
    }

    let mut lut = [0u8; BINS];
    let mut cumulative = 0.0f64;
    for (entry, mass) in lut.iter_mut().zip(hist) {
        cumulative += mass;
        *entry = ((BINS - 1) as f64 * cumulative) as u8;
    }
    lut
}

/// Position of a coordinate relative to the tile centers on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    /// Before the first or at/after the last center: use that tile only.
    Clamp(usize),
    /// `centers[k] <= x < centers[k + 1]`.
    Between(usize),
}

fn span(centers: &[usize], x: usize) -> Span {
    let passed = centers.partition_point(|&c| c <= x);
    if passed == 0 {
        Span::Clamp(0)
    } else if passed == centers.len() {
        Span::Clamp(centers.len() - 1)
    } else {
        Span::Between(passed - 1)
    }
}

/// Per-tile remap tables with their anchor points.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles_x: usize,
    luts: Vec<Lut>,
    row_centers: Vec<usize>,
    col_centers: Vec<usize>,
}

impl TileGrid {
    /// Table of tile `(ty, tx)`.
    pub fn lut(&self, ty: usize, tx: usize) -> &Lut {
        &self.luts[ty * self.tiles_x + tx]
    }

    pub fn row_centers(&self) -> &[usize] {
        &self.row_centers
    }

    pub fn col_centers(&self) -> &[usize] {
        &self.col_centers
    }

    /// Equalized value of intensity `value` at pixel `(i, j)`.
    pub fn map(&self, i: usize, j: usize, value: u8) -> u8 {
        self.blend(
            span(&self.row_centers, i),
            span(&self.col_centers, j),
            i,
            j,
            value,
        )
    }

    fn blend(&self, rows: Span, cols: Span, i: usize, j: usize, value: u8) -> u8 {
        let v = value as usize;
        let at = |ty: usize, tx: usize| self.lut(ty, tx)[v] as usize;
        let (ic, jc) = (&self.row_centers, &self.col_centers);

        let mapped = match (rows, cols) {
            (Span::Clamp(ty), Span::Clamp(tx)) => at(ty, tx),
            (Span::Between(k), Span::Clamp(tx)) => {
                let (top, bottom) = (ic[k], ic[k + 1]);
                ((bottom - i) * at(k, tx) + (i - top) * at(k + 1, tx)) / (bottom - top)
            }
            (Span::Clamp(ty), Span::Between(l)) => {
                let (left, right) = (jc[l], jc[l + 1]);
                ((right - j) * at(ty, l) + (j - left) * at(ty, l + 1)) / (right - left)
            }
            (Span::Between(k), Span::Between(l)) => {
                let (top, bottom) = (ic[k], ic[k + 1]);
                let (left, right) = (jc[l], jc[l + 1]);
                ((bottom - i) * (right - j) * at(k, l)
                    + (bottom - i) * (j - left) * at(k, l + 1)
                    + (i - top) * (right - j) * at(k + 1, l)
                    + (i - top) * (j - left) * at(k + 1, l + 1))
                    / ((bottom - top) * (right - left))
            }
        };
        mapped as u8
    }
}
