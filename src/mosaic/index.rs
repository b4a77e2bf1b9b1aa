//! Block-indexing scan: one glyph index per block of the cropped image.

use serde::Serialize;

use crate::ascii::{block_grid, crop_to_blocks};
use crate::model::{FormatError, Model};

/// Glyph indices for every block, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexMatrix {
    rows: usize,
    cols: usize,
    indices: Vec<u8>,
}

impl IndexMatrix {
    /// Number of block rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of block columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if col >= self.cols {
            return None;
        }
        self.indices.get(row * self.cols + col).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.indices
    }

    /// Iterate block rows.
    pub fn block_rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks() rejects a zero size; an empty matrix yields no rows either way
        self.indices.chunks(self.cols.max(1))
    }
}

/// Classify every whole block of a `width x height` image.
///
/// The image is cropped to block-size multiples first; trailing partial
/// rows and columns are skipped. Without a tree every block maps to glyph 0.
pub fn compute_index_matrix(
    model: &Model<'_>,
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<IndexMatrix, FormatError> {
    let (block_rows, block_cols) = (model.block_rows(), model.block_cols());
    let (cropped_width, cropped_height) = crop_to_blocks(width, height, block_rows, block_cols);
    let (rows, cols) = block_grid(width, height, block_rows, block_cols);

    let mut indices = Vec::with_capacity(rows * cols);
    for r in (0..cropped_height).step_by(block_rows) {
        for c in (0..cropped_width).step_by(block_cols) {
            let index = match model.tree() {
                Some(tree) => {
                    let block = pixels.get(r * width + c..).unwrap_or(&[]);
                    tree.classify(block, width)?
                }
                None => 0,
            };
            indices.push(index);
        }
    }

    Ok(IndexMatrix {
        rows,
        cols,
        indices,
    })
}
