//! Procedurally generated default model.
//!
//! Bins each block's center pixel into 16 intensity buckets with a depth-4
//! tree and maps the buckets onto the standard density ramp. Ramp glyphs
//! are flat fills of their level; the other printable glyphs are blank and
//! never selected.

use std::sync::OnceLock;

use super::blob::Model;
use super::builder::ModelBuilder;
use super::error::FormatError;
use super::tree::{DecisionTree, TreeNode};
use crate::ascii::{glyph_index, GLYPH_CHARS, STANDARD_CHARSET};

/// Block height of the built-in model, in pixels.
pub const BUILTIN_BLOCK_ROWS: usize = 12;

/// Block width of the built-in model, in pixels.
pub const BUILTIN_BLOCK_COLS: usize = 6;

const BUILTIN_DEPTH: usize = 4;
const BUCKETS: usize = 1 << BUILTIN_DEPTH;

static BUILTIN_BLOB: OnceLock<Vec<u8>> = OnceLock::new();

/// Serialized built-in model, generated on first use.
pub fn builtin_blob() -> &'static [u8] {
    BUILTIN_BLOB.get_or_init(build_blob)
}

/// Parse the built-in model.
pub fn builtin() -> Result<Model<'static>, FormatError> {
    Model::parse(builtin_blob())
}

fn ramp_glyph(level: usize) -> u8 {
    glyph_index(STANDARD_CHARSET[level]).unwrap_or(0) as u8
}

fn build_blob() -> Vec<u8> {
    let ramp_len = STANDARD_CHARSET.len();

    let mut fills = vec![0u8; GLYPH_CHARS.len()];
    for level in 0..ramp_len {
        fills[ramp_glyph(level) as usize] = (level * 255 / (ramp_len - 1)) as u8;
    }

    let center_row = (BUILTIN_BLOCK_ROWS / 2) as u8;
    let center_col = (BUILTIN_BLOCK_COLS / 2) as u8;
    let nodes = (0..DecisionTree::node_count(BUILTIN_DEPTH))
        .map(|idx| {
            let level = (idx + 1).ilog2() as usize;
            let pos = idx + 1 - (1 << level);
            if level == BUILTIN_DEPTH {
                TreeNode::Leaf {
                    glyph: ramp_glyph(pos * ramp_len / BUCKETS),
                }
            } else {
                // Split the node's bucket range at its midpoint
                let span = BUCKETS >> level;
                let mid = pos * span + span / 2;
                TreeNode::Split {
                    row: center_row,
                    col: center_col,
                    threshold: (mid * (256 / BUCKETS) - 1) as u8,
                }
            }
        })
        .collect();

    fills
        .into_iter()
        .fold(
            ModelBuilder::new(BUILTIN_BLOCK_ROWS, BUILTIN_BLOCK_COLS),
            ModelBuilder::flat_glyph,
        )
        .tree(DecisionTree::new(BUILTIN_DEPTH, nodes))
        .build()
}
