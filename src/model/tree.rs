//! Flattened binary decision tree mapping a pixel block to a glyph index.
//!
//! Nodes use implicit heap indexing: node `i` has children `2i + 1` (test
//! failed) and `2i + 2` (test passed). Every comparison is a single
//! integer greater-than against one pixel of the block.

use super::error::FormatError;

/// Deepest tree a model may declare.
pub const MAX_TREE_DEPTH: usize = 24;

/// Flag byte marking a serialized node as an internal (splitting) node.
pub const SPLIT_FLAG: u8 = 1;

/// Size of one serialized node in bytes.
pub const NODE_BYTES: usize = 4;

/// One node of the decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode {
    /// Go right when `block[row * stride + col] > threshold`, left otherwise.
    Split { row: u8, col: u8, threshold: u8 },
    /// Terminal node selecting a glyph.
    Leaf { glyph: u8 },
}

impl TreeNode {
    /// Decode a node from its 4-byte `[flag, a, b, c]` form.
    ///
    /// Any flag other than [`SPLIT_FLAG`] is a leaf carrying its glyph in `a`.
    pub fn from_bytes(raw: [u8; NODE_BYTES]) -> Self {
        if raw[0] == SPLIT_FLAG {
            TreeNode::Split {
                row: raw[1],
                col: raw[2],
                threshold: raw[3],
            }
        } else {
            TreeNode::Leaf { glyph: raw[1] }
        }
    }

    /// Encode the node in its 4-byte serialized form.
    pub fn to_bytes(self) -> [u8; NODE_BYTES] {
        match self {
            TreeNode::Split {
                row,
                col,
                threshold,
            } => [SPLIT_FLAG, row, col, threshold],
            TreeNode::Leaf { glyph } => [0, glyph, 0, 0],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// A complete binary decision tree stored as a flat node array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTree {
    depth: usize,
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Number of nodes in a complete tree of the given depth.
    pub fn node_count(depth: usize) -> usize {
        (1usize << (depth + 1)) - 1
    }

    /// Build a tree from raw nodes without validating it.
    ///
    /// [`classify`](Self::classify) still bounds every step, so a malformed
    /// tree yields a [`FormatError`] rather than an out-of-bounds read.
    pub fn new(depth: usize, nodes: Vec<TreeNode>) -> Self {
        Self { depth, nodes }
    }

    /// A tree made of a single leaf that always selects `glyph`.
    pub fn leaf(glyph: u8) -> Self {
        Self::new(0, vec![TreeNode::Leaf { glyph }])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check every node a walk from the root can reach: each path ends at a
    /// leaf inside the tree and within `depth` levels, each test reads inside
    /// a `rows x cols` block, and each leaf selects a glyph below `glyphs`.
    ///
    /// Nodes below an early leaf are never visited and may hold anything.
    pub fn validate(&self, rows: usize, cols: usize, glyphs: usize) -> Result<(), FormatError> {
        if self.depth > MAX_TREE_DEPTH {
            return Err(FormatError::TreeDepth(self.depth as i32));
        }
        let len = self.nodes.len();
        if len == 0 {
            return Err(FormatError::ChildOutOfRange { node: 0, len });
        }

        let mut pending = vec![(0usize, 0usize)];
        while let Some((node, level)) = pending.pop() {
            match self.nodes[node] {
                TreeNode::Split { row, col, .. } => {
                    if 2 * node + 2 >= len {
                        return Err(FormatError::ChildOutOfRange { node, len });
                    }
                    if level >= self.depth {
                        return Err(FormatError::DepthExceeded {
                            max_depth: self.depth,
                        });
                    }
                    if row as usize >= rows || col as usize >= cols {
                        return Err(FormatError::OffsetOutOfBlock {
                            node,
                            row,
                            col,
                            rows,
                            cols,
                        });
                    }
                    pending.push((2 * node + 2, level + 1));
                    pending.push((2 * node + 1, level + 1));
                }
                TreeNode::Leaf { glyph } => {
                    if glyph as usize >= glyphs {
                        return Err(FormatError::GlyphOutOfRange {
                            node,
                            glyph,
                            glyphs,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk the tree for the block starting at `block[0]`, whose rows are
    /// `stride` bytes apart, and return the selected glyph index.
    pub fn classify(&self, block: &[u8], stride: usize) -> Result<u8, FormatError> {
        let max_depth = self.depth.min(MAX_TREE_DEPTH);
        let mut cur = 0usize;

        for _ in 0..=max_depth {
            let Some(node) = self.nodes.get(cur) else {
                return Err(FormatError::ChildOutOfRange {
                    node: cur.saturating_sub(1) / 2,
                    len: self.nodes.len(),
                });
            };
            match *node {
                TreeNode::Leaf { glyph } => return Ok(glyph),
                TreeNode::Split {
                    row,
                    col,
                    threshold,
                } => {
                    let pixel = block
                        .get(row as usize * stride + col as usize)
                        .copied()
                        .ok_or(FormatError::PixelOutOfRange { node: cur })?;
                    cur = if pixel > threshold {
                        2 * cur + 2
                    } else {
                        2 * cur + 1
                    };
                }
            }
        }

        Err(FormatError::DepthExceeded { max_depth })
    }
}
