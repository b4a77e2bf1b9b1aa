//! Model blob parsing.
//!
//! Layout (native-endian `i32` integers):
//!
//! ```text
//! N | block_rows | block_cols | N * (block_rows * block_cols) bitmap bytes | tree
//! tree = depth | (2^(depth+1) - 1) * [flag, a, b, c]
//! ```
//!
//! Glyph bitmaps are borrowed straight from the blob, so the blob must
//! outlive the [`Model`].

use sha2::{Digest, Sha256};

use super::error::FormatError;
use super::tree::{DecisionTree, TreeNode, MAX_TREE_DEPTH, NODE_BYTES};
use crate::ascii::GLYPH_CHARS;

/// Size of one serialized integer.
pub const INT_BYTES: usize = std::mem::size_of::<i32>();

/// Size of the `N | rows | cols` header.
pub const HEADER_BYTES: usize = 3 * INT_BYTES;

/// A parsed model: glyph bitmaps plus the optional decision tree.
#[derive(Debug, Clone)]
pub struct Model<'a> {
    block_rows: usize,
    block_cols: usize,
    glyphs: Vec<&'a [u8]>,
    tree: Option<DecisionTree>,
}

impl<'a> Model<'a> {
    /// Parse a serialized model, borrowing glyph bitmaps from `blob`.
    pub fn parse(blob: &'a [u8]) -> Result<Self, FormatError> {
        parse(blob)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn block_rows(&self) -> usize {
        self.block_rows
    }

    pub fn block_cols(&self) -> usize {
        self.block_cols
    }

    /// Bitmap of glyph `index`, `block_rows * block_cols` bytes in row-major order.
    pub fn glyph(&self, index: usize) -> Option<&'a [u8]> {
        self.glyphs.get(index).copied()
    }

    pub fn glyphs(&self) -> &[&'a [u8]] {
        &self.glyphs
    }

    /// The decision tree, or `None` when the blob carries no tree.
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }
}

fn read_i32(blob: &[u8], offset: usize, section: &'static str) -> Result<i32, FormatError> {
    blob.get(offset..offset + INT_BYTES)
        .and_then(|bytes| bytes.try_into().ok())
        .map(i32::from_ne_bytes)
        .ok_or(FormatError::Truncated {
            section,
            needed: offset + INT_BYTES,
            available: blob.len(),
        })
}

/// Parse a serialized model blob.
///
/// Every size the header declares is checked against the blob before any
/// region is reinterpreted; a blob that ends right after the bitmaps has no
/// tree.
pub fn parse(blob: &[u8]) -> Result<Model<'_>, FormatError> {
    let n = read_i32(blob, 0, "header")?;
    let rows = read_i32(blob, INT_BYTES, "header")?;
    let cols = read_i32(blob, 2 * INT_BYTES, "header")?;

    if n < 1 || n as usize > GLYPH_CHARS.len() {
        return Err(FormatError::GlyphCount(n));
    }
    if rows < 1 || cols < 1 {
        return Err(FormatError::BlockSize { rows, cols });
    }

    let glyph_count = n as usize;
    let (block_rows, block_cols) = (rows as usize, cols as usize);
    let glyph_bytes = block_rows
        .checked_mul(block_cols)
        .ok_or(FormatError::BlockSize { rows, cols })?;
    let bitmaps_end = glyph_bytes
        .checked_mul(glyph_count)
        .and_then(|bytes| bytes.checked_add(HEADER_BYTES))
        .ok_or(FormatError::BlockSize { rows, cols })?;

    if blob.len() < bitmaps_end {
        return Err(FormatError::Truncated {
            section: "glyph bitmaps",
            needed: bitmaps_end,
            available: blob.len(),
        });
    }

    let glyphs: Vec<&[u8]> = blob[HEADER_BYTES..bitmaps_end]
        .chunks_exact(glyph_bytes)
        .collect();

    let tree = parse_tree(&blob[bitmaps_end..], bitmaps_end)?;
    if let Some(tree) = &tree {
        tree.validate(block_rows, block_cols, glyph_count)?;
    }

    log::debug!(
        "Parsed model: {} glyphs, {}x{} blocks, tree depth {:?}",
        glyph_count,
        block_rows,
        block_cols,
        tree.as_ref().map(DecisionTree::depth)
    );

    Ok(Model {
        block_rows,
        block_cols,
        glyphs,
        tree,
    })
}

/// Decode the tree region; `base` is its offset inside the blob, for error reports.
fn parse_tree(region: &[u8], base: usize) -> Result<Option<DecisionTree>, FormatError> {
    if region.is_empty() {
        log::debug!("Model blob has no decision tree; every block maps to glyph 0");
        return Ok(None);
    }

    let depth = read_i32(region, 0, "tree depth").map_err(|e| rebase(e, base))?;
    if depth < 0 || depth as usize > MAX_TREE_DEPTH {
        return Err(FormatError::TreeDepth(depth));
    }

    let depth = depth as usize;
    let count = DecisionTree::node_count(depth);
    let needed = INT_BYTES + count * NODE_BYTES;
    if region.len() < needed {
        return Err(FormatError::Truncated {
            section: "decision tree",
            needed: base + needed,
            available: base + region.len(),
        });
    }
    if region.len() > needed {
        log::warn!(
            "Ignoring {} trailing bytes after the decision tree",
            region.len() - needed
        );
    }

    let nodes = region[INT_BYTES..needed]
        .chunks_exact(NODE_BYTES)
        .map(|raw| TreeNode::from_bytes([raw[0], raw[1], raw[2], raw[3]]))
        .collect();

    Ok(Some(DecisionTree::new(depth, nodes)))
}

fn rebase(err: FormatError, base: usize) -> FormatError {
    match err {
        FormatError::Truncated {
            section,
            needed,
            available,
        } => FormatError::Truncated {
            section,
            needed: base + needed,
            available: base + available,
        },
        other => other,
    }
}

/// SHA-256 of the raw blob, hex encoded.
///
/// Identifies which model produced a rendering.
pub fn fingerprint(blob: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(blob);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    fn header(n: i32, rows: i32, cols: i32) -> Vec<u8> {
        let mut blob = Vec::new();
        for v in [n, rows, cols] {
            blob.extend_from_slice(&v.to_ne_bytes());
        }
        blob
    }

    #[test]
    fn test_parse_without_tree() {
        let mut blob = header(2, 2, 3);
        blob.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        blob.extend_from_slice(&[7, 8, 9, 10, 11, 12]);

        let model = parse(&blob).unwrap();
        assert_eq!(model.glyph_count(), 2);
        assert_eq!(model.block_rows(), 2);
        assert_eq!(model.block_cols(), 3);
        assert_eq!(model.glyph(1), Some(&[7u8, 8, 9, 10, 11, 12][..]));
        assert!(model.glyph(2).is_none());
        assert!(model.tree().is_none());
    }

    #[test]
    fn test_glyphs_borrow_from_blob() {
        let mut blob = header(1, 1, 2);
        blob.extend_from_slice(&[40, 41]);
        let model = parse(&blob).unwrap();
        let glyph = model.glyph(0).unwrap();
        assert_eq!(glyph.as_ptr(), blob[HEADER_BYTES..].as_ptr());
    }

    #[test]
    fn test_short_header_rejected() {
        let blob = header(1, 1, 1);
        assert!(matches!(
            parse(&blob[..7]),
            Err(FormatError::Truncated {
                section: "header",
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_bitmaps_rejected() {
        let mut blob = header(3, 4, 4);
        blob.extend_from_slice(&[0u8; 40]);
        assert_eq!(
            parse(&blob).unwrap_err(),
            FormatError::Truncated {
                section: "glyph bitmaps",
                needed: HEADER_BYTES + 48,
                available: HEADER_BYTES + 40,
            }
        );
    }

    #[test]
    fn test_bad_header_values_rejected() {
        assert_eq!(parse(&header(0, 1, 1)).unwrap_err(), FormatError::GlyphCount(0));
        assert_eq!(parse(&header(96, 1, 1)).unwrap_err(), FormatError::GlyphCount(96));
        assert_eq!(
            parse(&header(1, -2, 1)).unwrap_err(),
            FormatError::BlockSize { rows: -2, cols: 1 }
        );
        assert_eq!(
            parse(&header(1, 1, 0)).unwrap_err(),
            FormatError::BlockSize { rows: 1, cols: 0 }
        );
    }

    #[test]
    fn test_truncated_tree_rejected() {
        let mut blob = ModelBuilder::new(1, 1)
            .glyph(vec![0])
            .glyph(vec![255])
            .tree(DecisionTree::new(
                1,
                vec![
                    TreeNode::Split {
                        row: 0,
                        col: 0,
                        threshold: 127,
                    },
                    TreeNode::Leaf { glyph: 0 },
                    TreeNode::Leaf { glyph: 1 },
                ],
            ))
            .build();
        assert!(parse(&blob).is_ok());

        blob.truncate(blob.len() - 1);
        assert!(matches!(
            parse(&blob),
            Err(FormatError::Truncated {
                section: "decision tree",
                ..
            })
        ));

        // Only part of the depth integer left
        let partial = &blob[..HEADER_BYTES + 2 + 2];
        assert!(matches!(
            parse(partial),
            Err(FormatError::Truncated {
                section: "tree depth",
                ..
            })
        ));
    }

    #[test]
    fn test_tree_depth_bounds() {
        let mut blob = header(1, 1, 1);
        blob.push(0);
        blob.extend_from_slice(&(-1i32).to_ne_bytes());
        assert_eq!(parse(&blob).unwrap_err(), FormatError::TreeDepth(-1));

        let mut blob = header(1, 1, 1);
        blob.push(0);
        blob.extend_from_slice(&(MAX_TREE_DEPTH as i32 + 1).to_ne_bytes());
        assert_eq!(
            parse(&blob).unwrap_err(),
            FormatError::TreeDepth(MAX_TREE_DEPTH as i32 + 1)
        );
    }

    #[test]
    fn test_leaf_glyph_out_of_range_rejected() {
        let blob = ModelBuilder::new(1, 1)
            .glyph(vec![0])
            .tree(DecisionTree::leaf(4))
            .build();
        assert!(matches!(
            parse(&blob),
            Err(FormatError::GlyphOutOfRange { glyph: 4, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_tolerated() {
        let mut blob = ModelBuilder::new(1, 1)
            .glyph(vec![0])
            .tree(DecisionTree::leaf(0))
            .build();
        blob.extend_from_slice(&[0xAA; 3]);
        let model = parse(&blob).unwrap();
        assert_eq!(model.tree().map(DecisionTree::len), Some(1));
    }

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = fingerprint(b"model");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, fingerprint(b"model"));
        assert_ne!(a, fingerprint(b"model2"));
    }
}
