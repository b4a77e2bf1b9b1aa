//! Serializer producing model blobs in the layout [`parse`](super::parse) reads.

use super::tree::DecisionTree;

/// Builds a model blob glyph by glyph.
///
/// The builder does not validate; feed its output to [`parse`](super::parse)
/// to check it.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    block_rows: usize,
    block_cols: usize,
    glyphs: Vec<Vec<u8>>,
    tree: Option<DecisionTree>,
}

impl ModelBuilder {
    pub fn new(block_rows: usize, block_cols: usize) -> Self {
        Self {
            block_rows,
            block_cols,
            glyphs: Vec::new(),
            tree: None,
        }
    }

    /// Append a glyph bitmap. Short bitmaps are zero-padded and long ones
    /// truncated to `block_rows * block_cols` bytes.
    pub fn glyph(mut self, mut bitmap: Vec<u8>) -> Self {
        bitmap.resize(self.block_rows * self.block_cols, 0);
        self.glyphs.push(bitmap);
        self
    }

    /// Append a glyph whose every pixel is `value`.
    pub fn flat_glyph(self, value: u8) -> Self {
        let len = self.block_rows * self.block_cols;
        self.glyph(vec![value; len])
    }

    pub fn tree(mut self, tree: DecisionTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Serialize the header, bitmaps and tree.
    pub fn build(&self) -> Vec<u8> {
        let mut blob = Vec::new();
        for value in [self.glyphs.len(), self.block_rows, self.block_cols] {
            blob.extend_from_slice(&(value as i32).to_ne_bytes());
        }
        for bitmap in &self.glyphs {
            blob.extend_from_slice(bitmap);
        }
        if let Some(tree) = &self.tree {
            blob.extend_from_slice(&(tree.depth() as i32).to_ne_bytes());
            for node in tree.nodes() {
                blob.extend_from_slice(&node.to_bytes());
            }
        }
        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parse, TreeNode, HEADER_BYTES};

    #[test]
    fn test_build_layout() {
        let blob = ModelBuilder::new(2, 2)
            .glyph(vec![1, 2, 3, 4])
            .tree(DecisionTree::leaf(0))
            .build();

        assert_eq!(&blob[..4], &1i32.to_ne_bytes());
        assert_eq!(&blob[4..8], &2i32.to_ne_bytes());
        assert_eq!(&blob[8..12], &2i32.to_ne_bytes());
        assert_eq!(&blob[HEADER_BYTES..HEADER_BYTES + 4], &[1, 2, 3, 4]);
        assert_eq!(&blob[16..20], &0i32.to_ne_bytes());
        assert_eq!(&blob[20..], &TreeNode::Leaf { glyph: 0 }.to_bytes());
    }

    #[test]
    fn test_glyph_padding() {
        let blob = ModelBuilder::new(2, 2).glyph(vec![9]).build();
        let model = parse(&blob).unwrap();
        assert_eq!(model.glyph(0), Some(&[9u8, 0, 0, 0][..]));
    }
}
