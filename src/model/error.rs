//! Errors raised while decoding or walking a model.

/// A model blob or decision tree that cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("model blob truncated: need {needed} bytes for the {section}, have {available}")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("invalid glyph count {0} (expected 1..=95)")]
    GlyphCount(i32),

    #[error("invalid block size {rows}x{cols}")]
    BlockSize { rows: i32, cols: i32 },

    #[error("invalid tree depth {0}")]
    TreeDepth(i32),

    #[error("tree node {node} has children outside the {len}-node tree")]
    ChildOutOfRange { node: usize, len: usize },

    #[error("tree node {node} tests pixel ({row}, {col}) outside the {rows}x{cols} block")]
    OffsetOutOfBlock {
        node: usize,
        row: u8,
        col: u8,
        rows: usize,
        cols: usize,
    },

    #[error("tree leaf {node} selects glyph {glyph} but the model has {glyphs}")]
    GlyphOutOfRange {
        node: usize,
        glyph: u8,
        glyphs: usize,
    },

    #[error("tree traversal exceeded {max_depth} levels")]
    DepthExceeded { max_depth: usize },

    #[error("tree node {node} reads past the end of the pixel block")]
    PixelOutOfRange { node: usize },
}
