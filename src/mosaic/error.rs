//! Errors raised by a render call.
//!
//! All of them end the current call only; the context stays usable.

use crate::model::FormatError;

/// Reasons a render call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("model format error: {0}")]
    Format(#[from] FormatError),

    #[error("image has {blocks} blocks but the index matrix holds at most {capacity}")]
    Capacity { blocks: usize, capacity: usize },

    #[error("text buffer holds {provided} bytes but {required} are required")]
    TextBufferTooSmall { required: usize, provided: usize },

    #[error("pixel buffer holds {provided} bytes but a {width}x{height} image needs {required}")]
    PixelBufferTooSmall {
        width: usize,
        height: usize,
        required: usize,
        provided: usize,
    },

    #[error("equalization tile grid {tiles_y}x{tiles_x} is outside 1..=16")]
    InvalidTileGrid { tiles_y: usize, tiles_x: usize },

    #[error("block classified as glyph {index} but the model has {glyphs}")]
    MissingGlyph { index: usize, glyphs: usize },
}
