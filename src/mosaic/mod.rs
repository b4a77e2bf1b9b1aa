//! Image-to-mosaic pipeline.
//!
//! 1. **Equalization** - optional tiled CLAHE over the whole image
//! 2. **Block indexing** - classify each whole block with the model's tree
//! 3. **Substitution** - overwrite blocks with glyph bitmaps, emit text

mod clahe;
mod error;
mod index;
mod render;

pub use clahe::{
    tile_lut, Equalizer, Lut, TileGrid, BINS, DEFAULT_CLIP_LIMIT, DEFAULT_TILES, MAX_TILES,
};
pub use error::RenderError;
pub use index::{compute_index_matrix, IndexMatrix};
pub use render::{RenderContext, RenderOptions, Rendered};
