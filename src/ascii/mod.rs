//! Glyph character tables and block-grid arithmetic.
//!
//! Every model's glyph table is index-aligned with [`GLYPH_CHARS`], the 95
//! printable ASCII characters from space to tilde.

mod charset;
mod dimensions;

pub use charset::{glyph_char, glyph_index, GLYPH_CHARS, STANDARD_CHARSET};
pub use dimensions::{block_grid, crop_to_blocks, text_buffer_size};
