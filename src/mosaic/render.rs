//! Render context: optional equalization, block indexing and glyph substitution.

use std::time::Instant;

use serde::Serialize;

use super::clahe::{Equalizer, DEFAULT_CLIP_LIMIT, DEFAULT_TILES};
use super::error::RenderError;
use super::index::{compute_index_matrix, IndexMatrix};
use crate::ascii::{block_grid, crop_to_blocks, glyph_char, text_buffer_size};
use crate::model::{builtin, Model};

/// Tunables of a [`RenderContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Equalization tiles along the vertical axis (1..=16).
    pub tiles_y: usize,
    /// Equalization tiles along the horizontal axis (1..=16).
    pub tiles_x: usize,
    /// Histogram clip limit in units of `1/256`.
    pub clip_limit: u8,
    /// Largest block count a single render may produce; `None` is unbounded.
    pub max_blocks: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tiles_y: DEFAULT_TILES,
            tiles_x: DEFAULT_TILES,
            clip_limit: DEFAULT_CLIP_LIMIT,
            max_blocks: None,
        }
    }
}

/// Summary of one render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    /// Original image width; only `cropped_width` columns were rewritten.
    pub width: usize,
    /// Original image height; only `cropped_height` rows were rewritten.
    pub height: usize,
    pub cropped_width: usize,
    pub cropped_height: usize,
    pub indices: IndexMatrix,
    /// Bytes written to the text buffer (0 without one).
    pub text_len: usize,
}

/// A parsed model plus rendering parameters.
///
/// Rendering takes `&self` and allocates all scratch space per call, so one
/// context can serve concurrent renders.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    model: Model<'a>,
    equalizer: Equalizer,
    max_blocks: Option<usize>,
}

impl RenderContext<'static> {
    /// Context over the built-in model with default options.
    pub fn init() -> Result<Self, RenderError> {
        Self::new(builtin()?, RenderOptions::default())
    }
}

impl<'a> RenderContext<'a> {
    pub fn new(model: Model<'a>, options: RenderOptions) -> Result<Self, RenderError> {
        let equalizer = Equalizer::new(options.tiles_y, options.tiles_x, options.clip_limit)?;
        Ok(Self {
            model,
            equalizer,
            max_blocks: options.max_blocks,
        })
    }

    pub fn model(&self) -> &Model<'a> {
        &self.model
    }

    pub fn equalizer(&self) -> &Equalizer {
        &self.equalizer
    }

    /// Text bytes needed to render a `width x height` image:
    /// `(height / block_rows) * (width / block_cols + 1)`.
    pub fn required_text_buffer_size(&self, width: usize, height: usize) -> usize {
        text_buffer_size(
            width,
            height,
            self.model.block_rows(),
            self.model.block_cols(),
        )
    }

    /// Render a `width x height` single-channel image in place.
    ///
    /// With `optimize` the whole image is equalized first. Each whole block
    /// of the cropped image is then classified and overwritten with its
    /// glyph bitmap; trailing partial rows and columns are left untouched.
    /// When `text` is given, one character per block and a newline per block
    /// row are written to it.
    ///
    /// All buffer sizes are checked before any pixel is modified.
    pub fn render(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        mut text: Option<&mut [u8]>,
        optimize: bool,
    ) -> Result<Rendered, RenderError> {
        let started = Instant::now();
        let (block_rows, block_cols) = (self.model.block_rows(), self.model.block_cols());

        let required = width.saturating_mul(height);
        if pixels.len() < required {
            return Err(RenderError::PixelBufferTooSmall {
                width,
                height,
                required,
                provided: pixels.len(),
            });
        }

        if let Some(text) = text.as_deref() {
            let required = self.required_text_buffer_size(width, height);
            if text.len() < required {
                return Err(RenderError::TextBufferTooSmall {
                    required,
                    provided: text.len(),
                });
            }
        }

        let (grid_rows, grid_cols) = block_grid(width, height, block_rows, block_cols);
        if let Some(capacity) = self.max_blocks {
            let blocks = grid_rows * grid_cols;
            if blocks > capacity {
                return Err(RenderError::Capacity { blocks, capacity });
            }
        }

        let pixels = &mut pixels[..required];
        if optimize {
            self.equalizer.apply(pixels, width, height)?;
        }

        let (cropped_width, cropped_height) = crop_to_blocks(width, height, block_rows, block_cols);
        if (cropped_width, cropped_height) != (width, height) {
            log::debug!(
                "Cropped {}x{} to {}x{} for {}x{} blocks",
                width,
                height,
                cropped_width,
                cropped_height,
                block_rows,
                block_cols
            );
        }

        let indices = compute_index_matrix(&self.model, pixels, width, height)?;

        let mut text_len = 0;
        for br in 0..indices.rows() {
            for bc in 0..indices.cols() {
                let index = indices.get(br, bc).unwrap_or(0) as usize;
                // Parsed trees only select stored glyphs
                let glyph = self.model.glyph(index).ok_or(RenderError::MissingGlyph {
                    index,
                    glyphs: self.model.glyph_count(),
                })?;

                if let Some(text) = text.as_deref_mut() {
                    text[text_len] = glyph_char(index).unwrap_or(b' ');
                    text_len += 1;
                }

                let (top, left) = (br * block_rows, bc * block_cols);
                for (i, glyph_row) in glyph.chunks_exact(block_cols).enumerate() {
                    let start = (top + i) * width + left;
                    pixels[start..start + block_cols].copy_from_slice(glyph_row);
                }
            }
            if let Some(text) = text.as_deref_mut() {
                text[text_len] = b'\n';
                text_len += 1;
            }
        }

        log::debug!(
            "Rendered {}x{} blocks in {:?} (equalized: {})",
            indices.rows(),
            indices.cols(),
            started.elapsed(),
            optimize
        );

        Ok(Rendered {
            width,
            height,
            cropped_width,
            cropped_height,
            indices,
            text_len,
        })
    }

    /// Render and return the text output as a `String`.
    pub fn render_to_string(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        optimize: bool,
    ) -> Result<(String, Rendered), RenderError> {
        let mut text = vec![0u8; self.required_text_buffer_size(width, height)];
        let rendered = self.render(pixels, width, height, Some(&mut text[..]), optimize)?;
        let text = text[..rendered.text_len].iter().map(|&b| b as char).collect();
        Ok((text, rendered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionTree, ModelBuilder, TreeNode};

    /// 1x2 blocks: glyph 0 (' ') is [0, 0], glyph 1 ('!') is [9, 9],
    /// glyph 2 ('"') is [7, 8]; the left pixel picks between 1 and 2.
    fn small_blob() -> Vec<u8> {
        ModelBuilder::new(1, 2)
            .glyph(vec![0, 0])
            .glyph(vec![9, 9])
            .glyph(vec![7, 8])
            .tree(DecisionTree::new(
                1,
                vec![
                    TreeNode::Split {
                        row: 0,
                        col: 0,
                        threshold: 50,
                    },
                    TreeNode::Leaf { glyph: 1 },
                    TreeNode::Leaf { glyph: 2 },
                ],
            ))
            .build()
    }

    #[test]
    fn test_substitutes_glyph_pixels_and_text() {
        let blob = small_blob();
        let ctx = RenderContext::new(Model::parse(&blob).unwrap(), RenderOptions::default())
            .unwrap();
        #[rustfmt::skip]
        let mut pixels = vec![
            100, 0, 10, 0,
            10,  0, 100, 0,
        ];
        let mut text = vec![0u8; ctx.required_text_buffer_size(4, 2)];
        let rendered = ctx
            .render(&mut pixels, 4, 2, Some(&mut text[..]), false)
            .unwrap();

        assert_eq!(text, b"\"!\n!\"\n");
        assert_eq!(rendered.text_len, 6);
        assert_eq!(pixels, vec![7, 8, 9, 9, 9, 9, 7, 8]);
    }

    #[test]
    fn test_uncropped_remainder_is_untouched() {
        let blob = small_blob();
        let ctx = RenderContext::new(Model::parse(&blob).unwrap(), RenderOptions::default())
            .unwrap();
        // 3 wide: the last column is a partial block
        let mut pixels = vec![100, 0, 42, 100, 0, 43];
        let rendered = ctx.render(&mut pixels, 3, 2, None, false).unwrap();
        assert_eq!((rendered.width, rendered.height), (3, 2));
        assert_eq!((rendered.cropped_width, rendered.cropped_height), (2, 2));
        assert_eq!(pixels, vec![7, 8, 42, 7, 8, 43]);
        assert_eq!(rendered.text_len, 0);
    }

    #[test]
    fn test_undersized_text_buffer_rejected_before_mutation() {
        let blob = small_blob();
        let ctx = RenderContext::new(Model::parse(&blob).unwrap(), RenderOptions::default())
            .unwrap();
        let mut pixels = vec![100u8; 8];
        let mut text = vec![0u8; 5];
        let err = ctx
            .render(&mut pixels, 4, 2, Some(&mut text[..]), true)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::TextBufferTooSmall {
                required: 6,
                provided: 5
            }
        );
        assert_eq!(pixels, vec![100u8; 8]);
    }

    #[test]
    fn test_short_pixel_buffer_rejected() {
        let blob = small_blob();
        let ctx = RenderContext::new(Model::parse(&blob).unwrap(), RenderOptions::default())
            .unwrap();
        let err = ctx.render(&mut [0u8; 7], 4, 2, None, false).unwrap_err();
        assert!(matches!(
            err,
            RenderError::PixelBufferTooSmall {
                required: 8,
                provided: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_capacity_limit() {
        let blob = small_blob();
        let options = RenderOptions {
            max_blocks: Some(3),
            ..RenderOptions::default()
        };
        let ctx = RenderContext::new(Model::parse(&blob).unwrap(), options).unwrap();
        let err = ctx.render(&mut [0u8; 8], 4, 2, None, false).unwrap_err();
        assert_eq!(
            err,
            RenderError::Capacity {
                blocks: 4,
                capacity: 3
            }
        );
        // Still usable afterwards
        assert!(ctx.render(&mut [0u8; 4], 4, 1, None, false).is_ok());
    }

    #[test]
    fn test_invalid_tile_grid_rejected() {
        let blob = small_blob();
        let options = RenderOptions {
            tiles_x: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            RenderContext::new(Model::parse(&blob).unwrap(), options),
            Err(RenderError::InvalidTileGrid { .. })
        ));
    }

    #[test]
    fn test_newline_per_block_row_even_without_columns() {
        let blob = small_blob();
        let ctx = RenderContext::new(Model::parse(&blob).unwrap(), RenderOptions::default())
            .unwrap();
        let mut pixels = vec![0u8; 3];
        let (text, rendered) = ctx.render_to_string(&mut pixels, 1, 3, false).unwrap();
        assert_eq!(text, "\n\n\n");
        assert!(rendered.indices.is_empty());
    }

    #[test]
    fn test_init_uses_builtin_model() {
        let ctx = RenderContext::init().unwrap();
        assert_eq!(ctx.model().glyph_count(), 95);
        assert_eq!(ctx.equalizer().tiles(), (8, 8));
    }
}
