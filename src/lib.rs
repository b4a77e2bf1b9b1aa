//! ascii-mosaic library crate.
//!
//! Converts 8-bit grayscale images into ASCII-art mosaics by classifying
//! fixed-size pixel blocks with a pretrained decision tree.
//!
//! ```ignore
//! let context = RenderContext::init()?;
//! let (text, _) = context.render_to_string(&mut pixels, width, height, true)?;
//! ```

pub mod ascii;
pub mod cli;
pub mod config;
pub mod image_io;
pub mod model;
pub mod mosaic;

pub use model::{FormatError, Model};
pub use mosaic::{RenderContext, RenderError, RenderOptions, Rendered};
