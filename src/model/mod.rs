//! Pretrained glyph model: bitmap table plus classification tree.
//!
//! - [`parse`] reads a serialized blob into a [`Model`] borrowing its bitmaps
//! - [`DecisionTree`] classifies a pixel block into a glyph index
//! - [`ModelBuilder`] writes blobs in the same layout
//! - [`builtin`] provides the default model

mod blob;
mod builder;
mod builtin;
mod error;
mod tree;

pub use blob::{fingerprint, parse, Model, HEADER_BYTES, INT_BYTES};
pub use builder::ModelBuilder;
pub use builtin::{builtin, builtin_blob, BUILTIN_BLOCK_COLS, BUILTIN_BLOCK_ROWS};
pub use error::FormatError;
pub use tree::{DecisionTree, TreeNode, MAX_TREE_DEPTH, NODE_BYTES, SPLIT_FLAG};
