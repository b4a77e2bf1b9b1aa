//! Block-grid arithmetic shared by the indexer and the renderer.

/// Crop `(width, height)` down to the largest multiples of the block size.
///
/// Trailing partial columns and rows are dropped.
///
/// # Example
/// ```ignore
/// // 645x480 with 10-wide, 6-tall blocks
/// assert_eq!(crop_to_blocks(645, 480, 6, 10), (640, 480));
/// ```
pub fn crop_to_blocks(
    width: usize,
    height: usize,
    block_rows: usize,
    block_cols: usize,
) -> (usize, usize) {
    if block_rows == 0 || block_cols == 0 {
        return (0, 0);
    }
    (
        width / block_cols * block_cols,
        height / block_rows * block_rows,
    )
}

/// Number of whole blocks in an image, as `(block_rows_count, block_cols_count)`.
pub fn block_grid(
    width: usize,
    height: usize,
    block_rows: usize,
    block_cols: usize,
) -> (usize, usize) {
    if block_rows == 0 || block_cols == 0 {
        return (0, 0);
    }
    (height / block_rows, width / block_cols)
}

/// Bytes of text output for an image: one character per block plus a
/// newline per block row.
///
/// `(height / block_rows) * (width / block_cols + 1)`
pub fn text_buffer_size(
    width: usize,
    height: usize,
    block_rows: usize,
    block_cols: usize,
) -> usize {
    let (rows, cols) = block_grid(width, height, block_rows, block_cols);
    if block_cols == 0 {
        return 0;
    }
    rows * (cols + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_is_noop_on_exact_multiples() {
        for (w, h) in [(60, 36), (640, 480), (10, 6), (0, 0)] {
            assert_eq!(crop_to_blocks(w, h, 6, 10), (w, h));
        }
    }

    #[test]
    fn test_crop_drops_partial_blocks() {
        assert_eq!(crop_to_blocks(645, 480, 6, 10), (640, 480));
        assert_eq!(crop_to_blocks(649, 485, 6, 10), (640, 480));
        assert_eq!(crop_to_blocks(9, 5, 6, 10), (0, 0));
    }

    #[test]
    fn test_text_buffer_size_scenario() {
        assert_eq!(text_buffer_size(640, 480, 6, 10), 5200);
        assert_eq!(text_buffer_size(645, 480, 6, 10), 5200);
    }

    #[test]
    fn test_text_buffer_size_empty() {
        assert_eq!(text_buffer_size(0, 480, 6, 10), 80);
        assert_eq!(text_buffer_size(640, 5, 6, 10), 0);
        assert_eq!(text_buffer_size(640, 480, 0, 0), 0);
    }

    #[test]
    fn test_block_grid() {
        assert_eq!(block_grid(640, 480, 6, 10), (80, 64));
        assert_eq!(block_grid(640, 480, 0, 10), (0, 0));
    }
}
