//! Character tables for glyph output.

/// Printable ASCII, space through tilde, index-aligned with a model's glyph table.
pub const GLYPH_CHARS: &[u8; 95] = b" !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Standard ASCII density ramp (10 levels).
/// Characters ordered from darkest (space) to brightest (@).
/// Works well on dark terminals.
pub const STANDARD_CHARSET: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Character printed for glyph `index`, if the index is inside the table.
pub fn glyph_char(index: usize) -> Option<u8> {
    GLYPH_CHARS.get(index).copied()
}

/// Glyph index of a printable ASCII character.
pub fn glyph_index(c: char) -> Option<usize> {
    if c.is_ascii_graphic() || c == ' ' {
        Some(c as usize - ' ' as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_spans_printable_ascii() {
        assert_eq!(GLYPH_CHARS.len(), 95);
        assert_eq!(GLYPH_CHARS[0], b' ');
        assert_eq!(GLYPH_CHARS[94], b'~');
        for (i, &c) in GLYPH_CHARS.iter().enumerate() {
            assert_eq!(c as usize, 32 + i);
        }
    }

    #[test]
    fn test_glyph_index_round_trips_ramp() {
        for &c in STANDARD_CHARSET {
            let index = glyph_index(c).unwrap();
            assert_eq!(glyph_char(index), Some(c as u8));
        }
    }

    #[test]
    fn test_non_printable_has_no_index() {
        assert_eq!(glyph_index('\n'), None);
        assert_eq!(glyph_index('\u{7f}'), None);
        assert_eq!(glyph_index('█'), None);
        assert_eq!(glyph_char(95), None);
    }
}
