//! Terminal cell width of rendered condition text.
//!
//! Every condition of one bar must occupy the same number of cells once its
//! markup is resolved, otherwise the label column jumps around as the signal
//! changes. These helpers measure that width.

use std::num::NonZeroUsize;
use std::sync::{LazyLock, Mutex};

use lru::LruCache;
use unicode_width::UnicodeWidthChar;

use crate::markup;
use crate::sync::lock_recover;

/// Minimum string length to cache (shorter strings have minimal overhead).
const CACHE_MIN_LEN: usize = 8;

static CELL_LEN_CACHE: LazyLock<Mutex<LruCache<String, usize>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(1024).expect("non-zero"))));

/// Get the cell width of a single character.
///
/// Block glyphs are one cell wide; control characters have 0 width.
#[must_use]
pub fn get_character_cell_size(c: char) -> usize {
    c.width().unwrap_or(0)
}

#[inline]
fn compute_cell_width(text: &str) -> usize {
    text.chars().map(get_character_cell_size).sum()
}

/// Get the total cell width of a string (cached for longer strings).
#[must_use]
pub fn cell_len(text: &str) -> usize {
    if text.len() < CACHE_MIN_LEN {
        return compute_cell_width(text);
    }

    if let Some(&cached) = lock_recover(&CELL_LEN_CACHE).get(text) {
        return cached;
    }

    let width = compute_cell_width(text);
    lock_recover(&CELL_LEN_CACHE).put(text.to_string(), width);
    width
}

/// Cell width of markup after resolving tags, without any escapes.
#[must_use]
pub fn markup_cell_len(text: &str) -> usize {
    cell_len(&markup::plain(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(cell_len("hello"), 5);
        assert_eq!(cell_len("  43.8%"), 7);
    }

    #[test]
    fn test_block_glyphs_are_single_cell() {
        for glyph in crate::generator::BLOCK_GLYPHS {
            assert_eq!(get_character_cell_size(glyph), 1, "glyph {glyph}");
        }
        assert_eq!(cell_len("████▍█████0"), 11);
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(get_character_cell_size('\x1b'), 0);
        assert_eq!(get_character_cell_size('\0'), 0);
    }

    #[test]
    fn test_cjk_width() {
        assert_eq!(cell_len("日本"), 4);
    }

    #[test]
    fn test_cell_len_caching() {
        let text = "a somewhat longer string";
        assert_eq!(cell_len(text), cell_len(text));
        assert_eq!(cell_len(text), 24);
    }

    #[test]
    fn test_markup_cell_len() {
        let text = "[font=f]████▍[color=#00000000]█████0[/color][/font]  43.8%";
        assert_eq!(markup_cell_len(text), 18);
    }
}
