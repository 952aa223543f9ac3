//! Display-width helpers for fitting labels into terminal cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `s` in terminal columns.
pub fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, ending in `tail` when
/// anything was cut.
///
/// ```
/// use picklist_widgets::text::truncate;
///
/// assert_eq!(truncate("Strawberry", 6, "…"), "Straw…");
/// assert_eq!(truncate("Fig", 6, "…"), "Fig");
/// ```
pub fn truncate(s: &str, max_width: usize, tail: &str) -> String {
    if width(s) <= max_width {
        return s.to_string();
    }
    let tail_width = width(tail);
    if tail_width > max_width {
        return take_columns(tail, max_width);
    }
    let mut out = take_columns(s, max_width - tail_width);
    out.push_str(tail);
    out
}

fn take_columns(s: &str, columns: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > columns {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width() {
        assert_eq!(width("apple"), 5);
        assert_eq!(width(""), 0);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(width("梨"), 2);
        assert_eq!(width("梨a"), 3);
    }

    #[test]
    fn fits_unchanged() {
        assert_eq!(truncate("kiwi", 4, "…"), "kiwi");
    }

    #[test]
    fn cut_with_tail() {
        assert_eq!(truncate("blueberry", 5, "…"), "blue…");
        assert_eq!(truncate("blueberry", 5, "..."), "bl...");
    }

    #[test]
    fn never_splits_a_wide_character() {
        // 4 columns minus the tail leaves 3; the second ideograph would need 4.
        assert_eq!(truncate("梨梨梨", 4, "…"), "梨…");
    }

    #[test]
    fn tail_wider_than_space() {
        assert_eq!(truncate("blueberry", 2, "..."), "..");
        assert_eq!(truncate("blueberry", 0, "…"), "");
    }
}
