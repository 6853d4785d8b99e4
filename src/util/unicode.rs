use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells` cells, ending in `…` when shortened.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Pad `s` with spaces to exactly `cells` wide, truncating if needed
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    match s[byte_offset..].grapheme_indices(true).nth(1) {
        Some((i, _)) => Some(byte_offset + i),
        None => Some(s.len()),
    }
}

/// Byte offset of the grapheme before `byte_offset`
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset].grapheme_indices(true).last().map(|(i, _)| i)
}

/// Start of the whitespace-delimited word left of `byte_offset`
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let prefix = &s[..byte_offset.min(s.len())];
    let trimmed = prefix.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("milk"), 4);
        assert_eq!(display_width("牛乳"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_to_width("Buy milk", 20), "Buy milk");
        assert_eq!(truncate_to_width("Buy oat milk", 8), "Buy oat\u{2026}");
        assert_eq!(truncate_to_width("牛乳を買う", 5), "牛乳\u{2026}");
        assert_eq!(truncate_to_width("x", 0), "");
        assert_eq!(truncate_to_width("xyz", 1), "\u{2026}");
    }

    #[test]
    fn padding() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abc\u{2026}");
    }

    #[test]
    fn grapheme_steps() {
        let s = "a🎉e\u{0301}";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(5));
        assert_eq!(next_grapheme_boundary(s, 5), Some(s.len()));
        assert_eq!(next_grapheme_boundary(s, s.len()), None);
        assert_eq!(prev_grapheme_boundary(s, s.len()), Some(5));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn word_left() {
        assert_eq!(word_boundary_left("buy oat milk", 12), 8);
        assert_eq!(word_boundary_left("buy oat ", 8), 4);
        assert_eq!(word_boundary_left("buy", 3), 0);
    }
}
