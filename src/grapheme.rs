use crate::upos_type;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Split into extended graphemes.
pub(crate) fn graphemes(s: &str) -> Vec<&str> {
    s.graphemes(true).collect()
}

/// Length in graphemes.
pub(crate) fn grapheme_len(s: &str) -> upos_type {
    s.graphemes(true).count() as upos_type
}

/// The grapheme consists of exactly this one char.
pub(crate) fn single_char(g: &str) -> Option<char> {
    let mut it = g.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// First char of the grapheme. Used for matching against a character class.
pub(crate) fn first_char(g: &str) -> Option<char> {
    g.chars().next()
}

/// Replace a grapheme range of the text.
///
/// Returns None if the range is out of bounds or inverted.
pub(crate) fn replace_range(text: &str, range: Range<upos_type>, with: &str) -> Option<String> {
    if range.start > range.end {
        return None;
    }
    let bytes = byte_range(text, range)?;

    let mut buf = String::with_capacity(text.len() + with.len());
    buf.push_str(&text[..bytes.start]);
    buf.push_str(with);
    buf.push_str(&text[bytes.end..]);
    Some(buf)
}

/// Grapheme range to byte range.
pub(crate) fn byte_range(text: &str, range: Range<upos_type>) -> Option<Range<usize>> {
    let mut start = None;
    let mut end = None;
    let mut idx = 0;
    for (pos, _) in text.grapheme_indices(true) {
        if idx == range.start {
            start = Some(pos);
        }
        if idx == range.end {
            end = Some(pos);
            break;
        }
        idx += 1;
    }
    if idx == range.start && start.is_none() {
        start = Some(text.len());
    }
    if idx == range.end && end.is_none() {
        end = Some(text.len());
    }

    match (start, end) {
        (Some(start), Some(end)) => Some(start..end),
        _ => None,
    }
}

/// Trim whitespace and line-breaks from both ends.
pub(crate) fn trim_input(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace())
}
