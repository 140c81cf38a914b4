//!
//! Conversion between the typed text and the formatted text.
//!
//! The typed text is what the host stores, the formatted text
//! is what the user sees, literals included. How much of the
//! format is included follows the [RenderMode].
//!
//! ```
//! use rat_mask::{formatted_text, FormatSymbolTable, RenderMode};
//!
//! let symbols = FormatSymbolTable::new();
//! let s = formatted_text("ddd-ddd", &symbols, &RenderMode::LeftOnly, "123456");
//! assert_eq!(s, "123-456");
//! ```
//!

use crate::format_symbols::{FormatSymbolTable, Symbol};
use crate::grapheme::graphemes;
use crate::render_mode::RenderMode;

/// Interleave the typed graphemes with the literals of the format.
///
/// * LeftOnly: stops after the last typed grapheme.
/// * LeftAndRight: continues up to the next slot.
/// * Whole: the rest of the format is appended verbatim,
///   slot characters included.
///
/// Typed graphemes beyond the last slot are dropped.
pub fn formatted_text(
    format: &str,
    symbols: &FormatSymbolTable,
    mode: &RenderMode,
    typed: &str,
) -> String {
    let typed = graphemes(typed);
    let mut pos = 0;

    let mut result = String::new();
    let mut stop_at_slot = false;
    let mut verbatim = false;
    for g in graphemes(format) {
        match symbols.classify_grapheme(g) {
            Symbol::Slot(_) if !verbatim => {
                if stop_at_slot || pos >= typed.len() {
                    break;
                }
                result.push_str(typed[pos]);
                pos += 1;

                if pos == typed.len() {
                    match mode {
                        RenderMode::LeftOnly => break,
                        RenderMode::LeftAndRight => stop_at_slot = true,
                        RenderMode::Whole { .. } => verbatim = true,
                    }
                }
            }
            _ => result.push_str(g),
        }
    }
    result
}

/// Recover the typed text from a formatted text.
///
/// Takes the graphemes at the slot positions. In Whole mode the
/// unfilled tail of the format is recognized as the earliest
/// position after a slot where the rest of the text equals the rest
/// of the format.
///
/// This can't distinguish a typed grapheme that equals the slot
/// character of its position from the verbatim tail. With the
/// format `"**"` in Whole mode the typed text `"**"` comes back
/// as `"*"`.
pub fn extract_typed(
    format: &str,
    symbols: &FormatSymbolTable,
    mode: &RenderMode,
    formatted: &str,
) -> String {
    let fmt = graphemes(format);
    let shown = graphemes(formatted);
    let n = fmt.len().min(shown.len());

    let is_slot = |g: &str| matches!(symbols.classify_grapheme(g), Symbol::Slot(_));

    let end = if mode.is_whole() && shown.len() == fmt.len() {
        (1..=n)
            .find(|e| is_slot(fmt[e - 1]) && shown[*e..] == fmt[*e..])
            .unwrap_or(n)
    } else {
        n
    };

    (0..end)
        .filter(|i| is_slot(fmt[*i]))
        .map(|i| shown[i])
        .collect()
}
