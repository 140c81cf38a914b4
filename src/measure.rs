//!
//! Width measurement is provided by the host.
//!
//! The masking core only needs the display width of some
//! text rendered with either the input or the decoration style.
//!

use crate::upos_type;

/// Which style is used to render the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    /// Typed input.
    Input,
    /// Literals of the format and placeholders.
    Decoration,
}

/// Width measurement.
pub trait Measure {
    /// Display width of the text rendered with the style
    /// for the given class.
    ///
    /// Returns None if the width can't be determined, e.g. the
    /// style is not set. This is treated as zero width and the
    /// decoration is not placed.
    fn width(&self, text: &str, class: GlyphClass) -> Option<upos_type>;
}

impl<T: Measure + ?Sized> Measure for &T {
    fn width(&self, text: &str, class: GlyphClass) -> Option<upos_type> {
        (**self).width(text, class)
    }
}

/// Terminal cell width. Both classes use the same metric.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CellWidth;

impl Measure for CellWidth {
    #[inline]
    fn width(&self, text: &str, _class: GlyphClass) -> Option<upos_type> {
        Some(unicode_display_width::width(text) as upos_type)
    }
}
