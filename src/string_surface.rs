//!
//! A headless [TextSurface].
//!
//! Keeps the text, the cursor and its own copy of the decorations,
//! and can compose the visible line. Useful for testing and
//! for hosts that render plain strings.
//!
//! ```
//! use rat_mask::string_surface::StringSurface;
//! use rat_mask::{EditRequest, FieldState};
//!
//! let mut field = FieldState::with_formats(["ddd-ddd"]);
//! let mut surface = StringSurface::new();
//! surface.revalidate(&mut field);
//!
//! surface.edit(&mut field, EditRequest::insert(0, "1234"));
//! assert_eq!(surface.text(), "1234");
//! assert_eq!(surface.display(&field), "123-4");
//! ```
//!

use crate::decoration::{DecorationDiff, Decorations};
use crate::field_state::FieldState;
use crate::format_match::EditRequest;
use crate::grapheme::{grapheme_len, graphemes};
use crate::measure::{CellWidth, GlyphClass, Measure};
use crate::text_surface::{self, EditOutcome, TextSurface};
use crate::upos_type;

/// Plain string host.
#[derive(Debug, Default, Clone)]
pub struct StringSurface<M = CellWidth> {
    text: String,
    cursor: upos_type,
    pending_cursor: Option<upos_type>,
    layers: Decorations,
    measure: M,
}

impl StringSurface<CellWidth> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: Measure> StringSurface<M> {
    /// Use a different measurement.
    pub fn with_measure(measure: M) -> Self {
        Self {
            text: Default::default(),
            cursor: 0,
            pending_cursor: None,
            layers: Default::default(),
            measure,
        }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor as grapheme offset.
    pub fn cursor(&self) -> upos_type {
        self.cursor
    }

    /// Cursor move waiting for [run_pending](Self::run_pending).
    pub fn pending_cursor(&self) -> Option<upos_type> {
        self.pending_cursor
    }

    /// Set the cursor directly. Clamped to the text.
    pub fn set_cursor(&mut self, cursor: upos_type) {
        self.cursor = cursor.min(grapheme_len(&self.text));
        self.pending_cursor = None;
    }

    /// Apply a scheduled cursor move. Returns true if there was one.
    pub fn run_pending(&mut self) -> bool {
        if let Some(cursor) = self.pending_cursor.take() {
            self.cursor = cursor.min(grapheme_len(&self.text));
            true
        } else {
            false
        }
    }

    /// The decorations as applied from the diffs.
    pub fn layers(&self) -> &Decorations {
        &self.layers
    }

    /// Run an edit.
    pub fn edit(&mut self, field: &mut FieldState, edit: EditRequest) -> EditOutcome {
        text_surface::process_edit(field, self, edit, None)
    }

    /// Run an edit with a filter that can refuse it.
    pub fn edit_filtered(
        &mut self,
        field: &mut FieldState,
        edit: EditRequest,
        filter: &mut dyn FnMut(&EditRequest) -> bool,
    ) -> EditOutcome {
        text_surface::process_edit(field, self, edit, Some(filter))
    }

    /// Type at the cursor.
    pub fn type_str(&mut self, field: &mut FieldState, s: &str) -> EditOutcome {
        self.run_pending();
        let r = self.edit(field, EditRequest::insert(self.cursor, s));
        self.run_pending();
        r
    }

    /// Delete the grapheme before the cursor.
    pub fn backspace(&mut self, field: &mut FieldState) -> EditOutcome {
        self.run_pending();
        if self.cursor == 0 {
            return EditOutcome::Rejected;
        }
        let r = self.edit(field, EditRequest::delete(self.cursor - 1..self.cursor));
        self.run_pending();
        r
    }

    /// Replace the whole text.
    pub fn assign(&mut self, field: &mut FieldState, text: &str) -> EditOutcome {
        let r = text_surface::assign_text(field, self, text);
        self.run_pending();
        r
    }

    /// Revalidate after a configuration change.
    pub fn revalidate(&mut self, field: &mut FieldState) {
        text_surface::revalidate(field, self);
        self.run_pending();
    }

    /// Set new formats. Clears the text.
    pub fn set_formats<I, S>(&mut self, field: &mut FieldState, formats: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        field.set_formats(formats);
        self.text.clear();
        self.revalidate(field);
    }

    /// Compose the visible line.
    ///
    /// Placeholders, then decorations, then the input are written
    /// to a line of cells. Later writes win. Positions are taken
    /// as cell offsets.
    pub fn display(&self, field: &FieldState) -> String {
        let mut line = Line::default();

        for p in self.layers.placeholders() {
            line.put_str(p.x, &p.text, &self.measure, GlyphClass::Decoration);
        }
        for (_, d) in self.layers.iter() {
            line.put_str(d.x, &d.text, &self.measure, GlyphClass::Decoration);
        }

        let mut x = field.inset() + field.left_inset(&self.measure);
        for (i, g) in graphemes(&self.text).into_iter().enumerate() {
            x += line.put(x, g, &self.measure, GlyphClass::Input);
            x += self.layers.kerning_at(i as upos_type);
        }

        line.to_string()
    }
}

impl<M: Measure> Measure for StringSurface<M> {
    fn width(&self, text: &str, class: GlyphClass) -> Option<upos_type> {
        self.measure.width(text, class)
    }
}

impl<M: Measure> TextSurface for StringSurface<M> {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn schedule_cursor(&mut self, cursor: upos_type) {
        self.pending_cursor = Some(cursor);
    }

    fn apply_decorations(&mut self, diff: &DecorationDiff) {
        self.layers.apply(diff);
    }
}

/// One line of cells.
#[derive(Debug, Default)]
struct Line<'a> {
    // None is an empty cell, Some("") continues a wide glyph.
    cells: Vec<Option<&'a str>>,
}

impl<'a> Line<'a> {
    fn put_str(&mut self, x: upos_type, s: &'a str, measure: &dyn Measure, class: GlyphClass) {
        let mut x = x;
        for g in graphemes(s) {
            x += self.put(x, g, measure, class);
        }
    }

    /// Returns the width of the glyph.
    fn put(&mut self, x: upos_type, g: &'a str, measure: &dyn Measure, class: GlyphClass) -> upos_type {
        let Some(width) = measure.width(g, class) else {
            return 0;
        };
        let x = x as usize;
        let w = width as usize;
        if self.cells.len() < x + w.max(1) {
            self.cells.resize(x + w.max(1), None);
        }
        self.cells[x] = Some(g);
        for cell in self.cells[x + 1..x + w.max(1)].iter_mut() {
            *cell = Some("");
        }
        width
    }
}

impl std::fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            match cell {
                None => f.write_str(" ")?,
                Some(g) => f.write_str(g)?,
            }
        }
        Ok(())
    }
}
