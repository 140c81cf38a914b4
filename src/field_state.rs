//!
//! Per-field state of the masking engine.
//!
//! Holds the format patterns, the currently selected format and
//! the decorations. The text itself belongs to the host.
//!
//! [FieldState::apply_edit] selects the format for an edit.
//! The current format is tried first, then all others in the
//! order they were given. The first accepting format becomes
//! the current one with [FieldState::commit].
//!

use crate::decoration::Decorations;
use crate::extract;
use crate::format_match::{EditRequest, FormatMatcher, FormatPattern, Match, MatchOutcome};
use crate::format_symbols::{FormatSymbolTable, Symbol};
use crate::grapheme::graphemes;
use crate::measure::{GlyphClass, Measure};
use crate::render_mode::RenderMode;
use crate::upos_type;
use log::debug;

/// Formats, current format and decorations of one field.
#[derive(Debug, Clone)]
pub struct FieldState {
    formats: Vec<FormatPattern>,
    current: Option<usize>,
    symbols: FormatSymbolTable,
    mode: RenderMode,
    inset: upos_type,
    trailing_literals: bool,
    trim_input: bool,
    decorations: Decorations,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            formats: Default::default(),
            current: None,
            symbols: Default::default(),
            mode: Default::default(),
            inset: 0,
            trailing_literals: true,
            trim_input: true,
            decorations: Default::default(),
        }
    }
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field with the given formats.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut s = Self::default();
        s.set_formats(formats);
        s
    }

    /// Set the format patterns.
    ///
    /// Resets the current format. The host must clear its text
    /// and [revalidate](Self::revalidate).
    pub fn set_formats<I, S>(&mut self, formats: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats
            .into_iter()
            .map(|v| FormatPattern::new(v, &self.symbols))
            .collect();
        self.current = None;
    }

    /// Format patterns in fallback order.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|v| v.pattern())
    }

    /// The currently selected format.
    pub fn current_format(&self) -> Option<&str> {
        self.current_pattern().map(|v| v.pattern())
    }

    fn current_pattern(&self) -> Option<&FormatPattern> {
        self.current.and_then(|v| self.formats.get(v))
    }

    /// The current format, or the first one if nothing has
    /// been selected yet.
    fn display_pattern(&self) -> Option<&FormatPattern> {
        self.current_pattern().or_else(|| self.formats.first())
    }

    pub fn symbols(&self) -> &FormatSymbolTable {
        &self.symbols
    }

    /// Set the slot characters. The formats are parsed again.
    ///
    /// The host must revalidate its text.
    pub fn set_symbols(&mut self, symbols: FormatSymbolTable) {
        self.symbols = symbols;
        for f in self.formats.iter_mut() {
            *f = FormatPattern::new(f.pattern(), &self.symbols);
        }
    }

    pub fn render_mode(&self) -> &RenderMode {
        &self.mode
    }

    /// Set the render mode. The host must revalidate its text.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Left offset of the field in the host's units.
    pub fn inset(&self) -> upos_type {
        self.inset
    }

    /// Set the inset. The host must revalidate its text.
    pub fn set_inset(&mut self, inset: upos_type) {
        self.inset = inset;
    }

    /// Show the literal run after the last slot.
    pub fn trailing_literals(&self) -> bool {
        self.trailing_literals
    }

    /// The host must revalidate its text.
    pub fn set_trailing_literals(&mut self, show: bool) {
        self.trailing_literals = show;
    }

    /// Trim whitespace from edits before matching.
    pub fn trim_input(&self) -> bool {
        self.trim_input
    }

    pub fn set_trim_input(&mut self, trim: bool) {
        self.trim_input = trim;
    }

    /// Current decorations.
    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Matcher with the current configuration.
    pub fn matcher<'a>(&'a self, measure: &'a dyn Measure) -> FormatMatcher<'a> {
        FormatMatcher::new(&self.symbols, &self.mode, measure)
            .inset(self.inset)
            .trailing_literals(self.trailing_literals)
    }

    /// Select the format for the edit and match it.
    ///
    /// Nothing is changed here. The match carries the accepting
    /// format, [commit](Self::commit) makes it the current one
    /// and applies the decorations after the host has applied
    /// the edit.
    pub fn apply_edit(
        &self,
        text: &str,
        edit: &EditRequest,
        measure: &dyn Measure,
    ) -> MatchOutcome {
        if self.formats.is_empty() {
            return MatchOutcome::WithoutFormat;
        }

        let matcher = self.matcher(measure);

        if let Some(current) = self.current {
            if let Some(format) = self.formats.get(current) {
                if let MatchOutcome::Allowed(mut m) =
                    matcher.attempt_match(Some(format), text, edit, &self.decorations)
                {
                    m.format = Some(current);
                    return MatchOutcome::Allowed(m);
                }
            }
        }
        for (i, format) in self.formats.iter().enumerate() {
            if Some(i) == self.current {
                continue;
            }
            if let MatchOutcome::Allowed(mut m) =
                matcher.attempt_match(Some(format), text, edit, &self.decorations)
            {
                m.format = Some(i);
                return MatchOutcome::Allowed(m);
            }
        }
        MatchOutcome::NotAllowed
    }

    /// Accept the match. Switches to the accepting format and
    /// applies the decoration changes.
    pub fn commit(&mut self, m: &Match) {
        if m.format.is_some() && m.format != self.current {
            debug!(
                "format {:?} -> {:?}",
                self.current_format(),
                m.format
                    .and_then(|v| self.formats.get(v))
                    .map(|v| v.pattern())
            );
            self.current = m.format;
        }
        self.decorations.apply(&m.diff);
    }

    /// Run the complete text against the formats again.
    ///
    /// Used after the configuration changed. Returns the text
    /// that remains. If the text doesn't fit any format
    /// anymore, it is cleared.
    pub fn revalidate(&mut self, text: &str, measure: &dyn Measure) -> String {
        self.decorations.clear();

        let edit = EditRequest::replace_all(text, text);
        match self.apply_edit(text, &edit, measure) {
            MatchOutcome::WithoutFormat => text.to_string(),
            MatchOutcome::Allowed(m) => {
                self.commit(&m);
                m.text
            }
            MatchOutcome::NotAllowed => {
                debug!("text {:?} doesn't fit, cleared", text);
                self.current = None;
                match self.apply_edit("", &EditRequest::noop(), measure) {
                    MatchOutcome::Allowed(m) => {
                        self.commit(&m);
                        m.text
                    }
                    _ => String::new(),
                }
            }
        }
    }

    /// Width of the literal run at the start of the format.
    ///
    /// The host starts the input after this.
    pub fn left_inset(&self, measure: &dyn Measure) -> upos_type {
        let Some(format) = self.display_pattern() else {
            return 0;
        };
        let leading = graphemes(format.pattern())
            .into_iter()
            .take_while(|g| self.symbols.classify_grapheme(g) == Symbol::Literal)
            .collect::<String>();
        if leading.is_empty() {
            0
        } else {
            measure
                .width(&leading, GlyphClass::Decoration)
                .unwrap_or(0)
        }
    }

    /// Typed text with the literals of the current format.
    ///
    /// Without a format the text is returned as is.
    pub fn formatted_text(&self, typed: &str) -> String {
        match self.display_pattern() {
            Some(f) => extract::formatted_text(f.pattern(), &self.symbols, &self.mode, typed),
            None => typed.to_string(),
        }
    }

    /// Typed text from a formatted text using the current format.
    pub fn extract_typed(&self, formatted: &str) -> String {
        match self.display_pattern() {
            Some(f) => extract::extract_typed(f.pattern(), &self.symbols, &self.mode, formatted),
            None => formatted.to_string(),
        }
    }
}
