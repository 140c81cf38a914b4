//!
//! Matches one edit against one format pattern.
//!
//! The matcher walks the format and the candidate text, the text
//! after the edit, in lockstep. Slot positions consume one
//! grapheme of the candidate, literal runs are turned into
//! decorations. The result is either a [Match] with the
//! cleaned up text and the changes to the decorations,
//! or [MatchOutcome::NotAllowed].
//!
//! Literals pasted together with the input are removed
//! if they match the literal run in front of a slot run.
//! `"123-456"` is accepted for `"ddd-ddd"` the same as `"123456"`.
//!

use crate::decoration::{DecorationDiff, Decorations, Kerning, Placeholder};
use crate::format_symbols::{FormatSymbolTable, Symbol};
use crate::grapheme::{grapheme_len, graphemes, replace_range, trim_input};
use crate::measure::{GlyphClass, Measure};
use crate::render_mode::RenderMode;
use crate::upos_type;
use log::{debug, trace};
use std::fmt::{Debug, Formatter};
use std::ops::Range;

/// Replace a grapheme range of the current text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Grapheme range of the current text.
    pub range: Range<upos_type>,
    /// Replacement.
    pub text: String,
}

impl EditRequest {
    pub fn new(range: Range<upos_type>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert at the position.
    pub fn insert(pos: upos_type, text: impl Into<String>) -> Self {
        Self::new(pos..pos, text)
    }

    /// Delete the range.
    pub fn delete(range: Range<upos_type>) -> Self {
        Self::new(range, String::new())
    }

    /// Replace all of the current text.
    pub fn replace_all(current: &str, text: impl Into<String>) -> Self {
        Self::new(0..grapheme_len(current), text)
    }

    /// Empty edit at the start.
    ///
    /// Useful to get the decorations for an empty field.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Same edit with whitespace trimmed from the replacement.
    pub fn trimmed(&self) -> Self {
        Self::new(self.range.clone(), trim_input(&self.text))
    }

    /// Number of inserted graphemes.
    pub fn inserted(&self) -> upos_type {
        grapheme_len(&self.text)
    }
}

/// Accepted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// New text. Typed graphemes only, literals are removed.
    pub text: String,
    /// Number of graphemes removed from the candidate text
    /// because they matched a literal.
    pub deleted: upos_type,
    /// Changes to the decorations.
    pub diff: DecorationDiff,
    /// Index of the accepting format, filled in by
    /// [FieldState::apply_edit](crate::FieldState::apply_edit).
    pub format: Option<usize>,
}

/// Result of matching an edit.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No format is configured. The edit is not checked.
    WithoutFormat,
    /// The edit doesn't fit the format.
    NotAllowed,
    /// The edit is accepted.
    Allowed(Match),
}

impl MatchOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, MatchOutcome::Allowed(_))
    }

    /// Extract the match.
    pub fn allowed(self) -> Option<Match> {
        match self {
            MatchOutcome::Allowed(m) => Some(m),
            _ => None,
        }
    }
}

/// A format pattern with some precalculated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    pattern: String,
    trailing: String,
    slots: upos_type,
}

impl FormatPattern {
    /// Parse the format with the given slot characters.
    pub fn new(pattern: impl Into<String>, symbols: &FormatSymbolTable) -> Self {
        let pattern = pattern.into();
        let trailing = trailing_literals(&pattern, symbols);
        let slots = graphemes(&pattern)
            .into_iter()
            .filter(|g| matches!(symbols.classify_grapheme(g), Symbol::Slot(_)))
            .count() as upos_type;
        Self {
            pattern,
            trailing,
            slots,
        }
    }

    /// Format pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Literal run after the last slot.
    pub fn trailing(&self) -> &str {
        &self.trailing
    }

    /// Number of slots. This is the maximum length of the text.
    pub fn slots(&self) -> upos_type {
        self.slots
    }
}

/// Literal run after the last slot of the format.
///
/// If the format has no slots at all, this is the whole format.
pub fn trailing_literals(format: &str, symbols: &FormatSymbolTable) -> String {
    let fmt = graphemes(format);
    let start = fmt
        .iter()
        .rposition(|g| matches!(symbols.classify_grapheme(g), Symbol::Slot(_)))
        .map(|v| v + 1)
        .unwrap_or(0);
    fmt[start..].concat()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Mask,
    Input,
}

/// Matches edits against a format.
pub struct FormatMatcher<'a> {
    /// Slot characters.
    pub symbols: &'a FormatSymbolTable,
    /// Render mode.
    pub mode: &'a RenderMode,
    /// Width measurement.
    pub measure: &'a dyn Measure,
    /// x-position of the start of the field.
    pub inset: upos_type,
    /// Show the literal run after the last slot.
    pub trailing_literals: bool,
}

impl Debug for FormatMatcher<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatMatcher")
            .field("symbols", &self.symbols)
            .field("mode", &self.mode)
            .field("inset", &self.inset)
            .field("trailing_literals", &self.trailing_literals)
            .finish()
    }
}

impl<'a> FormatMatcher<'a> {
    pub fn new(
        symbols: &'a FormatSymbolTable,
        mode: &'a RenderMode,
        measure: &'a dyn Measure,
    ) -> Self {
        Self {
            symbols,
            mode,
            measure,
            inset: 0,
            trailing_literals: true,
        }
    }

    pub fn inset(mut self, inset: upos_type) -> Self {
        self.inset = inset;
        self
    }

    pub fn trailing_literals(mut self, show: bool) -> Self {
        self.trailing_literals = show;
        self
    }

    /// Match the edit against the format.
    ///
    /// * format: None means no format is configured.
    /// * text: current text.
    /// * edit: the edit.
    /// * existing: current decorations, used to calculate the diff.
    pub fn attempt_match(
        &self,
        format: Option<&FormatPattern>,
        text: &str,
        edit: &EditRequest,
        existing: &Decorations,
    ) -> MatchOutcome {
        let Some(format) = format else {
            return MatchOutcome::WithoutFormat;
        };

        let Some(candidate) = replace_range(text, edit.range.clone(), &edit.text) else {
            debug!("edit {:?} out of bounds for {:?}", edit.range, text);
            return MatchOutcome::NotAllowed;
        };

        let fmt = graphemes(format.pattern());
        let mut input = graphemes(&candidate);

        let whole = self.mode.is_whole();
        // all positions in Whole mode are multiples of this
        let glyph_width = fmt
            .first()
            .map(|g| self.width(g, GlyphClass::Input))
            .unwrap_or(0);

        let mut diff = DecorationDiff::default();
        let mut deleted = 0;

        let mut state = WalkState::Mask;
        let mut first_run = true;
        let mut trailing_run = false;
        let mut lit_start = 0;
        let mut run_start = 0;
        let mut input_start = 0;
        let mut cursor = 0;
        let mut x = self.inset;

        let mut idx = 0;
        while idx < fmt.len() {
            let symbol = self.symbols.classify_grapheme(fmt[idx]);

            match (state, symbol) {
                (WalkState::Mask, Symbol::Slot(_)) => {
                    state = WalkState::Input;
                    run_start = idx;
                    input_start = cursor;
                    if lit_start < idx {
                        let literal = fmt[lit_start..idx].concat();
                        let placed = self.place(&mut diff, existing, lit_start, &literal, &mut x);
                        if let Some(width) = placed {
                            if !first_run && cursor > 0 && (!whole || cursor < input.len()) {
                                diff.kerning.push(Kerning {
                                    index: (cursor - 1) as upos_type,
                                    width,
                                });
                            }
                        }
                    }
                    first_run = false;
                    if trailing_run {
                        break;
                    }
                }
                (WalkState::Input, Symbol::Literal) => {
                    state = WalkState::Mask;
                    x = self.advance(x, &fmt[..idx], &input[input_start..cursor]);
                    lit_start = idx;
                }
                _ => {}
            }

            if let Symbol::Slot(slot) = symbol {
                if trailing_run || (input.is_empty() && !whole) {
                    break;
                }

                let mut filled = false;
                let mut stripped = 0;
                while cursor < input.len() {
                    if self.symbols.accepts_grapheme(slot, input[cursor]) {
                        cursor += 1;
                        filled = true;
                        break;
                    }
                    // pasted literal of the preceding run.
                    if idx == run_start
                        && lit_start + stripped < run_start
                        && input[cursor] == fmt[lit_start + stripped]
                    {
                        input.remove(cursor);
                        stripped += 1;
                        deleted += 1;
                    } else {
                        debug!(
                            "{:?} not allowed at {} of {:?}",
                            input[cursor],
                            idx,
                            format.pattern()
                        );
                        return MatchOutcome::NotAllowed;
                    }
                }

                if !filled && whole {
                    self.place_placeholder(&mut diff, slot, idx, glyph_width);
                }
            }

            if !trailing_run && !input.is_empty() && cursor == input.len() {
                match self.mode {
                    RenderMode::LeftOnly => break,
                    RenderMode::LeftAndRight => trailing_run = true,
                    RenderMode::Whole { .. } => {}
                }
            }

            idx += 1;
        }

        // pasted literals at the very end.
        if cursor < input.len() && idx == fmt.len() && state == WalkState::Mask {
            let rest = input.len() - cursor;
            let literal = &fmt[lit_start..];
            if rest <= literal.len() && input[cursor..] == literal[..rest] {
                input.truncate(cursor);
                deleted += rest;
            }
        }

        if cursor < input.len() {
            debug!(
                "{} graphemes exceed {:?}",
                input.len() - cursor,
                format.pattern()
            );
            return MatchOutcome::NotAllowed;
        }

        if self.trailing_literals && !format.trailing().is_empty() {
            if state == WalkState::Input && !whole {
                x = self.advance(x, &fmt[..idx], &input[input_start..cursor]);
            }
            self.place(&mut diff, existing, idx, format.trailing(), &mut x);
        }

        diff.finish(existing);
        trace!(
            "{:?}: add {} move {} remove {}",
            format.pattern(),
            diff.to_add.len(),
            diff.to_move.len(),
            diff.to_remove.len()
        );

        MatchOutcome::Allowed(Match {
            text: input.concat(),
            deleted: deleted as upos_type,
            diff,
            format: None,
        })
    }

    fn width(&self, text: &str, class: GlyphClass) -> upos_type {
        self.measure.width(text, class).unwrap_or(0)
    }

    /// x-position after an input run.
    fn advance(&self, x: upos_type, format_prefix: &[&str], input_run: &[&str]) -> upos_type {
        if self.mode.is_whole() {
            self.inset + self.width(&format_prefix.concat(), GlyphClass::Input)
        } else {
            x + self.width(&input_run.concat(), GlyphClass::Input)
        }
    }

    /// Register a literal run and advance x.
    /// Unmeasurable runs are not placed.
    fn place(
        &self,
        diff: &mut DecorationDiff,
        existing: &Decorations,
        key: usize,
        literal: &str,
        x: &mut upos_type,
    ) -> Option<upos_type> {
        let width = self.measure.width(literal, GlyphClass::Decoration)?;
        diff.register(existing, key as upos_type, literal, *x);
        *x += width;
        Some(width)
    }

    fn place_placeholder(
        &self,
        diff: &mut DecorationDiff,
        slot: char,
        idx: usize,
        glyph_width: upos_type,
    ) {
        let Some(c) = self.mode.placeholder(slot) else {
            return;
        };
        let text = c.to_string();
        if self.measure.width(&text, GlyphClass::Decoration).is_some() {
            diff.placeholders.push(Placeholder {
                offset: idx as upos_type,
                text: text.into(),
                x: self.inset + idx as upos_type * glyph_width,
            });
        }
    }
}
