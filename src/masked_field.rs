//! Text field with format fallback.
//!
//! * Insert/delete/move operations, a simple selection.
//! * Every edit is matched against the formats of the
//!   [FieldState]. The first format that accepts the edit
//!   becomes the current one.
//! * Format literals are rendered as decorations around the
//!   typed text. Which literals are shown depends on the
//!   [RenderMode].
//! * Pasted text may contain the literals, they are removed.
//!
//! ```rust no_run
//! use ratatui_core::buffer::Buffer;
//! use ratatui_core::layout::Rect;
//! use ratatui_core::widgets::StatefulWidget;
//! use rat_mask::masked_field::{MaskedField, MaskedFieldState};
//! use rat_mask::{HasScreenCursor, RenderMode};
//!
//! let area = Rect::new(0, 0, 20, 1);
//! let mut buf = Buffer::empty(area);
//!
//! let mut phone = MaskedFieldState::with_formats(["+7(ddd)ddd-dd-dd", "ddd-ddd"]);
//! phone.set_render_mode(RenderMode::LeftAndRight);
//!
//! MaskedField::new().render(area, &mut buf, &mut phone);
//! if let Some((x, y)) = phone.screen_cursor() {
//!     // frame.set_cursor_position((x, y));
//! }
//! ```
//!
//! The visual cursor must be set separately after rendering.
//! It is accessible as [HasScreenCursor::screen_cursor()] after rendering.
//!
//! Event handling by calling the freestanding fn [handle_events].
//! There's [handle_mouse_events] if you want to override the default key bindings but keep
//! the mouse behaviour.
//!

use crate::_private::NonExhaustive;
use crate::event::{ReadOnly, TextOutcome};
use crate::field_state::FieldState;
use crate::format_match::EditRequest;
use crate::format_symbols::FormatSymbolTable;
use crate::grapheme::{grapheme_len, graphemes};
use crate::measure::{CellWidth, GlyphClass, Measure};
use crate::render_mode::RenderMode;
use crate::text_surface::{self, EditOutcome, TextSurface};
use crate::{HasScreenCursor, upos_type};
use rat_event::util::MouseFlags;
use rat_event::{HandleEvent, MouseOnly, Regular, ct_event};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui_core::buffer::Buffer;
use ratatui_core::layout::Rect;
use ratatui_core::style::{Style, Stylize};
use ratatui_core::widgets::{StatefulWidget, Widget};
use ratatui_crossterm::crossterm::event::Event;
use ratatui_widgets::block::Block;
use std::cmp::min;
use std::fmt::{Debug, Formatter};
use std::ops::Range;

/// Text field with format fallback.
///
/// # Stateful
/// This widget implements [`StatefulWidget`], you can use it with
/// [`MaskedFieldState`] to handle common actions.
#[derive(Debug, Default, Clone)]
pub struct MaskedField<'a> {
    block: Option<Block<'a>>,
    style: Style,
    focus_style: Option<Style>,
    select_style: Option<Style>,
    decoration_style: Option<Style>,
    placeholder_style: Option<Style>,
}

/// Combined styles.
#[derive(Debug, Clone)]
pub struct MaskedFieldStyle {
    pub style: Style,
    pub focus: Option<Style>,
    pub select: Option<Style>,
    /// Format literals.
    pub decoration: Option<Style>,
    /// Placeholders for empty slots.
    pub placeholder: Option<Style>,
    pub block: Option<Block<'static>>,

    pub non_exhaustive: NonExhaustive,
}

impl Default for MaskedFieldStyle {
    fn default() -> Self {
        Self {
            style: Default::default(),
            focus: None,
            select: None,
            decoration: None,
            placeholder: None,
            block: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

/// Text and cursor of the field.
#[derive(Debug, Default, Clone)]
pub struct FieldValue {
    text: String,
    cursor: upos_type,
    anchor: upos_type,
    pending_cursor: Option<upos_type>,
}

/// State & event-handling.
pub struct MaskedFieldState {
    /// The whole area with block.
    /// __read only__ renewed with each render.
    pub area: Rect,
    /// Area inside a possible block.
    /// __read only__ renewed with each render.
    pub inner: Rect,

    /// Formats and decorations.
    /// __read only__ use the setters of the state, they
    /// revalidate the text.
    pub field: FieldState,
    /// Text and cursor.
    /// __read only__
    pub value: FieldValue,

    /// Current focus state.
    /// __read+write__
    pub focus: FocusFlag,
    /// Mouse selection in progress.
    /// __read+write__
    pub mouse: MouseFlags,

    filter: Option<Box<dyn FnMut(&EditRequest) -> bool>>,

    /// Construct with `..Default::default()`
    pub non_exhaustive: NonExhaustive,
}

impl<'a> MaskedField<'a> {
    /// New widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the combined style.
    #[inline]
    pub fn styles(mut self, styles: MaskedFieldStyle) -> Self {
        self.style = styles.style;
        if styles.focus.is_some() {
            self.focus_style = styles.focus;
        }
        if styles.select.is_some() {
            self.select_style = styles.select;
        }
        if styles.decoration.is_some() {
            self.decoration_style = styles.decoration;
        }
        if styles.placeholder.is_some() {
            self.placeholder_style = styles.placeholder;
        }
        if let Some(block) = styles.block {
            self.block = Some(block);
        }
        self
    }

    /// Base text style.
    #[inline]
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    /// Style when focused.
    #[inline]
    pub fn focus_style(mut self, style: impl Into<Style>) -> Self {
        self.focus_style = Some(style.into());
        self
    }

    /// Style for selection
    #[inline]
    pub fn select_style(mut self, style: impl Into<Style>) -> Self {
        self.select_style = Some(style.into());
        self
    }

    /// Style for the format literals. Patched onto the base style.
    #[inline]
    pub fn decoration_style(mut self, style: impl Into<Style>) -> Self {
        self.decoration_style = Some(style.into());
        self
    }

    /// Style for the placeholders. Patched onto the base style.
    /// Defaults to the decoration style.
    #[inline]
    pub fn placeholder_style(mut self, style: impl Into<Style>) -> Self {
        self.placeholder_style = Some(style.into());
        self
    }

    /// Block.
    #[inline]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> StatefulWidget for &MaskedField<'a> {
    type State = MaskedFieldState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl StatefulWidget for MaskedField<'_> {
    type State = MaskedFieldState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref(
    widget: &MaskedField<'_>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut MaskedFieldState,
) {
    state.area = area;
    state.inner = match &widget.block {
        Some(block) => block.inner(area),
        None => area,
    };
    // the text has been laid out, the cursor can move.
    state.value.run_pending();

    if let Some(block) = &widget.block {
        block.render(area, buf);
    }

    let inner = state.inner;

    let focus_style = if let Some(focus_style) = widget.focus_style {
        focus_style
    } else {
        widget.style
    };
    let select_style = if let Some(select_style) = widget.select_style {
        select_style
    } else {
        Style::default().on_yellow()
    };
    let style = if state.is_focused() {
        focus_style
    } else {
        widget.style
    };
    let decoration_style = if let Some(decoration_style) = widget.decoration_style {
        style.patch(decoration_style)
    } else {
        style
    };
    let placeholder_style = if let Some(placeholder_style) = widget.placeholder_style {
        style.patch(placeholder_style)
    } else {
        decoration_style
    };

    // set base style
    for y in inner.top()..inner.bottom() {
        for x in inner.left()..inner.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.reset();
                cell.set_style(style);
            }
        }
    }
    if inner.is_empty() {
        return;
    }

    let decorations = state.field.decorations();
    for p in decorations.placeholders() {
        put_str(buf, inner, p.x, &p.text, placeholder_style);
    }
    for (_, d) in decorations.iter() {
        put_str(buf, inner, d.x, &d.text, decoration_style);
    }

    let selection = state.selection();
    let mut x = state.input_start();
    for (i, g) in graphemes(&state.value.text).into_iter().enumerate() {
        let i = i as upos_type;
        let style = if state.is_focused() && selection.contains(&i) {
            style.patch(select_style)
        } else {
            style
        };
        x += put_str(buf, inner, x, g, style);
        x += decorations.kerning_at(i);
    }
}

/// Write one line of text. Clipped to the area.
/// Returns the width written.
fn put_str(buf: &mut Buffer, area: Rect, x: upos_type, text: &str, style: Style) -> upos_type {
    let mut x = x;
    let mut written = 0;
    for g in graphemes(text) {
        let width = unicode_display_width::width(g) as upos_type;
        if x + width > area.width as upos_type {
            break;
        }
        let cx = area.x + x as u16;
        if let Some(cell) = buf.cell_mut((cx, area.y)) {
            cell.set_symbol(g);
            cell.set_style(style);
        }
        for dx in 1..width as u16 {
            if let Some(cell) = buf.cell_mut((cx + dx, area.y)) {
                cell.reset();
                cell.set_style(style);
            }
        }
        x += width;
        written += width;
    }
    written
}

impl Measure for FieldValue {
    #[inline]
    fn width(&self, text: &str, class: GlyphClass) -> Option<upos_type> {
        CellWidth.width(text, class)
    }
}

impl TextSurface for FieldValue {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn schedule_cursor(&mut self, cursor: upos_type) {
        self.pending_cursor = Some(cursor);
    }
}

impl FieldValue {
    /// Apply a scheduled cursor move.
    pub fn run_pending(&mut self) -> bool {
        if let Some(cursor) = self.pending_cursor.take() {
            let cursor = min(cursor, grapheme_len(&self.text));
            self.cursor = cursor;
            self.anchor = cursor;
            true
        } else {
            false
        }
    }

    /// Text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor as grapheme offset.
    pub fn cursor(&self) -> upos_type {
        self.cursor
    }

    /// Selection anchor as grapheme offset.
    pub fn anchor(&self) -> upos_type {
        self.anchor
    }

    fn set_cursor(&mut self, cursor: upos_type, extend_selection: bool) -> bool {
        let cursor = min(cursor, grapheme_len(&self.text));
        let old = (self.cursor, self.anchor);
        self.cursor = cursor;
        if !extend_selection {
            self.anchor = cursor;
        }
        old != (self.cursor, self.anchor)
    }
}

impl Debug for MaskedFieldState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskedFieldState")
            .field("area", &self.area)
            .field("inner", &self.inner)
            .field("field", &self.field)
            .field("value", &self.value)
            .field("focus", &self.focus)
            .field("mouse", &self.mouse)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

impl Default for MaskedFieldState {
    fn default() -> Self {
        Self {
            area: Default::default(),
            inner: Default::default(),
            field: Default::default(),
            value: Default::default(),
            focus: Default::default(),
            mouse: Default::default(),
            filter: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl HasFocus for MaskedFieldState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

impl MaskedFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            focus: FocusFlag::new().with_name(name),
            ..MaskedFieldState::default()
        }
    }

    /// New state with the given formats.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut s = Self::default();
        s.set_formats(formats);
        s
    }

    /// Set the formats. Clears the text.
    pub fn set_formats<I, S>(&mut self, formats: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field.set_formats(formats);
        self.value.text.clear();
        self.revalidate();
    }

    /// Set the slot characters.
    ///
    /// Clears the text if it doesn't fit anymore.
    pub fn set_symbols(&mut self, symbols: FormatSymbolTable) {
        self.field.set_symbols(symbols);
        self.revalidate();
    }

    /// Set the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.field.set_render_mode(mode);
        self.revalidate();
    }

    /// Left offset of the field.
    pub fn set_inset(&mut self, inset: upos_type) {
        self.field.set_inset(inset);
        self.revalidate();
    }

    /// Show the literals after the last slot.
    pub fn set_trailing_literals(&mut self, show: bool) {
        self.field.set_trailing_literals(show);
        self.revalidate();
    }

    /// Replace the field state. The text is revalidated.
    pub fn set_field(&mut self, field: FieldState) {
        self.field = field;
        self.revalidate();
    }

    /// Filter for edits. Sees every edit the formats accept
    /// and can refuse it.
    pub fn set_filter(&mut self, filter: impl FnMut(&EditRequest) -> bool + 'static) {
        self.filter = Some(Box::new(filter));
    }

    /// Remove the filter.
    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    fn revalidate(&mut self) {
        text_surface::revalidate(&mut self.field, &mut self.value);
        self.value.run_pending();
    }

    /// Typed text.
    pub fn text(&self) -> &str {
        &self.value.text
    }

    /// Text with the format literals as it is displayed.
    pub fn formatted_text(&self) -> String {
        self.field.formatted_text(&self.value.text)
    }

    /// Current format.
    pub fn current_format(&self) -> Option<&str> {
        self.field.current_format()
    }

    /// Text length in graphemes.
    pub fn len(&self) -> upos_type {
        grapheme_len(&self.value.text)
    }

    pub fn is_empty(&self) -> bool {
        self.value.text.is_empty()
    }

    /// Cursor as grapheme offset.
    pub fn cursor(&self) -> upos_type {
        self.value.pending_cursor.unwrap_or(self.value.cursor)
    }

    /// Selection range.
    pub fn selection(&self) -> Range<upos_type> {
        let v = &self.value;
        if v.cursor < v.anchor {
            v.cursor..v.anchor
        } else {
            v.anchor..v.cursor
        }
    }

    pub fn has_selection(&self) -> bool {
        self.value.cursor != self.value.anchor
    }

    /// Run an edit through the formats.
    pub fn edit(&mut self, edit: EditRequest) -> EditOutcome {
        self.value.run_pending();
        match self.filter.as_mut() {
            Some(filter) => {
                let filter: &mut dyn FnMut(&EditRequest) -> bool = filter.as_mut();
                text_surface::process_edit(&mut self.field, &mut self.value, edit, Some(filter))
            }
            None => text_surface::process_edit(&mut self.field, &mut self.value, edit, None),
        }
    }

    /// Set the text. Returns false if the text is rejected.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.value.run_pending();
        let edit = EditRequest::replace_all(&self.value.text, text);
        let r = self.edit(edit).is_changed();
        self.value.run_pending();
        r
    }

    /// Clear the text.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            false
        } else {
            self.set_text("")
        }
    }

    /// Insert a char at the cursor, replacing the selection.
    pub fn insert_char(&mut self, c: char) -> bool {
        self.insert_str(c.to_string())
    }

    /// Insert a string at the cursor, replacing the selection.
    pub fn insert_str(&mut self, s: impl Into<String>) -> bool {
        self.value.run_pending();
        let range = self.selection();
        self.edit(EditRequest::new(range, s)).is_changed()
    }

    /// Delete the selection or the grapheme before the cursor.
    pub fn delete_prev_char(&mut self) -> bool {
        self.value.run_pending();
        let range = if self.has_selection() {
            self.selection()
        } else if self.value.cursor == 0 {
            return false;
        } else {
            self.value.cursor - 1..self.value.cursor
        };
        self.edit(EditRequest::delete(range)).is_changed()
    }

    /// Delete the selection or the grapheme after the cursor.
    pub fn delete_next_char(&mut self) -> bool {
        self.value.run_pending();
        let range = if self.has_selection() {
            self.selection()
        } else if self.value.cursor >= self.len() {
            return false;
        } else {
            self.value.cursor..self.value.cursor + 1
        };
        self.edit(EditRequest::delete(range)).is_changed()
    }

    /// Set the cursor.
    pub fn set_cursor(&mut self, cursor: upos_type, extend_selection: bool) -> bool {
        self.value.run_pending();
        self.value.set_cursor(cursor, extend_selection)
    }

    pub fn move_left(&mut self, extend_selection: bool) -> bool {
        self.value.run_pending();
        let c = self.value.cursor.saturating_sub(1);
        self.value.set_cursor(c, extend_selection)
    }

    pub fn move_right(&mut self, extend_selection: bool) -> bool {
        self.value.run_pending();
        let c = self.value.cursor + 1;
        self.value.set_cursor(c, extend_selection)
    }

    pub fn move_to_start(&mut self, extend_selection: bool) -> bool {
        self.set_cursor(0, extend_selection)
    }

    pub fn move_to_end(&mut self, extend_selection: bool) -> bool {
        let len = self.len();
        self.set_cursor(len, extend_selection)
    }

    pub fn select_all(&mut self) -> bool {
        self.value.run_pending();
        let old = self.selection();
        self.value.anchor = 0;
        self.value.cursor = self.len();
        old != self.selection()
    }

    /// x-position where the input starts, relative to the inner area.
    pub fn input_start(&self) -> upos_type {
        self.field.inset() + self.field.left_inset(&self.value)
    }

    /// x-position of a grapheme offset, relative to the inner area.
    /// Includes the space taken by decorations between
    /// the graphemes.
    pub fn col_to_screen(&self, pos: upos_type) -> upos_type {
        let decorations = self.field.decorations();
        let mut x = self.input_start();
        for (i, g) in graphemes(&self.value.text)
            .into_iter()
            .take(pos as usize)
            .enumerate()
        {
            let i = i as upos_type;
            x += unicode_display_width::width(g) as upos_type;
            x += decorations.kerning_at(i);
        }
        x
    }

    /// Grapheme offset for a x-position relative to the inner area.
    /// Positions on a decoration go to the next grapheme.
    pub fn screen_to_col(&self, scx: i16) -> upos_type {
        if scx < 0 {
            return 0;
        }
        let scx = scx as upos_type;
        let decorations = self.field.decorations();
        let mut x = self.input_start();
        for (i, g) in graphemes(&self.value.text).into_iter().enumerate() {
            let i = i as upos_type;
            let width = unicode_display_width::width(g) as upos_type;
            if scx < x + width {
                return i;
            }
            x += width;
            x += decorations.kerning_at(i);
        }
        self.len()
    }

    /// Set the cursor from a x-position relative to the inner area.
    pub fn set_screen_cursor(&mut self, cursor: i16, extend_selection: bool) -> bool {
        let cx = self.screen_to_col(cursor);
        self.set_cursor(cx, extend_selection)
    }
}

impl HasScreenCursor for MaskedFieldState {
    /// The current text cursor as an absolute screen position.
    #[inline]
    fn screen_cursor(&self) -> Option<(u16, u16)> {
        if self.is_focused() && !self.has_selection() {
            let sx = self.col_to_screen(self.cursor());
            if sx < self.inner.width as upos_type {
                Some((self.inner.x + sx as u16, self.inner.y))
            } else {
                None
            }
        } else {
            None
        }
    }
}

impl HandleEvent<Event, Regular, TextOutcome> for MaskedFieldState {
    fn handle(&mut self, event: &Event, _keymap: Regular) -> TextOutcome {
        // small helper ...
        fn tc(r: bool) -> TextOutcome {
            if r {
                TextOutcome::TextChanged
            } else {
                TextOutcome::Unchanged
            }
        }

        let mut r = if self.is_focused() {
            match event {
                ct_event!(key press c) | ct_event!(key press SHIFT-c) => tc(self.insert_char(*c)),
                ct_event!(keycode press Backspace) => tc(self.delete_prev_char()),
                ct_event!(keycode press Delete) => tc(self.delete_next_char()),
                ct_event!(key press CONTROL-'d') => tc(self.clear()),
                ct_event!(paste v) => tc(self.insert_str(v.as_str())),

                ct_event!(key release _)
                | ct_event!(key release SHIFT-_)
                | ct_event!(keycode release Backspace)
                | ct_event!(keycode release Delete)
                | ct_event!(key release CONTROL-'d') => TextOutcome::Unchanged,

                _ => TextOutcome::Continue,
            }
        } else {
            TextOutcome::Continue
        };

        if r == TextOutcome::Continue {
            r = self.handle(event, ReadOnly);
        }
        r
    }
}

impl HandleEvent<Event, ReadOnly, TextOutcome> for MaskedFieldState {
    fn handle(&mut self, event: &Event, _keymap: ReadOnly) -> TextOutcome {
        let mut r = if self.is_focused() {
            match event {
                ct_event!(keycode press Left) => self.move_left(false).into(),
                ct_event!(keycode press Right) => self.move_right(false).into(),
                ct_event!(keycode press Home) => self.move_to_start(false).into(),
                ct_event!(keycode press End) => self.move_to_end(false).into(),
                ct_event!(keycode press SHIFT-Left) => self.move_left(true).into(),
                ct_event!(keycode press SHIFT-Right) => self.move_right(true).into(),
                ct_event!(keycode press SHIFT-Home) => self.move_to_start(true).into(),
                ct_event!(keycode press SHIFT-End) => self.move_to_end(true).into(),
                ct_event!(key press CONTROL-'a') => self.select_all().into(),

                ct_event!(keycode release Left)
                | ct_event!(keycode release Right)
                | ct_event!(keycode release Home)
                | ct_event!(keycode release End)
                | ct_event!(keycode release SHIFT-Left)
                | ct_event!(keycode release SHIFT-Right)
                | ct_event!(keycode release SHIFT-Home)
                | ct_event!(keycode release SHIFT-End)
                | ct_event!(key release CONTROL-'a') => TextOutcome::Unchanged,

                _ => TextOutcome::Continue,
            }
        } else {
            TextOutcome::Continue
        };

        if r == TextOutcome::Continue {
            r = self.handle(event, MouseOnly);
        }
        r
    }
}

impl HandleEvent<Event, MouseOnly, TextOutcome> for MaskedFieldState {
    fn handle(&mut self, event: &Event, _keymap: MouseOnly) -> TextOutcome {
        match event {
            ct_event!(mouse any for m) if self.mouse.drag(self.inner, m) => {
                let c = (m.column as i16) - (self.inner.x as i16);
                self.set_screen_cursor(c, true).into()
            }
            ct_event!(mouse down Left for column,row) => {
                if self.inner.contains((*column, *row).into()) {
                    let c = (column - self.inner.x) as i16;
                    self.set_screen_cursor(c, false).into()
                } else {
                    TextOutcome::Continue
                }
            }
            _ => TextOutcome::Continue,
        }
    }
}

/// Handle all events.
/// Text events are only processed if focus is true.
/// Mouse events are processed if they are in range.
pub fn handle_events(state: &mut MaskedFieldState, focus: bool, event: &Event) -> TextOutcome {
    state.focus.set(focus);
    state.handle(event, Regular)
}

/// Handle only navigation events.
/// Text events are only processed if focus is true.
/// Mouse events are processed if they are in range.
pub fn handle_readonly_events(
    state: &mut MaskedFieldState,
    focus: bool,
    event: &Event,
) -> TextOutcome {
    state.focus.set(focus);
    state.handle(event, ReadOnly)
}

/// Handle only mouse-events.
pub fn handle_mouse_events(state: &mut MaskedFieldState, event: &Event) -> TextOutcome {
    state.handle(event, MouseOnly)
}
