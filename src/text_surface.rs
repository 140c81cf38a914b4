//!
//! Connects the masking engine to a host text field.
//!
//! The host implements [TextSurface] and routes every edit
//! through [process_edit]. An accepted edit replaces the
//! host's text with the cleaned up text, applies the decoration
//! changes and schedules the cursor move. The cursor is set
//! once the host has laid out the new text.
//!

use crate::decoration::DecorationDiff;
use crate::field_state::FieldState;
use crate::format_match::{EditRequest, MatchOutcome};
use crate::grapheme::{grapheme_len, replace_range};
use crate::measure::Measure;
use crate::upos_type;
use log::debug;

/// A host text field.
pub trait TextSurface: Measure {
    /// Current text. Typed graphemes only.
    fn text(&self) -> &str;

    /// Replace the text.
    fn set_text(&mut self, text: String);

    /// Move the cursor to this grapheme offset after the next
    /// layout of the text.
    fn schedule_cursor(&mut self, cursor: upos_type);

    /// Apply the decoration changes to the visual representation.
    ///
    /// Hosts that render directly from
    /// [FieldState::decorations] can ignore this.
    fn apply_decorations(&mut self, diff: &DecorationDiff) {
        _ = diff;
    }
}

/// Result of [process_edit].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Edit accepted, text and decorations changed.
    Changed,
    /// The edit doesn't fit any format.
    Rejected,
    /// The edit fits but the filter refused it.
    Vetoed,
    /// No format configured, the edit was applied as is.
    Passthrough,
}

impl EditOutcome {
    /// The text has been changed.
    pub fn is_changed(&self) -> bool {
        matches!(self, EditOutcome::Changed | EditOutcome::Passthrough)
    }
}

/// Run an edit through the masking engine and update the host.
///
/// * The replacement text is trimmed if
///   [FieldState::trim_input] is set.
/// * The filter sees edits that would be accepted and can
///   refuse them. Nothing changes for a refused edit, the
///   current format included.
/// * Without a format the untrimmed edit is applied verbatim.
pub fn process_edit<S: TextSurface>(
    field: &mut FieldState,
    surface: &mut S,
    edit: EditRequest,
    filter: Option<&mut dyn FnMut(&EditRequest) -> bool>,
) -> EditOutcome {
    let matched_edit = if field.trim_input() {
        edit.trimmed()
    } else {
        edit.clone()
    };

    match field.apply_edit(surface.text(), &matched_edit, &*surface) {
        MatchOutcome::Allowed(m) => {
            if let Some(filter) = filter {
                if !filter(&matched_edit) {
                    debug!("edit {:?} vetoed", matched_edit);
                    return EditOutcome::Vetoed;
                }
            }
            let cursor = (matched_edit.range.start + matched_edit.inserted())
                .saturating_sub(m.deleted);

            field.commit(&m);
            surface.apply_decorations(&m.diff);
            surface.set_text(m.text);
            surface.schedule_cursor(cursor);
            EditOutcome::Changed
        }
        MatchOutcome::NotAllowed => EditOutcome::Rejected,
        MatchOutcome::WithoutFormat => {
            if let Some(filter) = filter {
                if !filter(&edit) {
                    debug!("edit {:?} vetoed", edit);
                    return EditOutcome::Vetoed;
                }
            }
            let Some(text) = replace_range(surface.text(), edit.range.clone(), &edit.text) else {
                debug!("edit {:?} out of bounds", edit.range);
                return EditOutcome::Rejected;
            };
            surface.set_text(text);
            surface.schedule_cursor(edit.range.start + edit.inserted());
            EditOutcome::Passthrough
        }
    }
}

/// Replace all of the surface's text.
pub fn assign_text<S: TextSurface>(
    field: &mut FieldState,
    surface: &mut S,
    text: &str,
) -> EditOutcome {
    let edit = EditRequest::replace_all(surface.text(), text);
    process_edit(field, surface, edit, None)
}

/// Run the surface's text against the formats again after
/// a configuration change. The text is cleared if it
/// doesn't fit anymore.
pub fn revalidate<S: TextSurface>(field: &mut FieldState, surface: &mut S) {
    let old = field.decorations().clone();
    let text = field.revalidate(surface.text(), &*surface);

    let mut diff = DecorationDiff::default();
    for (key, d) in field.decorations().iter() {
        diff.to_add.insert(key, d.clone());
    }
    diff.to_remove = old
        .keys()
        .filter(|k| !diff.to_add.contains_key(k))
        .collect();
    diff.to_remove.sort_unstable();
    diff.kerning = field.decorations().kerning().to_vec();
    diff.placeholders = field.decorations().placeholders().to_vec();

    let cursor = grapheme_len(&text);
    surface.apply_decorations(&diff);
    surface.set_text(text);
    surface.schedule_cursor(cursor);
}
