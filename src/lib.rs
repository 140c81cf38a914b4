#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

#[cfg(feature = "serde")]
pub mod config;
pub mod decoration;
pub mod extract;
pub mod field_state;
pub mod format_match;
pub mod format_symbols;
pub mod masked_field;
pub mod measure;
pub mod render_mode;
pub mod string_surface;
pub mod text_surface;

mod grapheme;

pub use decoration::{DecorationDiff, Decorations};
pub use extract::{extract_typed, formatted_text};
pub use field_state::FieldState;
pub use format_match::{EditRequest, FormatMatcher, Match, MatchOutcome};
pub use format_symbols::{CharClass, FormatSymbolTable, Symbol};
pub use measure::{CellWidth, GlyphClass, Measure};
pub use render_mode::RenderMode;
pub use text_surface::{EditOutcome, TextSurface, process_edit};

pub use rat_cursor::{HasScreenCursor, impl_screen_cursor, screen_cursor};

pub mod event {
    //!
    //! Event-handler traits and Keybindings.
    //!

    pub use rat_event::*;

    /// Runs only the navigation events, not any editing.
    #[derive(Debug)]
    pub struct ReadOnly;

    /// Result of event handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum TextOutcome {
        /// The given event has not been used at all.
        Continue,
        /// The event has been recognized, but the result was nil.
        /// Further processing for this event may stop.
        Unchanged,
        /// The event has been recognized and there is some change
        /// due to it.
        /// Further processing for this event may stop.
        /// Rendering the ui is advised.
        Changed,
        /// Text content has changed.
        TextChanged,
    }

    impl ConsumedEvent for TextOutcome {
        fn is_consumed(&self) -> bool {
            *self != TextOutcome::Continue
        }
    }

    // Useful for converting most navigation/edit results.
    impl From<bool> for TextOutcome {
        fn from(value: bool) -> Self {
            if value {
                TextOutcome::Changed
            } else {
                TextOutcome::Unchanged
            }
        }
    }

    impl From<Outcome> for TextOutcome {
        fn from(value: Outcome) -> Self {
            match value {
                Outcome::Continue => TextOutcome::Continue,
                Outcome::Unchanged => TextOutcome::Unchanged,
                Outcome::Changed => TextOutcome::Changed,
            }
        }
    }

    impl From<TextOutcome> for Outcome {
        fn from(value: TextOutcome) -> Self {
            match value {
                TextOutcome::Continue => Outcome::Continue,
                TextOutcome::Unchanged => Outcome::Unchanged,
                TextOutcome::Changed => Outcome::Changed,
                TextOutcome::TextChanged => Outcome::Changed,
            }
        }
    }
}

/// Configuration errors.
///
/// Edits never fail with an error, a rejected edit is
/// [MatchOutcome::NotAllowed].
#[derive(Debug, PartialEq)]
pub enum MaskError {
    /// A slot character can't be used. Slot characters must be
    /// single chars and can't be used as placeholders for whitespace.
    InvalidSymbol(char),
    /// Unknown character class name.
    InvalidClass(String),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

/// Grapheme index type.
///
/// Used for edit ranges, cursor offsets, format offsets
/// and x-positions measured in terminal cells.
#[allow(non_camel_case_types)]
pub type upos_type = u32;

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
