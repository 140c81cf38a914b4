use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// How the literals of a format are shown around the input.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum RenderMode {
    /// Literals are shown left of the typed input only.
    /// Rendering stops with the last typed grapheme.
    #[default]
    LeftOnly,
    /// As LeftOnly, but the literal run following the last
    /// typed grapheme is shown too.
    LeftAndRight,
    /// The whole format is shown. Slots without input show
    /// the mapped placeholder, if any.
    ///
    /// __Precondition__: input and decorations must use glyphs
    /// of the same width. Positions are calculated as
    /// format-offset * width-of-one-glyph.
    Whole {
        placeholders: FxHashMap<char, char>,
    },
}

impl RenderMode {
    /// Whole mode without placeholders.
    pub fn whole() -> Self {
        RenderMode::Whole {
            placeholders: FxHashMap::default(),
        }
    }

    /// Whole mode with the given placeholders.
    pub fn whole_with<I: IntoIterator<Item = (char, char)>>(placeholders: I) -> Self {
        RenderMode::Whole {
            placeholders: placeholders.into_iter().collect(),
        }
    }

    #[inline]
    pub fn is_whole(&self) -> bool {
        matches!(self, RenderMode::Whole { .. })
    }

    /// Placeholder for a slot character.
    #[inline]
    pub fn placeholder(&self, slot: char) -> Option<char> {
        match self {
            RenderMode::Whole { placeholders } => placeholders.get(&slot).copied(),
            _ => None,
        }
    }
}
