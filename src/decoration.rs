//!
//! Decorations are the rendered runs of format literals.
//!
//! Each run is identified by its offset in the format. After
//! each accepted edit a [DecorationDiff] describes which
//! runs are new, which only moved and which are gone.
//! The host applies the diff to its own representation.
//!
//! [Decorations] is the arena keeping the current state.
//!

use crate::upos_type;
use rustc_hash::FxHashMap;

/// One rendered literal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Literal text.
    pub text: Box<str>,
    /// x-position relative to the start of the field.
    pub x: upos_type,
}

/// Advisory extra space after an input grapheme.
///
/// The decoration following the grapheme needs that much room.
/// Only needed by hosts that lay out input and decorations
/// in one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kerning {
    /// Grapheme index into the text.
    pub index: upos_type,
    /// Width of the following decoration.
    pub width: upos_type,
}

/// Placeholder for an unfilled slot in
/// [RenderMode::Whole](crate::RenderMode::Whole).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Format offset of the slot.
    pub offset: upos_type,
    /// Placeholder glyph.
    pub text: Box<str>,
    /// x-position relative to the start of the field.
    pub x: upos_type,
}

/// Changes to the decorations.
///
/// `to_add` and `to_move` are disjoint. Every existing decoration
/// in neither of them is listed in `to_remove`. An entry in `to_add`
/// for an existing key replaces that decoration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecorationDiff {
    /// New decorations.
    pub to_add: FxHashMap<upos_type, Decoration>,
    /// Existing decorations with a new x-position.
    pub to_move: FxHashMap<upos_type, upos_type>,
    /// Decorations that are gone. Sorted.
    pub to_remove: Vec<upos_type>,
    /// Spacing after input graphemes.
    pub kerning: Vec<Kerning>,
    /// Complete list of placeholders. Replaces the old list.
    pub placeholders: Vec<Placeholder>,
}

impl DecorationDiff {
    /// Register a literal run at the given format offset.
    ///
    /// Reuses an existing decoration with the same text,
    /// otherwise creates a new one.
    pub(crate) fn register(
        &mut self,
        existing: &Decorations,
        key: upos_type,
        text: &str,
        x: upos_type,
    ) {
        match existing.get(key) {
            Some(d) if d.text.as_ref() == text => {
                self.to_add.remove(&key);
                self.to_move.insert(key, x);
            }
            _ => {
                self.to_move.remove(&key);
                self.to_add.insert(
                    key,
                    Decoration {
                        text: text.into(),
                        x,
                    },
                );
            }
        }
    }

    /// Calculate the removed decorations.
    pub(crate) fn finish(&mut self, existing: &Decorations) {
        self.to_remove = existing
            .keys()
            .filter(|k| !self.to_add.contains_key(k) && !self.to_move.contains_key(k))
            .collect();
        self.to_remove.sort_unstable();
    }

    /// Nothing to do.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty()
            && self.to_move.is_empty()
            && self.to_remove.is_empty()
            && self.kerning.is_empty()
            && self.placeholders.is_empty()
    }

    /// Kerning after the given grapheme.
    pub fn kerning_at(&self, index: upos_type) -> upos_type {
        kerning_at(&self.kerning, index)
    }
}

fn kerning_at(kerning: &[Kerning], index: upos_type) -> upos_type {
    kerning
        .iter()
        .filter(|k| k.index == index)
        .map(|k| k.width)
        .sum()
}

/// Current decorations, keyed by format offset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decorations {
    decorations: FxHashMap<upos_type, Decoration>,
    kerning: Vec<Kerning>,
    placeholders: Vec<Placeholder>,
}

impl Decorations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoration for the format offset.
    #[inline]
    pub fn get(&self, key: upos_type) -> Option<&Decoration> {
        self.decorations.get(&key)
    }

    /// All keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = upos_type> + '_ {
        self.decorations.keys().copied()
    }

    /// All decorations sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (upos_type, &Decoration)> {
        let mut v = self
            .decorations
            .iter()
            .map(|(k, v)| (*k, v))
            .collect::<Vec<_>>();
        v.sort_by_key(|(k, _)| *k);
        v.into_iter()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Current placeholders.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Current kerning.
    pub fn kerning(&self) -> &[Kerning] {
        &self.kerning
    }

    /// Kerning after the given grapheme.
    pub fn kerning_at(&self, index: upos_type) -> upos_type {
        kerning_at(&self.kerning, index)
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.decorations.clear();
        self.kerning.clear();
        self.placeholders.clear();
    }

    /// Apply the changes.
    pub fn apply(&mut self, diff: &DecorationDiff) {
        for key in &diff.to_remove {
            self.decorations.remove(key);
        }
        for (key, d) in &diff.to_add {
            self.decorations.insert(*key, d.clone());
        }
        for (key, x) in &diff.to_move {
            if let Some(d) = self.decorations.get_mut(key) {
                d.x = *x;
            }
        }
        self.kerning.clone_from(&diff.kerning);
        self.placeholders.clone_from(&diff.placeholders);
    }
}
