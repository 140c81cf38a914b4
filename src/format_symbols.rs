//!
//! Maps the slot characters of a format pattern to the
//! characters a user can enter there.
//!
//! The default table knows
//! * `d`: a digit.
//! * `w`: a letter.
//! * `*`: anything.
//!
//! Every other character of a format is a literal and
//! is rendered as decoration.
//!

use crate::MaskError;
use crate::grapheme::{first_char, single_char};
use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Set of characters accepted by one slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, PartialEq, Eq)]
pub enum CharClass {
    /// Any numeric char.
    Digit,
    /// Any alphabetic char.
    Letter,
    /// Letters or digits.
    Alphanumeric,
    /// Everything.
    Any,
    /// Only the given chars.
    OneOf(String),
    /// Everything but the given chars.
    NoneOf(String),
}

impl Debug for CharClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CharClass::Digit => write!(f, "digit"),
            CharClass::Letter => write!(f, "letter"),
            CharClass::Alphanumeric => write!(f, "alnum"),
            CharClass::Any => write!(f, "any"),
            // a leading ^ or \ is escaped, it would read back as something else.
            CharClass::OneOf(s) if s.starts_with(['^', '\\']) => write!(f, "[\\{}]", s),
            CharClass::OneOf(s) => write!(f, "[{}]", s),
            CharClass::NoneOf(s) => write!(f, "[^{}]", s),
        }
    }
}

impl CharClass {
    /// Does the class contain the char.
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharClass::Digit => c.is_numeric(),
            CharClass::Letter => c.is_alphabetic(),
            CharClass::Alphanumeric => c.is_alphanumeric(),
            CharClass::Any => true,
            CharClass::OneOf(s) => s.contains(c),
            CharClass::NoneOf(s) => !s.contains(c),
        }
    }

    /// Parse the names used in configuration files.
    ///
    /// * `digit`, `letter`, `alnum`, `any`
    /// * `[abc]` one of the chars
    /// * `[^abc]` none of the chars
    /// * `[\^abc]` one of the chars, if the first is `^` or `\`
    ///
    /// Empty sets are not allowed.
    pub fn parse(s: &str) -> Result<Self, MaskError> {
        match s {
            "digit" => Ok(CharClass::Digit),
            "letter" => Ok(CharClass::Letter),
            "alnum" => Ok(CharClass::Alphanumeric),
            "any" => Ok(CharClass::Any),
            s if s.starts_with("[^") && s.ends_with(']') && s.len() > 3 => {
                Ok(CharClass::NoneOf(s[2..s.len() - 1].to_string()))
            }
            s if s.starts_with("[\\") && s.ends_with(']') && s.len() > 3 => {
                Ok(CharClass::OneOf(s[2..s.len() - 1].to_string()))
            }
            s if s.starts_with('[')
                && s.ends_with(']')
                && s.len() > 2
                && !s.starts_with("[^")
                && !s.starts_with("[\\") =>
            {
                Ok(CharClass::OneOf(s[1..s.len() - 1].to_string()))
            }
            s => Err(MaskError::InvalidClass(s.to_string())),
        }
    }

    /// A set without any chars.
    pub fn is_empty_set(&self) -> bool {
        match self {
            CharClass::OneOf(s) | CharClass::NoneOf(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Classification of one grapheme of a format pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Input slot with the slot char.
    Slot(char),
    /// Literal, rendered as decoration.
    Literal,
}

/// Slot characters and their accepted character classes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSymbolTable {
    symbols: FxHashMap<char, CharClass>,
}

impl Default for FormatSymbolTable {
    fn default() -> Self {
        let mut symbols = FxHashMap::default();
        symbols.insert('d', CharClass::Digit);
        symbols.insert('w', CharClass::Letter);
        symbols.insert('*', CharClass::Any);
        Self { symbols }
    }
}

impl FormatSymbolTable {
    /// Default table with `d`, `w` and `*`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table without any slot characters.
    /// Every format is then pure decoration.
    pub fn empty() -> Self {
        Self {
            symbols: FxHashMap::default(),
        }
    }

    /// Add a slot character.
    pub fn with(mut self, slot: char, class: CharClass) -> Result<Self, MaskError> {
        self.insert(slot, class)?;
        Ok(self)
    }

    /// Add or replace a slot character.
    ///
    /// Whitespace can't be used as a slot, it is trimmed from
    /// user input. Empty [OneOf](CharClass::OneOf) and
    /// [NoneOf](CharClass::NoneOf) sets are refused.
    pub fn insert(&mut self, slot: char, class: CharClass) -> Result<(), MaskError> {
        if slot.is_whitespace() {
            return Err(MaskError::InvalidSymbol(slot));
        }
        if class.is_empty_set() {
            return Err(MaskError::InvalidClass(format!("{:?}", class)));
        }
        self.symbols.insert(slot, class);
        Ok(())
    }

    /// Remove a slot character.
    pub fn remove(&mut self, slot: char) -> Option<CharClass> {
        self.symbols.remove(&slot)
    }

    /// Class for a slot.
    pub fn class(&self, slot: char) -> Option<&CharClass> {
        self.symbols.get(&slot)
    }

    /// Number of slot characters.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// No slot characters.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Is a slot character.
    #[inline]
    pub fn is_slot(&self, c: char) -> bool {
        self.symbols.contains_key(&c)
    }

    /// Classify one char of a format.
    #[inline]
    pub fn classify(&self, c: char) -> Symbol {
        if self.is_slot(c) {
            Symbol::Slot(c)
        } else {
            Symbol::Literal
        }
    }

    /// Classify one grapheme of a format.
    /// Only single-char graphemes can be slots.
    #[inline]
    pub fn classify_grapheme(&self, g: &str) -> Symbol {
        match single_char(g) {
            Some(c) => self.classify(c),
            None => Symbol::Literal,
        }
    }

    /// Can the input char be entered at the slot.
    /// Unknown slots accept nothing.
    #[inline]
    pub fn accepts(&self, slot: char, input: char) -> bool {
        match self.symbols.get(&slot) {
            Some(class) => class.contains(input),
            None => false,
        }
    }

    /// Can the input grapheme be entered at the slot.
    /// The grapheme is tested by its first char.
    #[inline]
    pub fn accepts_grapheme(&self, slot: char, input: &str) -> bool {
        match first_char(input) {
            Some(c) => self.accepts(slot, c),
            None => false,
        }
    }

    /// Iterate all slots.
    pub fn iter(&self) -> impl Iterator<Item = (char, &CharClass)> {
        self.symbols.iter().map(|(k, v)| (*k, v))
    }
}
