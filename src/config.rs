//!
//! Serializable field configuration.
//!
//! ```json
//! {
//!   "formats": ["+7(ddd)ddd-dd-dd", "ddd-ddd"],
//!   "symbols": { "7": "[7]", "x": "[0123456789abcdef]" },
//!   "mode": "LeftAndRight"
//! }
//! ```
//!
//! Character classes are given by name, see [CharClass::parse].
//!

use crate::MaskError;
use crate::field_state::FieldState;
use crate::format_symbols::{CharClass, FormatSymbolTable};
use crate::render_mode::RenderMode;
use crate::upos_type;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Format patterns in fallback order.
    pub formats: Vec<String>,
    /// Start with the default slot characters `d`, `w` and `*`.
    pub default_symbols: bool,
    /// Additional slot characters with the name of the
    /// character class.
    pub symbols: BTreeMap<char, String>,
    pub mode: RenderMode,
    pub inset: upos_type,
    pub trailing_literals: bool,
    pub trim_input: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            formats: Default::default(),
            default_symbols: true,
            symbols: Default::default(),
            mode: Default::default(),
            inset: 0,
            trailing_literals: true,
            trim_input: true,
        }
    }
}

impl FieldConfig {
    /// Build the slot characters.
    pub fn symbol_table(&self) -> Result<FormatSymbolTable, MaskError> {
        let mut table = if self.default_symbols {
            FormatSymbolTable::new()
        } else {
            FormatSymbolTable::empty()
        };
        for (slot, class) in &self.symbols {
            table.insert(*slot, CharClass::parse(class)?)?;
        }
        Ok(table)
    }

    /// Create the field state.
    ///
    /// The host must still revalidate its text.
    pub fn build(&self) -> Result<FieldState, MaskError> {
        let mut field = FieldState::new();
        field.set_symbols(self.symbol_table()?);
        field.set_formats(self.formats.iter().cloned());
        field.set_render_mode(self.mode.clone());
        field.set_inset(self.inset);
        field.set_trailing_literals(self.trailing_literals);
        field.set_trim_input(self.trim_input);
        Ok(field)
    }
}

impl From<&FieldState> for FieldConfig {
    /// Configuration of an existing field.
    ///
    /// Character classes are written by name.
    fn from(field: &FieldState) -> Self {
        let defaults = FormatSymbolTable::new();
        let default_symbols = defaults
            .iter()
            .all(|(slot, class)| field.symbols().class(slot) == Some(class));

        let symbols = field
            .symbols()
            .iter()
            .filter(|(slot, class)| !default_symbols || defaults.class(*slot) != Some(*class))
            .map(|(slot, class)| (slot, format!("{:?}", class)))
            .collect();

        Self {
            formats: field.formats().map(|v| v.to_string()).collect(),
            default_symbols,
            symbols,
            mode: field.render_mode().clone(),
            inset: field.inset(),
            trailing_literals: field.trailing_literals(),
            trim_input: field.trim_input(),
        }
    }
}
