//! Encoder and decoder options.

use serde::Deserialize;

/// Options for [`IgbinaryEncoder`](crate::IgbinaryEncoder).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeOptions {
    /// Emit repeated non-empty strings as back-references to their first
    /// occurrence. Class names are always interned.
    pub compact_strings: bool,
    /// Maximum nesting of arrays and objects. `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compact_strings: true,
            max_depth: None,
        }
    }
}

/// Options for [`IgbinaryDecoder`](crate::IgbinaryDecoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Maximum nesting of arrays, objects and shared cells. `None` means
    /// unbounded, in which case hostile input can exhaust the stack.
    pub max_depth: Option<usize>,
}
