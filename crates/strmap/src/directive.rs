//! Per-field directives, parsed from the `#[strmap("...")]` annotation string.
//!
//! # Syntax
//!
//! ```text
//! <directive> ::= "-"                              ; ignore field entirely
//!               | <name>? ("," <option>)*           ; empty name => field's own name
//! <option>    ::= "inline" | "omitempty" | <other>  ; unknown options are ignored
//! ```
//!
//! - `"customName"`: the field is keyed `customName`
//! - `"customName,omitempty"`: same, but skipped when zero
//! - `",omitempty"`: keyed by the field name, skipped when zero
//! - `"-"`: the field is ignored
//! - `"-,"`: the field is keyed `-`
//! - `"customName,inline"`: the field is a record flattened as `customName.<inner>`

/// Annotation that excludes a field from encoding and decoding.
pub const IGNORE: &str = "-";

const TOKEN_SEPARATOR: char = ',';
const OPTION_INLINE: &str = "inline";
const OPTION_OMIT_EMPTY: &str = "omitempty";

/// Parsed behavior of a single record field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// Target key; empty means the field's own name.
    pub name: String,
    /// The field never appears in a map and is never read from one.
    pub ignored: bool,
    /// The field is a nested record flattened with dotted keys.
    pub inline: bool,
    /// The field is skipped on encode when zero, and left untouched on decode
    /// when the incoming value parses to zero.
    pub omit_empty: bool,
}

impl Directive {
    /// Parse an annotation. `None` and `Some("")` both yield the default directive.
    pub fn parse(tag: Option<&str>) -> Self {
        let tag = match tag {
            Some(tag) if !tag.is_empty() => tag,
            _ => return Self::default(),
        };
        // Only a bare "-" ignores; "-," renames the field to "-".
        if tag == IGNORE {
            return Self {
                ignored: true,
                ..Self::default()
            };
        }

        let mut tokens = tag.split(TOKEN_SEPARATOR);
        let mut directive = Self {
            name: tokens.next().unwrap_or_default().to_owned(),
            ..Self::default()
        };
        for option in tokens {
            match option {
                OPTION_INLINE => directive.inline = true,
                OPTION_OMIT_EMPTY => directive.omit_empty = true,
                _ => {}
            }
        }
        directive
    }

    /// The key this directive gives a field called `field_name`.
    pub fn key_for<'a>(&'a self, field_name: &'a str) -> &'a str {
        if self.name.is_empty() {
            field_name
        } else {
            &self.name
        }
    }
}
