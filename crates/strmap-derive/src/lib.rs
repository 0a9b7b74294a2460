//! Derive macros for the `strmap` codec.
//!
//! - [`Record`]: a struct with named fields, walked field by field
//! - [`Value`]: a custom leaf type converted through its own hooks
//!
//! Both read the `#[strmap(...)]` attribute.
//!
//! ## Field annotations (`Record` only)
//!
//! ```rust, ignore
//! #[derive(Record)]
//! struct Example {
//!     #[strmap("customName")]          // keyed "customName"
//!     pub renamed: String,
//!     #[strmap(",omitempty")]          // keyed "skipped", omitted when zero
//!     pub skipped: u32,
//!     #[strmap("-")]                   // ignored, any type
//!     pub ignored: Vec<String>,
//!     #[strmap("-,")]                  // keyed "-"
//!     pub dash: String,
//!     #[strmap("inner,inline")]        // flattened as "inner.<field>"
//!     pub inner: Inner,
//!     private: Vec<u8>,                // never visited
//! }
//! ```
//!
//! The annotation string is stored verbatim and parsed by the runtime. A field
//! annotated exactly `"-"` gets no accessor, so its type need not implement
//! `Value`. Like a private field, it leaves the record without a zero value
//! unless the type is marked `#[strmap(default)]`.
//!
//! ## Container flags
//!
//! `#[strmap(text, display, map, default)]` on the type:
//!
//! - `text`: the type implements `strmap::TextCodec`
//! - `display`: the type implements `Display` (encode-only)
//! - `map`: the type implements `strmap::MapCodec`
//! - `default`: the zero value is `Default::default()`. For `Value` this also
//!   derives `is_zero` from `PartialEq`, so the type must implement both.
//!
//! `derive(Value)` requires at least one of `text`, `display` or `map`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, parse_quote, DeriveInput, Generics};

static ATTRIBUTE_NAME: &str = "strmap";

mod attrs;
mod record;
mod value;

#[proc_macro_derive(Record, attributes(strmap))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Value, attributes(strmap))]
pub fn derive_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    value::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Clone `generics`, requiring every type parameter to implement `strmap::Value`.
pub(crate) fn with_value_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: ::strmap::Value));
    }
    generics
}
