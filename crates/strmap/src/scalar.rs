//! Leaf conversion between a single value and its string form.
//!
//! Encoding tries, in order: [`TextCodec`](crate::TextCodec), [`Display`](std::fmt::Display),
//! then the primitive formatting below. Decoding tries `TextCodec`, then strict
//! primitive parsing. Display-only types are write-only.
//!
//! Primitive formats:
//!
//! - `bool` → `true` / `false`
//! - integers → decimal, no padding or separators
//! - floats → shortest representation that parses back to the same value, no exponent
//! - complex → `(re+imi)`, components formatted like floats, sign always shown
//! - `char`, `String` → verbatim

use std::any;
use std::fmt::Display;
use std::str::FromStr;

use num_complex::Complex;

use crate::error::{Error, Result};
use crate::value::{PrimitiveZero, Scalar, ScalarMut, Value};

/// Render a resolved leaf value as a string.
pub fn to_text(value: &dyn Value) -> Result<String> {
    if let Some(codec) = value.as_text_codec() {
        return codec.to_text().map_err(|source| Error::Hook {
            type_name: value.type_name(),
            source,
        });
    }
    if let Some(display) = value.as_display() {
        return Ok(display.to_string());
    }
    if let Some(scalar) = value.scalar() {
        return Ok(format_scalar(scalar));
    }
    Err(Error::UnsupportedType {
        type_name: value.type_name(),
    })
}

/// Parse `text` into a resolved leaf value.
///
/// With `omit_empty`, a text that parses to the zero value leaves `value` untouched.
pub fn from_text(value: &mut dyn Value, text: &str, omit_empty: bool) -> Result<()> {
    if value.as_text_codec_mut().is_some() {
        if !omit_empty {
            return decode_text(value, text);
        }
        return value.stage(&mut |scratch: &mut dyn Value| {
            decode_text(scratch, text)?;
            Ok(!scratch.is_zero())
        });
    }
    if let Some(slot) = value.scalar_mut() {
        return parse_scalar(slot, text, omit_empty);
    }
    Err(Error::UnsupportedType {
        type_name: value.type_name(),
    })
}

fn decode_text(value: &mut dyn Value, text: &str) -> Result<()> {
    let type_name = value.type_name();
    match value.as_text_codec_mut() {
        Some(codec) => codec.from_text(text).map_err(|source| Error::Parse {
            input: text.to_owned(),
            type_name,
            source,
        }),
        None => Err(Error::UnsupportedType { type_name }),
    }
}

/// Format a primitive value.
pub fn format_scalar(scalar: Scalar<'_>) -> String {
    match scalar {
        Scalar::Bool(v) => v.to_string(),
        Scalar::I8(v) => v.to_string(),
        Scalar::I16(v) => v.to_string(),
        Scalar::I32(v) => v.to_string(),
        Scalar::I64(v) => v.to_string(),
        Scalar::I128(v) => v.to_string(),
        Scalar::Isize(v) => v.to_string(),
        Scalar::U8(v) => v.to_string(),
        Scalar::U16(v) => v.to_string(),
        Scalar::U32(v) => v.to_string(),
        Scalar::U64(v) => v.to_string(),
        Scalar::U128(v) => v.to_string(),
        Scalar::Usize(v) => v.to_string(),
        // Display for floats is already the shortest round-trip form without exponent.
        Scalar::F32(v) => v.to_string(),
        Scalar::F64(v) => v.to_string(),
        Scalar::Complex32(v) => format_complex(v),
        Scalar::Complex64(v) => format_complex(v),
        Scalar::Char(v) => v.to_string(),
        Scalar::Str(v) => v.to_owned(),
    }
}

fn format_complex<T: Display>(value: Complex<T>) -> String {
    let im = value.im.to_string();
    let sign = if im.starts_with(['-', '+']) { "" } else { "+" };
    format!("({}{}{}i)", value.re, sign, im)
}

/// Parse `text` into a primitive slot.
pub fn parse_scalar(slot: ScalarMut<'_>, text: &str, omit_empty: bool) -> Result<()> {
    match slot {
        ScalarMut::Bool(v) => assign(v, parse_bool(text)?, omit_empty),
        ScalarMut::I8(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::I16(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::I32(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::I64(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::I128(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::Isize(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::U8(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::U16(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::U32(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::U64(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::U128(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::Usize(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::F32(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::F64(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::Complex32(v) => assign(v, parse_complex(text)?, omit_empty),
        ScalarMut::Complex64(v) => assign(v, parse_complex(text)?, omit_empty),
        ScalarMut::Char(v) => assign(v, parse_number(text)?, omit_empty),
        ScalarMut::Str(v) => assign(v, text.to_owned(), omit_empty),
    }
}

fn assign<T: PrimitiveZero>(slot: &mut T, parsed: T, omit_empty: bool) -> Result<()> {
    if !(omit_empty && parsed.is_primitive_zero()) {
        *slot = parsed;
    }
    Ok(())
}

fn parse_error<T>(text: &str, reason: impl Into<crate::BoxError>) -> Error {
    Error::Parse {
        input: text.to_owned(),
        type_name: any::type_name::<T>(),
        source: reason.into(),
    }
}

/// Strict `FromStr` parsing: no surrounding whitespace, range-checked.
fn parse_number<T>(text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse()
        .map_err(|err| parse_error::<T>(text, Box::new(err) as crate::BoxError))
}

fn parse_bool(text: &str) -> Result<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(parse_error::<bool>(text, "invalid boolean syntax")),
    }
}

/// Parse `(re+imi)`, `re+imi`, `re` or `imi`.
fn parse_complex<T>(text: &str) -> Result<Complex<T>>
where
    Complex<T>: FromStr,
    <Complex<T> as FromStr>::Err: Display,
{
    let inner = match text.strip_prefix('(') {
        Some(rest) => rest
            .strip_suffix(')')
            .ok_or_else(|| parse_error::<Complex<T>>(text, "unbalanced parentheses"))?,
        None => text,
    };
    inner
        .parse::<Complex<T>>()
        .map_err(|err| parse_error::<Complex<T>>(text, err.to_string()))
}
