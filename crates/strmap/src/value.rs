//! The capability model every encodable field type implements.
//!
//! A [`Value`] answers a fixed set of capability queries: is it a primitive
//! ([`Value::scalar`]), a record ([`Value::as_record`]), does it carry one of the
//! conversion hooks ([`TextCodec`], [`MapCodec`], [`fmt::Display`]), or is it a
//! reference to another value ([`Value::referent`]). The encoder and decoder walk
//! these answers in a fixed priority order; types never pick their own path.
//!
//! Implementations are provided for the primitive types, `String`, the
//! `num_complex` complex types, and the reference wrappers `Option<T>`, `Box<T>`,
//! `Rc<T>` and `Arc<T>`. Records and custom leaves get theirs from
//! `#[derive(Record)]` and `#[derive(Value)]`.

use std::any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use num_complex::{Complex, Complex32, Complex64};

use crate::error::{BoxError, Error, Result};
use crate::record::Record;
use crate::FlatMap;

/// Self-describing textual conversion: the type renders itself to a string and
/// parses itself back.
pub trait TextCodec {
    fn to_text(&self) -> std::result::Result<String, BoxError>;

    /// Overwrite `self` with the value `text` describes.
    fn from_text(&mut self, text: &str) -> std::result::Result<(), BoxError>;
}

/// Record-level conversion: the type converts itself to and from the flat map
/// directly, replacing field-by-field traversal.
///
/// When the type sits under an inline prefix, `to_map` keys are prefixed on encode
/// and `from_map` receives only the entries under that prefix, prefix stripped.
pub trait MapCodec {
    fn to_map(&self) -> std::result::Result<FlatMap, BoxError>;

    fn from_map(&mut self, map: &FlatMap) -> std::result::Result<(), BoxError>;
}

/// A primitive value, borrowed for encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Complex32(Complex32),
    Complex64(Complex64),
    Char(char),
    Str(&'a str),
}

/// A primitive slot, borrowed for decoding.
#[derive(Debug)]
pub enum ScalarMut<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    I128(&'a mut i128),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    U128(&'a mut u128),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Complex32(&'a mut Complex32),
    Complex64(&'a mut Complex64),
    Char(&'a mut char),
    Str(&'a mut String),
}

/// What a value refers to, if it is a reference at all.
pub enum Referent<'a> {
    /// Not a reference; the value stands for itself.
    Direct,
    /// A reference to a present value.
    Present(&'a dyn Value),
    /// A reference with nothing behind it (`None`).
    Absent,
}

/// Object-safe access to a scratch zero value of the implementing type.
///
/// Types without a zero value are handed to `apply` directly, so the write
/// cannot be withheld. Implemented for every sized [`Value`]; never implement
/// it by hand.
pub trait Stage {
    /// Run `apply` against a fresh zero value and move it into `self` when
    /// `apply` returns `true`.
    fn stage(&mut self, apply: &mut dyn FnMut(&mut dyn Value) -> Result<bool>) -> Result<()>;
}

impl<T: Value> Stage for T {
    fn stage(&mut self, apply: &mut dyn FnMut(&mut dyn Value) -> Result<bool>) -> Result<()> {
        let Some(mut scratch) = T::zero() else {
            // No scratch to build, so `apply` writes straight into `self`.
            apply(self)?;
            return Ok(());
        };
        if apply(&mut scratch)? {
            *self = scratch;
        }
        Ok(())
    }
}

/// A type the codec can read from and write into.
///
/// Every capability query defaults to "not supported"; implementations override
/// the ones that apply.
pub trait Value: Stage {
    /// Concrete type name, used in error messages and as the shape cache key.
    fn type_name(&self) -> &'static str {
        any::type_name::<Self>()
    }

    /// Whether `self` equals the type's zero value.
    fn is_zero(&self) -> bool;

    /// The type's zero value, or `None` if the type has none the codec may build.
    fn zero() -> Option<Self>
    where
        Self: Sized;

    fn scalar(&self) -> Option<Scalar<'_>> {
        None
    }

    fn scalar_mut(&mut self) -> Option<ScalarMut<'_>> {
        None
    }

    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    fn as_map_codec(&self) -> Option<&dyn MapCodec> {
        None
    }

    fn as_map_codec_mut(&mut self) -> Option<&mut dyn MapCodec> {
        None
    }

    fn as_text_codec(&self) -> Option<&dyn TextCodec> {
        None
    }

    fn as_text_codec_mut(&mut self) -> Option<&mut dyn TextCodec> {
        None
    }

    fn as_display(&self) -> Option<&dyn fmt::Display> {
        None
    }

    fn referent(&self) -> Referent<'_> {
        Referent::Direct
    }

    /// The referenced value for writing. Absent references are filled with the
    /// referent's zero value first.
    fn referent_mut(&mut self) -> Result<&mut dyn Value> {
        Err(Error::Allocation {
            type_name: self.type_name(),
            reason: "not a reference",
        })
    }

    /// Call `f` with a zero value of the referenced type. Only meaningful when
    /// [`Value::referent`] is [`Referent::Absent`].
    fn visit_zero_referent(&self, _f: &mut dyn FnMut(&dyn Value) -> Result<()>) -> Result<()> {
        Err(Error::NilValue {
            context: format!("{} refers to nothing", self.type_name()),
        })
    }

    fn is_reference(&self) -> bool {
        !matches!(self.referent(), Referent::Direct)
    }
}

/// True for values the encoder and decoder may treat as a record.
pub(crate) fn is_record_like(value: &dyn Value) -> bool {
    value.as_map_codec().is_some() || value.as_record().is_some()
}

/// Follow a reference chain to its end. `None` when it ends in an absent reference.
pub(crate) fn resolve(mut value: &dyn Value) -> Option<&dyn Value> {
    loop {
        match value.referent() {
            Referent::Direct => return Some(value),
            Referent::Present(inner) => value = inner,
            Referent::Absent => return None,
        }
    }
}

/// Follow a reference chain, substituting the referent's zero value for an
/// absent reference, and hand the end of the chain to `f`.
pub(crate) fn visit_resolved(
    value: &dyn Value,
    f: &mut dyn FnMut(&dyn Value) -> Result<()>,
) -> Result<()> {
    match value.referent() {
        Referent::Direct => f(value),
        Referent::Present(inner) => visit_resolved(inner, f),
        Referent::Absent => {
            value.visit_zero_referent(&mut |zero: &dyn Value| visit_resolved(zero, f))
        }
    }
}

/// Follow a reference chain for writing, materializing absent references.
pub(crate) fn materialize(mut value: &mut dyn Value) -> Result<&mut dyn Value> {
    while value.is_reference() {
        value = value.referent_mut()?;
    }
    Ok(value)
}

/// Zero test for primitives. Floats compare by bit pattern, so `-0.0` is not zero.
pub(crate) trait PrimitiveZero {
    fn is_primitive_zero(&self) -> bool;
}

macro_rules! impl_primitive_zero {
    (eq: $($ty:ty),*) => {$(
        impl PrimitiveZero for $ty {
            fn is_primitive_zero(&self) -> bool {
                *self == <$ty>::default()
            }
        }
    )*};
    (bits: $($ty:ty),*) => {$(
        impl PrimitiveZero for $ty {
            fn is_primitive_zero(&self) -> bool {
                self.to_bits() == 0
            }
        }
    )*};
}

impl_primitive_zero!(eq: bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char);
impl_primitive_zero!(bits: f32, f64);

impl<T: PrimitiveZero> PrimitiveZero for Complex<T> {
    fn is_primitive_zero(&self) -> bool {
        self.re.is_primitive_zero() && self.im.is_primitive_zero()
    }
}

impl PrimitiveZero for String {
    fn is_primitive_zero(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! impl_scalar_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Value for $ty {
            fn is_zero(&self) -> bool {
                self.is_primitive_zero()
            }

            fn zero() -> Option<Self> {
                Some(<$ty>::default())
            }

            fn scalar(&self) -> Option<Scalar<'_>> {
                Some(Scalar::$variant(*self))
            }

            fn scalar_mut(&mut self) -> Option<ScalarMut<'_>> {
                Some(ScalarMut::$variant(self))
            }
        }
    )*};
}

impl_scalar_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Complex32 => Complex32,
    Complex64 => Complex64,
    char => Char,
}

impl Value for String {
    fn is_zero(&self) -> bool {
        self.is_primitive_zero()
    }

    fn zero() -> Option<Self> {
        Some(String::new())
    }

    fn scalar(&self) -> Option<Scalar<'_>> {
        Some(Scalar::Str(self))
    }

    fn scalar_mut(&mut self) -> Option<ScalarMut<'_>> {
        Some(ScalarMut::Str(self))
    }
}

impl<T: Value> Value for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn zero() -> Option<Self> {
        Some(None)
    }

    fn referent(&self) -> Referent<'_> {
        match self {
            Some(value) => Referent::Present(value),
            None => Referent::Absent,
        }
    }

    fn referent_mut(&mut self) -> Result<&mut dyn Value> {
        let value = match self.take() {
            Some(value) => value,
            None => T::zero().ok_or(Error::Allocation {
                type_name: any::type_name::<T>(),
                reason: "type has no zero value to allocate",
            })?,
        };
        Ok(self.insert(value))
    }

    fn visit_zero_referent(&self, f: &mut dyn FnMut(&dyn Value) -> Result<()>) -> Result<()> {
        let zero = T::zero().ok_or_else(|| Error::NilValue {
            context: format!("absent {} has no zero value", any::type_name::<T>()),
        })?;
        f(&zero)
    }
}

impl<T: Value> Value for Box<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn zero() -> Option<Self> {
        T::zero().map(Box::new)
    }

    fn referent(&self) -> Referent<'_> {
        Referent::Present(&**self)
    }

    fn referent_mut(&mut self) -> Result<&mut dyn Value> {
        Ok(&mut **self)
    }
}

macro_rules! impl_shared_value {
    ($($handle:ident),*) => {$(
        impl<T: Value> Value for $handle<T> {
            fn is_zero(&self) -> bool {
                (**self).is_zero()
            }

            fn zero() -> Option<Self> {
                T::zero().map($handle::new)
            }

            fn referent(&self) -> Referent<'_> {
                Referent::Present(&**self)
            }

            fn referent_mut(&mut self) -> Result<&mut dyn Value> {
                match $handle::get_mut(self) {
                    Some(value) => Ok(value),
                    None => Err(Error::Allocation {
                        type_name: any::type_name::<T>(),
                        reason: concat!("shared ", stringify!($handle), " handle has other owners"),
                    }),
                }
            }
        }
    )*};
}

impl_shared_value!(Rc, Arc);
