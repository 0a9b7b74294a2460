//! # strmap
//!
//! Bidirectional codec between Rust structs and a flat `HashMap<String, String>`.
//!
//! Flat string maps are what key-value stores, environment variables, form
//! payloads and tag sets can carry. `strmap` projects a record into such a map
//! and reconstructs a record from one, flattening nested records with dotted
//! keys.
//!
//! ## Quick start
//!
//! ```rust
//! use strmap::{decode, encode, Record};
//!
//! #[derive(Record, Debug, Default, PartialEq)]
//! struct Database {
//!     pub url: String,
//!     #[strmap(",omitempty")]
//!     pub pool: u32,
//! }
//!
//! #[derive(Record, Debug, Default, PartialEq)]
//! struct Settings {
//!     #[strmap("name")]
//!     pub service_name: String,
//!     #[strmap("db,inline")]
//!     pub database: Database,
//!     #[strmap("-")]
//!     pub scratch: String,
//! }
//!
//! let settings = Settings {
//!     service_name: "billing".into(),
//!     database: Database { url: "postgres://db".into(), pool: 0 },
//!     scratch: "never stored".into(),
//! };
//! let map = encode(&settings).unwrap();
//! assert_eq!(map.len(), 2);
//! assert_eq!(map["name"], "billing");
//! assert_eq!(map["db.url"], "postgres://db");
//!
//! let mut back = Settings::default();
//! decode(&map, &mut back).unwrap();
//! assert_eq!(back.database, settings.database);
//! ```
//!
//! ## Modules
//!
//! - [`directive`]: `#[strmap("...")]` annotation parsing
//! - [`value`]: the [`Value`] capability trait and the conversion hooks
//! - [`record`]: the [`Record`] trait and the shape cache
//! - [`scalar`]: leaf string conversion
//! - [`encoder`]: record → flat map
//! - [`decoder`]: flat map → record
//! - [`config`]: [`Config`] and [`Codec`]
//! - [`error`]: error types

extern crate self as strmap;

use std::collections::HashMap;

pub mod config;
pub mod decoder;
pub mod directive;
pub mod encoder;
pub mod error;
pub mod record;
pub mod scalar;
pub mod value;

pub use config::{Codec, Config};
pub use directive::Directive;
pub use error::{BoxError, Error, ErrorKind, Result};
pub use record::{FieldDef, Record};
pub use value::{MapCodec, Referent, Scalar, ScalarMut, TextCodec, Value};

pub use num_complex::{Complex32, Complex64};
pub use strmap_derive::{Record, Value};

/// The flat interchange format: string keys to string values.
pub type FlatMap = HashMap<String, String>;

/// Encode a record into a flat map with the default [`Config`].
///
/// `value` may be a record or any `Option`/`Box`/`Rc`/`Arc` chain ending in one.
pub fn encode(value: &dyn Value) -> Result<FlatMap> {
    Codec::default().encode(value)
}

/// Decode a flat map into `target` with the default [`Config`].
///
/// Both arguments accept `None` so that absent inputs surface as
/// [`ErrorKind::NilValue`] rather than being unrepresentable:
///
/// ```rust
/// use strmap::{decode, ErrorKind, FlatMap, Record};
///
/// #[derive(Record, Default)]
/// struct Empty {}
///
/// let err = decode(None::<&FlatMap>, &mut Empty::default()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NilValue);
/// let err = decode(&FlatMap::new(), None::<&mut Empty>).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NilValue);
/// ```
pub fn decode<'m, 't, T>(
    data: impl Into<Option<&'m FlatMap>>,
    target: impl Into<Option<&'t mut T>>,
) -> Result<()>
where
    T: Value + 't,
{
    Codec::default().decode(data, target)
}
