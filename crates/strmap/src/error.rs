//! Error types for flat-map encoding and decoding.

use thiserror::Error;

/// Error type returned by user conversion hooks ([`TextCodec`](crate::TextCodec),
/// [`MapCodec`](crate::MapCodec)).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while encoding a record into a flat map or decoding one back.
///
/// Every error aborts the whole call. A failed decode may leave its target partially
/// written; callers should treat it as undefined.
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument (map, target, or the end of a reference chain) is absent.
    #[error("provided a nil value: {context}")]
    NilValue { context: String },

    /// The decode target cannot be written through (a shared `Rc`/`Arc` handle).
    #[error("decode target {type_name} is not a writable reference")]
    NotAPointer { type_name: &'static str },

    /// A value expected to be a record resolved to something else.
    #[error("{type_name} is not a record type")]
    NotARecord { type_name: &'static str },

    /// A leaf type has no text codec, no display, and is not a primitive.
    #[error("{type_name} doesn't implement TextCodec, Display or a primitive conversion")]
    UnsupportedType { type_name: &'static str },

    /// A leaf string failed strict parsing, or a text codec rejected it.
    #[error("cannot parse {input:?} as {type_name}: {source}")]
    Parse {
        input: String,
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// A conversion hook reported failure while producing text or a map,
    /// or while reading a map.
    #[error("conversion hook of {type_name} failed: {source}")]
    Hook {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// Decode needed to materialize or write through a reference and could not.
    #[error("cannot allocate {type_name}: {reason}")]
    Allocation {
        type_name: &'static str,
        reason: &'static str,
    },

    /// An inline record type occurs again inside its own inline path.
    #[error("inline cycle: {type_name} recurs at key {key:?}")]
    InlineCycle { type_name: &'static str, key: String },

    /// The codec configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Wraps a failure with the flat-map key being processed.
    #[error("field {key:?}: {source}")]
    Field {
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// Wraps a failure to inline a field.
    #[error("cannot inline field {key:?}, inlining requires a record: {source}")]
    Inline {
        key: String,
        #[source]
        source: Box<Error>,
    },
}

/// Category of an [`Error`], independent of the key context wrapped around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NilValue,
    NotAPointer,
    NotARecord,
    UnsupportedType,
    ParseError,
    Hook,
    AllocationError,
    InlineCycle,
    InvalidConfig,
}

impl Error {
    /// Returns the category of this error, looking through `Field` and `Inline` wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NilValue { .. } => ErrorKind::NilValue,
            Error::NotAPointer { .. } => ErrorKind::NotAPointer,
            Error::NotARecord { .. } => ErrorKind::NotARecord,
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::Parse { .. } => ErrorKind::ParseError,
            Error::Hook { .. } => ErrorKind::Hook,
            Error::Allocation { .. } => ErrorKind::AllocationError,
            Error::InlineCycle { .. } => ErrorKind::InlineCycle,
            Error::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Error::Field { source, .. } | Error::Inline { source, .. } => source.kind(),
        }
    }

    /// Attaches `key` to this error unless it already carries a key.
    pub(crate) fn at_key(self, key: &str) -> Self {
        match self {
            Error::Field { .. } | Error::Inline { .. } | Error::InlineCycle { .. } => self,
            other => Error::Field {
                key: key.to_owned(),
                source: Box::new(other),
            },
        }
    }
}

/// Convenience alias used throughout strmap.
pub type Result<T> = std::result::Result<T, Error>;
