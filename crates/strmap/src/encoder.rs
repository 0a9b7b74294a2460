//! Encoder: flattens a record into a `FlatMap`.
//!
//! Fields are visited depth-first in declaration order. Each visible field is
//! either skipped (ignored, or zero under `omitempty`), flattened (`inline`,
//! keys composed as `outer.inner`), or converted to a string by the
//! [`scalar`](crate::scalar) layer. A type implementing
//! [`MapCodec`](crate::MapCodec) replaces traversal of its subtree entirely.
//!
//! # Example
//! ```
//! use strmap::{encode, Record};
//!
//! #[derive(Record)]
//! struct Server {
//!     pub host: String,
//!     #[strmap("listen_port")]
//!     pub port: u16,
//! }
//!
//! let map = encode(&Server { host: "localhost".into(), port: 8080 }).unwrap();
//! assert_eq!(map["host"], "localhost");
//! assert_eq!(map["listen_port"], "8080");
//! ```

use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::shape_of;
use crate::scalar;
use crate::value::{is_record_like, resolve, visit_resolved, Value};
use crate::FlatMap;

/// Encode `value` into a new flat map using `config`.
///
/// `value` may be a record, a `MapCodec`, or any chain of `Option`/`Box`/`Rc`/`Arc`
/// ending in one. An absent reference fails with `NilValue`; anything else fails
/// with `NotARecord`.
pub fn encode(config: &Config, value: &dyn Value) -> Result<FlatMap> {
    let root = resolve(value).ok_or_else(|| Error::NilValue {
        context: format!("{} resolves to nothing", value.type_name()),
    })?;
    if !is_record_like(root) {
        return Err(Error::NotARecord {
            type_name: root.type_name(),
        });
    }

    let mut encoder = Encoder {
        separator: &config.separator,
        out: FlatMap::new(),
        path: vec![root.type_name()],
    };
    encoder.encode_record(root, "")?;
    Ok(encoder.out)
}

struct Encoder<'c> {
    separator: &'c str,
    out: FlatMap,
    /// Record types on the current inline path, root first.
    path: Vec<&'static str>,
}

impl Encoder<'_> {
    fn encode_record(&mut self, value: &dyn Value, prefix: &str) -> Result<()> {
        if let Some(codec) = value.as_map_codec() {
            debug!(record = value.type_name(), prefix, "encoding through MapCodec");
            let map = codec.to_map().map_err(|source| Error::Hook {
                type_name: value.type_name(),
                source,
            })?;
            self.out
                .extend(map.into_iter().map(|(key, text)| (format!("{prefix}{key}"), text)));
            return Ok(());
        }

        let record = value.as_record().ok_or(Error::NotARecord {
            type_name: value.type_name(),
        })?;
        let shape = shape_of(record);
        for field in shape.fields() {
            let directive = &field.directive;
            let key = format!("{prefix}{}", field.key());
            if directive.ignored {
                trace!(field = field.name, "ignored");
                continue;
            }
            let Some(value) = record.field(field.index) else {
                continue;
            };
            if directive.omit_empty && value.is_zero() {
                trace!(key = key.as_str(), "omitted empty value");
                continue;
            }

            if directive.inline {
                visit_resolved(value, &mut |resolved: &dyn Value| {
                    self.encode_inline(resolved, &key)
                })
                .map_err(|err| err.at_key(&key))?;
            } else {
                let text = encode_leaf(value).map_err(|err| err.at_key(&key))?;
                self.out.insert(key, text);
            }
        }
        Ok(())
    }

    fn encode_inline(&mut self, value: &dyn Value, key: &str) -> Result<()> {
        let type_name = value.type_name();
        if !is_record_like(value) {
            return Err(Error::Inline {
                key: key.to_owned(),
                source: Box::new(Error::NotARecord { type_name }),
            });
        }
        if self.path.contains(&type_name) {
            return Err(Error::InlineCycle {
                type_name,
                key: key.to_owned(),
            });
        }

        self.path.push(type_name);
        let prefix = format!("{key}{}", self.separator);
        self.encode_record(value, &prefix)?;
        self.path.pop();
        Ok(())
    }
}

fn encode_leaf(value: &dyn Value) -> Result<String> {
    let mut text = None;
    visit_resolved(value, &mut |resolved: &dyn Value| {
        text = Some(scalar::to_text(resolved)?);
        Ok(())
    })?;
    text.ok_or(Error::UnsupportedType {
        type_name: value.type_name(),
    })
}
