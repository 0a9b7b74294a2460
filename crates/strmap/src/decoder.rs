//! Decoder: writes a `FlatMap` back into a record.
//!
//! The decoder mirrors the encoder's traversal over the target's shape. Keys
//! missing from the map leave their field untouched, so decoding into a
//! populated record is a partial update. Keys that match no field are ignored.
//!
//! Absent references (`None`) met on the way are filled with the referent's
//! zero value whether or not their key is present, so every visible field ends
//! up allocated. Present references are only written through when there is
//! something to write.
//!
//! # Example
//! ```
//! use strmap::{decode, FlatMap, Record};
//!
//! #[derive(Record, Debug, Default, PartialEq)]
//! struct Server {
//!     pub host: String,
//!     pub port: u16,
//! }
//!
//! let map = FlatMap::from([("port".to_string(), "9090".to_string())]);
//! let mut server = Server { host: "localhost".into(), port: 8080 };
//! decode(&map, &mut server).unwrap();
//! assert_eq!(server, Server { host: "localhost".into(), port: 9090 });
//! ```

use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::shape_of;
use crate::scalar;
use crate::value::{is_record_like, materialize, resolve, Referent, Value};
use crate::FlatMap;

/// Decode `data` into `target` using `config`.
pub fn decode(config: &Config, data: Option<&FlatMap>, target: Option<&mut dyn Value>) -> Result<()> {
    let data = data.ok_or_else(|| Error::NilValue {
        context: "map passed".to_owned(),
    })?;
    let target = target.ok_or_else(|| Error::NilValue {
        context: "decode target".to_owned(),
    })?;
    let root = resolve_target(target)?;

    let mut decoder = Decoder {
        separator: &config.separator,
        data,
        path: vec![root.type_name()],
    };
    decoder.decode_record(root, "")
}

/// Follow the target's reference chain without allocating. The end of the chain
/// must be a writable record.
fn resolve_target(mut value: &mut dyn Value) -> Result<&mut dyn Value> {
    loop {
        match value.referent() {
            Referent::Direct => break,
            Referent::Absent => {
                return Err(Error::NilValue {
                    context: format!("{} decode target", value.type_name()),
                })
            }
            Referent::Present(_) => {}
        }
        let type_name = value.type_name();
        value = value
            .referent_mut()
            .map_err(|_| Error::NotAPointer { type_name })?;
    }
    if !is_record_like(value) {
        return Err(Error::NotARecord {
            type_name: value.type_name(),
        });
    }
    Ok(value)
}

/// Entries of `data` under `prefix`, prefix stripped.
fn sub_map(data: &FlatMap, prefix: &str) -> FlatMap {
    data.iter()
        .filter_map(|(key, text)| {
            key.strip_prefix(prefix)
                .map(|rest| (rest.to_owned(), text.clone()))
        })
        .collect()
}

struct Decoder<'a> {
    separator: &'a str,
    data: &'a FlatMap,
    /// Record types on the current inline path, root first.
    path: Vec<&'static str>,
}

impl Decoder<'_> {
    fn decode_record(&mut self, value: &mut dyn Value, prefix: &str) -> Result<()> {
        let type_name = value.type_name();
        if let Some(codec) = value.as_map_codec_mut() {
            debug!(record = type_name, prefix, "decoding through MapCodec");
            let result = if prefix.is_empty() {
                codec.from_map(self.data)
            } else {
                codec.from_map(&sub_map(self.data, prefix))
            };
            return result.map_err(|source| Error::Hook { type_name, source });
        }

        let record = value
            .as_record_mut()
            .ok_or(Error::NotARecord { type_name })?;
        let shape = shape_of(record);
        let data = self.data;
        for field in shape.fields() {
            let directive = &field.directive;
            if directive.ignored {
                trace!(field = field.name, "ignored");
                continue;
            }
            let key = format!("{prefix}{}", field.key());
            let Some(value) = record.field_mut(field.index) else {
                continue;
            };

            if directive.inline {
                self.decode_inline(value, &key)
                    .map_err(|err| err.at_key(&key))?;
                continue;
            }

            if resolve(value).is_none() {
                materialize(&mut *value).map_err(|err| err.at_key(&key))?;
            }
            let Some(text) = data.get(&key) else {
                trace!(key = key.as_str(), "key absent, field left untouched");
                continue;
            };
            materialize(value)
                .and_then(|target| scalar::from_text(target, text, directive.omit_empty))
                .map_err(|err| err.at_key(&key))?;
        }
        Ok(())
    }

    fn decode_inline(&mut self, value: &mut dyn Value, key: &str) -> Result<()> {
        let target = materialize(value)?;
        let type_name = target.type_name();
        if !is_record_like(target) {
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
        self.decode_record(target, &prefix)?;
        self.path.pop();
        Ok(())
    }
}
