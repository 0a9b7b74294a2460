//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::decoder;
use crate::encoder;
use crate::error::{Error, Result};
use crate::value::Value;
use crate::FlatMap;

/// Separator placed between an inline field's key and its inner keys.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Settings shared by encode and decode.
///
/// Deserializable so it can be embedded in an application's own configuration;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Joins inline keys: `outer{separator}inner`.
    pub separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(Error::InvalidConfig(
                "separator must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// An encoder/decoder bound to a validated [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: Config,
}

impl Codec {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// See [`crate::encode`].
    pub fn encode(&self, value: &dyn Value) -> Result<FlatMap> {
        encoder::encode(&self.config, value)
    }

    /// See [`crate::decode`].
    pub fn decode<'m, 't, T>(
        &self,
        data: impl Into<Option<&'m FlatMap>>,
        target: impl Into<Option<&'t mut T>>,
    ) -> Result<()>
    where
        T: Value + 't,
    {
        let target = target.into().map(|target| target as &mut dyn Value);
        decoder::decode(&self.config, data.into(), target)
    }
}
