//! The format registry.
//!
//! A closed set of formats, each able to decode bytes into a [`Value`] and
//! encode a [`Value`] back into bytes. Names are the ones accepted on the
//! command line and matched against input file extensions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::{BoxError, Error};
use crate::value::{self, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Json,
    Toml,
    Yml,
    Msgpack,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Json, Format::Toml, Format::Yml, Format::Msgpack];

    pub const fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Yml => "yml",
            Format::Msgpack => "msgpack",
        }
    }

    /// Exact, case-sensitive lookup by registry name.
    pub fn from_name(name: &str) -> Option<Format> {
        Self::ALL.into_iter().find(|format| format.name() == name)
    }

    /// Infers a format from whatever follows the last `.` of an input
    /// locator. A leading dot (`.json`) does not count as an extension.
    pub fn from_extension(locator: &str) -> Option<Format> {
        match locator.rfind('.') {
            Some(index) if index > 0 => Self::from_name(&locator[index + 1..]),
            _ => None,
        }
    }

    /// Comma separated list of every registered name, for diagnostics.
    pub fn supported_names() -> String {
        Self::ALL.map(Format::name).join(", ")
    }

    pub fn decode(self, input: &[u8]) -> Result<Value, Error> {
        let decoded: Result<Value, BoxError> = match self {
            Format::Json => serde_json::from_slice(input).map_err(Into::into),
            Format::Toml => std::str::from_utf8(input)
                .map_err(BoxError::from)
                .and_then(|text| value::from_toml_str(text).map_err(Into::into)),
            Format::Yml => decode_yaml(input),
            Format::Msgpack => rmp_serde::from_slice(input).map_err(Into::into),
        };
        decoded.map_err(|source| Error::DecodeFailed {
            format: self,
            source,
        })
    }

    pub fn encode(self, value: &Value) -> Result<Vec<u8>, Error> {
        let encoded: Result<Vec<u8>, BoxError> = match self {
            Format::Json => encode_json(value),
            Format::Toml => toml::to_string(value)
                .map(String::into_bytes)
                .map_err(Into::into),
            Format::Yml => serde_yaml::to_string(value)
                .map(String::into_bytes)
                .map_err(Into::into),
            Format::Msgpack => rmp_serde::to_vec(value).map_err(Into::into),
        };
        encoded.map_err(|source| Error::EncodeFailed {
            format: self,
            source,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decodes the first document of a YAML stream with merge keys (`<<`) applied.
fn decode_yaml(input: &[u8]) -> Result<Value, BoxError> {
    let Some(document) = serde_yaml::Deserializer::from_slice(input).next() else {
        return Ok(Value::Null);
    };
    let mut yaml = serde_yaml::Value::deserialize(document)?;
    yaml.apply_merge()?;
    Ok(serde_yaml::from_value(yaml)?)
}

fn encode_json(value: &Value) -> Result<Vec<u8>, BoxError> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(out)
}
