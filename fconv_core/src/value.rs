//! Format-agnostic document tree.
//!
//! Every decoder in the registry produces a [`Value`] and every encoder
//! consumes one. The serde impls are written by hand so that each codec sees
//! the same shapes regardless of which format the tree came from:
//!
//! - unsigned integers that fit in `i64` collapse into [`Value::Int`]
//! - scalar map keys (YAML `1: a`, MessagePack integer keys) become strings
//! - TOML datetimes become their RFC 3339 string (TOML input only)
//! - YAML tags such as `!Ref` are dropped and the tagged node kept
//! - MessagePack extension values are rejected
//! - binary blobs are emitted as base64 strings for text formats

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::{
    self, Deserialize, DeserializeSeed, Deserializer, EnumAccess, IgnoredAny, MapAccess,
    SeqAccess, Unexpected, VariantAccess, Visitor,
};
use serde::ser::{Serialize, Serializer};

/// Key under which the `toml` deserializer exposes datetimes to `deserialize_any`.
const TOML_DATETIME_FIELD: &str = "$__toml_private_datetime";

/// Maps are kept sorted by key so text output is deterministic.
pub type Map = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Only used for values above `i64::MAX`.
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Value::UInt(n), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // `none` rather than `unit`: TOML skips absent map entries but
            // rejects unit values outright.
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::UInt(n) => serializer.serialize_u64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) if serializer.is_human_readable() => {
                serializer.serialize_str(&STANDARD.encode(bytes))
            }
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed::default().deserialize(deserializer)
    }
}

/// Parses a TOML document, turning its datetimes into strings.
pub(crate) fn from_toml_str(text: &str) -> Result<Value, toml::de::Error> {
    toml::from_str::<TomlDocument>(text).map(|TomlDocument(value)| value)
}

struct TomlDocument(Value);

impl<'de> Deserialize<'de> for TomlDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seed = ValueSeed {
            toml_datetimes: true,
        };
        seed.deserialize(deserializer).map(TomlDocument)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ValueSeed {
    /// Read `{TOML_DATETIME_FIELD: "..."}` maps as plain strings.
    toml_datetimes: bool,
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor(self))
    }
}

struct ValueVisitor(ValueSeed);

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any structured data value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        self.0.deserialize(deserializer)
    }

    // Of the registered codecs only rmp-serde calls this from
    // `deserialize_any`, for ext values, as a `(tag, data)` pair.
    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Value, D::Error> {
        let (tag, _data) = <(i8, IgnoredAny)>::deserialize(deserializer)?;
        Err(de::Error::custom(format_args!(
            "unsupported MessagePack extension type {tag}"
        )))
    }

    // serde_yaml reports `!Tag node` as an enum whose variant is the tag.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (_tag, node) = data.variant::<IgnoredAny>()?;
        node.newtype_variant_seed(self.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        // size hints come from untrusted input
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element_seed(self.0)? {
            items.push(item);
        }
        Ok(Value::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::new();
        while let Some(MapKey(key)) = access.next_key()? {
            if self.0.toml_datetimes && map.is_empty() && key == TOML_DATETIME_FIELD {
                let datetime: String = access.next_value()?;
                return Ok(Value::String(datetime));
            }
            let value = access.next_value_seed(self.0)?;
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}

/// Map key that accepts any scalar and stores its textual form.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or scalar map key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
        Ok(MapKey(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
        Ok(MapKey(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
        Ok(MapKey(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<MapKey, E> {
        String::from_utf8(v.to_vec())
            .map(MapKey)
            .map_err(|_| E::invalid_value(Unexpected::Bytes(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_collapses_into_int() {
        assert_eq!(Value::from(7u64), Value::Int(7));
        assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
    }

    #[test]
    fn test_json_and_msgpack_integers_compare_equal() {
        let from_json: Value = serde_json::from_str(r#"{"n": 42}"#).unwrap();
        let packed = rmp_serde::to_vec(&from_json).unwrap();
        let from_msgpack: Value = rmp_serde::from_slice(&packed).unwrap();
        assert_eq!(from_json, from_msgpack);
        assert_eq!(from_msgpack.get("n"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_yaml_scalar_keys_become_strings() {
        let value: Value = serde_yaml::from_str("1: one\ntrue: yes-ish\n").unwrap();
        assert_eq!(value.get("1"), Some(&Value::from("one")));
        assert_eq!(value.get("true"), Some(&Value::from("yes-ish")));
    }

    #[test]
    fn test_yaml_compound_key_is_rejected() {
        let err = serde_yaml::from_str::<Value>("? [1, 2]\n: pair\n").unwrap_err();
        assert!(err.to_string().contains("map key"), "msg: {err}");
    }

    #[test]
    fn test_bytes_are_base64_in_text_formats() {
        let value = Value::Bytes(vec![1, 2, 3]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"AQID\"");
    }

    #[test]
    fn test_bytes_stay_binary_in_msgpack() {
        let value = Value::Bytes(vec![1, 2, 3]);
        let packed = rmp_serde::to_vec(&value).unwrap();
        assert_eq!(packed, [0xc4, 0x03, 1, 2, 3]);
        let back: Value = rmp_serde::from_slice(&packed).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_toml_datetime_becomes_string() {
        let value = from_toml_str("when = 1979-05-27T07:32:00Z\n").unwrap();
        assert_eq!(value.get("when"), Some(&Value::from("1979-05-27T07:32:00Z")));
    }

    #[test]
    fn test_datetime_field_name_is_plain_key_outside_toml() {
        let value: Value =
            serde_json::from_str(r#"{"$__toml_private_datetime": 5, "b": 1}"#).unwrap();
        assert_eq!(value.get(TOML_DATETIME_FIELD), Some(&Value::Int(5)));
        assert_eq!(value.get("b"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_yaml_tags_are_dropped() {
        let value: Value =
            serde_yaml::from_str("a: !Ref bucket
b: !Sub [x, y]
c: !Custom {k: 1}
").unwrap();
        assert_eq!(value.get("a"), Some(&Value::from("bucket")));
        assert_eq!(value.get("b"), Some(&Value::Seq(vec!["x".into(), "y".into()])));
        assert_eq!(value.get("c").and_then(|c| c.get("k")), Some(&Value::Int(1)));
    }

    #[test]
    fn test_msgpack_ext_is_rejected() {
        // fixmap(1), "a", fixext1 type 5 data 0x01
        let packed = [0x81, 0xa1, b'a', 0xd4, 0x05, 0x01];
        let err = rmp_serde::from_slice::<Value>(&packed).unwrap_err();
        assert!(err.to_string().contains("extension type 5"), "msg: {err}");
    }

    #[test]
    fn test_null_map_entries_are_dropped_from_toml() {
        let value: Value = [("a", Value::Null), ("b", Value::Int(1))]
            .into_iter()
            .collect();
        let out = toml::to_string(&value).unwrap();
        assert!(out.contains("b = 1"), "out: {out}");
        assert!(!out.contains("a ="), "out: {out}");
    }

    #[test]
    fn test_map_keys_are_sorted() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["a", "m", "z"]);
    }
}
