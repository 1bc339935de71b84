//! Configuration values
//!
//! Typed values produced from raw attribute strings, plus the decoding rules
//! that turn `"300"` into a number and `"{\"a\":1}"` into an object.

use std::collections::BTreeMap;
use std::fmt;

use carousel_dom::NodeId;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Nested configuration object
pub type ConfigMap = BTreeMap<String, Value>;

/// A configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(ConfigMap),
    /// Reference to an element in the host document
    Element(NodeId),
}

impl Value {
    /// Empty object
    pub fn object() -> Self {
        Value::Object(ConfigMap::new())
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<NodeId> {
        match self {
            Value::Element(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Truthiness as the slider engine sees it: `null`, `false`, `0`, `NaN`
    /// and `""` are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Element(_) => true,
        }
    }

    /// Whether a module value switches its module on. An options object is on
    /// unless its `enabled` field is falsy.
    pub fn is_enabled(&self) -> bool {
        match self {
            Value::Object(map) => map.get("enabled").is_none_or(Value::is_truthy),
            other => other.is_truthy(),
        }
    }
}

/// Decode a raw attribute string into a typed value.
///
/// Rules are applied in order, first match wins:
/// empty or `true`, `false`, `null`, `auto`, finite number, `{...}`/`[...]`
/// literal, raw string. A literal that fails to parse stays a string.
pub fn decode(raw: &str) -> Value {
    match raw {
        "" | "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        "auto" => return Value::String("auto".to_string()),
        _ => {}
    }

    if let Some(n) = parse_number(raw) {
        return Value::Number(n);
    }

    if is_structured_literal(raw) {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(parsed) => return Value::from(parsed),
            Err(e) => tracing::debug!("Keeping {:?} as a string: {}", raw, e),
        }
    }

    Value::String(raw.to_string())
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_structured_literal(raw: &str) -> bool {
    (raw.starts_with('{') && raw.ends_with('}')) || (raw.starts_with('[') && raw.ends_with(']'))
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Element(id)
    }
}

impl From<ConfigMap> for Value {
    fn from(map: ConfigMap) -> Self {
        Value::Object(map)
    }
}

/// Largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => map.serialize(serializer),
            Value::Element(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("element", &id.0)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Element(id) => write!(f, "{id}"),
            Value::Array(_) | Value::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keywords() {
        assert_eq!(decode(""), Value::Bool(true));
        assert_eq!(decode("true"), Value::Bool(true));
        assert_eq!(decode("false"), Value::Bool(false));
        assert_eq!(decode("null"), Value::Null);
        assert_eq!(decode("auto"), Value::String("auto".into()));
    }

    #[test]
    fn test_decode_numbers() {
        assert_eq!(decode("300"), Value::Number(300.0));
        assert_eq!(decode("-1.5"), Value::Number(-1.5));
        assert_eq!(decode("1e3"), Value::Number(1000.0));
        assert_eq!(decode(" 12 "), Value::Number(12.0));
        assert_eq!(decode(".5"), Value::Number(0.5));
    }

    #[test]
    fn test_decode_non_finite_stays_string() {
        assert_eq!(decode("Infinity"), Value::String("Infinity".into()));
        assert_eq!(decode("NaN"), Value::String("NaN".into()));
        assert_eq!(decode("inf"), Value::String("inf".into()));
        assert_eq!(decode("   "), Value::String("   ".into()));
    }

    #[test]
    fn test_decode_structured() {
        let v = decode(r#"{"delay": 500, "pauseOnMouseEnter": true}"#);
        let map = v.as_object().unwrap();
        assert_eq!(map.get("delay"), Some(&Value::Number(500.0)));
        assert_eq!(map.get("pauseOnMouseEnter"), Some(&Value::Bool(true)));

        assert_eq!(
            decode("[1, \"two\"]"),
            Value::Array(vec![Value::Number(1.0), Value::String("two".into())])
        );
    }

    #[test]
    fn test_decode_malformed_structured_falls_back() {
        assert_eq!(decode("{not json}"), Value::String("{not json}".into()));
        assert_eq!(decode("[1,"), Value::String("[1,".into()));
    }

    #[test]
    fn test_decode_plain_string() {
        assert_eq!(decode("horizontal"), Value::String("horizontal".into()));
        assert_eq!(decode("0x10"), Value::String("0x10".into()));
    }

    #[test]
    fn test_decode_is_idempotent_for_scalars() {
        for raw in ["300", "0.25", "-7", "1e3", "true", "false", "", "12.50"] {
            let once = decode(raw);
            let twice = decode(&once.to_string());
            assert_eq!(once, twice, "round trip of {raw:?}");
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(Value::Number(5000.0).is_truthy());
        assert!(Value::object().is_truthy());
        assert!(Value::Element(NodeId(3)).is_truthy());
    }

    #[test]
    fn test_enabled_reads_options_object() {
        assert!(Value::object().is_enabled());
        assert!(!decode(r#"{"enabled": false, "delay": 5000}"#).is_enabled());
        assert!(decode(r#"{"enabled": true}"#).is_enabled());
        assert!(!Value::Bool(false).is_enabled());
        assert!(Value::Number(1.0).is_enabled());
    }

    #[test]
    fn test_serialize_shapes() {
        let mut map = ConfigMap::new();
        map.insert("speed".into(), Value::Number(300.0));
        map.insert("ratio".into(), Value::Number(0.5));
        map.insert("el".into(), Value::Element(NodeId(7)));
        let json = serde_json::to_string(&Value::Object(map)).unwrap();
        assert_eq!(json, r#"{"el":{"element":7},"ratio":0.5,"speed":300}"#);
    }
}
