use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::{
    hash::{Fnv, HashCode},
    Number, ParseError,
};

/// Ordered mapping used for JSON objects; iteration follows insertion order.
pub type Map = IndexMap<String, Node>;

const NULL_TAG: u8 = 0;
const BOOL_TAG: u8 = 1;
const NUMBER_TAG: u8 = 2;
const STRING_TAG: u8 = 3;
const ARRAY_TAG: u8 = 4;
const OBJECT_TAG: u8 = 5;
const OPAQUE_TAG: u8 = 6;

/// A JSON value as seen by the merge engine.
///
/// Objects keep key insertion order, so merged output lists keys in the
/// order they were first seen across the input documents.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number represented as IEEE-754 double precision.
    Number(Number),
    /// JSON string.
    String(String),
    /// JSON array.
    Array(Vec<Node>),
    /// JSON object.
    Object(Map),
    /// A non-JSON, function-like value carried as its source text.
    ///
    /// Never produced by parsing; serialized as a plain string.
    Opaque(String),
}

/// Top-level shape class of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// The document is a JSON object.
    Object,
    /// The document is a JSON array.
    Array,
    /// The document is a bare scalar and carries no fields.
    Scalar,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Object => f.write_str("an object"),
            Shape::Array => f.write_str("an array"),
            Shape::Scalar => f.write_str("a scalar"),
        }
    }
}

impl Node {
    /// Returns an empty object node.
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(Map::new())
    }

    /// Wraps the source text of a function-like value.
    ///
    /// ```
    /// # use json_addition_core::Node;
    /// let f = Node::opaque("function () {}");
    /// assert_eq!(f.kind(), "function");
    /// ```
    #[must_use]
    pub fn opaque<S>(source: S) -> Self
    where
        S: Into<String>,
    {
        Self::Opaque(source.into())
    }

    /// Parses a JSON string into a node.
    ///
    /// ```
    /// # use json_addition_core::Node;
    /// let node = Node::from_json_str("{\"hello\":\"world\"}")?;
    /// assert!(matches!(node, Node::Object(_)));
    /// # Ok::<(), json_addition_core::ParseError>(())
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, ParseError> {
        let value: JsonValue = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    /// Converts a serde JSON value into a [`Node`].
    pub fn from_json_value(value: JsonValue) -> Result<Self, ParseError> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(v) => Ok(Self::Bool(v)),
            JsonValue::Number(num) => {
                let Some(as_f64) = num.as_f64() else {
                    return Err(ParseError::NumberOutOfRange { value: num.to_string() });
                };
                Ok(Self::Number(Number::new(as_f64)?))
            }
            JsonValue::String(s) => Ok(Self::String(s)),
            JsonValue::Array(values) => {
                let mut items = Vec::with_capacity(values.len());
                for value in values {
                    items.push(Self::from_json_value(value)?);
                }
                Ok(Self::Array(items))
            }
            JsonValue::Object(map) => {
                let mut object = Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key, Self::from_json_value(value)?);
                }
                Ok(Self::Object(object))
            }
        }
    }

    /// Converts the node into a serde JSON value. Opaque values become strings.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Number(n) => JsonValue::Number(n.to_json_number()),
            Self::String(s) | Self::Opaque(s) => JsonValue::String(s.clone()),
            Self::Array(values) => JsonValue::Array(values.iter().map(Self::to_json_value).collect()),
            Self::Object(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json_value());
                }
                JsonValue::Object(object)
            }
        }
    }

    /// Renders the node as JSON indented with two spaces.
    ///
    /// ```
    /// # use json_addition_core::Node;
    /// let node = Node::from_json_str("{\"a\":[1,2]}")?;
    /// assert_eq!(node.to_pretty_json()?, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Name of the value's type, as used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Opaque(_) => "function",
        }
    }

    /// Shape class of the node when used as a whole document.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Object(_) => Shape::Object,
            Self::Array(_) => Shape::Array,
            _ => Shape::Scalar,
        }
    }

    /// String coercion used when two values are joined as `"a, b"`.
    ///
    /// Containers render as compact JSON.
    ///
    /// ```
    /// # use json_addition_core::Node;
    /// assert_eq!(Node::from_json_str("5")?.to_text(), "5");
    /// assert_eq!(Node::from_json_str("[1,\"x\"]")?.to_text(), "[1,\"x\"]");
    /// # Ok::<(), json_addition_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) | Self::Opaque(s) => s.clone(),
            Self::Array(_) | Self::Object(_) => self.to_json_value().to_string(),
        }
    }

    /// Structural hash; equal nodes (per `==`) hash alike.
    #[must_use]
    pub fn hash_code(&self) -> HashCode {
        let mut state = Fnv::new();
        self.feed(&mut state);
        state.finish()
    }

    fn feed(&self, state: &mut Fnv) {
        state.write(&[self.tag()]);
        match self {
            Self::Null => {}
            Self::Bool(v) => {
                state.write(&[u8::from(*v)]);
            }
            Self::Number(n) => {
                state.write_u64(n.hash_code());
            }
            Self::String(s) | Self::Opaque(s) => {
                state.write_u64(s.len() as u64).write(s.as_bytes());
            }
            Self::Array(values) => {
                state.write_u64(values.len() as u64);
                for value in values {
                    value.feed(state);
                }
            }
            Self::Object(map) => {
                // Object equality ignores key order, so entries are combined
                // with a commutative sum.
                let mut sum = 0u64;
                for (key, value) in map {
                    let mut entry = Fnv::new();
                    entry.write_u64(key.len() as u64).write(key.as_bytes());
                    value.feed(&mut entry);
                    sum = sum.wrapping_add(entry.finish());
                }
                state.write_u64(map.len() as u64).write_u64(sum);
            }
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Self::Null => NULL_TAG,
            Self::Bool(_) => BOOL_TAG,
            Self::Number(_) => NUMBER_TAG,
            Self::String(_) => STRING_TAG,
            Self::Array(_) => ARRAY_TAG,
            Self::Object(_) => OBJECT_TAG,
            Self::Opaque(_) => OPAQUE_TAG,
        }
    }
}

impl TryFrom<JsonValue> for Node {
    type Error = ParseError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json_value(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for Node {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) | Self::Opaque(s) => serializer.serialize_str(s),
            Self::Array(values) => serializer.collect_seq(values),
            Self::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(serde::de::Error::custom)
    }
}
