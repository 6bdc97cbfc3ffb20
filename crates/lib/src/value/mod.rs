//! Base values that overlays are layered on.
//!
//! This module provides the [`Value`] enum, the plain data that callers hand to
//! [`create`](crate::create). A `Value` is never mutated by the overlay engine:
//! overlays record their changes on the side and read through to the base
//! until a key is written.
//!
//! # Value Types
//!
//! ## Leaf Values
//! - [`Value::Null`], [`Value::Bool`], [`Value::Int`], [`Value::Float`], [`Value::Text`]
//!
//! ## Branch Values
//! - [`Value::Map`] - Keyed properties, see [`Map`]
//! - [`Value::List`] - Ordered elements, see [`List`]
//!
//! Branch values are reference counted. Two branch values are the *same* value
//! only when they point at the same allocation, which is what overlay identity
//! and [`equals`](crate::equals) are built on.

use std::{fmt, sync::Arc};

pub mod list;
pub mod map;

pub use list::List;
pub use map::{Attributes, Map, Property};

/// Plain data that can be wrapped by an overlay.
///
/// Structural equality (`==`) compares contents. Identity comparison, which
/// is what overlays care about, is available through [`Value::same`].
///
/// ```
/// # use veneer::{Value, value::Map};
/// let a = Value::from(Map::new().with("x", 5));
/// let b = Value::from(Map::new().with("x", 5));
///
/// assert_eq!(a, b);          // same contents
/// assert!(!a.same(&b));      // different allocations
/// assert!(a.same(&a.clone()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/empty value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text string value
    Text(String),
    /// Keyed properties
    Map(Arc<Map>),
    /// Ordered elements
    List(Arc<List>),
}

impl Value {
    /// Returns true if this is a leaf value
    pub fn is_leaf(&self) -> bool {
        !self.is_branch()
    }

    /// Returns true if this value can be wrapped in an overlay
    pub fn is_branch(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Map(_) => "map",
            Value::List(_) => "list",
        }
    }

    /// Strict identity: leaves compare by value, branches by allocation.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Map(_) | Value::List(_), _) | (_, Value::Map(_) | Value::List(_)) => false,
            (a, b) => a == b,
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to borrow the map
    pub fn as_map(&self) -> Option<&Arc<Map>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to borrow the list
    pub fn as_list(&self) -> Option<&Arc<List>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Converts to a `serde_json::Value`.
    ///
    /// Only enumerable map properties are emitted.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, prop)| prop.attributes.enumerable)
                    .map(|(key, prop)| (key.clone(), prop.value.to_json()))
                    .collect(),
            ),
            Value::List(list) => {
                serde_json::Value::Array(list.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Parses a value from JSON text.
    #[cfg(feature = "json")]
    pub fn from_json_str(input: &str) -> crate::Result<Value> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serializes this value as JSON text.
    #[cfg(feature = "json")]
    pub fn to_json_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Map(map) => write!(f, "{map}"),
            Value::List(list) => write!(f, "{list}"),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Map(map) => serde::Serialize::serialize(map.as_ref(), serializer),
            Value::List(list) => serde::Serialize::serialize(list.as_ref(), serializer),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, SeqAccess, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any JSON-like value")
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                serde::Deserialize::deserialize(deserializer)
            }

            fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Int(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
                Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Float(v))
            }

            fn visit_str<E>(self, v: &str) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Value, E> {
                Ok(Value::Text(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<Value>()? {
                    items.push(item);
                }
                Ok(Value::from(List::from(items)))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = Map::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    map.insert(key, value);
                }
                Ok(Value::from(map))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(Arc::new(value))
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(Arc::new(value))
    }
}

impl From<Arc<Map>> for Value {
    fn from(value: Arc<Map>) -> Self {
        Value::Map(value)
    }
}

impl From<Arc<List>> for Value {
    fn from(value: Arc<List>) -> Self {
        Value::List(value)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::from(items.into_iter().map(Value::from).collect::<List>())
            }
            serde_json::Value::Object(entries) => Value::from(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<Map>(),
            ),
        }
    }
}

// PartialEq implementations for comparing Value with primitives
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_int() == Some(*other as i64)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}
