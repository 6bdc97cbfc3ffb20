//! Keyed base values with per-property attributes.

use std::{
    collections::{HashMap, hash_map},
    fmt,
};

use super::Value;

/// Property attributes, mirroring the three flags a keyed property can carry.
///
/// A property that is not `configurable` is handed out raw by overlays:
/// reading it never materializes a child overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// Whether the value may be reassigned
    pub writable: bool,
    /// Whether the key shows up during enumeration
    pub enumerable: bool,
    /// Whether the property may be redefined or removed
    pub configurable: bool,
}

impl Attributes {
    /// Writable, enumerable and configurable.
    pub const DEFAULT: Attributes = Attributes {
        writable: true,
        enumerable: true,
        configurable: true,
    };

    /// Neither writable, enumerable nor configurable.
    pub const SEALED: Attributes = Attributes {
        writable: false,
        enumerable: false,
        configurable: false,
    };

    /// Returns a copy with `enumerable` replaced.
    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// Returns a copy with `configurable` replaced.
    pub fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Returns a copy with `writable` replaced.
    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A value stored under a key, together with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub value: Value,
    pub attributes: Attributes,
}

impl Property {
    /// Creates a property with default attributes.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            attributes: Attributes::DEFAULT,
        }
    }

    /// Creates a property with explicit attributes.
    pub fn with_attributes(value: impl Into<Value>, attributes: Attributes) -> Self {
        Self {
            value: value.into(),
            attributes,
        }
    }
}

/// Keyed collection of properties.
///
/// A `Map` is built up by the caller and then frozen in place by wrapping it in
/// a [`Value`]; from then on it is shared and never mutated.
///
/// ```
/// # use veneer::value::{Attributes, Map};
/// let map = Map::new()
///     .with("name", "Alice")
///     .with("age", 30)
///     .with_property("id", 7, Attributes::SEALED);
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get("name").and_then(|v| v.as_text()), Some("Alice"));
/// assert!(!map.property("id").unwrap().attributes.configurable);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: HashMap<String, Property>,
}

impl Map {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no properties
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the map has a property under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Gets the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|prop| &prop.value)
    }

    /// Gets the full property stored under `key`
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.entries.get(key)
    }

    /// Inserts a value with default attributes, returning the previous property
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Property> {
        self.entries.insert(key.into(), Property::new(value))
    }

    /// Inserts a property with explicit attributes
    pub fn define(&mut self, key: impl Into<String>, property: Property) -> Option<Property> {
        self.entries.insert(key.into(), property)
    }

    /// Removes a property
    pub fn remove(&mut self, key: &str) -> Option<Property> {
        self.entries.remove(key)
    }

    /// Builder form of [`Map::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`Map::define`]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Self {
        self.define(key, Property::with_attributes(value, attributes));
        self
    }

    /// Iterates over all keys, enumerable or not
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Iterates over all properties
    pub fn iter(&self) -> hash_map::Iter<'_, String, Property> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl FromIterator<(String, Property)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Property)>>(iter: T) -> Self {
        Map {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        write!(f, "{{")?;
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {}", self.entries[key].value)?;
        }
        write!(f, "}}")
    }
}

// Serializes as a plain object of enumerable properties; attributes are not
// part of the wire form.
impl serde::Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let visible: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, prop)| prop.attributes.enumerable)
            .collect();
        let mut map = serializer.serialize_map(Some(visible.len()))?;
        for (key, prop) in visible {
            map.serialize_entry(key, &prop.value)?;
        }
        map.end()
    }
}
