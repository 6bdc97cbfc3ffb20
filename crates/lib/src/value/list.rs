//! Ordered base values.

use std::{fmt, slice};

use super::Value;

/// Ordered collection of values.
///
/// Like [`Map`](super::Map), a `List` is shared and immutable once wrapped in a
/// [`Value`]. Overlays over a list work on their own working copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    items: Vec<Value>,
}

impl List {
    /// Creates a new empty list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Pushes a value to the end of the list
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Builder form of [`List::push`]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Returns an iterator over the values in order
    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Borrows the items as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl serde::Serialize for List {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(&self.items)
    }
}
