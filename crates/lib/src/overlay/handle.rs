use std::{fmt, sync::Arc};

use super::{ListOverlay, MapOverlay, Overlay};
use crate::value::{List, Map, Value};

/// A value as seen through an overlay.
///
/// Reads on an overlay return handles: branch values come back as child
/// overlays, leaves (and branches behind non-configurable properties) come
/// back as plain [`Value`]s.
#[derive(Debug, Clone)]
pub enum Handle {
    /// A plain value that is not wrapped
    Value(Value),
    /// Overlay over a keyed map
    Map(MapOverlay),
    /// Overlay over a list
    List(ListOverlay),
}

impl Handle {
    /// Returns true if this handle is an overlay node
    pub fn is_overlay(&self) -> bool {
        !matches!(self, Handle::Value(_))
    }

    /// Returns true if this is an overlay holding a change anywhere below it,
    /// enumerable or not
    pub(crate) fn is_modified(&self) -> bool {
        match self {
            Handle::Value(_) => false,
            Handle::Map(overlay) => overlay.modified(),
            Handle::List(overlay) => overlay.modified(),
        }
    }

    /// Returns true for maps and lists, wrapped or not
    pub fn is_branch(&self) -> bool {
        match self {
            Handle::Value(value) => value.is_branch(),
            Handle::Map(_) | Handle::List(_) => true,
        }
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Handle::Value(value) => value.type_name(),
            Handle::Map(_) => "map overlay",
            Handle::List(_) => "list overlay",
        }
    }

    /// Borrows the overlay node, if this is one
    pub fn as_overlay(&self) -> Option<&dyn Overlay> {
        match self {
            Handle::Value(_) => None,
            Handle::Map(overlay) => Some(overlay),
            Handle::List(overlay) => Some(overlay),
        }
    }

    /// Borrows the map overlay
    pub fn as_map(&self) -> Option<&MapOverlay> {
        match self {
            Handle::Map(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Borrows the list overlay
    pub fn as_list(&self) -> Option<&ListOverlay> {
        match self {
            Handle::List(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Borrows the plain value
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Handle::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_int)
    }

    /// Attempts to convert to a float
    pub fn as_float(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_float)
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_text)
    }

    /// Strict identity of two handles.
    ///
    /// Overlays are the same only if they are the same node; plain values
    /// follow [`Value::same`].
    pub fn same(&self, other: &Handle) -> bool {
        match (self, other) {
            (Handle::Value(a), Handle::Value(b)) => a.same(b),
            (Handle::Map(a), Handle::Map(b)) => a.ptr_eq(b),
            (Handle::List(a), Handle::List(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Produces a plain value with the visible contents of this handle.
    pub fn to_value(&self) -> Value {
        match self {
            Handle::Value(value) => value.clone(),
            Handle::Map(overlay) => overlay.to_value(),
            Handle::List(overlay) => overlay.to_value(),
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<Value> for Handle {
    fn from(value: Value) -> Self {
        Handle::Value(value)
    }
}

impl From<MapOverlay> for Handle {
    fn from(overlay: MapOverlay) -> Self {
        Handle::Map(overlay)
    }
}

impl From<ListOverlay> for Handle {
    fn from(overlay: ListOverlay) -> Self {
        Handle::List(overlay)
    }
}

macro_rules! handle_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Handle {
                fn from(value: $ty) -> Self {
                    Handle::Value(Value::from(value))
                }
            }
        )*
    };
}

handle_from_value!(bool, i64, i32, u32, f64, String, &str, Map, List, Arc<Map>, Arc<List>);

#[cfg(feature = "json")]
handle_from_value!(serde_json::Value);
