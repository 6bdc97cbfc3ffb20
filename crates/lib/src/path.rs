//! Dot-separated paths into overlay trees.
//!
//! A path like `"user.roles.0.name"` walks maps by key and lists by numeric
//! index. Paths are normalized before use, so empty components are ignored.
//!
//! ```
//! use veneer::{create, Value};
//! use serde_json::json;
//!
//! let draft = create(Value::from(json!({"user": {"roles": [{"name": "reader"}]}})));
//! draft.set_path("user.roles.0.name", "admin").unwrap();
//!
//! let name = draft.get_path("user.roles.0.name").unwrap();
//! assert_eq!(name.as_text(), Some("admin"));
//! ```

use crate::{
    overlay::{Handle, OverlayError},
    value::Value,
};

/// Normalizes a path string by cleaning up dots and empty components.
///
/// ```
/// # use veneer::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path(".user"), "user");
/// assert_eq!(normalize_path("user."), "user");
/// assert_eq!(normalize_path("user..profile"), "user.profile");
/// assert_eq!(normalize_path("..."), "");
/// ```
pub fn normalize_path(input: &str) -> String {
    components(input).collect::<Vec<_>>().join(".")
}

/// Iterates over the non-empty components of a path.
pub fn components(input: &str) -> impl Iterator<Item = &str> {
    input.split('.').filter(|component| !component.is_empty())
}

impl Handle {
    /// Looks up a single key or index on this handle.
    ///
    /// Overlays are read through their own `get`, so branch values come back
    /// materialized. Plain branch values are read directly.
    pub fn child(&self, component: &str) -> Option<Handle> {
        match self {
            Handle::Map(map) => map.get(component),
            Handle::List(list) => list.get(component.parse().ok()?),
            Handle::Value(Value::Map(map)) => map.get(component).cloned().map(Handle::Value),
            Handle::Value(Value::List(list)) => list
                .get(component.parse().ok()?)
                .cloned()
                .map(Handle::Value),
            Handle::Value(_) => None,
        }
    }

    /// Looks up a nested handle by path. The empty path returns `self`.
    pub fn get_path(&self, path: &str) -> Option<Handle> {
        components(path).try_fold(self.clone(), |current, component| current.child(component))
    }

    /// Writes `value` at a nested path.
    ///
    /// Every component but the last must resolve to an overlay; the last one
    /// is written with that overlay's `set`, so the frozen and no-op rules of
    /// the target node apply.
    pub fn set_path(&self, path: &str, value: impl Into<Handle>) -> Result<(), OverlayError> {
        let parts: Vec<&str> = components(path).collect();
        let invalid = |reason: &str| OverlayError::InvalidPath {
            path: normalize_path(path),
            reason: reason.to_string(),
        };

        let Some((last, parents)) = parts.split_last() else {
            return Err(invalid("path is empty"));
        };
        let parent = parents
            .iter()
            .try_fold(self.clone(), |current, component| current.child(component))
            .ok_or_else(|| invalid("parent does not exist"))?;

        match &parent {
            Handle::Map(map) => map.set(*last, value),
            Handle::List(list) => {
                let index = last
                    .parse()
                    .map_err(|_| invalid("list index is not a number"))?;
                list.set(index, value)
            }
            Handle::Value(_) => Err(invalid("parent is not an overlay")),
        }
    }
}
