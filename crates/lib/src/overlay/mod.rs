//! Copy-on-write overlays over base values.
//!
//! An overlay wraps one branch value and intercepts every structural operation
//! on it. Reads fall through to the base until a key is written; writes are
//! recorded on the overlay and never reach the base.
//!
//! # Core Types
//!
//! - [`Handle`] - What [`create`] returns and what overlay reads hand back
//! - [`MapOverlay`] - Lazy overlay over a keyed map
//! - [`ListOverlay`] - Eager working-copy overlay over a list
//! - [`Overlay`] - Flag and identity protocol shared by both node kinds
//!
//! # Lifecycle
//!
//! ```
//! use veneer::{create, Value};
//! use serde_json::json;
//!
//! let base = Value::from(json!({"count": 0, "user": {"name": "Alice"}}));
//! let draft = create(base.clone());
//! let root = draft.as_map().unwrap();
//!
//! root.set("count", 1).unwrap();
//! root.get("user").unwrap().as_map().unwrap().set("name", "Bob").unwrap();
//!
//! assert_eq!(draft.to_value().to_json(), json!({"count": 1, "user": {"name": "Bob"}}));
//! assert_eq!(base.to_json(), json!({"count": 0, "user": {"name": "Alice"}}));
//! ```

use crate::value::Value;

pub mod errors;
mod handle;
pub mod list;
pub mod map;

pub use errors::OverlayError;
pub use handle::Handle;
pub use list::ListOverlay;
pub use map::{Descriptor, MapOverlay};

/// State every overlay node exposes, independent of its kind.
///
/// These are the hidden queries of an overlay. They live on the node rather
/// than in its key space, so no caller key can shadow them.
pub trait Overlay {
    /// Returns true once [`Overlay::freeze`] has been called on this node.
    fn is_frozen(&self) -> bool;

    /// Returns true once any write, delete or define went through this node.
    fn is_dirty(&self) -> bool;

    /// Permanently rejects further mutation of this node.
    ///
    /// With `deep`, every child overlay that has already been materialized is
    /// frozen too. Children that were never read stay unfrozen.
    fn freeze(&self, deep: bool);

    /// The reference this node is compared by.
    ///
    /// A dirty node is its own identity. A clean node is identified by what it
    /// wraps: the base value, or the overlay it was layered on.
    fn identity(&self) -> Handle;

    /// Returns true if this node or any materialized descendant is dirty.
    fn has_changed(&self) -> bool;

    /// Produces a plain value with the node's visible contents.
    ///
    /// Subtrees without changes are returned as the original base `Arc`, so
    /// only changed paths are rebuilt.
    fn to_value(&self) -> Value;
}

/// Wraps a value in an overlay.
///
/// Maps and lists get a fresh overlay node; leaves pass through unchanged.
/// Passing an existing overlay layers a new, independent overlay on top of it:
/// writes through the new handle are invisible to the one below.
///
/// ```
/// use veneer::{create, Value, value::Map};
///
/// let base = Value::from(Map::new().with("x", 5));
/// let first = create(base.clone());
/// let second = create(first.clone());
///
/// second.as_map().unwrap().set("x", 6).unwrap();
///
/// assert_eq!(second.as_map().unwrap().get("x").and_then(|h| h.as_int()), Some(6));
/// assert_eq!(first.as_map().unwrap().get("x").and_then(|h| h.as_int()), Some(5));
/// assert!(create(7).as_value().is_some());
/// ```
pub fn create(value: impl Into<Handle>) -> Handle {
    match value.into() {
        Handle::Value(Value::Map(map)) => Handle::Map(MapOverlay::over_base(map)),
        Handle::Value(Value::List(list)) => Handle::List(ListOverlay::over_base(list)),
        Handle::Value(leaf) => Handle::Value(leaf),
        Handle::Map(overlay) => Handle::Map(MapOverlay::over_overlay(overlay)),
        Handle::List(overlay) => Handle::List(ListOverlay::over_overlay(&overlay)),
    }
}
