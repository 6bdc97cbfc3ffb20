//! Stateless queries over handles.
//!
//! These functions answer questions about any [`Handle`], overlay or not, by
//! reading the flags an overlay node exposes through [`Overlay`]. They never
//! depend on which concrete node kind they are looking at.

use tracing::warn;

use crate::overlay::{Handle, Overlay, OverlayError};

/// Returns true if `handle` is an overlay node.
pub fn is_overlay(handle: &Handle) -> bool {
    handle.is_overlay()
}

/// Freezes an overlay, optionally together with its materialized children.
///
/// Freezing is permanent. A deep freeze reaches only children that were read
/// (or written) before the call; parts of the base that were never touched are
/// not wrapped yet and so cannot be frozen.
///
/// Plain values carry no overlay state. Freezing one is logged and returns
/// [`OverlayError::InvalidArgument`] without any other effect, so the error is
/// informational and callers may discard it (`let _ = freeze(..)`). Use
/// [`is_frozen`] afterwards when the outcome matters.
///
/// ```
/// use veneer::{create, freeze, is_frozen, Value};
/// use serde_json::json;
///
/// let draft = create(Value::from(json!({"a": 1})));
/// freeze(&draft, false).unwrap();
/// assert!(is_frozen(&draft));
///
/// assert!(freeze(&create(5), false).is_err());
/// ```
pub fn freeze(handle: &Handle, deep: bool) -> Result<(), OverlayError> {
    match handle.as_overlay() {
        Some(overlay) => {
            overlay.freeze(deep);
            Ok(())
        }
        None => {
            let kind = handle.type_name();
            warn!(kind, "Cannot freeze a value that is not an overlay");
            Err(OverlayError::InvalidArgument {
                reason: format!("cannot freeze a plain {kind} value"),
            })
        }
    }
}

/// Returns true if `handle` is a frozen overlay.
pub fn is_frozen(handle: &Handle) -> bool {
    handle.as_overlay().is_some_and(|overlay| overlay.is_frozen())
}

/// Returns true if `handle` is an overlay that has recorded a change itself.
///
/// Changes in child overlays do not count; see [`has_changed`].
pub fn is_dirty(handle: &Handle) -> bool {
    handle.as_overlay().is_some_and(|overlay| overlay.is_dirty())
}

/// The reference `handle` is compared by in [`equals`].
///
/// Plain values are their own identity. A dirty overlay is identified by
/// itself, a clean one by what it wraps.
pub fn identity(handle: &Handle) -> Handle {
    match handle.as_overlay() {
        Some(overlay) => overlay.identity(),
        None => handle.clone(),
    }
}

/// Identity comparison through overlays.
///
/// Two handles are equal when their [`identity`] is the same reference. This
/// is not a content comparison: two clean overlays over the same base are
/// equal, overlays over lookalike bases are not, and an overlay stops being
/// equal to its base as soon as it is written to.
///
/// ```
/// use veneer::{create, equals, Value, value::Map};
///
/// let base = Value::from(Map::new().with("x", 5));
/// let o1 = create(base.clone());
/// let o2 = create(base.clone());
///
/// assert!(equals(&base.clone().into(), &o1));
/// assert!(equals(&o1, &o2));
///
/// o2.as_map().unwrap().set("y", 10).unwrap();
/// assert!(!equals(&o1, &o2));
///
/// let lookalike = create(Value::from(Map::new().with("x", 5)));
/// assert!(!equals(&lookalike, &o1));
/// ```
pub fn equals(a: &Handle, b: &Handle) -> bool {
    identity(a).same(&identity(b))
}

/// Returns true if `handle` or any child overlay it has materialized is dirty.
///
/// Plain values never change and return `false`. Children that were never
/// read cannot hold changes and are not visited.
pub fn has_changed(handle: &Handle) -> bool {
    handle
        .as_overlay()
        .is_some_and(|overlay| overlay.has_changed())
}
