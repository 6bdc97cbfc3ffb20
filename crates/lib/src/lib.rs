//!
//! Veneer: copy-on-write overlays for nested value trees.
//! Hand out a tree that callers may mutate freely, without copying it and without
//! ever touching the original.
//!
//! ## Core Concepts
//!
//! * **Base values (`value::Value`)**: Plain, immutable data. Maps and lists are
//!   reference counted, and that reference is what identity is measured by.
//! * **Overlays (`overlay::MapOverlay`, `overlay::ListOverlay`)**: Created by
//!   [`create`]. An overlay records writes and deletes on the side and reads
//!   through to its base for everything else.
//! * **Handles (`Handle`)**: What `create` and overlay reads return: either a plain
//!   value or an overlay node. Branch values read through an overlay come back as
//!   child overlays, created on first read and cached so repeated reads are stable.
//! * **Queries (`query`)**: [`is_overlay`], [`freeze`], [`is_frozen`], [`is_dirty`],
//!   [`equals`] and [`has_changed`] inspect the state of any handle.
//!
//! ## Reducer-style updates
//!
//! ```
//! use veneer::{create, equals, has_changed, Value};
//! use serde_json::json;
//!
//! let state = Value::from(json!({"todos": [{"done": false}], "filter": "all"}));
//!
//! let draft = create(state.clone());
//! let todo = draft.get_path("todos.0").unwrap();
//! todo.as_map().unwrap().set("done", true).unwrap();
//!
//! assert!(has_changed(&draft));
//! let next = draft.to_value();
//! assert_eq!(next.to_json(), json!({"todos": [{"done": true}], "filter": "all"}));
//! assert_eq!(state.to_json(), json!({"todos": [{"done": false}], "filter": "all"}));
//!
//! // Unchanged state stays identical to the base
//! assert!(equals(&create(state.clone()), &state.into()));
//! ```

pub mod overlay;
pub mod path;
pub mod query;
pub mod value;

pub use overlay::{Handle, ListOverlay, MapOverlay, Overlay, OverlayError, create};
pub use query::{equals, freeze, has_changed, is_dirty, is_frozen, is_overlay};
pub use value::Value;

/// Result type used throughout the Veneer library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Veneer library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(feature = "json")]
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured overlay errors from the overlay module
    #[error(transparent)]
    Overlay(OverlayError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            #[cfg(feature = "json")]
            Error::Serialize(_) => "serialize",
            Error::Overlay(_) => "overlay",
        }
    }

    /// Check if this error reports a write against a frozen overlay.
    pub fn is_frozen_error(&self) -> bool {
        match self {
            Error::Overlay(overlay_err) => overlay_err.is_frozen_error(),
            #[cfg(feature = "json")]
            Error::Serialize(_) => false,
        }
    }

    /// Check if this error is an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Overlay(overlay_err) => overlay_err.is_invalid_argument(),
            #[cfg(feature = "json")]
            Error::Serialize(_) => false,
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            #[cfg(feature = "json")]
            Error::Serialize(_) => true,
            Error::Overlay(_) => false,
        }
    }
}
