//! Lazy overlay over a keyed map.
//!
//! A [`MapOverlay`] keeps three things next to the map it wraps:
//!
//! - **Overrides**: keys that were written, defined or removed through this
//!   node. A removed key is stored as a tombstone.
//! - **Materialized children**: child overlays created the first time a branch
//!   value was read. Reading the same key again returns the cached child, so
//!   handles stay stable until the key is written.
//! - **Flags**: `dirty` (monotonic, set by the first recorded change) and
//!   `frozen` (permanent).
//!
//! The wrapped map is only ever read.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{debug, trace, warn};

use super::{Handle, Overlay, OverlayError, create};
use crate::value::{Attributes, Map, Property, Value};

/// A visible property: its handle plus the attributes it carries.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub handle: Handle,
    pub attributes: Attributes,
}

/// What an override records for a key.
#[derive(Debug, Clone)]
enum Slot {
    Present(Descriptor),
    /// Tombstone for a removed key
    Deleted,
}

/// What a map overlay reads through to.
#[derive(Debug, Clone)]
enum Origin {
    Base(Arc<Map>),
    Overlay(MapOverlay),
}

impl Origin {
    /// Looks a key up without materializing anything.
    fn peek(&self, key: &str) -> Option<Descriptor> {
        match self {
            Origin::Base(map) => map.property(key).map(|prop| Descriptor {
                handle: Handle::Value(prop.value.clone()),
                attributes: prop.attributes,
            }),
            Origin::Overlay(overlay) => overlay.peek(key),
        }
    }

    /// Looks a key up the way a caller read would.
    fn read(&self, key: &str) -> Option<Descriptor> {
        match self {
            Origin::Base(_) => self.peek(key),
            Origin::Overlay(overlay) => overlay.describe(key),
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        match self {
            Origin::Base(map) => map.contains_key(key),
            Origin::Overlay(overlay) => overlay.contains_key(key),
        }
    }

    fn keys(&self) -> Vec<String> {
        match self {
            Origin::Base(map) => map.keys().cloned().collect(),
            Origin::Overlay(overlay) => overlay.keys(),
        }
    }

    fn identity(&self) -> Handle {
        match self {
            Origin::Base(map) => Handle::Value(Value::Map(Arc::clone(map))),
            Origin::Overlay(overlay) => Handle::Map(overlay.clone()),
        }
    }
}

struct MapNode {
    origin: Origin,
    overrides: HashMap<String, Slot>,
    children: HashMap<String, Descriptor>,
    dirty: bool,
    frozen: bool,
}

impl MapNode {
    /// Resolves a key from this node's own state only.
    ///
    /// `Some(None)` means the key is tombstoned; `None` means the node has no
    /// opinion and the origin must be consulted.
    fn local(&self, key: &str) -> Option<Option<Descriptor>> {
        match self.overrides.get(key) {
            Some(Slot::Deleted) => Some(None),
            Some(Slot::Present(descriptor)) => Some(Some(descriptor.clone())),
            None => self.children.get(key).cloned().map(Some),
        }
    }

    /// Child overlays this node currently holds, overrides and cache alike.
    fn overlays(&self) -> Vec<Handle> {
        let overridden = self.overrides.values().filter_map(|slot| match slot {
            Slot::Present(descriptor) if descriptor.handle.is_overlay() => {
                Some(descriptor.handle.clone())
            }
            _ => None,
        });
        overridden
            .chain(self.children.values().map(|child| child.handle.clone()))
            .collect()
    }
}

/// Overlay over a keyed map.
///
/// Cloning a `MapOverlay` clones the handle, not the node: both clones see and
/// make the same changes.
///
/// ```
/// use veneer::{create, Value, value::Map};
///
/// let base = Value::from(Map::new().with("a", 1).with("b", 2));
/// let draft = create(base.clone());
/// let map = draft.as_map().unwrap();
///
/// map.set("a", 10).unwrap();
/// map.remove("b").unwrap();
///
/// assert_eq!(map.get("a").and_then(|h| h.as_int()), Some(10));
/// assert!(map.get("b").is_none());
/// assert_eq!(map.keys(), vec!["a".to_string()]);
///
/// // The base is untouched
/// let base_map = base.as_map().unwrap();
/// assert_eq!(base_map.get("a"), Some(&Value::Int(1)));
/// assert_eq!(base_map.get("b"), Some(&Value::Int(2)));
/// ```
#[derive(Clone)]
pub struct MapOverlay {
    node: Arc<RwLock<MapNode>>,
}

impl MapOverlay {
    fn new(origin: Origin) -> Self {
        Self {
            node: Arc::new(RwLock::new(MapNode {
                origin,
                overrides: HashMap::new(),
                children: HashMap::new(),
                dirty: false,
                frozen: false,
            })),
        }
    }

    pub(crate) fn over_base(map: Arc<Map>) -> Self {
        Self::new(Origin::Base(map))
    }

    pub(crate) fn over_overlay(overlay: MapOverlay) -> Self {
        Self::new(Origin::Overlay(overlay))
    }

    fn read(&self) -> RwLockReadGuard<'_, MapNode> {
        self.node.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MapNode> {
        self.node.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if both handles refer to the same node
    pub fn ptr_eq(&self, other: &MapOverlay) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Visible descriptor for `key`, without materializing a child.
    fn peek(&self, key: &str) -> Option<Descriptor> {
        let origin = {
            let node = self.read();
            if let Some(local) = node.local(key) {
                return local;
            }
            node.origin.clone()
        };
        origin.peek(key)
    }

    /// Gets the value visible under `key`.
    ///
    /// Branch values are materialized into a child overlay on first read and
    /// cached, so repeated reads return the same handle. Branches behind a
    /// non-configurable property are returned raw. Returns `None` for removed
    /// or missing keys.
    pub fn get(&self, key: &str) -> Option<Handle> {
        let origin = {
            let node = self.read();
            if let Some(local) = node.local(key) {
                return local.map(|descriptor| descriptor.handle);
            }
            node.origin.clone()
        };

        let Descriptor { handle, attributes } = origin.read(key)?;
        if !handle.is_branch() || !attributes.configurable {
            return Some(handle);
        }

        let mut node = self.write();
        // The key may have been written or materialized while unlocked.
        if let Some(local) = node.local(key) {
            return local.map(|descriptor| descriptor.handle);
        }
        trace!(key, kind = handle.type_name(), "Materializing child overlay");
        let child = create(handle);
        node.children.insert(
            key.to_string(),
            Descriptor {
                handle: child.clone(),
                attributes,
            },
        );
        Some(child)
    }

    /// Gets the visible value and attributes under `key`.
    ///
    /// The handle is obtained the same way [`MapOverlay::get`] obtains it.
    pub fn describe(&self, key: &str) -> Option<Descriptor> {
        let attributes = self.peek(key)?.attributes;
        let handle = self.get(key)?;
        Some(Descriptor { handle, attributes })
    }

    /// Writes `value` under `key`.
    ///
    /// Branch values are wrapped in a fresh overlay before they are stored.
    /// Writing the handle a key already resolves to is a no-op and does not
    /// mark the overlay dirty. On a frozen overlay the write is ignored and
    /// still reported as success.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<Handle>,
    ) -> Result<(), OverlayError> {
        let key = key.into();
        let value = value.into();

        let current = self.peek(&key);
        if current
            .as_ref()
            .is_some_and(|descriptor| descriptor.handle.same(&value))
        {
            return Ok(());
        }
        let attributes = current.map_or(Attributes::DEFAULT, |descriptor| descriptor.attributes);
        self.record(key, create(value), attributes);
        Ok(())
    }

    /// Writes `value` under `key` with explicit attributes.
    ///
    /// Follows the same frozen and dirty rules as [`MapOverlay::set`]. A branch
    /// value defined as non-configurable is stored raw, matching how reads
    /// treat such properties. An overlay defined that way is stored as its
    /// published value, so this node never shares another node's state.
    pub fn define(
        &self,
        key: impl Into<String>,
        value: impl Into<Handle>,
        attributes: Attributes,
    ) -> Result<(), OverlayError> {
        let key = key.into();
        let value = value.into();

        if self.peek(&key).is_some_and(|descriptor| {
            descriptor.attributes == attributes && descriptor.handle.same(&value)
        }) {
            return Ok(());
        }
        let handle = match value {
            Handle::Value(raw) if !attributes.configurable => Handle::Value(raw),
            // A sealed property cannot hold a live node owned elsewhere
            overlay if !attributes.configurable => Handle::Value(overlay.to_value()),
            value => create(value),
        };
        self.record(key, handle, attributes);
        Ok(())
    }

    fn record(&self, key: String, handle: Handle, attributes: Attributes) {
        let mut node = self.write();
        if node.frozen {
            debug!(key = %key, "Ignoring write to frozen overlay");
            return;
        }
        node.children.remove(&key);
        node.overrides
            .insert(key, Slot::Present(Descriptor { handle, attributes }));
        node.dirty = true;
    }

    /// Removes `key` from the visible map.
    ///
    /// The base keeps its value; the overlay records a tombstone. Fails with
    /// [`OverlayError::Frozen`] on a frozen overlay.
    pub fn remove(&self, key: &str) -> Result<(), OverlayError> {
        let mut node = self.write();
        if node.frozen {
            warn!(key, "Rejected delete on frozen overlay");
            return Err(OverlayError::frozen("remove", key));
        }
        node.dirty = true;
        node.children.remove(key);
        node.overrides.insert(key.to_string(), Slot::Deleted);
        Ok(())
    }

    /// Returns true if `key` is visible through this overlay
    pub fn contains_key(&self, key: &str) -> bool {
        let origin = {
            let node = self.read();
            match node.overrides.get(key) {
                Some(Slot::Deleted) => return false,
                Some(Slot::Present(_)) => return true,
                None => {}
            }
            node.origin.clone()
        };
        origin.contains_key(key)
    }

    /// All visible keys, enumerable or not, sorted.
    pub fn keys(&self) -> Vec<String> {
        let (origin, overridden, deleted) = {
            let node = self.read();
            let mut overridden = Vec::new();
            let mut deleted = Vec::new();
            for (key, slot) in &node.overrides {
                match slot {
                    Slot::Present(_) => overridden.push(key.clone()),
                    Slot::Deleted => deleted.push(key.clone()),
                }
            }
            (node.origin.clone(), overridden, deleted)
        };

        let mut keys: BTreeSet<String> = origin.keys().into_iter().collect();
        keys.extend(overridden);
        for key in &deleted {
            keys.remove(key);
        }
        keys.into_iter().collect()
    }

    /// Visible keys whose property is enumerable, sorted.
    pub fn enumerable_keys(&self) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter(|key| {
                self.peek(key)
                    .is_some_and(|descriptor| descriptor.attributes.enumerable)
            })
            .collect()
    }

    /// Returns true if this node or any materialized child, hidden or not,
    /// recorded a change. Decides whether the base can be published as is.
    pub(crate) fn modified(&self) -> bool {
        let children = {
            let node = self.read();
            if node.dirty {
                return true;
            }
            node.children.clone()
        };
        children.values().any(|child| child.handle.is_modified())
    }

    /// Number of visible keys
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns true if no key is visible
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Overlay for MapOverlay {
    fn is_frozen(&self) -> bool {
        self.read().frozen
    }

    fn is_dirty(&self) -> bool {
        self.read().dirty
    }

    fn freeze(&self, deep: bool) {
        let children = {
            let mut node = self.write();
            node.frozen = true;
            debug!(deep, "Froze map overlay");
            if !deep {
                return;
            }
            node.overlays()
        };
        for child in children {
            if let Some(overlay) = child.as_overlay() {
                overlay.freeze(true);
            }
        }
    }

    fn identity(&self) -> Handle {
        let node = self.read();
        if node.dirty {
            Handle::Map(self.clone())
        } else {
            node.origin.identity()
        }
    }

    fn has_changed(&self) -> bool {
        let children = {
            let node = self.read();
            if node.dirty {
                return true;
            }
            node.children.clone()
        };
        children.values().any(|child| {
            child.attributes.enumerable
                && child
                    .handle
                    .as_overlay()
                    .is_some_and(|overlay| overlay.has_changed())
        })
    }

    fn to_value(&self) -> Value {
        if !self.modified() {
            if let Origin::Base(map) = &self.read().origin {
                return Value::Map(Arc::clone(map));
            }
        }
        self.keys()
            .into_iter()
            .filter_map(|key| {
                let Descriptor { handle, attributes } = self.peek(&key)?;
                Some((key, Property::with_attributes(handle.to_value(), attributes)))
            })
            .collect::<Map>()
            .into()
    }
}

impl fmt::Debug for MapOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(node) = self.node.try_read() else {
            return f.debug_struct("MapOverlay").finish_non_exhaustive();
        };
        f.debug_struct("MapOverlay")
            .field("origin", &node.origin)
            .field("overrides", &node.overrides.len())
            .field("children", &node.children.len())
            .field("dirty", &node.dirty)
            .field("frozen", &node.frozen)
            .finish()
    }
}
