//! Working-copy overlay over a list.
//!
//! Index arithmetic and the in-place list operations (push, pop, shift,
//! unshift, sort) do not map well onto per-key overrides, so a
//! [`ListOverlay`] copies the list once when it is created. Every element is
//! passed through [`create`] at that point, which means branch elements are
//! child overlays from the start and index reads are always stable.
//!
//! The copy is shallow: elements share structure with the base exactly like
//! any other overlay does.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{debug, warn};

use super::{Handle, Overlay, OverlayError, create};
use crate::value::{List, Value};

/// Highest index [`ListOverlay::set`] accepts; writes past the end allocate
/// holes up to it.
pub const MAX_INDEX: usize = (u32::MAX - 1) as usize;

/// Logs and builds the error for a mutation of a frozen list.
fn rejected(operation: &str, index: impl ToString) -> OverlayError {
    let index = index.to_string();
    warn!(operation, index = %index, "Rejected mutation of frozen list overlay");
    OverlayError::frozen(operation, index)
}

#[derive(Debug, Clone)]
enum Origin {
    Base(Arc<List>),
    Overlay(ListOverlay),
}

struct ListNode {
    origin: Origin,
    /// `None` marks a hole left by [`ListOverlay::remove`] or a sparse write
    items: Vec<Option<Handle>>,
    dirty: bool,
    frozen: bool,
}

/// Overlay over a list.
///
/// ```
/// use veneer::{create, Value, value::List};
///
/// let base = Value::from(List::new().with(1).with(2));
/// let draft = create(base.clone());
/// let list = draft.as_list().unwrap();
///
/// list.push(3).unwrap();
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.get(2).and_then(|h| h.as_int()), Some(3));
/// assert_eq!(base.as_list().unwrap().len(), 2);
/// ```
#[derive(Clone)]
pub struct ListOverlay {
    node: Arc<RwLock<ListNode>>,
}

impl ListOverlay {
    fn new(origin: Origin, items: Vec<Option<Handle>>) -> Self {
        Self {
            node: Arc::new(RwLock::new(ListNode {
                origin,
                items,
                dirty: false,
                frozen: false,
            })),
        }
    }

    pub(crate) fn over_base(list: Arc<List>) -> Self {
        let items = list.iter().map(|value| Some(create(value.clone()))).collect();
        Self::new(Origin::Base(list), items)
    }

    pub(crate) fn over_overlay(overlay: &ListOverlay) -> Self {
        let items = overlay
            .items()
            .into_iter()
            .map(|item| item.map(create))
            .collect();
        Self::new(Origin::Overlay(overlay.clone()), items)
    }

    fn read(&self) -> RwLockReadGuard<'_, ListNode> {
        self.node.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access for a mutating operation, or the frozen violation.
    fn mutate(
        &self,
        operation: &str,
        index: impl ToString,
    ) -> Result<RwLockWriteGuard<'_, ListNode>, OverlayError> {
        let mut node = self.node.write().unwrap_or_else(PoisonError::into_inner);
        if node.frozen {
            return Err(rejected(operation, index));
        }
        node.dirty = true;
        Ok(node)
    }

    /// Returns true if this node or any element overlay recorded a change.
    pub(crate) fn modified(&self) -> bool {
        let items = {
            let node = self.read();
            if node.dirty {
                return true;
            }
            node.items.clone()
        };
        items.iter().flatten().any(Handle::is_modified)
    }

    /// Returns true if both handles refer to the same node
    pub fn ptr_eq(&self, other: &ListOverlay) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Length of the working copy, holes included
    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    /// Returns true if the working copy is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the element at `index`. Holes and out-of-range indices are `None`.
    pub fn get(&self, index: usize) -> Option<Handle> {
        self.read().items.get(index).cloned().flatten()
    }

    /// Snapshot of the working copy, holes included
    pub fn items(&self) -> Vec<Option<Handle>> {
        self.read().items.clone()
    }

    /// Indices that currently hold an element
    pub fn indices(&self) -> Vec<usize> {
        self.read()
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.as_ref().map(|_| index))
            .collect()
    }

    /// Assigns the element at `index`.
    ///
    /// Writing past the end grows the list, filling the gap with holes. Always
    /// marks the overlay dirty, even if the element was already there.
    /// Indices above [`MAX_INDEX`] fail with [`OverlayError::InvalidArgument`].
    pub fn set(&self, index: usize, value: impl Into<Handle>) -> Result<(), OverlayError> {
        if index > MAX_INDEX {
            warn!(index, max = MAX_INDEX, "Rejected list index out of range");
            return Err(OverlayError::InvalidArgument {
                reason: format!("list index {index} exceeds {MAX_INDEX}"),
            });
        }
        let mut node = self.mutate("set", index)?;
        if index >= node.items.len() {
            node.items.resize(index + 1, None);
        }
        node.items[index] = Some(create(value));
        Ok(())
    }

    /// Removes the element at `index`, leaving a hole. The length is unchanged.
    pub fn remove(&self, index: usize) -> Result<Option<Handle>, OverlayError> {
        let mut node = self.mutate("remove", index)?;
        Ok(node.items.get_mut(index).and_then(Option::take))
    }

    /// Appends an element, returning the new length
    pub fn push(&self, value: impl Into<Handle>) -> Result<usize, OverlayError> {
        let mut node = self.mutate("push", "end")?;
        node.items.push(Some(create(value)));
        Ok(node.items.len())
    }

    /// Removes and returns the last element
    pub fn pop(&self) -> Result<Option<Handle>, OverlayError> {
        let mut node = self.mutate("pop", "end")?;
        Ok(node.items.pop().flatten())
    }

    /// Removes and returns the first element
    pub fn shift(&self) -> Result<Option<Handle>, OverlayError> {
        let mut node = self.mutate("shift", 0)?;
        if node.items.is_empty() {
            return Ok(None);
        }
        Ok(node.items.remove(0))
    }

    /// Prepends an element, returning the new length
    pub fn unshift(&self, value: impl Into<Handle>) -> Result<usize, OverlayError> {
        let mut node = self.mutate("unshift", 0)?;
        node.items.insert(0, Some(create(value)));
        Ok(node.items.len())
    }

    /// Sorts the working copy in place. Holes are moved to the end.
    ///
    /// The comparator runs on a snapshot without the overlay locked, so it may
    /// read through the handles it is given. The result replaces the working
    /// copy only once sorting is done: a panicking comparator leaves the list
    /// as it was, and a freeze that lands mid-sort rejects the result.
    pub fn sort_by<F>(&self, mut compare: F) -> Result<(), OverlayError>
    where
        F: FnMut(&Handle, &Handle) -> Ordering,
    {
        let mut items = {
            let node = self.read();
            if node.frozen {
                return Err(rejected("sort", "all"));
            }
            node.items.clone()
        };
        items.sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => compare(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.mutate("sort", "all")?.items = items;
        Ok(())
    }
}

impl Overlay for ListOverlay {
    fn is_frozen(&self) -> bool {
        self.read().frozen
    }

    fn is_dirty(&self) -> bool {
        self.read().dirty
    }

    fn freeze(&self, deep: bool) {
        let items = {
            let mut node = self.node.write().unwrap_or_else(PoisonError::into_inner);
            node.frozen = true;
            debug!(deep, len = node.items.len(), "Froze list overlay");
            if !deep {
                return;
            }
            node.items.clone()
        };
        for item in items.iter().flatten() {
            if let Some(overlay) = item.as_overlay() {
                overlay.freeze(true);
            }
        }
    }

    fn identity(&self) -> Handle {
        let node = self.read();
        if node.dirty {
            return Handle::List(self.clone());
        }
        match &node.origin {
            Origin::Base(list) => Handle::Value(Value::List(Arc::clone(list))),
            Origin::Overlay(overlay) => Handle::List(overlay.clone()),
        }
    }

    fn has_changed(&self) -> bool {
        let items = {
            let node = self.read();
            if node.dirty {
                return true;
            }
            node.items.clone()
        };
        items
            .iter()
            .flatten()
            .filter_map(Handle::as_overlay)
            .any(|overlay| overlay.has_changed())
    }

    fn to_value(&self) -> Value {
        if !self.modified() {
            if let Origin::Base(list) = &self.read().origin {
                return Value::List(Arc::clone(list));
            }
        }
        self.items()
            .into_iter()
            .map(|item| item.map_or(Value::Null, |handle| handle.to_value()))
            .collect::<List>()
            .into()
    }
}

impl fmt::Debug for ListOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(node) = self.node.try_read() else {
            return f.debug_struct("ListOverlay").finish_non_exhaustive();
        };
        f.debug_struct("ListOverlay")
            .field("origin", &node.origin)
            .field("len", &node.items.len())
            .field("dirty", &node.dirty)
            .field("frozen", &node.frozen)
            .finish()
    }
}
