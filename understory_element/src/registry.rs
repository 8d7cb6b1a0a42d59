// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native handle → element lookup.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::tree::ElementTree;
use crate::types::{ElementId, NativeHandle};

/// Maps native handles to the elements built on them.
///
/// Events coming in from a backend carry a native handle; the registry turns
/// that back into an [`ElementId`]. Handles that were never registered (for
/// example those of a foreign window) simply resolve to `None`.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    map: HashMap<NativeHandle, ElementId>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `handle` with `id`.
    ///
    /// Returns `false` and leaves the registry unchanged when `handle` already
    /// belongs to a different element that is still alive in `tree`. Entries
    /// left behind by removed elements are replaced.
    pub fn register<T>(&mut self, handle: NativeHandle, id: ElementId, tree: &ElementTree<T>) -> bool {
        match self.map.entry(handle) {
            Entry::Vacant(slot) => {
                slot.insert(id);
                true
            }
            Entry::Occupied(mut slot) => {
                let owner = *slot.get();
                if owner == id {
                    return true;
                }
                if tree.is_alive(owner) {
                    return false;
                }
                log::debug!("replacing stale registration of {handle:?}");
                slot.insert(id);
                true
            }
        }
    }

    /// The element registered for `handle`, if any.
    pub fn lookup(&self, handle: NativeHandle) -> Option<ElementId> {
        self.map.get(&handle).copied()
    }

    /// Remove the association of `handle`, but only if it points at `id`.
    pub fn unregister(&mut self, handle: NativeHandle, id: ElementId) -> bool {
        match self.map.entry(handle) {
            Entry::Occupied(slot) if *slot.get() == id => {
                slot.remove();
                true
            }
            _ => false,
        }
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no handle is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
