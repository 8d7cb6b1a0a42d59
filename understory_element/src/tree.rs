// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: element storage, structure, and ancestry queries.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::kind::ElementKind;
use crate::types::{ElementId, NativeHandle, TrackingToken};
use crate::violation::ContractViolation;

/// Ancestor chains are short in practice; keep them off the heap.
pub(crate) type Chain = SmallVec<[ElementId; 16]>;

/// A node of the logical element tree.
///
/// The payload `T` carries whatever the owner of the tree attaches to each
/// element (for example its registered reactions).
#[derive(Debug)]
pub struct Element<T> {
    generation: u32,
    kind: ElementKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    native: NativeHandle,
    hover_interest: u32,
    tracking: Option<TrackingToken>,
    notifications_blocked: bool,
    data: T,
}

impl<T> Element<T> {
    fn new(generation: u32, kind: ElementKind, native: NativeHandle, data: T) -> Self {
        Self {
            generation,
            kind,
            parent: None,
            children: Vec::new(),
            native,
            hover_interest: 0,
            tracking: None,
            notifications_blocked: false,
            data,
        }
    }

    /// Concrete kind of this element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Logical parent, or `None` for the application root.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Logical children in insertion order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Handle of the native object backing this element.
    pub fn native_handle(&self) -> NativeHandle {
        self.native
    }

    /// Number of outstanding reasons to track hover crossings on this element.
    pub fn hover_interest(&self) -> u32 {
        self.hover_interest
    }

    /// Whether a native tracking registration is armed.
    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    /// Add one reason to track hover crossings.
    ///
    /// When the count leaves zero, `arm` is called with this element's handle
    /// and the token it returns is kept until the count drops back to zero.
    /// Returns `true` if `arm` was called.
    pub fn retain_hover_interest(
        &mut self,
        arm: impl FnOnce(NativeHandle) -> TrackingToken,
    ) -> bool {
        self.hover_interest = self.hover_interest.saturating_add(1);
        if self.hover_interest != 1 {
            return false;
        }
        debug_assert!(self.tracking.is_none(), "no token is armed at zero interest");
        self.tracking = Some(arm(self.native));
        true
    }

    /// Drop one reason to track hover crossings.
    ///
    /// When the count returns to zero the armed token (if any) is handed back
    /// for disarming.
    pub fn release_hover_interest(&mut self) -> Result<Option<TrackingToken>, ContractViolation> {
        if self.hover_interest == 0 {
            return Err(ContractViolation::HoverInterestUnderflow);
        }
        self.hover_interest -= 1;
        if self.hover_interest == 0 {
            Ok(self.tracking.take())
        } else {
            Ok(None)
        }
    }

    /// Drop every reason to track hover crossings and return the armed token.
    pub fn take_tracking(&mut self) -> Option<TrackingToken> {
        self.hover_interest = 0;
        self.tracking.take()
    }

    /// Whether native notifications for this element are currently delivered.
    pub fn notifications_allowed(&self) -> bool {
        !self.notifications_blocked
    }

    /// Suppress native notifications for this element.
    pub fn block_notifications(&mut self) -> Result<(), ContractViolation> {
        if self.notifications_blocked {
            return Err(ContractViolation::NotificationsAlreadyBlocked);
        }
        self.notifications_blocked = true;
        Ok(())
    }

    /// Resume native notifications for this element.
    pub fn allow_notifications(&mut self) -> Result<(), ContractViolation> {
        if !self.notifications_blocked {
            return Err(ContractViolation::NotificationsNotBlocked);
        }
        self.notifications_blocked = false;
        Ok(())
    }

    /// Attached payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Attached payload, mutably.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Consume the element and return its payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// The logical element tree.
///
/// The tree always has exactly one root, an [`ElementKind::Application`]
/// element created with the tree and never removed from it. Every other
/// element is inserted under a live container and removed together with its
/// subtree.
///
/// ## Example
///
/// ```rust
/// use understory_element::{ElementKind, ElementTree, NativeHandle};
///
/// let mut tree = ElementTree::new(NativeHandle(1), ());
/// let app = tree.root();
/// let window = tree
///     .insert(app, ElementKind::Window, NativeHandle(2), ())
///     .unwrap();
/// let button = tree
///     .insert(window, ElementKind::Button, NativeHandle(3), ())
///     .unwrap();
///
/// assert_eq!(tree.window_of(button), Some(window));
/// assert_eq!(tree.depth(button), Some(2));
/// assert_eq!(tree.ancestors(button).collect::<Vec<_>>(), vec![button, window, app]);
///
/// tree.remove(window);
/// assert!(!tree.is_alive(button));
/// ```
pub struct ElementTree<T> {
    /// slots
    nodes: Vec<Option<Element<T>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
}

impl<T> core::fmt::Debug for ElementTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("ElementTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<T> ElementTree<T> {
    /// Create a tree holding only the application root.
    pub fn new(application: NativeHandle, data: T) -> Self {
        let generation = 1_u32;
        Self {
            nodes: alloc::vec![Some(Element::new(
                generation,
                ElementKind::Application,
                application,
                data,
            ))],
            generations: alloc::vec![generation],
            free_list: Vec::new(),
            root: ElementId::new(0, generation),
        }
    }

    /// The application root.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Insert a new element as the last child of `parent`.
    ///
    /// Returns `None` (and inserts nothing) when `parent` is stale or cannot
    /// hold children, when `kind` is [`ElementKind::Application`], or when a
    /// window or screen is placed anywhere but directly under the root.
    pub fn insert(
        &mut self,
        parent: ElementId,
        kind: ElementKind,
        native: NativeHandle,
        data: T,
    ) -> Option<ElementId> {
        let parent_kind = self.get(parent)?.kind;
        if kind == ElementKind::Application || !parent_kind.is_container() {
            log::warn!("cannot insert {kind:?} under {parent_kind:?}");
            return None;
        }
        if matches!(kind, ElementKind::Window | ElementKind::Screen) && parent != self.root {
            log::warn!("{kind:?} elements must be children of the application");
            return None;
        }

        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Element::new(generation, kind, native, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes
                .push(Some(Element::new(generation, kind, native, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        self.link_parent(id, parent);
        Some(id)
    }

    /// Remove an element and its subtree.
    ///
    /// Returns the removed elements with their ids, descendants before their
    /// parents. Removing the root or a stale id removes nothing.
    pub fn remove(&mut self, id: ElementId) -> Vec<(ElementId, Element<T>)> {
        let mut removed = Vec::new();
        if id == self.root || !self.is_alive(id) {
            return removed;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.remove_recursive(id, &mut removed);
        removed
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// An `ElementId` is considered live if its slot exists and its generation
    /// matches the current generation stored in that slot.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Access a live element.
    pub fn get(&self, id: ElementId) -> Option<&Element<T>> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.generation())
    }

    /// Access a live element mutably.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element<T>> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.generation())
    }

    /// Returns the kind of a live element.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.get(id).map(|n| n.kind)
    }

    /// Returns the parent of an element if live, or `None` for the root or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get the children of an element, or an empty slice if it is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map_or(&[], |n| &n.children)
    }

    /// Returns the native handle of a live element.
    pub fn native_handle(&self, id: ElementId) -> Option<NativeHandle> {
        self.get(id).map(|n| n.native)
    }

    /// Iterate `id` and then each of its ancestors up to the root.
    ///
    /// Yields nothing for a stale id.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Number of parent steps from `id` to the root.
    pub fn depth(&self, id: ElementId) -> Option<usize> {
        let count = self.ancestors(id).count();
        count.checked_sub(1)
    }

    /// Returns `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// The deepest element reachable by walking up from both `a` and `b`.
    ///
    /// Returns `None` when either side is `None` or stale.
    pub fn common_ancestor(&self, a: Option<ElementId>, b: Option<ElementId>) -> Option<ElementId> {
        let (a, b) = (a?, b?);
        let chain: Chain = self.ancestors(a).collect();
        self.ancestors(b).find(|id| chain.contains(id))
    }

    /// The nearest window containing `id` (or `id` itself if it is a window).
    pub fn window_of(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors(id)
            .find(|&a| self.kind(a) == Some(ElementKind::Window))
    }

    /// Flat list of all live elements, root first.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element<T>)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref().map(|n| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "ElementId uses 32-bit indices by design."
                )]
                (ElementId::new(i as u32, n.generation), n)
            })
        })
    }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Always `false`: the root lives as long as the tree.
    pub fn is_empty(&self) -> bool {
        false
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: ElementId) -> &Element<T> {
        self.get(id).expect("dangling ElementId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: ElementId) -> &mut Element<T> {
        self.get_mut(id).expect("dangling ElementId")
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn remove_recursive(&mut self, id: ElementId, removed: &mut Vec<(ElementId, Element<T>)>) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.remove_recursive(child, removed);
        }
        if let Some(element) = self.nodes[id.idx()].take() {
            self.free_list.push(id.idx());
            removed.push((id, element));
        }
    }
}

/// Iterator over an element and its ancestors, see [`ElementTree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, T> {
    tree: &'a ElementTree<T>,
    next: Option<ElementId>,
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}
