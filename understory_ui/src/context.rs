// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Ui` context: element lifecycle, registration, and queries.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use understory_element::{
    Command, ContractViolation, ElementId, ElementKind, ElementTree, KeyChord, NativeHandle,
    PointerStatus, Registry, report_violation,
};

use crate::Platform;
use crate::reaction::{ControllerKey, Handlers, Reaction, ReactionEvent, ShortcutReaction};

/// The application context.
///
/// Owns the element tree rooted in the application element, the native
/// handle registry, the platform backend, and the input state. All dispatch,
/// crossing, and shortcut logic runs through it on the event-loop thread.
///
/// Dropping a `Ui` destroys every element (children before parents, the
/// application last) and releases their native handles.
///
/// ## Example
///
/// ```rust
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use understory_element::{Command, ElementKind, NativeHandle};
/// use understory_ui::{NativeEvent, Disposition, Ui, headless::HeadlessPlatform};
///
/// let mut ui = Ui::new(HeadlessPlatform::new(), NativeHandle(1));
/// let window = ui
///     .create_element(ui.root(), ElementKind::Window, NativeHandle(2))
///     .unwrap();
/// let panel = ui
///     .create_element(window, ElementKind::Space, NativeHandle(3))
///     .unwrap();
///
/// let redraws = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&redraws);
/// ui.add_reaction(window, Command::Redraw, None, move |_, _| {
///     counter.set(counter.get() + 1);
/// });
///
/// // The panel has no reaction of its own; the request bubbles to the window.
/// assert_eq!(
///     ui.notify_native_event(NativeHandle(3), NativeEvent::Redraw),
///     Disposition::Handled
/// );
/// assert_eq!(redraws.get(), 1);
///
/// // Nobody listens for reshapes: the backend runs its default handling.
/// assert_eq!(
///     ui.notify_native_event(NativeHandle(3), NativeEvent::Reshape),
///     Disposition::Default
/// );
/// ```
pub struct Ui<P: Platform> {
    pub(crate) tree: ElementTree<Handlers<P>>,
    pub(crate) registry: Registry,
    pub(crate) platform: P,
    pub(crate) hovered: Option<ElementId>,
    pub(crate) pointer: PointerStatus,
    pub(crate) chord: KeyChord,
    /// Set while the crossing tracker walks; nested updates wait in `pending_hover`.
    pub(crate) crossing_active: bool,
    pub(crate) pending_hover: Option<Option<ElementId>>,
    windows: Vec<ElementId>,
    screens: Vec<ElementId>,
}

impl<P: Platform> fmt::Debug for Ui<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("tree", &self.tree)
            .field("registered", &self.registry.len())
            .field("hovered", &self.hovered)
            .field("pointer", &self.pointer)
            .field("chord", &self.chord)
            .field("windows", &self.windows)
            .field("screens", &self.screens)
            .finish_non_exhaustive()
    }
}

impl<P: Platform> Ui<P> {
    /// Create the context and its application element.
    pub fn new(platform: P, application: NativeHandle) -> Self {
        let tree = ElementTree::new(application, Handlers::default());
        let mut registry = Registry::new();
        let registered = registry.register(application, tree.root(), &tree);
        debug_assert!(registered, "a fresh registry accepts the application handle");
        log::debug!("application created on {application:?}");
        Self {
            tree,
            registry,
            platform,
            hovered: None,
            pointer: PointerStatus::default(),
            chord: KeyChord::default(),
            crossing_active: false,
            pending_hover: None,
            windows: Vec::new(),
            screens: Vec::new(),
        }
    }

    /// The application element.
    pub fn root(&self) -> ElementId {
        self.tree.root()
    }

    /// Create an element of `kind` under `parent`, backed by `handle`.
    ///
    /// Returns `None` when the tree rejects the placement (see
    /// [`ElementTree::insert`]) or when `handle` already belongs to a live
    /// element.
    pub fn create_element(
        &mut self,
        parent: ElementId,
        kind: ElementKind,
        handle: NativeHandle,
    ) -> Option<ElementId> {
        if let Some(owner) = self.lookup(handle) {
            log::warn!("create_element: {handle:?} already belongs to live {owner:?}");
            return None;
        }
        let id = self.tree.insert(parent, kind, handle, Handlers::default())?;
        let registered = self.registry.register(handle, id, &self.tree);
        debug_assert!(registered, "handle ownership was checked before insertion");
        match kind {
            ElementKind::Window => self.windows.push(id),
            ElementKind::Screen => self.screens.push(id),
            _ => {}
        }
        log::debug!("created {kind:?} {id:?} on {handle:?}");
        Some(id)
    }

    /// Destroy an element together with its subtree.
    ///
    /// Children go first, each while its parent is still registered. Every
    /// element leaves the registry before the backend is asked to destroy its
    /// native handle. Stale ids are ignored; the application is only
    /// destroyed by dropping the `Ui`.
    pub fn destroy_element(&mut self, id: ElementId) {
        if id == self.root() {
            report_violation(ContractViolation::RootRemoval);
            return;
        }
        if !self.tree.is_alive(id) {
            log::warn!("destroy_element: {id:?} is stale");
            return;
        }
        self.teardown(id);
    }

    fn teardown(&mut self, id: ElementId) {
        let children = self.tree.children_of(id).to_vec();
        for child in children {
            self.teardown(child);
        }

        // The pointer is still over whatever contained the element.
        if self.hovered == Some(id) {
            let parent = self.tree.parent_of(id);
            self.hovered = parent;
            if let Some(parent) = parent {
                self.retain_tracking(parent);
            }
        }

        let Some(element) = self.tree.get_mut(id) else {
            return;
        };
        let handle = element.native_handle();
        if let Some(token) = element.take_tracking() {
            self.platform.disarm_hover_tracking(token);
        }
        debug_assert!(
            self.tree.parent_of(id).is_none_or(|parent| self
                .tree
                .native_handle(parent)
                .and_then(|h| self.lookup(h))
                == Some(parent)),
            "the parent stays registered until its children are gone"
        );
        self.registry.unregister(handle, id);
        if id != self.tree.root() {
            let removed = self.tree.remove(id);
            debug_assert_eq!(removed.len(), 1, "children are torn down first");
        }
        self.windows.retain(|&w| w != id);
        self.screens.retain(|&s| s != id);
        log::debug!("destroyed {id:?} on {handle:?}");
        self.platform.destroy_native_handle(handle);
    }

    /// Register a reaction for `command` on `element`.
    ///
    /// Reactions are kept in registration order; the first one matching a
    /// command wins. Registering `PointerEntered` or `PointerExited` adds one
    /// unit of hover interest so the backend reports crossings for the
    /// element.
    ///
    /// Returns `false` for stale elements and for commands the element kind
    /// does not emit (the latter is a contract violation).
    pub fn add_reaction(
        &mut self,
        element: ElementId,
        command: Command,
        controller: Option<ControllerKey>,
        callback: impl Fn(&mut Self, &ReactionEvent) + 'static,
    ) -> bool {
        let Some(e) = self.tree.get_mut(element) else {
            log::warn!("add_reaction: {element:?} is stale");
            return false;
        };
        let kind = e.kind();
        if !kind.accepts(command) {
            report_violation(ContractViolation::UnsupportedCommand { kind, command });
            return false;
        }
        e.data_mut().reactions.push(Reaction {
            controller,
            command,
            callback: Rc::new(callback),
        });
        if is_crossing(command) {
            self.retain_tracking(element);
        }
        true
    }

    /// Register a keyboard shortcut for exactly `chord` on `element`.
    pub fn add_shortcut(
        &mut self,
        element: ElementId,
        chord: KeyChord,
        controller: Option<ControllerKey>,
        callback: impl Fn(&mut Self, &ReactionEvent) + 'static,
    ) -> bool {
        let Some(e) = self.tree.get_mut(element) else {
            log::warn!("add_shortcut: {element:?} is stale");
            return false;
        };
        e.data_mut().shortcuts.push(ShortcutReaction {
            controller,
            chord,
            callback: Rc::new(callback),
        });
        true
    }

    /// Remove every reaction and shortcut `controller` registered on `element`.
    ///
    /// Returns the number of removed registrations.
    pub fn remove_reactions(&mut self, element: ElementId, controller: ControllerKey) -> usize {
        let Some(e) = self.tree.get_mut(element) else {
            return 0;
        };
        let (commands, shortcuts) = e.data_mut().remove_controller(controller);
        for command in &commands {
            if is_crossing(*command) {
                self.release_tracking(element);
            }
        }
        commands.len() + shortcuts
    }

    /// Stop dispatching native notifications for `element`.
    ///
    /// Used while the application changes a widget's value itself, so the
    /// backend's echo of that change is not reported back as user input.
    pub fn block_notifications(&mut self, element: ElementId) {
        if let Some(e) = self.tree.get_mut(element)
            && let Err(violation) = e.block_notifications()
        {
            report_violation(violation);
        }
    }

    /// Resume dispatching native notifications for `element`.
    pub fn allow_notifications(&mut self, element: ElementId) {
        if let Some(e) = self.tree.get_mut(element)
            && let Err(violation) = e.allow_notifications()
        {
            report_violation(violation);
        }
    }

    /// Whether native notifications for `element` are dispatched.
    pub fn notifications_allowed(&self, element: ElementId) -> bool {
        self.tree
            .get(element)
            .is_some_and(|e| e.notifications_allowed())
    }

    // --- queries ---

    /// The element tree.
    pub fn tree(&self) -> &ElementTree<Handlers<P>> {
        &self.tree
    }

    /// The element registered for a native handle.
    ///
    /// Foreign handles resolve to `None`.
    pub fn lookup(&self, handle: NativeHandle) -> Option<ElementId> {
        self.registry
            .lookup(handle)
            .filter(|&id| self.tree.is_alive(id))
    }

    /// Logical parent of a live element.
    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.tree.parent_of(element)
    }

    /// Logical children of a live element, in creation order.
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.tree.children_of(element)
    }

    /// Every live element, the application first.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.tree.iter().map(|(id, _)| id)
    }

    /// Kind of a live element.
    pub fn kind(&self, element: ElementId) -> Option<ElementKind> {
        self.tree.kind(element)
    }

    /// Native handle of a live element.
    pub fn native_handle(&self, element: ElementId) -> Option<NativeHandle> {
        self.tree.native_handle(element)
    }

    /// Nearest window containing `element`.
    pub fn window_of(&self, element: ElementId) -> Option<ElementId> {
        self.tree.window_of(element)
    }

    /// Live windows in creation order.
    pub fn windows(&self) -> &[ElementId] {
        &self.windows
    }

    /// Live screens in creation order.
    pub fn screens(&self) -> &[ElementId] {
        &self.screens
    }

    /// Whether the pointer is inside `element`.
    pub fn is_pointer_inside(&self, element: ElementId) -> bool {
        self.tree
            .get(element)
            .is_some_and(|e| e.data().pointer_inside)
    }

    /// Hover-interest count of `element` (zero for stale ids).
    pub fn hover_interest(&self, element: ElementId) -> u32 {
        self.tree.get(element).map_or(0, |e| e.hover_interest())
    }

    /// Whether native hover tracking is armed for `element`.
    pub fn is_tracking(&self, element: ElementId) -> bool {
        self.tree.get(element).is_some_and(|e| e.is_tracking())
    }

    /// The element the crossing tracker considers hovered.
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Last known pointer state.
    pub fn pointer(&self) -> &PointerStatus {
        &self.pointer
    }

    /// The chord currently held down.
    pub fn chord(&self) -> KeyChord {
        self.chord
    }

    /// The backend.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The backend, mutably.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform> Drop for Ui<P> {
    fn drop(&mut self) {
        // Nothing is hovered any more; keep teardown from handing interest upward.
        self.hovered = None;
        let root = self.tree.root();
        let windows = self.tree.children_of(root).to_vec();
        for child in windows {
            self.teardown(child);
        }
        self.teardown(root);
    }
}

fn is_crossing(command: Command) -> bool {
    matches!(command, Command::PointerEntered | Command::PointerExited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPlatform;
    use crate::testing::Fixture;
    use kurbo::Rect;
    use understory_element::{KeyCode, Modifiers};

    #[test]
    fn create_registers_and_lists() {
        let f = Fixture::new();
        assert_eq!(f.ui.lookup(NativeHandle(4)), Some(f.button));
        assert_eq!(f.ui.lookup(NativeHandle(1)), Some(f.ui.root()));
        assert_eq!(f.ui.lookup(NativeHandle(999)), None);
        assert_eq!(f.ui.windows(), &[f.window]);
        assert_eq!(f.ui.window_of(f.button), Some(f.window));
        assert_eq!(f.ui.kind(f.panel), Some(ElementKind::Space));
    }

    #[test]
    fn duplicate_handle_is_refused() {
        let mut f = Fixture::new();
        assert_eq!(
            f.ui.create_element(f.panel, ElementKind::Label, NativeHandle(4)),
            None
        );
        assert_eq!(f.ui.lookup(NativeHandle(4)), Some(f.button));
        assert_eq!(f.ui.children(f.panel), &[f.button]);

        // Once the owner is gone the handle can be reused.
        f.ui.destroy_element(f.button);
        let label = f
            .ui
            .create_element(f.panel, ElementKind::Label, NativeHandle(4))
            .unwrap();
        assert_eq!(f.ui.lookup(NativeHandle(4)), Some(label));
    }

    #[test]
    fn destroy_children_first_and_unregister() {
        let mut f = Fixture::new();
        let platform = f.platform.clone();
        f.ui.destroy_element(f.panel);

        assert_eq!(
            platform.destroyed(),
            alloc::vec![NativeHandle(4), NativeHandle(3)]
        );
        assert_eq!(f.ui.lookup(NativeHandle(3)), None);
        assert_eq!(f.ui.lookup(NativeHandle(4)), None);
        assert!(!f.ui.tree().is_alive(f.button));
        assert!(f.ui.tree().children_of(f.window).is_empty());

        // Destroying again is a no-op.
        f.ui.destroy_element(f.panel);
        assert_eq!(platform.destroyed().len(), 2);
    }

    #[test]
    fn destroying_a_deep_subtree_keeps_ancestors_resolvable() {
        let mut f = Fixture::new();
        let platform = f.platform.clone();
        let inner = f
            .ui
            .create_element(f.panel, ElementKind::Space, NativeHandle(5))
            .unwrap();
        let check = f
            .ui
            .create_element(inner, ElementKind::CheckBox, NativeHandle(6))
            .unwrap();
        f.ui.add_reaction(inner, Command::PointerExited, None, |_, _| {});
        f.ui.update_hover_target(Some(check));

        f.ui.destroy_element(f.panel);

        assert_eq!(
            platform.destroyed(),
            alloc::vec![
                NativeHandle(4),
                NativeHandle(6),
                NativeHandle(5),
                NativeHandle(3)
            ]
        );
        for handle in 3..=6 {
            assert_eq!(f.ui.lookup(NativeHandle(handle)), None);
        }
        assert_eq!(f.ui.lookup(NativeHandle(2)), Some(f.window));
        assert_eq!(f.ui.hovered(), Some(f.window));
        assert_eq!(f.ui.hover_interest(f.window), 1);
        assert_eq!(platform.armed_count(), 1);
    }

    #[test]
    fn destroy_releases_tracking() {
        let mut f = Fixture::new();
        let platform = f.platform.clone();
        f.ui.add_reaction(f.panel, Command::PointerEntered, None, |_, _| {});
        assert!(platform.is_armed(NativeHandle(3)));
        f.ui.destroy_element(f.panel);
        assert!(!platform.is_armed(NativeHandle(3)));
        assert_eq!(platform.armed_count(), 0);
    }

    #[test]
    fn drop_tears_everything_down_application_last() {
        let platform = HeadlessPlatform::new();
        {
            let f = Fixture::with_platform(platform.clone());
            drop(f);
        }
        let destroyed = platform.destroyed();
        assert_eq!(
            destroyed,
            alloc::vec![
                NativeHandle(4),
                NativeHandle(3),
                NativeHandle(2),
                NativeHandle(1)
            ]
        );
        assert_eq!(platform.armed_count(), 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "only removed at shutdown")]
    fn destroying_the_application_is_a_violation() {
        let mut f = Fixture::new();
        let root = f.ui.root();
        f.ui.destroy_element(root);
    }

    #[test]
    fn reactions_respect_the_command_table() {
        let mut f = Fixture::new();
        assert!(f.ui.add_reaction(f.button, Command::Pressed, None, |_, _| {}));
        assert!(f.ui.add_reaction(f.window, Command::Closes, None, |_, _| {}));
        let button = f.button;
        f.ui.destroy_element(button);
        assert!(!f.ui.add_reaction(button, Command::Pressed, None, |_, _| {}));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "do not emit")]
    fn unsupported_command_is_a_violation() {
        let mut f = Fixture::new();
        f.ui.add_reaction(f.button, Command::Closes, None, |_, _| {});
    }

    #[test]
    fn remove_reactions_by_controller() {
        let mut f = Fixture::new();
        let ctl = ControllerKey(7);
        f.ui.add_reaction(f.panel, Command::PointerEntered, Some(ctl), |_, _| {});
        f.ui.add_reaction(f.panel, Command::PointerExited, Some(ctl), |_, _| {});
        f.ui.add_reaction(f.panel, Command::Redraw, None, |_, _| {});
        f.ui.add_shortcut(
            f.panel,
            KeyChord::new(KeyCode::TAB, Modifiers::empty()),
            Some(ctl),
            |_, _| {},
        );
        assert_eq!(f.ui.hover_interest(f.panel), 2);

        assert_eq!(f.ui.remove_reactions(f.panel, ctl), 3);
        assert_eq!(f.ui.hover_interest(f.panel), 0);
        assert!(!f.ui.is_tracking(f.panel));
        let handlers = f.ui.tree().get(f.panel).unwrap().data();
        assert_eq!(handlers.reaction_count(), 1);
        assert_eq!(handlers.shortcut_count(), 0);
    }

    #[test]
    fn blocking_round_trip() {
        let mut f = Fixture::new();
        assert!(f.ui.notifications_allowed(f.button));
        f.ui.block_notifications(f.button);
        assert!(!f.ui.notifications_allowed(f.button));
        f.ui.allow_notifications(f.button);
        assert!(f.ui.notifications_allowed(f.button));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "already blocked")]
    fn double_block_is_a_violation() {
        let mut f = Fixture::new();
        f.ui.block_notifications(f.button);
        f.ui.block_notifications(f.button);
    }

    #[test]
    fn screens_are_listed() {
        let mut f = Fixture::new();
        let root = f.ui.root();
        f.platform
            .set_rect(NativeHandle(50), Rect::new(0.0, 0.0, 100.0, 100.0));
        let screen = f
            .ui
            .create_element(root, ElementKind::Screen, NativeHandle(50))
            .unwrap();
        assert_eq!(f.ui.screens(), &[screen]);
        f.ui.destroy_element(screen);
        assert!(f.ui.screens().is_empty());
    }
}
