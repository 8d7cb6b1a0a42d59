// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard shortcut resolution.
//!
//! Starting at the focused element, each element up to the application is
//! asked for a shortcut registered for exactly the current chord. The first
//! hit runs and resolution ends there, so an inner element shadows an outer
//! one listening for the same chord.

use understory_element::{Command, ElementId, KeyChord};

use crate::Platform;
use crate::context::Ui;
use crate::reaction::ReactionEvent;

impl<P: Platform> Ui<P> {
    /// The element owning the backend's focused native object.
    ///
    /// `None` when nothing is focused or the focus is in a foreign object.
    pub fn focused_element(&self) -> Option<ElementId> {
        self.platform
            .focused_handle()
            .and_then(|handle| self.lookup(handle))
    }

    /// Run the shortcut registered for `chord` nearest to `focused`.
    ///
    /// Falls back to the application when `focused` is `None` or stale.
    /// Returns `false` when no element on the way up claims the chord; the
    /// caller should then let the platform handle the key.
    pub fn resolve_shortcut(&mut self, focused: Option<ElementId>, chord: KeyChord) -> bool {
        if !chord.has_key() {
            return false;
        }
        let origin = focused
            .filter(|&id| self.tree.is_alive(id))
            .unwrap_or_else(|| self.tree.root());
        let mut current = Some(origin);
        while let Some(id) = current {
            let Some(e) = self.tree.get(id) else {
                return false;
            };
            let parent = e.parent();
            if let Some((callback, controller)) = e.data().shortcut_for(chord) {
                log::trace!("shortcut {chord:?} resolved at {id:?}");
                let event = ReactionEvent {
                    element: id,
                    origin,
                    command: Command::KeyboardShortcut,
                    controller,
                };
                callback(self, &event);
                return true;
            }
            current = parent;
        }
        log::trace!("shortcut {chord:?} unresolved from {origin:?}");
        false
    }

    /// Resolve the chord currently held down, starting at the focused element.
    pub fn resolve_current_shortcut(&mut self) -> bool {
        let focused = self.focused_element();
        self.resolve_shortcut(focused, self.chord)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use understory_element::{ElementId, ElementKind, KeyChord, KeyCode, Modifiers, NativeHandle};

    use crate::context::Ui;
    use crate::headless::HeadlessPlatform;
    use crate::testing::Fixture;

    type Log = Rc<RefCell<Vec<(ElementId, ElementId)>>>;

    fn listen(ui: &mut Ui<HeadlessPlatform>, id: ElementId, chord: KeyChord, log: &Log) {
        let log = Rc::clone(log);
        ui.add_shortcut(id, chord, None, move |_, ev| {
            log.borrow_mut().push((ev.element, ev.origin));
        });
    }

    #[test]
    fn inner_element_shadows_outer() {
        let mut f = Fixture::new();
        let field = f
            .ui
            .create_element(f.window, ElementKind::TextField, NativeHandle(10))
            .unwrap();
        let log: Log = Rc::default();
        let tab = KeyChord::new(KeyCode::TAB, Modifiers::empty());
        let back_tab = KeyChord::new(KeyCode::TAB, Modifiers::SHIFT);
        listen(&mut f.ui, f.window, tab, &log);
        listen(&mut f.ui, field, back_tab, &log);

        assert!(f.ui.resolve_shortcut(Some(field), back_tab));
        assert_eq!(*log.borrow(), vec![(field, field)]);

        // Plain tab is not claimed by the field and reaches the window.
        log.borrow_mut().clear();
        assert!(f.ui.resolve_shortcut(Some(field), tab));
        assert_eq!(*log.borrow(), vec![(f.window, field)]);
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let mut f = Fixture::new();
        let log: Log = Rc::default();
        listen(
            &mut f.ui,
            f.panel,
            KeyChord::new(KeyCode::A, Modifiers::SHIFT),
            &log,
        );

        let superset = KeyChord::new(KeyCode::A, Modifiers::SHIFT | Modifiers::CONTROL);
        let bare = KeyChord::new(KeyCode::A, Modifiers::empty());
        assert!(!f.ui.resolve_shortcut(Some(f.button), superset));
        assert!(!f.ui.resolve_shortcut(Some(f.button), bare));
        assert!(log.borrow().is_empty());

        assert!(
            f.ui.resolve_shortcut(Some(f.button), KeyChord::new(KeyCode::A, Modifiers::SHIFT))
        );
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn no_focus_starts_at_the_application() {
        let mut f = Fixture::new();
        let log: Log = Rc::default();
        let quit = KeyChord::new(KeyCode::letter('Q').unwrap(), Modifiers::COMMAND);
        let root = f.ui.root();
        listen(&mut f.ui, root, quit, &log);
        listen(&mut f.ui, f.window, quit, &log);

        assert!(f.ui.resolve_shortcut(None, quit));
        assert_eq!(*log.borrow(), vec![(root, root)]);

        // A stale focus also falls back to the application.
        let button = f.button;
        f.ui.destroy_element(button);
        assert!(f.ui.resolve_shortcut(Some(button), quit));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn modifier_only_chord_never_resolves() {
        let mut f = Fixture::new();
        assert!(
            !f.ui
                .resolve_shortcut(Some(f.button), KeyChord { key: None, modifiers: Modifiers::SHIFT })
        );
    }

    #[test]
    fn focus_comes_from_the_platform() {
        let mut f = Fixture::new();
        assert_eq!(f.ui.focused_element(), None);
        f.platform.set_focus(Some(NativeHandle(4)));
        assert_eq!(f.ui.focused_element(), Some(f.button));
        // Foreign focus is no focus.
        f.platform.set_focus(Some(NativeHandle(404)));
        assert_eq!(f.ui.focused_element(), None);
    }
}
