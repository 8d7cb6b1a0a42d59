// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native event ingestion: the single entry point a backend's event callback uses.

use kurbo::Point;
use understory_element::{
    Command, ElementId, ElementKind, KeyChord, KeyCode, Modifiers, NativeHandle, PointerButtons,
};

use crate::Platform;
use crate::context::Ui;

/// A backend event, already stripped of its native encoding.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NativeEvent {
    /// The pointer moved over the object.
    PointerMoved {
        /// New pointer position in the absolute frame.
        position: Point,
    },
    /// Native hover tracking reports the pointer entered the object.
    HoverBegan,
    /// Native hover tracking reports the pointer left the object.
    HoverEnded,
    /// A pointer button went down.
    PointerDown {
        /// The button.
        button: PointerButtons,
        /// Pointer position in the absolute frame.
        position: Point,
    },
    /// A pointer button went up.
    PointerUp {
        /// The button.
        button: PointerButtons,
        /// Pointer position in the absolute frame.
        position: Point,
    },
    /// A key went down.
    KeyDown {
        /// The key.
        key: KeyCode,
        /// Modifiers held at the time.
        modifiers: Modifiers,
    },
    /// A key went up.
    KeyUp {
        /// The key.
        key: KeyCode,
        /// Modifiers still held.
        modifiers: Modifiers,
    },
    /// A button, menu item, or similar was activated.
    Pressed,
    /// The object wants to be redrawn.
    Redraw,
    /// The object changed size or position.
    Reshape,
    /// A window is about to close.
    Closes,
    /// The value of an editable object changed.
    Edited,
    /// Editing finished (focus left, return pressed, …).
    EditFinished,
    /// A transform (zoom, rotation, magnification) was applied.
    Transformed,
}

/// What the backend should do after [`Ui::notify_native_event`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// A reaction handled the event; skip the platform default.
    Handled,
    /// Nothing handled it; run the platform default.
    Default,
}

impl From<bool> for Disposition {
    fn from(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Default }
    }
}

impl<P: Platform> Ui<P> {
    /// Feed a backend event for `handle` into the core.
    ///
    /// Events for foreign handles are ignored. Pointer motion and hover
    /// signals drive the crossing tracker; key presses try shortcut resolution
    /// from the focused element before being dispatched to the element itself.
    pub fn notify_native_event(&mut self, handle: NativeHandle, event: NativeEvent) -> Disposition {
        let Some(id) = self.lookup(handle) else {
            log::warn!("ignoring {event:?} for foreign handle {handle:?}");
            return Disposition::Default;
        };
        let handled = match event {
            NativeEvent::PointerMoved { position } => {
                self.pointer.move_to(position);
                self.update_hover_target(Some(id));
                self.dispatch_notification(id, Command::PointerMoved)
            }
            NativeEvent::HoverBegan => {
                self.update_hover_target(Some(id));
                false
            }
            NativeEvent::HoverEnded => {
                self.hover_ended(id);
                false
            }
            NativeEvent::PointerDown { button, position } => {
                self.pointer.move_to(position);
                self.pointer.press(button);
                self.dispatch_notification(id, Command::PointerDown)
            }
            NativeEvent::PointerUp { button, position } => {
                self.pointer.move_to(position);
                self.pointer.release(button);
                self.dispatch_notification(id, Command::PointerUp)
            }
            NativeEvent::KeyDown { key, modifiers } => {
                self.chord = KeyChord::new(key, modifiers);
                self.resolve_current_shortcut() || self.dispatch_notification(id, Command::KeyDown)
            }
            NativeEvent::KeyUp { key: _, modifiers } => {
                self.chord = KeyChord {
                    key: None,
                    modifiers,
                };
                self.dispatch_notification(id, Command::KeyUp)
            }
            NativeEvent::Pressed => self.dispatch_notification(id, Command::Pressed),
            NativeEvent::Redraw => self.dispatch_notification(id, Command::Redraw),
            NativeEvent::Reshape => self.dispatch_notification(id, Command::Reshape),
            NativeEvent::Closes => self.dispatch_notification(id, Command::Closes),
            NativeEvent::Edited => self.dispatch_notification(id, Command::Edited),
            NativeEvent::EditFinished => self.dispatch_notification(id, Command::EditFinished),
            NativeEvent::Transformed => self.dispatch_notification(id, Command::Transformed),
        };
        if !handled {
            log::debug!("{event:?} on {id:?} falls through to the platform default");
        }
        handled.into()
    }

    fn dispatch_notification(&mut self, id: ElementId, command: Command) -> bool {
        if !self.notifications_allowed(id) {
            log::trace!("{command:?} on {id:?} suppressed while notifications are blocked");
            return false;
        }
        self.dispatch(id, command)
    }

    /// The pointer left `element`, so it is now over whatever contains it.
    ///
    /// Leaves reported for elements outside the hovered chain are late
    /// duplicates and are ignored.
    fn hover_ended(&mut self, element: ElementId) {
        let Some(hovered) = self.hovered else {
            return;
        };
        if !self.tree.is_ancestor_or_self(element, hovered) {
            log::trace!("late hover end for {element:?} ignored");
            return;
        }
        let target = match self.tree.kind(element) {
            Some(ElementKind::Window) => None,
            _ => self.tree.parent_of(element),
        };
        self.update_hover_target(target);
    }
}
