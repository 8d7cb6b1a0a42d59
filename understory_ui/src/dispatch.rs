// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command dispatch: bubble a command up the logical tree until one reaction handles it.
//!
//! ## Semantics
//!
//! - The walk starts at the target element and follows parent links to the
//!   application.
//! - At each element the first reaction registered for the command is invoked
//!   and the walk ends. At most one callback runs per call.
//! - A handler that wants ancestors to see the command as well calls
//!   [`Ui::dispatch_to_parent`] itself.
//! - Crossing commands are not bubbled (see [`Command::bubbles`]).
//! - The parent is read before the callback runs, so a callback that destroys
//!   the element it was invoked on cannot derail the walk: stale ids simply
//!   end it.
//!
//! `false` means "nobody handled it" and is an expected answer; native event
//! boundaries run the platform default in that case.

use understory_element::{Command, ElementId};

use crate::Platform;
use crate::context::Ui;
use crate::reaction::ReactionEvent;

impl<P: Platform> Ui<P> {
    /// Deliver `command` to `element` or the nearest ancestor that reacts to it.
    ///
    /// Returns `true` if a reaction was invoked.
    pub fn dispatch(&mut self, element: ElementId, command: Command) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            let Some(e) = self.tree.get(id) else {
                log::trace!("dispatch {command:?}: {id:?} is gone, stopping");
                return false;
            };
            // Captured before invoking anything.
            let parent = e.parent();
            if let Some((callback, controller)) = e.data().reaction_for(command) {
                log::trace!("dispatch {command:?} from {element:?}: handled by {id:?}");
                let event = ReactionEvent {
                    element: id,
                    origin: element,
                    command,
                    controller,
                };
                callback(self, &event);
                return true;
            }
            if !command.bubbles() {
                break;
            }
            current = parent;
        }
        log::trace!("dispatch {command:?} from {element:?}: unhandled");
        false
    }

    /// Continue bubbling `event` above the element that is handling it.
    ///
    /// Meant for reaction callbacks that handled a command but still want
    /// ancestors to see it. Returns `false` at the application or when the
    /// element no longer exists.
    pub fn dispatch_to_parent(&mut self, event: &ReactionEvent) -> bool {
        match self.tree.parent_of(event.element) {
            Some(parent) => self.dispatch(parent, event.command),
            None => false,
        }
    }
}
