// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registered reactions and keyboard shortcuts.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use understory_element::{Command, ElementId, KeyChord};

use crate::Platform;
use crate::context::Ui;

/// Caller-chosen key identifying the controller that registered a reaction.
///
/// The core never dereferences it; it is handed back to callbacks and used by
/// [`Ui::remove_reactions`] to unregister everything a controller added.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ControllerKey(pub u64);

/// What a reaction callback is told about the invocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ReactionEvent {
    /// Element the reaction is registered on.
    pub element: ElementId,
    /// Element the dispatch or resolution started at.
    pub origin: ElementId,
    /// The command being delivered ([`Command::KeyboardShortcut`] for shortcuts).
    pub command: Command,
    /// Controller the reaction was registered with.
    pub controller: Option<ControllerKey>,
}

/// Callback type for reactions and shortcuts.
///
/// Callbacks get the whole context so they can continue bubbling with
/// [`Ui::dispatch_to_parent`], move focus, or destroy elements. They take `&`
/// access to their own captures; use `Cell`/`RefCell` for state.
pub type Callback<P> = Rc<dyn Fn(&mut Ui<P>, &ReactionEvent)>;

pub(crate) struct Reaction<P: Platform> {
    pub(crate) controller: Option<ControllerKey>,
    pub(crate) command: Command,
    pub(crate) callback: Callback<P>,
}

pub(crate) struct ShortcutReaction<P: Platform> {
    pub(crate) controller: Option<ControllerKey>,
    pub(crate) chord: KeyChord,
    pub(crate) callback: Callback<P>,
}

/// Per-element payload holding registered reactions, in registration order.
///
/// It also holds the element's pointer-inside flag, which only the crossing
/// tracker writes.
pub struct Handlers<P: Platform> {
    pub(crate) reactions: Vec<Reaction<P>>,
    pub(crate) shortcuts: Vec<ShortcutReaction<P>>,
    pub(crate) pointer_inside: bool,
}

impl<P: Platform> Default for Handlers<P> {
    fn default() -> Self {
        Self {
            reactions: Vec::new(),
            shortcuts: Vec::new(),
            pointer_inside: false,
        }
    }
}

impl<P: Platform> Handlers<P> {
    /// Number of registered reactions.
    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// Number of registered shortcuts.
    pub fn shortcut_count(&self) -> usize {
        self.shortcuts.len()
    }

    /// First reaction registered for `command`, as `(callback, controller)`.
    pub(crate) fn reaction_for(&self, command: Command) -> Option<(Callback<P>, Option<ControllerKey>)> {
        self.reactions
            .iter()
            .find(|r| r.command == command)
            .map(|r| (Rc::clone(&r.callback), r.controller))
    }

    /// First shortcut registered for exactly `chord`.
    pub(crate) fn shortcut_for(&self, chord: KeyChord) -> Option<(Callback<P>, Option<ControllerKey>)> {
        self.shortcuts
            .iter()
            .find(|s| s.chord == chord)
            .map(|s| (Rc::clone(&s.callback), s.controller))
    }

    /// Remove everything registered by `controller`.
    ///
    /// Returns the commands of the removed reactions and the number of removed
    /// shortcuts.
    pub(crate) fn remove_controller(&mut self, controller: ControllerKey) -> (Vec<Command>, usize) {
        let mut removed = Vec::new();
        self.reactions.retain(|r| {
            let keep = r.controller != Some(controller);
            if !keep {
                removed.push(r.command);
            }
            keep
        });
        let before = self.shortcuts.len();
        self.shortcuts.retain(|s| s.controller != Some(controller));
        (removed, before - self.shortcuts.len())
    }
}

impl<P: Platform> fmt::Debug for Handlers<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field(
                "reactions",
                &self.reactions.iter().map(|r| r.command).collect::<Vec<_>>(),
            )
            .field(
                "shortcuts",
                &self.shortcuts.iter().map(|s| s.chord).collect::<Vec<_>>(),
            )
            .field("pointer_inside", &self.pointer_inside)
            .finish()
    }
}
