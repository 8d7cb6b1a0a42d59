// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer crossing: turn "the pointer is now over X" into enter/exit commands.
//!
//! The context remembers a single hovered element. When the backend reports a
//! new one, the tracker finds the deepest common ancestor of the old and new
//! element and then:
//!
//! 1. walks from the old element up to (excluding) the common ancestor,
//!    clearing pointer-inside and dispatching [`Command::PointerExited`];
//! 2. makes the new element the hovered one and keeps native hover tracking
//!    armed for it;
//! 3. walks from the new element up to the first element the pointer is
//!    already inside, setting pointer-inside and dispatching
//!    [`Command::PointerEntered`].
//!
//! Repeating the same target is a no-op, so moving around inside an element
//! produces no crossings for it or its ancestors. Afterwards the elements with
//! pointer-inside set are exactly the hovered element and its ancestors.
//!
//! Reactions run in the middle of a transition. If one of them moves the
//! target again, that move is queued and runs once the current transition is
//! complete; the last queued target wins. If an exit reaction destroys the new
//! target, its nearest live ancestor becomes the hovered element instead.
//!
//! ## Hover interest
//!
//! Native hover tracking is a per-handle registration the backend has to arm
//! and disarm. Each element counts the reasons it needs one: every crossing
//! reaction registered on it, plus one while it is the hovered element. The
//! backend is asked to arm when the count leaves zero and to disarm when it
//! returns to zero, never otherwise.

use smallvec::SmallVec;
use understory_element::{Command, ElementId, report_violation};

use crate::Platform;
use crate::context::Ui;

type Chain = SmallVec<[ElementId; 16]>;

impl<P: Platform> Ui<P> {
    /// Tell the tracker which element is under the pointer now.
    ///
    /// `None` means the pointer left every element of the application. Stale
    /// ids are treated like `None`.
    ///
    /// Called from a reaction during a transition, the move is deferred until
    /// that transition has finished.
    pub fn update_hover_target(&mut self, target: Option<ElementId>) {
        if self.crossing_active {
            log::trace!("deferring hover target {target:?}");
            self.pending_hover = Some(target);
            return;
        }
        self.crossing_active = true;
        let mut next = Some(target);
        while let Some(target) = next {
            self.cross_to(target);
            next = self.pending_hover.take();
        }
        self.crossing_active = false;
    }

    fn cross_to(&mut self, target: Option<ElementId>) {
        let target = target.filter(|&id| {
            let alive = self.tree.is_alive(id);
            if !alive {
                log::warn!("hover target {id:?} is stale");
            }
            alive
        });
        if target == self.hovered {
            return;
        }
        let old = self.hovered;
        let common = self.tree.common_ancestor(old, target);
        let fallback = self.chain_below(target, None);

        for id in self.chain_below(old, common) {
            if !self.set_pointer_inside(id, false) {
                continue;
            }
            log::trace!("pointer exited {id:?}");
            self.dispatch(id, Command::PointerExited);
        }

        // Exit reactions may have destroyed the target or moved `hovered`
        // through teardown; whatever the tracker holds now is released.
        let target = fallback.into_iter().find(|&id| self.tree.is_alive(id));
        let previous = core::mem::replace(&mut self.hovered, target);
        if let Some(id) = target {
            self.retain_tracking(id);
        }
        if let Some(id) = previous {
            self.release_tracking(id);
        }

        let enters: Chain = self
            .chain_below(target, None)
            .into_iter()
            .take_while(|&id| !self.is_pointer_inside(id))
            .collect();
        for id in enters {
            if !self.set_pointer_inside(id, true) {
                continue;
            }
            log::trace!("pointer entered {id:?}");
            self.dispatch(id, Command::PointerEntered);
        }
    }

    /// Set the pointer-inside flag of a live element.
    ///
    /// Returns `false` when the element is stale or the flag already had that
    /// value.
    fn set_pointer_inside(&mut self, element: ElementId, inside: bool) -> bool {
        let Some(e) = self.tree.get_mut(element) else {
            return false;
        };
        let handlers = e.data_mut();
        if handlers.pointer_inside == inside {
            return false;
        }
        handlers.pointer_inside = inside;
        true
    }

    /// Add one unit of hover interest to `element`, arming native tracking
    /// when it is the first.
    pub fn retain_tracking(&mut self, element: ElementId) {
        let Some(e) = self.tree.get_mut(element) else {
            log::warn!("retain_tracking: {element:?} is stale");
            return;
        };
        let platform = &mut self.platform;
        if e.retain_hover_interest(|handle| platform.arm_hover_tracking(handle)) {
            log::debug!("armed hover tracking for {element:?}");
        }
    }

    /// Drop one unit of hover interest from `element`, disarming native
    /// tracking when none is left.
    pub fn release_tracking(&mut self, element: ElementId) {
        let Some(e) = self.tree.get_mut(element) else {
            return;
        };
        match e.release_hover_interest() {
            Ok(Some(token)) => {
                log::debug!("disarmed hover tracking for {element:?} ({token:?})");
                self.platform.disarm_hover_tracking(token);
            }
            Ok(None) => {}
            Err(violation) => report_violation(violation),
        }
    }

    /// `from` and its ancestors, stopping before `stop`.
    fn chain_below(&self, from: Option<ElementId>, stop: Option<ElementId>) -> Chain {
        let Some(from) = from else {
            return Chain::new();
        };
        self.tree
            .ancestors(from)
            .take_while(|&id| Some(id) != stop)
            .collect()
    }
}
