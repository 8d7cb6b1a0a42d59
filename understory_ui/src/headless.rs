// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Platform`] without a window system.
//!
//! Rectangles and focus are whatever the host configured; hover tracking
//! registrations and destroyed handles are recorded so they can be inspected.
//! Clones share their state, so a host can keep one clone while the [`Ui`]
//! owns another.
//!
//! [`Ui`]: crate::Ui

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashMap;
use kurbo::Rect;
use understory_element::{ElementKind, NativeHandle, TrackingToken};

use crate::Platform;

#[derive(Debug, Default)]
struct State {
    rects: HashMap<NativeHandle, Rect>,
    focus: Option<NativeHandle>,
    armed: HashMap<u64, NativeHandle>,
    arm_calls: HashMap<NativeHandle, u32>,
    disarm_calls: u32,
    next_token: u64,
    destroyed: Vec<NativeHandle>,
}

/// Headless backend with shared, inspectable state.
#[derive(Clone, Debug, Default)]
pub struct HeadlessPlatform {
    state: Rc<RefCell<State>>,
}

impl HeadlessPlatform {
    /// Create a backend with no rectangles, no focus and nothing armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute rectangle reported for `handle`.
    ///
    /// Unknown handles report [`Rect::ZERO`].
    pub fn set_rect(&self, handle: NativeHandle, rect: Rect) {
        self.state.borrow_mut().rects.insert(handle, rect);
    }

    /// Set the handle reported as focused.
    pub fn set_focus(&self, handle: Option<NativeHandle>) {
        self.state.borrow_mut().focus = handle;
    }

    /// Whether a tracking registration is armed for `handle`.
    pub fn is_armed(&self, handle: NativeHandle) -> bool {
        self.state.borrow().armed.values().any(|&h| h == handle)
    }

    /// Number of armed tracking registrations.
    pub fn armed_count(&self) -> usize {
        self.state.borrow().armed.len()
    }

    /// How often tracking was armed for `handle`.
    pub fn arm_calls(&self, handle: NativeHandle) -> u32 {
        self.state
            .borrow()
            .arm_calls
            .get(&handle)
            .copied()
            .unwrap_or(0)
    }

    /// How often tracking was disarmed, over all handles.
    pub fn disarm_calls(&self) -> u32 {
        self.state.borrow().disarm_calls
    }

    /// Destroyed handles, in destruction order.
    pub fn destroyed(&self) -> Vec<NativeHandle> {
        self.state.borrow().destroyed.clone()
    }
}

impl Platform for HeadlessPlatform {
    fn native_rect(&self, handle: NativeHandle, _kind: ElementKind) -> Rect {
        self.state
            .borrow()
            .rects
            .get(&handle)
            .copied()
            .unwrap_or(Rect::ZERO)
    }

    fn arm_hover_tracking(&mut self, handle: NativeHandle) -> TrackingToken {
        let mut state = self.state.borrow_mut();
        state.next_token += 1;
        let raw = state.next_token;
        state.armed.insert(raw, handle);
        *state.arm_calls.entry(handle).or_default() += 1;
        TrackingToken::new(raw)
    }

    fn disarm_hover_tracking(&mut self, token: TrackingToken) {
        let mut state = self.state.borrow_mut();
        state.disarm_calls += 1;
        if state.armed.remove(&token.raw()).is_none() {
            log::warn!("disarming unknown tracking token {token:?}");
        }
    }

    fn focused_handle(&self) -> Option<NativeHandle> {
        self.state.borrow().focus
    }

    fn destroy_native_handle(&mut self, handle: NativeHandle) {
        let mut state = self.state.borrow_mut();
        state.rects.remove(&handle);
        if state.focus == Some(handle) {
            state.focus = None;
        }
        state.destroyed.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a = HeadlessPlatform::new();
        let mut b = a.clone();
        let token = b.arm_hover_tracking(NativeHandle(5));
        assert!(a.is_armed(NativeHandle(5)));
        assert_eq!(a.arm_calls(NativeHandle(5)), 1);

        b.disarm_hover_tracking(token);
        assert_eq!(a.armed_count(), 0);
        assert_eq!(a.disarm_calls(), 1);
    }

    #[test]
    fn destroyed_handles_lose_rect_and_focus() {
        let mut p = HeadlessPlatform::new();
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        p.set_rect(NativeHandle(9), rect);
        p.set_focus(Some(NativeHandle(9)));
        assert_eq!(p.native_rect(NativeHandle(9), ElementKind::Label), rect);

        p.destroy_native_handle(NativeHandle(9));
        assert_eq!(p.native_rect(NativeHandle(9), ElementKind::Label), Rect::ZERO);
        assert_eq!(p.focused_handle(), None);
        assert_eq!(p.destroyed(), alloc::vec![NativeHandle(9)]);
    }
}
