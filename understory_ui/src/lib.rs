// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ui --heading-base-level=0

//! Understory UI: one dispatch protocol over native toolkits with different event models.
//!
//! A backend implements the small [`Platform`] trait and forwards every native
//! event it receives to [`Ui::notify_native_event`]. The core then decides who
//! handles it by walking the logical element tree from
//! [`understory_element`]:
//!
//! - **Command dispatch** ([`Ui::dispatch`]): the first reaction for a command
//!   on the element or its nearest ancestor runs, and only that one.
//! - **Pointer crossing** ([`Ui::update_hover_target`]): moving the hovered
//!   element emits exits up to the common ancestor, then entries down from it,
//!   and keeps native hover tracking armed exactly where someone needs it.
//! - **Shortcuts** ([`Ui::resolve_shortcut`]): the chord is matched exactly,
//!   starting at the focused element; inner elements shadow outer ones.
//! - **Geometry** ([`Ui::rect`]): rectangles in the shared absolute frame, or
//!   relative to the parent or any other element.
//!
//! When nothing handles an event the answer is [`Disposition::Default`] and the
//! backend runs its native default behavior.
//!
//! Reactions receive `&mut Ui`, so they may continue bubbling, move focus, or
//! destroy elements, including the one being dispatched to. Element ids are
//! generational; walks over destroyed elements stop instead of misbehaving.
//!
//! ## Example
//!
//! ```rust
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_element::{Command, ElementKind, NativeHandle};
//! use understory_ui::{Ui, headless::HeadlessPlatform};
//!
//! let mut ui = Ui::new(HeadlessPlatform::new(), NativeHandle(1));
//! let window = ui.create_element(ui.root(), ElementKind::Window, NativeHandle(2)).unwrap();
//! let panel = ui.create_element(window, ElementKind::Space, NativeHandle(3)).unwrap();
//! let button = ui.create_element(panel, ElementKind::Button, NativeHandle(4)).unwrap();
//!
//! let inside = Rc::new(Cell::new(false));
//! for (command, value) in [(Command::PointerEntered, true), (Command::PointerExited, false)] {
//!     let inside = Rc::clone(&inside);
//!     ui.add_reaction(panel, command, None, move |_, _| inside.set(value));
//! }
//!
//! ui.update_hover_target(Some(button));
//! assert!(inside.get());
//! // Still within the panel: no crossing for it.
//! ui.update_hover_target(Some(panel));
//! assert!(inside.get());
//! ui.update_hover_target(Some(window));
//! assert!(!inside.get());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod context;
mod crossing;
mod dispatch;
mod event;
mod geometry;
pub mod headless;
mod platform;
mod reaction;
mod shortcut;

#[cfg(test)]
mod testing;

pub use context::Ui;
pub use event::{Disposition, NativeEvent};
pub use geometry::Frame;
pub use platform::Platform;
pub use reaction::{Callback, ControllerKey, Handlers, ReactionEvent};
