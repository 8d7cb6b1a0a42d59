// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_element --heading-base-level=0

//! Understory Element: the logical element tree behind a native UI backend.
//!
//! Native toolkits disagree about how events reach widgets: some pump messages
//! through per-window procedures, others walk a responder chain of delegates.
//! This crate holds the backend-neutral model both are mapped onto.
//!
//! - [`ElementTree`]: a generational arena of [`Element`]s rooted in a single
//!   [`ElementKind::Application`] element. Parent links are plain ids, so a
//!   walk over a chain whose elements are removed mid-way sees stale ids and
//!   stops instead of touching freed memory.
//! - [`Registry`]: resolves the [`NativeHandle`] carried by a backend event to
//!   the [`ElementId`] it belongs to.
//! - [`ElementKind`] and [`Command`]: the closed sets of element kinds and
//!   abstract commands, and the fixed table of which kind emits which command.
//! - [`KeyChord`], [`Modifiers`], [`PointerStatus`]: the input state the
//!   dispatch layer reads.
//! - [`ContractViolation`] and [`report_violation`]: the debug-assert channel
//!   for API misuse.
//!
//! Each element also carries a hover-interest count and the [`TrackingToken`]
//! of an armed native hover registration. The token is created through
//! [`Element::retain_hover_interest`] and handed back when the count returns
//! to zero, so it exists exactly while the count is positive.
//!
//! Event dispatch itself lives in `understory_ui`, which stores its reactions
//! in the tree's per-element payload.
//!
//! ## Example
//!
//! ```rust
//! use understory_element::{ElementKind, ElementTree, NativeHandle, Registry};
//!
//! let mut tree = ElementTree::new(NativeHandle(0x10), ());
//! let mut registry = Registry::new();
//!
//! let app = tree.root();
//! let window = tree
//!     .insert(app, ElementKind::Window, NativeHandle(0x20), ())
//!     .unwrap();
//! assert!(registry.register(NativeHandle(0x20), window, &tree));
//!
//! assert_eq!(registry.lookup(NativeHandle(0x20)), Some(window));
//! // A handle nobody registered is not an error, just unknown.
//! assert_eq!(registry.lookup(NativeHandle(0x30)), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod input;
mod kind;
mod registry;
mod tree;
mod types;
mod violation;

pub use input::{KeyChord, KeyCode, Modifiers, PointerButtons, PointerStatus};
pub use kind::{Command, ElementKind};
pub use registry::Registry;
pub use tree::{Ancestors, Element, ElementTree};
pub use types::{ElementId, NativeHandle, TrackingToken};
pub use violation::{ContractViolation, report_violation};
