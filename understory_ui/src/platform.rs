// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow interface every native backend implements.

use kurbo::Rect;
use understory_element::{ElementKind, NativeHandle, TrackingToken};

/// A native backend.
///
/// Message-procedure and responder-chain toolkits both reduce to these few
/// queries; everything else about an event is decided by the core. Backends
/// are chosen at build time through the type parameter of [`crate::Ui`].
///
/// All methods are called on the event-loop thread and must not block.
pub trait Platform {
    /// Rectangle of a native object in the absolute, bottom-left-origin frame.
    ///
    /// For [`ElementKind::Screen`] this is the screen's frame. It is never
    /// called for the application, whose rectangle is the union of all screens.
    fn native_rect(&self, handle: NativeHandle, kind: ElementKind) -> Rect;

    /// Ask the backend to report pointer enter/leave for `handle`.
    fn arm_hover_tracking(&mut self, handle: NativeHandle) -> TrackingToken;

    /// Stop reporting pointer enter/leave for a registration made by
    /// [`Platform::arm_hover_tracking`].
    fn disarm_hover_tracking(&mut self, token: TrackingToken);

    /// The native object that currently has keyboard focus, if the backend knows one.
    fn focused_handle(&self) -> Option<NativeHandle>;

    /// Release a native object. Called after its element left the registry.
    fn destroy_native_handle(&mut self, handle: NativeHandle);
}
