// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers shared by the tree, the registry, and platform backends.

/// Identifier for an element in the tree (generational).
///
/// An `ElementId` stays valid until its element is removed. After that it is
/// *stale*: every query taking it returns `None`/`false` instead of touching
/// whatever element later reuses the slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Opaque value identifying a native object (window handle, view pointer, …).
///
/// The native object itself belongs to the platform backend; the core only
/// uses the value as a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NativeHandle(pub u64);

/// Token for an armed native hover-tracking registration.
///
/// Created by a platform backend when tracking is armed and handed back to it
/// when tracking is disarmed. Deliberately neither `Copy` nor `Clone`: an
/// element owns at most one token and gives it up exactly once.
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct TrackingToken(u64);

impl TrackingToken {
    /// Wrap a backend-specific tracking registration value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The backend-specific value this token wraps.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}
