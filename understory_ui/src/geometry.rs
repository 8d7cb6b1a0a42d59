// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry queries in the shared absolute frame.
//!
//! Every element's absolute rectangle comes from the backend
//! ([`Platform::native_rect`]) in one bottom-left-origin frame, so relative
//! rectangles are plain origin subtractions and compose exactly.

use kurbo::Rect;
use understory_element::{ContractViolation, ElementId, report_violation};

use crate::Platform;
use crate::context::Ui;

/// Coordinate frame for [`Ui::rect`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Frame {
    /// The shared absolute frame.
    Absolute,
    /// Relative to the element's logical parent (absolute for the application).
    #[default]
    Parent,
    /// Relative to another element.
    Relative(ElementId),
}

impl<P: Platform> Ui<P> {
    /// Rectangle of `element` in `frame`.
    ///
    /// Returns `None` when `element` or the reference element is stale.
    ///
    /// The application's rectangle is the union of all screens and only exists
    /// in absolute terms; asking for it relative to another element is a
    /// contract violation and yields the absolute rectangle.
    pub fn rect(&self, element: ElementId, frame: Frame) -> Option<Rect> {
        let absolute = self.absolute_rect(element)?;
        let reference = if element == self.root() {
            match frame {
                Frame::Absolute | Frame::Parent => None,
                Frame::Relative(other) if other == element => None,
                Frame::Relative(_) => {
                    report_violation(ContractViolation::InvalidRelativeElement);
                    None
                }
            }
        } else {
            match frame {
                Frame::Absolute => None,
                Frame::Parent => self.tree.parent_of(element),
                Frame::Relative(other) => Some(other),
            }
        };
        match reference {
            None => Some(absolute),
            Some(other) => {
                let base = self.absolute_rect(other)?;
                Some(absolute - base.origin().to_vec2())
            }
        }
    }

    /// Union of all screen rectangles (empty without screens).
    pub fn application_rect(&self) -> Rect {
        self.screens()
            .iter()
            .filter_map(|&screen| self.absolute_rect(screen))
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO)
    }

    fn absolute_rect(&self, element: ElementId) -> Option<Rect> {
        if element == self.root() {
            return Some(self.application_rect());
        }
        let e = self.tree.get(element)?;
        Some(self.platform.native_rect(e.native_handle(), e.kind()))
    }
}
