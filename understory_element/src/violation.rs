// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Programmer-contract violations and the single channel that reports them.

use crate::kind::{Command, ElementKind};

/// A broken usage contract.
///
/// None of these are runtime failures an end user can cause; they indicate a
/// bug in the application or backend. They are never returned to callers:
/// [`report_violation`] logs them and fails a debug assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    /// The application rectangle was requested relative to another element.
    #[error("the application rect can only be queried in absolute coordinates")]
    InvalidRelativeElement,
    /// A reaction was registered for a command the element kind never emits.
    #[error("{kind} elements do not emit {command}")]
    UnsupportedCommand {
        /// Kind of the element the reaction was registered on.
        kind: ElementKind,
        /// The rejected command.
        command: Command,
    },
    /// Hover interest was released more often than it was retained.
    #[error("hover interest released without a matching retain")]
    HoverInterestUnderflow,
    /// Notifications were blocked twice without being allowed in between.
    #[error("notifications are already blocked for this element")]
    NotificationsAlreadyBlocked,
    /// Notifications were allowed without having been blocked.
    #[error("notifications are not blocked for this element")]
    NotificationsNotBlocked,
    /// The application root was asked to be removed while the context is alive.
    #[error("the application element is only removed at shutdown")]
    RootRemoval,
}

/// Report a contract violation.
///
/// Logs at error level, then fails a debug assertion. In release builds the
/// caller continues with its documented no-op fallback.
#[track_caller]
pub fn report_violation(violation: ContractViolation) {
    log::error!("contract violation: {violation}");
    debug_assert!(false, "contract violation: {violation}");
}
