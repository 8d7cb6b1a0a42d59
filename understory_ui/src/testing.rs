// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared test fixture: application → window → panel → button.

use understory_element::{ElementId, ElementKind, NativeHandle};

use crate::context::Ui;
use crate::headless::HeadlessPlatform;

/// Handles are 1 (application), 2 (window), 3 (panel), 4 (button).
pub(crate) struct Fixture {
    pub(crate) ui: Ui<HeadlessPlatform>,
    pub(crate) platform: HeadlessPlatform,
    pub(crate) window: ElementId,
    pub(crate) panel: ElementId,
    pub(crate) button: ElementId,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with_platform(HeadlessPlatform::new())
    }

    pub(crate) fn with_platform(platform: HeadlessPlatform) -> Self {
        let mut ui = Ui::new(platform.clone(), NativeHandle(1));
        let window = ui
            .create_element(ui.root(), ElementKind::Window, NativeHandle(2))
            .unwrap();
        let panel = ui
            .create_element(window, ElementKind::Space, NativeHandle(3))
            .unwrap();
        let button = ui
            .create_element(panel, ElementKind::Button, NativeHandle(4))
            .unwrap();
        Self {
            ui,
            platform,
            window,
            panel,
            button,
        }
    }
}
