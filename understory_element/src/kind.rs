// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element kinds, commands, and the fixed table of which kind accepts which command.

use core::fmt;

/// Concrete kind of an element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementKind {
    /// The process-wide root.
    Application,
    /// A physical display.
    Screen,
    /// A top-level window.
    Window,
    /// A plain container.
    Space,
    /// A container that displays an image.
    ImageSpace,
    /// A container rendered with OpenGL.
    OpenGlSpace,
    /// A container rendered with Metal.
    MetalSpace,
    /// A push button.
    Button,
    /// A check box.
    CheckBox,
    /// A radio button.
    Radio,
    /// A static text label.
    Label,
    /// A single-line text input.
    TextField,
    /// A multi-line text input.
    TextBox,
    /// A pop-up selection.
    Select,
    /// A slider.
    Slider,
    /// A menu.
    Menu,
    /// An entry in a menu.
    MenuItem,
}

/// Abstract event an element can react to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Command {
    /// A button-like element was activated.
    Pressed,
    /// The element should redraw its contents.
    Redraw,
    /// The element's size or position changed.
    Reshape,
    /// A key went down while the element was targeted.
    KeyDown,
    /// A key went up while the element was targeted.
    KeyUp,
    /// A registered key chord matched. Only used as the tag for shortcut callbacks.
    KeyboardShortcut,
    /// The pointer moved over the element.
    PointerMoved,
    /// The pointer entered the element.
    PointerEntered,
    /// The pointer left the element.
    PointerExited,
    /// A pointer button went down.
    PointerDown,
    /// A pointer button went up.
    PointerUp,
    /// A window is about to close.
    Closes,
    /// The value of an editable element changed.
    Edited,
    /// Editing of an element finished (focus left, return pressed, …).
    EditFinished,
    /// The view transformation of a space changed (zoom, scroll, …).
    Transformed,
}

impl Command {
    /// Whether an unhandled command continues to the logical parent.
    ///
    /// Crossing commands are delivered to the crossed element only; the
    /// crossing walk already visits every ancestor that changes state.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::PointerEntered | Self::PointerExited)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl ElementKind {
    /// Whether reactions for `command` may be registered on this kind.
    pub const fn accepts(self, command: Command) -> bool {
        use Command::*;
        // Every kind that has an on-screen presence can report crossing and
        // pointer button/motion commands.
        let pointer = matches!(
            command,
            PointerMoved | PointerEntered | PointerExited | PointerDown | PointerUp
        );
        let keys = matches!(command, KeyDown | KeyUp);
        match self {
            Self::Application => keys || matches!(command, PointerMoved | PointerDown | PointerUp),
            Self::Screen => matches!(command, Reshape),
            Self::Window => pointer || keys || matches!(command, Closes | Reshape | Redraw),
            Self::Space | Self::ImageSpace => pointer || keys || matches!(command, Redraw),
            Self::OpenGlSpace | Self::MetalSpace => {
                pointer || keys || matches!(command, Redraw | Reshape | Transformed)
            }
            Self::Button | Self::CheckBox | Self::Radio | Self::Select => {
                pointer || matches!(command, Pressed)
            }
            Self::Label => pointer,
            Self::TextField | Self::TextBox => {
                pointer || keys || matches!(command, Edited | EditFinished)
            }
            Self::Slider => pointer || matches!(command, Edited | EditFinished),
            Self::Menu => false,
            Self::MenuItem => matches!(command, Pressed),
        }
    }

    /// Whether elements of this kind may contain logical children.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Application
                | Self::Window
                | Self::Space
                | Self::ImageSpace
                | Self::OpenGlSpace
                | Self::MetalSpace
                | Self::Menu
        )
    }
}
