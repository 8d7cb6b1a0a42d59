// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard chords and pointer status.

use kurbo::{Point, Vec2};

/// Layout-independent key identifier.
///
/// Backends translate their native virtual key codes into these values. The
/// associated constants cover the keys the core and common shortcuts care
/// about; any other key can be expressed with [`KeyCode::new`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// Letter `A`; `B` through `Z` follow consecutively.
    pub const A: Self = Self(0x01);
    /// Letter `C`.
    pub const C: Self = Self(0x03);
    /// Letter `V`.
    pub const V: Self = Self(0x16);
    /// Letter `X`.
    pub const X: Self = Self(0x18);
    /// Letter `Z`.
    pub const Z: Self = Self(0x1A);
    /// Return / Enter.
    pub const RETURN: Self = Self(0x35);
    /// Tab.
    pub const TAB: Self = Self(0x36);
    /// Space bar.
    pub const SPACE: Self = Self(0x37);
    /// Backspace.
    pub const DELETE: Self = Self(0x38);
    /// Escape.
    pub const ESCAPE: Self = Self(0x39);
    /// Left arrow.
    pub const LEFT: Self = Self(0x44);
    /// Down arrow.
    pub const DOWN: Self = Self(0x45);
    /// Up arrow.
    pub const UP: Self = Self(0x46);
    /// Right arrow.
    pub const RIGHT: Self = Self(0x47);

    /// Wrap a raw key value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Key code for an ASCII letter, case-insensitive.
    pub const fn letter(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ASCII letters fit in a byte."
            )]
            let offset = c as u8 - b'A';
            Some(Self(Self::A.0 + offset as u16))
        } else {
            None
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held down as part of a chord.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT   = 0b0000_0001;
        /// Either control key.
        const CONTROL = 0b0000_0010;
        /// Either option / alt key.
        const OPTION  = 0b0000_0100;
        /// Either command / meta / windows key.
        const COMMAND = 0b0000_1000;
    }
}

/// A key together with the modifiers held while it was pressed.
///
/// Equality is exact: `(A, SHIFT)` differs from both `(A, SHIFT | CONTROL)`
/// and `(A, empty)`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyChord {
    /// The non-modifier key, if one is down.
    pub key: Option<KeyCode>,
    /// The modifier keys.
    pub modifiers: Modifiers,
}

impl KeyChord {
    /// A chord of `key` with `modifiers`.
    pub const fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key: Some(key),
            modifiers,
        }
    }

    /// Whether this chord names a key (and could therefore match a shortcut).
    pub const fn has_key(&self) -> bool {
        self.key.is_some()
    }
}

bitflags::bitflags! {
    /// Pointer buttons currently held down.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// Left / primary button.
        const PRIMARY   = 0b0000_0001;
        /// Right / secondary button.
        const SECONDARY = 0b0000_0010;
        /// Middle / wheel button.
        const AUXILIARY = 0b0000_0100;
    }
}

/// Last known pointer state.
///
/// Positions are in the absolute, bottom-left-origin frame shared by all
/// elements.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerStatus {
    /// Current position.
    pub position: Point,
    /// Position before the last move.
    pub previous: Point,
    /// Buttons currently held down.
    pub buttons: PointerButtons,
}

impl PointerStatus {
    /// Record a move to `position`, keeping the old position as `previous`.
    pub fn move_to(&mut self, position: Point) {
        self.previous = self.position;
        self.position = position;
    }

    /// Movement between the previous and the current position.
    pub fn delta(&self) -> Vec2 {
        self.position - self.previous
    }

    /// Record a button press.
    pub fn press(&mut self, button: PointerButtons) {
        self.buttons |= button;
    }

    /// Record a button release.
    pub fn release(&mut self, button: PointerButtons) {
        self.buttons.remove(button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_equality_is_exact() {
        let shift_a = KeyChord::new(KeyCode::A, Modifiers::SHIFT);
        assert_eq!(shift_a, KeyChord::new(KeyCode::A, Modifiers::SHIFT));
        assert_ne!(
            shift_a,
            KeyChord::new(KeyCode::A, Modifiers::SHIFT | Modifiers::CONTROL)
        );
        assert_ne!(shift_a, KeyChord::new(KeyCode::A, Modifiers::empty()));
        assert_ne!(shift_a, KeyChord::new(KeyCode::C, Modifiers::SHIFT));
    }

    #[test]
    fn letters() {
        assert_eq!(KeyCode::letter('a'), Some(KeyCode::A));
        assert_eq!(KeyCode::letter('Z'), Some(KeyCode::Z));
        assert_eq!(KeyCode::letter('v'), Some(KeyCode::V));
        assert_eq!(KeyCode::letter('1'), None);
    }

    #[test]
    fn pointer_delta_and_buttons() {
        let mut p = PointerStatus::default();
        p.move_to(Point::new(10.0, 20.0));
        p.move_to(Point::new(15.0, 18.0));
        assert_eq!(p.previous, Point::new(10.0, 20.0));
        assert_eq!(p.delta(), Vec2::new(5.0, -2.0));

        p.press(PointerButtons::PRIMARY);
        p.press(PointerButtons::SECONDARY);
        p.release(PointerButtons::PRIMARY);
        assert_eq!(p.buttons, PointerButtons::SECONDARY);
    }
}
