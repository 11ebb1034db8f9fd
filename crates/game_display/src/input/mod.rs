//! Input types and the event pipeline

pub mod event;
pub mod pipeline;

pub use event::{Event, EventType};
pub use pipeline::{EventPipeline, PipelineAction, ProcessOutcome, SurfaceMetrics};

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Modifier key state
    ///
    /// Left and right keys are tracked separately; use the `BOTH_*` masks to
    /// test for either side.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// Left shift
        const LEFT_SHIFT = 1 << 0;
        /// Right shift
        const RIGHT_SHIFT = 1 << 1;
        /// Left control
        const LEFT_CTRL = 1 << 2;
        /// Right control
        const RIGHT_CTRL = 1 << 3;
        /// Left alt / option
        const LEFT_ALT = 1 << 4;
        /// Right alt / option
        const RIGHT_ALT = 1 << 5;
        /// Left command / super
        const LEFT_COMMAND = 1 << 6;
        /// Right command / super
        const RIGHT_COMMAND = 1 << 7;
        /// Caps lock is engaged
        const CAPS_LOCK = 1 << 8;

        /// Either shift
        const BOTH_SHIFTS = Self::LEFT_SHIFT.bits() | Self::RIGHT_SHIFT.bits();
        /// Either control
        const BOTH_CTRLS = Self::LEFT_CTRL.bits() | Self::RIGHT_CTRL.bits();
        /// Either alt
        const BOTH_ALTS = Self::LEFT_ALT.bits() | Self::RIGHT_ALT.bits();
        /// Either command
        const BOTH_COMMANDS = Self::LEFT_COMMAND.bits() | Self::RIGHT_COMMAND.bits();
    }
}

/// Key code carried by key events
///
/// Printable keys use the character they produce without modifiers (letters
/// are lower case). Keys without a character use the function-key block
/// starting at `0xF700`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u32);

impl Key {
    /// Backspace (delete backwards)
    pub const BACKSPACE: Self = Self(0x7F);
    /// Tab
    pub const TAB: Self = Self(0x09);
    /// Return / enter
    pub const ENTER: Self = Self(0x0D);
    /// Escape
    pub const ESCAPE: Self = Self(0x1B);
    /// Space bar
    pub const SPACE: Self = Self(0x20);
    /// Up arrow
    pub const UP: Self = Self(0xF700);
    /// Down arrow
    pub const DOWN: Self = Self(0xF701);
    /// Left arrow
    pub const LEFT: Self = Self(0xF702);
    /// Right arrow
    pub const RIGHT: Self = Self(0xF703);
    /// F1; F2 to F35 follow consecutively, see [`Key::function`]
    pub const F1: Self = Self(0xF704);
    /// Insert
    pub const INSERT: Self = Self(0xF727);
    /// Forward delete
    pub const DELETE: Self = Self(0xF728);
    /// Home
    pub const HOME: Self = Self(0xF729);
    /// Begin
    pub const BEGIN: Self = Self(0xF72A);
    /// End
    pub const END: Self = Self(0xF72B);
    /// Page up
    pub const PAGE_UP: Self = Self(0xF72C);
    /// Page down
    pub const PAGE_DOWN: Self = Self(0xF72D);
    /// Print screen
    pub const PRINT_SCREEN: Self = Self(0xF72E);
    /// Scroll lock
    pub const SCROLL_LOCK: Self = Self(0xF72F);
    /// Pause
    pub const PAUSE: Self = Self(0xF730);
    /// Sys req
    pub const SYS_REQ: Self = Self(0xF731);
    /// Break
    pub const BREAK: Self = Self(0xF732);
    /// Menu
    pub const MENU: Self = Self(0xF735);
    /// Help
    pub const HELP: Self = Self(0xF746);
    /// Mode switch
    pub const MODE_SWITCH: Self = Self(0xF747);

    /// Function key `F<n>` for `n` in 1..=35
    pub fn function(n: u32) -> Option<Self> {
        (1..=35).contains(&n).then(|| Self(Self::F1.0 + n - 1))
    }

    /// Key for a printable character
    pub fn from_char(c: char) -> Self {
        Self(u32::from(c.to_ascii_lowercase()))
    }

    /// The character this key produces, if it is printable
    pub fn as_char(self) -> Option<char> {
        if self.0 >= 0xF700 {
            return None;
        }
        char::from_u32(self.0).filter(|c| !c.is_control())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "'{c}'"),
            None => write!(f, "0x{:04X}", self.0),
        }
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Any further button, numbered from 3
    Other(u8),
}

impl MouseButton {
    /// Zero-based button number (left 0, right 1, middle 2)
    pub const fn number(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Other(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys_are_consecutive() {
        assert_eq!(Key::function(1), Some(Key::F1));
        assert_eq!(Key::function(12), Some(Key(0xF70F)));
        assert_eq!(Key::function(35), Some(Key(0xF726)));
        assert_eq!(Key::function(0), None);
        assert_eq!(Key::function(36), None);
    }

    #[test]
    fn test_printable_keys() {
        assert_eq!(Key::from_char('A'), Key(u32::from('a')));
        assert_eq!(Key::from_char('a').as_char(), Some('a'));
        assert_eq!(Key::ESCAPE.as_char(), None);
        assert_eq!(Key::UP.as_char(), None);
        assert_eq!(Key::UP.to_string(), "0xF700");
    }

    #[test]
    fn test_both_masks() {
        assert!(Modifiers::RIGHT_ALT.intersects(Modifiers::BOTH_ALTS));
        assert!(!Modifiers::LEFT_CTRL.intersects(Modifiers::BOTH_SHIFTS));
    }
}
