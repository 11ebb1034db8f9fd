//! Backend-neutral native notifications
//!
//! Backends translate whatever their windowing library reports into these
//! values. Positions are in surface pixels with the origin at the top-left,
//! which is what every supported windowing library uses; the event pipeline
//! converts them into the bottom-left space applications see.

use crate::input::{Key, Modifiers, MouseButton};

/// Press, release or auto-repeat of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key went down
    Press,
    /// Key came up
    Release,
    /// Key is held and the host generated a repeat
    Repeat,
}

/// A notification from the host, stamped with the host's clock in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    /// Host timestamp in seconds
    pub timestamp: f64,
    /// What happened
    pub kind: NativeEventKind,
}

impl NativeEvent {
    /// Create a native event
    pub const fn new(timestamp: f64, kind: NativeEventKind) -> Self {
        Self { timestamp, kind }
    }
}

/// Native notification payloads
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEventKind {
    /// Non-modifier key
    Key {
        /// Key code
        key: Key,
        /// Hardware scancode
        scancode: u32,
        /// Press, release or repeat
        action: KeyAction,
    },
    /// A single modifier key went down or up
    ModifierKey {
        /// The one flag the key controls
        modifier: Modifiers,
        /// True on press
        pressed: bool,
    },
    /// Complete modifier snapshot, for hosts that report one
    ModifierFlags(Modifiers),
    /// Text input
    Char(char),
    /// Cursor moved over the surface
    MouseMoved {
        /// X, surface pixels from the left
        x: f64,
        /// Y, surface pixels from the top
        y: f64,
    },
    /// Mouse button changed state
    MouseButton {
        /// Which button
        button: MouseButton,
        /// True on press
        pressed: bool,
        /// X, surface pixels from the left
        x: f64,
        /// Y, surface pixels from the top
        y: f64,
    },
    /// Wheel or trackpad scroll
    Scroll {
        /// Horizontal amount
        dx: f64,
        /// Vertical amount
        dy: f64,
        /// Cursor X, surface pixels from the left
        x: f64,
        /// Cursor Y, surface pixels from the top
        y: f64,
    },
    /// Application gained (true) or lost (false) focus
    Focus(bool),
    /// The user asked to close the surface
    CloseRequested,
    /// The surface client area changed size
    Resized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// Surface was minimised (true) or restored (false)
    Iconified(bool),
    /// Anything the pipeline has no translation for
    Other(String),
}
