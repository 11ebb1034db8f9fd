//! Typed input events delivered to the application
//!
//! Mouse coordinates are window-relative with the origin at the bottom-left:
//! the bottom pixel row is `y = 1` and the top row is `y = height`. This
//! offset-by-one convention is kept for compatibility with existing games.

use super::{Key, Modifiers, MouseButton};
use std::fmt;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// No event
    None,
    /// Modifier keys changed
    ModifiersChanged,
    /// Key pressed
    KeyDown,
    /// Key released
    KeyUp,
    /// Character typed
    Char,
    /// Mouse moved
    MouseMove,
    /// Mouse button pressed
    MouseDown,
    /// Mouse button released
    MouseUp,
    /// Wheel or trackpad scroll
    MouseScroll,
    /// Application lost focus
    AppDeactivate,
    /// Application gained focus
    AppActivate,
}

/// Input event
///
/// Every variant carries the modifier state that was latched when the event
/// was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Modifier state changed
    ModifiersChanged {
        /// New modifier state
        modifiers: Modifiers,
        /// State before the change
        previous: Modifiers,
    },
    /// Key pressed (or repeated)
    KeyDown {
        /// Modifier state
        modifiers: Modifiers,
        /// Key code
        key: Key,
        /// Hardware scancode
        scancode: u32,
        /// True for auto-repeat
        is_repeat: bool,
    },
    /// Key released
    KeyUp {
        /// Modifier state
        modifiers: Modifiers,
        /// Key code
        key: Key,
        /// Hardware scancode
        scancode: u32,
    },
    /// Character typed
    Char {
        /// Modifier state
        modifiers: Modifiers,
        /// The Unicode character
        character: char,
    },
    /// Mouse moved
    MouseMove {
        /// Modifier state
        modifiers: Modifiers,
        /// X from the left edge
        x: i32,
        /// Y from the bottom edge, bottom row is 1
        y: i32,
        /// Horizontal movement in pixels
        delta_x: f32,
        /// Vertical movement in pixels, positive downwards
        delta_y: f32,
    },
    /// Mouse button pressed
    MouseDown {
        /// Modifier state
        modifiers: Modifiers,
        /// X from the left edge
        x: i32,
        /// Y from the bottom edge, bottom row is 1
        y: i32,
        /// Which button
        button: MouseButton,
        /// 1 for a single click, 2 for a double click, ...
        click_count: u32,
    },
    /// Mouse button released
    MouseUp {
        /// Modifier state
        modifiers: Modifiers,
        /// X from the left edge
        x: i32,
        /// Y from the bottom edge, bottom row is 1
        y: i32,
        /// Which button
        button: MouseButton,
        /// Click count of the press this release ends
        click_count: u32,
    },
    /// Wheel or trackpad scroll
    MouseScroll {
        /// Modifier state
        modifiers: Modifiers,
        /// Horizontal amount
        scroll_x: f32,
        /// Vertical amount
        scroll_y: f32,
        /// Cursor X from the left edge
        cursor_x: i32,
        /// Cursor Y from the bottom edge, bottom row is 1
        cursor_y: i32,
    },
    /// Application lost focus
    AppDeactivate {
        /// Modifier state before focus was lost
        modifiers: Modifiers,
    },
    /// Application gained focus
    AppActivate {
        /// Modifier state
        modifiers: Modifiers,
    },
}

impl Event {
    /// The type tag of this event
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::ModifiersChanged { .. } => EventType::ModifiersChanged,
            Self::KeyDown { .. } => EventType::KeyDown,
            Self::KeyUp { .. } => EventType::KeyUp,
            Self::Char { .. } => EventType::Char,
            Self::MouseMove { .. } => EventType::MouseMove,
            Self::MouseDown { .. } => EventType::MouseDown,
            Self::MouseUp { .. } => EventType::MouseUp,
            Self::MouseScroll { .. } => EventType::MouseScroll,
            Self::AppDeactivate { .. } => EventType::AppDeactivate,
            Self::AppActivate { .. } => EventType::AppActivate,
        }
    }

    /// The modifier state carried by every event
    pub const fn modifiers(&self) -> Modifiers {
        match self {
            Self::ModifiersChanged { modifiers, .. }
            | Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::Char { modifiers, .. }
            | Self::MouseMove { modifiers, .. }
            | Self::MouseDown { modifiers, .. }
            | Self::MouseUp { modifiers, .. }
            | Self::MouseScroll { modifiers, .. }
            | Self::AppDeactivate { modifiers }
            | Self::AppActivate { modifiers } => *modifiers,
        }
    }

    /// Window position for mouse events
    pub const fn position(&self) -> Option<(i32, i32)> {
        match self {
            Self::MouseMove { x, y, .. }
            | Self::MouseDown { x, y, .. }
            | Self::MouseUp { x, y, .. } => Some((*x, *y)),
            Self::MouseScroll {
                cursor_x, cursor_y, ..
            } => Some((*cursor_x, *cursor_y)),
            _ => None,
        }
    }

    /// Reason this event could not have come from a real device, if any
    pub(crate) fn malformation(&self) -> Option<&'static str> {
        match self {
            Self::MouseDown { click_count: 0, .. } | Self::MouseUp { click_count: 0, .. } => {
                Some("mouse button event with a zero click count")
            }
            Self::MouseMove {
                delta_x, delta_y, ..
            } if !delta_x.is_finite() || !delta_y.is_finite() => {
                Some("mouse move with a non-finite delta")
            }
            Self::MouseScroll {
                scroll_x, scroll_y, ..
            } if !scroll_x.is_finite() || !scroll_y.is_finite() => {
                Some("scroll with a non-finite amount")
            }
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModifiersChanged {
                modifiers,
                previous,
            } => write!(f, "ModifiersChanged {previous:?} -> {modifiers:?}"),
            Self::KeyDown {
                modifiers,
                key,
                scancode,
                is_repeat,
            } => write!(
                f,
                "KeyDown key={key} scancode={scancode} repeat={is_repeat} modifiers={modifiers:?}"
            ),
            Self::KeyUp {
                modifiers,
                key,
                scancode,
            } => write!(f, "KeyUp key={key} scancode={scancode} modifiers={modifiers:?}"),
            Self::Char {
                modifiers,
                character,
            } => write!(
                f,
                "Char {character:?} (U+{:04X}) modifiers={modifiers:?}",
                u32::from(*character)
            ),
            Self::MouseMove {
                modifiers,
                x,
                y,
                delta_x,
                delta_y,
            } => write!(
                f,
                "MouseMove ({x}, {y}) delta=({delta_x}, {delta_y}) modifiers={modifiers:?}"
            ),
            Self::MouseDown {
                modifiers,
                x,
                y,
                button,
                click_count,
            } => write!(
                f,
                "MouseDown {button:?} x{click_count} at ({x}, {y}) modifiers={modifiers:?}"
            ),
            Self::MouseUp {
                modifiers,
                x,
                y,
                button,
                click_count,
            } => write!(
                f,
                "MouseUp {button:?} x{click_count} at ({x}, {y}) modifiers={modifiers:?}"
            ),
            Self::MouseScroll {
                modifiers,
                scroll_x,
                scroll_y,
                cursor_x,
                cursor_y,
            } => write!(
                f,
                "MouseScroll ({scroll_x}, {scroll_y}) at ({cursor_x}, {cursor_y}) modifiers={modifiers:?}"
            ),
            Self::AppDeactivate { modifiers } => write!(f, "AppDeactivate modifiers={modifiers:?}"),
            Self::AppActivate { modifiers } => write!(f, "AppActivate modifiers={modifiers:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_and_modifiers() {
        let event = Event::KeyDown {
            modifiers: Modifiers::LEFT_SHIFT,
            key: Key::from_char('q'),
            scancode: 12,
            is_repeat: false,
        };
        assert_eq!(event.event_type(), EventType::KeyDown);
        assert_eq!(event.modifiers(), Modifiers::LEFT_SHIFT);
        assert_eq!(event.position(), None);
    }

    #[test]
    fn test_malformed_events_are_detected() {
        let click = Event::MouseDown {
            modifiers: Modifiers::empty(),
            x: 3,
            y: 4,
            button: MouseButton::Left,
            click_count: 0,
        };
        assert!(click.malformation().is_some());

        let scroll = Event::MouseScroll {
            modifiers: Modifiers::empty(),
            scroll_x: f32::NAN,
            scroll_y: 0.0,
            cursor_x: 0,
            cursor_y: 1,
        };
        assert!(scroll.malformation().is_some());

        let fine = Event::AppActivate {
            modifiers: Modifiers::CAPS_LOCK,
        };
        assert!(fine.malformation().is_none());
    }

    #[test]
    fn test_display_names_the_variant() {
        let event = Event::MouseMove {
            modifiers: Modifiers::empty(),
            x: 10,
            y: 20,
            delta_x: 1.0,
            delta_y: -2.0,
        };
        assert!(event.to_string().starts_with("MouseMove (10, 20)"));
    }
}
