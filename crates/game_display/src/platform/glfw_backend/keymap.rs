//! GLFW event translation

use crate::input::{Key, Modifiers, MouseButton};
use crate::platform::native::{KeyAction, NativeEvent, NativeEventKind};
use glfw::{Action, WindowEvent};

const GLFW_F1: i32 = 290;
const GLFW_F25: i32 = 314;
const GLFW_KP_0: i32 = 320;
const GLFW_KP_9: i32 = 329;

/// The modifier flag a GLFW key controls, if it is a modifier key
pub(super) fn modifier_for(key: glfw::Key) -> Option<Modifiers> {
    Some(match key {
        glfw::Key::LeftShift => Modifiers::LEFT_SHIFT,
        glfw::Key::RightShift => Modifiers::RIGHT_SHIFT,
        glfw::Key::LeftControl => Modifiers::LEFT_CTRL,
        glfw::Key::RightControl => Modifiers::RIGHT_CTRL,
        glfw::Key::LeftAlt => Modifiers::LEFT_ALT,
        glfw::Key::RightAlt => Modifiers::RIGHT_ALT,
        glfw::Key::LeftSuper => Modifiers::LEFT_COMMAND,
        glfw::Key::RightSuper => Modifiers::RIGHT_COMMAND,
        glfw::Key::CapsLock => Modifiers::CAPS_LOCK,
        _ => return None,
    })
}

/// Key code for a non-modifier GLFW key
pub(super) fn key_for(key: glfw::Key) -> Option<Key> {
    let code = key as i32;
    let mapped = match key {
        glfw::Key::Escape => Key::ESCAPE,
        glfw::Key::Enter | glfw::Key::KpEnter => Key::ENTER,
        glfw::Key::Tab => Key::TAB,
        glfw::Key::Backspace => Key::BACKSPACE,
        glfw::Key::Insert => Key::INSERT,
        glfw::Key::Delete => Key::DELETE,
        glfw::Key::Right => Key::RIGHT,
        glfw::Key::Left => Key::LEFT,
        glfw::Key::Down => Key::DOWN,
        glfw::Key::Up => Key::UP,
        glfw::Key::PageUp => Key::PAGE_UP,
        glfw::Key::PageDown => Key::PAGE_DOWN,
        glfw::Key::Home => Key::HOME,
        glfw::Key::End => Key::END,
        glfw::Key::ScrollLock => Key::SCROLL_LOCK,
        glfw::Key::PrintScreen => Key::PRINT_SCREEN,
        glfw::Key::Pause => Key::PAUSE,
        glfw::Key::Menu => Key::MENU,
        glfw::Key::KpDecimal => Key::from_char('.'),
        glfw::Key::KpDivide => Key::from_char('/'),
        glfw::Key::KpMultiply => Key::from_char('*'),
        glfw::Key::KpSubtract => Key::from_char('-'),
        glfw::Key::KpAdd => Key::from_char('+'),
        glfw::Key::KpEqual => Key::from_char('='),
        _ if (32..=96).contains(&code) => Key::from_char(char::from(code as u8)),
        _ if (GLFW_F1..=GLFW_F25).contains(&code) => Key::function((code - GLFW_F1 + 1) as u32)?,
        _ if (GLFW_KP_0..=GLFW_KP_9).contains(&code) => {
            Key::from_char(char::from(b'0' + (code - GLFW_KP_0) as u8))
        }
        _ => return None,
    };
    Some(mapped)
}

fn mouse_button_for(button: glfw::MouseButton) -> MouseButton {
    match button as i32 {
        0 => MouseButton::Left,
        1 => MouseButton::Right,
        2 => MouseButton::Middle,
        other => MouseButton::Other(other as u8),
    }
}

/// Translate one GLFW window event
///
/// `cursor` is the cursor position at the time of polling; GLFW does not
/// attach it to button and scroll events.
pub(super) fn translate(timestamp: f64, event: WindowEvent, cursor: (f64, f64)) -> NativeEvent {
    let kind = match event {
        WindowEvent::Key(key, scancode, action, _) => {
            if let Some(modifier) = modifier_for(key) {
                NativeEventKind::ModifierKey {
                    modifier,
                    pressed: action != Action::Release,
                }
            } else if let Some(key) = key_for(key) {
                NativeEventKind::Key {
                    key,
                    scancode: scancode as u32,
                    action: match action {
                        Action::Press => KeyAction::Press,
                        Action::Release => KeyAction::Release,
                        Action::Repeat => KeyAction::Repeat,
                    },
                }
            } else {
                NativeEventKind::Other(format!("unmapped key {key:?}"))
            }
        }
        WindowEvent::Char(character) => NativeEventKind::Char(character),
        WindowEvent::CursorPos(x, y) => NativeEventKind::MouseMoved { x, y },
        WindowEvent::MouseButton(button, action, _) => NativeEventKind::MouseButton {
            button: mouse_button_for(button),
            pressed: action != Action::Release,
            x: cursor.0,
            y: cursor.1,
        },
        WindowEvent::Scroll(dx, dy) => NativeEventKind::Scroll {
            dx,
            dy,
            x: cursor.0,
            y: cursor.1,
        },
        WindowEvent::Focus(focused) => NativeEventKind::Focus(focused),
        WindowEvent::Close => NativeEventKind::CloseRequested,
        WindowEvent::Size(width, height) => NativeEventKind::Resized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        },
        WindowEvent::Iconify(iconified) => NativeEventKind::Iconified(iconified),
        other => NativeEventKind::Other(format!("{other:?}")),
    };
    NativeEvent::new(timestamp, kind)
}
