//! Native event translation and the application event queue
//!
//! Key principles:
//! - One translation point: every native notification passes through
//!   [`EventPipeline::process_event`]
//! - Handler returns consumed (true = stop, false = forward to the host)
//! - Queued events are pulled by the application between frames, FIFO
//! - Side effects on the surface (cursor warps, resizes) are returned as
//!   actions for the owner to apply

use super::{Event, Key, Modifiers, MouseButton};
use crate::platform::native::{KeyAction, NativeEvent, NativeEventKind};
use std::collections::VecDeque;

/// Presses closer together than this (seconds) count as multi-clicks
pub const DOUBLE_CLICK_INTERVAL: f64 = 0.5;

/// Presses further apart than this (pixels, either axis) start a new click sequence
pub const DOUBLE_CLICK_DISTANCE: f64 = 4.0;

/// Surface size used for coordinate conversion and delta-mode centring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceMetrics {
    /// Client width in pixels
    pub width: u32,
    /// Client height in pixels
    pub height: u32,
}

impl SurfaceMetrics {
    /// Centre of the surface in native (top-left origin) pixels
    pub fn centre(&self) -> (f64, f64) {
        (f64::from(self.width / 2), f64::from(self.height / 2))
    }

    /// Convert native top-left coordinates to the bottom-left space events use
    pub fn to_event_space(&self, x: f64, y: f64) -> (i32, i32) {
        (x.floor() as i32, self.height as i32 - y.floor() as i32)
    }

    /// Convert event-space coordinates back to native top-left coordinates
    pub fn to_native_space(&self, x: i32, y: i32) -> (f64, f64) {
        (f64::from(x), f64::from(self.height as i32 - y))
    }
}

/// Side effect the owner of the pipeline must carry out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineAction {
    /// Move the cursor back to this native position (delta mode)
    WarpCursor {
        /// Native X
        x: f64,
        /// Native Y
        y: f64,
    },
    /// The surface changed size
    SurfaceResized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// Focus changed; cursor visibility may need reapplying
    ActivationChanged {
        /// True when the application became active
        active: bool,
    },
}

/// Result of translating one native event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessOutcome {
    /// True when the host must not dispatch the event again
    pub consumed: bool,
    /// Follow-up for the owner, if any
    pub action: Option<PipelineAction>,
}

impl ProcessOutcome {
    const fn consumed() -> Self {
        Self {
            consumed: true,
            action: None,
        }
    }

    const fn forwarded() -> Self {
        Self {
            consumed: false,
            action: None,
        }
    }

    const fn with_action(action: PipelineAction) -> Self {
        Self {
            consumed: true,
            action: Some(action),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ClickTracker {
    button: MouseButton,
    timestamp: f64,
    x: f64,
    y: f64,
    count: u32,
}

/// Translates native notifications and queues typed events
pub struct EventPipeline {
    queue: VecDeque<Event>,
    modifiers: Modifiers,
    key_repeat: bool,
    delta_mode: bool,
    cursor_visible: bool,
    app_active: bool,
    quit_requested: bool,
    alt_esc_enabled: bool,
    last_cursor: Option<(f64, f64)>,
    last_click: Option<ClickTracker>,
}

impl EventPipeline {
    /// Create an empty pipeline with default behaviour
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            modifiers: Modifiers::empty(),
            key_repeat: true,
            delta_mode: false,
            cursor_visible: true,
            app_active: true,
            quit_requested: false,
            alt_esc_enabled: true,
            last_cursor: None,
            last_click: None,
        }
    }

    /// Translate one native event, queueing at most one [`Event`]
    pub fn process_event(&mut self, native: &NativeEvent, surface: SurfaceMetrics) -> ProcessOutcome {
        match &native.kind {
            NativeEventKind::Key {
                key,
                scancode,
                action,
            } => self.process_key(*key, *scancode, *action),
            NativeEventKind::ModifierKey { modifier, pressed } => {
                let previous = self.modifiers;
                if *modifier == Modifiers::CAPS_LOCK {
                    if *pressed {
                        self.modifiers.toggle(Modifiers::CAPS_LOCK);
                    }
                } else {
                    self.modifiers.set(*modifier, *pressed);
                }
                self.push_modifiers_changed(previous);
                ProcessOutcome::consumed()
            }
            NativeEventKind::ModifierFlags(flags) => {
                let previous = self.modifiers;
                self.modifiers = *flags;
                self.push_modifiers_changed(previous);
                ProcessOutcome::consumed()
            }
            NativeEventKind::Char(character) => {
                self.queue.push_back(Event::Char {
                    modifiers: self.modifiers,
                    character: *character,
                });
                ProcessOutcome::consumed()
            }
            NativeEventKind::MouseMoved { x, y } => self.process_mouse_move(*x, *y, surface),
            NativeEventKind::MouseButton {
                button,
                pressed,
                x,
                y,
            } => {
                let click_count = if *pressed {
                    self.register_press(*button, native.timestamp, *x, *y)
                } else {
                    self.last_click
                        .filter(|click| click.button == *button)
                        .map_or(1, |click| click.count)
                };
                let (x, y) = surface.to_event_space(*x, *y);
                let modifiers = self.modifiers;
                self.queue.push_back(if *pressed {
                    Event::MouseDown {
                        modifiers,
                        x,
                        y,
                        button: *button,
                        click_count,
                    }
                } else {
                    Event::MouseUp {
                        modifiers,
                        x,
                        y,
                        button: *button,
                        click_count,
                    }
                });
                ProcessOutcome::consumed()
            }
            NativeEventKind::Scroll { dx, dy, x, y } => {
                let (cursor_x, cursor_y) = surface.to_event_space(*x, *y);
                self.queue.push_back(Event::MouseScroll {
                    modifiers: self.modifiers,
                    scroll_x: *dx as f32,
                    scroll_y: *dy as f32,
                    cursor_x,
                    cursor_y,
                });
                ProcessOutcome::consumed()
            }
            NativeEventKind::Focus(active) => self.process_focus(*active),
            NativeEventKind::CloseRequested => {
                log::info!("Close requested by the host");
                self.quit_requested = true;
                ProcessOutcome::consumed()
            }
            NativeEventKind::Resized { width, height } => {
                ProcessOutcome::with_action(PipelineAction::SurfaceResized {
                    width: *width,
                    height: *height,
                })
            }
            NativeEventKind::Iconified(_) | NativeEventKind::Other(_) => ProcessOutcome::forwarded(),
        }
    }

    fn process_key(&mut self, key: Key, scancode: u32, action: KeyAction) -> ProcessOutcome {
        let modifiers = self.modifiers;
        match action {
            KeyAction::Press | KeyAction::Repeat => {
                let is_repeat = action == KeyAction::Repeat;
                if is_repeat && !self.key_repeat {
                    return ProcessOutcome::consumed();
                }
                if !is_repeat
                    && self.alt_esc_enabled
                    && key == Key::ESCAPE
                    && modifiers.intersects(Modifiers::BOTH_ALTS)
                {
                    log::info!("Alt+Esc pressed, requesting quit");
                    self.quit_requested = true;
                    return ProcessOutcome::consumed();
                }
                self.queue.push_back(Event::KeyDown {
                    modifiers,
                    key,
                    scancode,
                    is_repeat,
                });
            }
            KeyAction::Release => {
                self.queue.push_back(Event::KeyUp {
                    modifiers,
                    key,
                    scancode,
                });
            }
        }
        ProcessOutcome::consumed()
    }

    fn process_mouse_move(&mut self, x: f64, y: f64, surface: SurfaceMetrics) -> ProcessOutcome {
        if self.delta_mode {
            let centre = surface.centre();
            if (x, y) == centre {
                // Echo of a warp; later samples are measured from the centre.
                self.last_cursor = Some(centre);
                return ProcessOutcome::consumed();
            }
            // Warps for earlier samples in the same batch have not landed yet.
            let (lx, ly) = self.last_cursor.unwrap_or(centre);
            let (dx, dy) = (x - lx, y - ly);
            self.last_cursor = Some((x, y));
            if dx == 0.0 && dy == 0.0 {
                return ProcessOutcome::consumed();
            }
            let (ex, ey) = surface.to_event_space(centre.0, centre.1);
            self.queue.push_back(Event::MouseMove {
                modifiers: self.modifiers,
                x: ex,
                y: ey,
                delta_x: dx as f32,
                delta_y: dy as f32,
            });
            return ProcessOutcome::with_action(PipelineAction::WarpCursor {
                x: centre.0,
                y: centre.1,
            });
        }

        let (dx, dy) = self
            .last_cursor
            .map_or((0.0, 0.0), |(lx, ly)| (x - lx, y - ly));
        self.last_cursor = Some((x, y));
        let (ex, ey) = surface.to_event_space(x, y);
        self.queue.push_back(Event::MouseMove {
            modifiers: self.modifiers,
            x: ex,
            y: ey,
            delta_x: dx as f32,
            delta_y: dy as f32,
        });
        ProcessOutcome::consumed()
    }

    fn process_focus(&mut self, active: bool) -> ProcessOutcome {
        if active == self.app_active {
            return ProcessOutcome::consumed();
        }
        self.app_active = active;
        if active {
            self.queue.push_back(Event::AppActivate {
                modifiers: self.modifiers,
            });
        } else {
            // Key-ups are not delivered while inactive.
            self.queue.push_back(Event::AppDeactivate {
                modifiers: self.modifiers,
            });
            self.modifiers = Modifiers::empty();
            self.last_click = None;
        }
        self.last_cursor = None;
        ProcessOutcome::with_action(PipelineAction::ActivationChanged { active })
    }

    fn register_press(&mut self, button: MouseButton, timestamp: f64, x: f64, y: f64) -> u32 {
        let count = match self.last_click {
            Some(click)
                if click.button == button
                    && timestamp - click.timestamp <= DOUBLE_CLICK_INTERVAL
                    && (x - click.x).abs() <= DOUBLE_CLICK_DISTANCE
                    && (y - click.y).abs() <= DOUBLE_CLICK_DISTANCE =>
            {
                click.count + 1
            }
            _ => 1,
        };
        self.last_click = Some(ClickTracker {
            button,
            timestamp,
            x,
            y,
            count,
        });
        count
    }

    fn push_modifiers_changed(&mut self, previous: Modifiers) {
        if previous != self.modifiers {
            self.queue.push_back(Event::ModifiersChanged {
                modifiers: self.modifiers,
                previous,
            });
        }
    }

    /// Pop the oldest queued event
    pub fn dequeue_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Append an event at the tail of the queue
    pub fn queue_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued event
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Modifier state after the last processed event
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether auto-repeated key presses produce events
    pub const fn key_repeat(&self) -> bool {
        self.key_repeat
    }

    /// Enable or disable key repeat events
    pub fn set_key_repeat(&mut self, enabled: bool) {
        self.key_repeat = enabled;
    }

    /// Whether Alt+Esc requests quit
    pub const fn alt_esc_enabled(&self) -> bool {
        self.alt_esc_enabled
    }

    /// Enable or disable Alt+Esc to quit
    pub fn set_alt_esc_enabled(&mut self, enabled: bool) {
        self.alt_esc_enabled = enabled;
    }

    /// Whether only relative mouse movement is reported
    pub const fn delta_mode(&self) -> bool {
        self.delta_mode
    }

    /// Switch delta mode; the owner is responsible for the initial warp
    pub fn set_delta_mode(&mut self, enabled: bool) {
        self.delta_mode = enabled;
        self.last_cursor = None;
    }

    /// The cursor visibility last requested by the application
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Record the requested cursor visibility
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    /// Whether the cursor should actually be shown right now
    pub const fn effective_cursor_visible(&self) -> bool {
        !self.app_active || (self.cursor_visible && !self.delta_mode)
    }

    /// Whether the application currently has focus
    pub const fn app_active(&self) -> bool {
        self.app_active
    }

    /// True while the application has focus and holds the mouse in delta mode
    pub const fn app_owns_mouse(&self) -> bool {
        self.app_active && self.delta_mode
    }

    /// Whether the host or the user asked to quit
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Set or clear the quit latch
    pub fn set_quit_requested(&mut self, requested: bool) {
        self.quit_requested = requested;
    }

    /// Forget per-session state; the queue and quit latch are cleared too
    pub fn reset(&mut self) {
        let key_repeat = self.key_repeat;
        let alt_esc_enabled = self.alt_esc_enabled;
        *self = Self::new();
        self.key_repeat = key_repeat;
        self.alt_esc_enabled = alt_esc_enabled;
    }
}

impl Default for EventPipeline {
    fn default() -> Self {
        Self::new()
    }
}
