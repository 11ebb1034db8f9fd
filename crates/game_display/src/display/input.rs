//! Event pumping, the application queue and mouse state

use super::Display;
use crate::error::{DisplayError, DisplayResult};
use crate::foundation::logging;
use crate::input::{Event, Modifiers, PipelineAction, SurfaceMetrics};
use std::time::Duration;

impl Display {
    /// Translate every pending native event
    ///
    /// Call once per iteration of the main loop, then drain the queue with
    /// [`Display::dequeue_event`].
    pub fn poll(&mut self) {
        for native in self.platform.pump_events() {
            crate::display_trace!("native {:?}", native.kind);
            let metrics = self.surface_metrics();
            let outcome = self.events.process_event(&native, metrics);
            if !outcome.consumed {
                self.platform.forward_event(&native);
            }
            match outcome.action {
                Some(PipelineAction::WarpCursor { x, y }) => self.platform.warp_cursor(x, y),
                Some(PipelineAction::SurfaceResized { width, height }) => {
                    self.handle_surface_resize(width, height);
                }
                Some(PipelineAction::ActivationChanged { active }) => {
                    log::debug!("Application {}", if active { "activated" } else { "deactivated" });
                    self.apply_cursor_visibility();
                }
                None => {}
            }
        }
    }

    /// Block until an event arrives or `seconds` pass, then poll
    pub fn sleep(&mut self, seconds: f64) {
        let timeout = Duration::try_from_secs_f64(seconds).unwrap_or_default();
        self.platform.wait_events(timeout);
        self.poll();
    }

    /// Pop the oldest queued event
    pub fn dequeue_event(&mut self) -> Option<Event> {
        let event = self.events.dequeue_event();
        if let Some(event) = &event {
            crate::display_trace!("dequeue {event}");
        }
        event
    }

    /// Append an application-made event to the queue
    pub fn queue_event(&mut self, event: Event) -> DisplayResult<()> {
        if let Some(problem) = event.malformation() {
            let err = DisplayError::contract(format!("queue_event: {problem}"));
            log::error!("{err}");
            return Err(err);
        }
        self.events.queue_event(event);
        Ok(())
    }

    /// Write `event` to the trace sink regardless of the trace switch
    pub fn trace_event(&self, event: &Event) {
        logging::write_trace_always(format_args!("{event}"));
    }

    /// Number of queued events
    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    /// Modifier state after the last processed event
    pub fn modifiers(&self) -> Modifiers {
        self.events.modifiers()
    }

    /// Whether auto-repeated key presses produce events
    pub fn key_repeat(&self) -> bool {
        self.events.key_repeat()
    }

    /// Enable or disable key repeat events
    pub fn set_key_repeat(&mut self, enabled: bool) {
        self.events.set_key_repeat(enabled);
    }

    /// Enable or disable Alt+Esc as a quit request
    pub fn set_alt_esc_enabled(&mut self, enabled: bool) {
        self.events.set_alt_esc_enabled(enabled);
    }

    /// Whether the user or the host asked to quit
    pub fn was_quit_requested(&self) -> bool {
        self.events.quit_requested()
    }

    /// Set or clear the quit latch
    pub fn set_quit_requested(&mut self, requested: bool) {
        self.events.set_quit_requested(requested);
    }

    /// Whether the application has focus
    pub fn is_app_active(&self) -> bool {
        self.events.app_active()
    }

    /// True while the application has focus and delta mode is on
    pub fn app_owns_mouse(&self) -> bool {
        self.events.app_owns_mouse()
    }

    /// Whether only relative mouse movement is reported
    pub fn delta_mode(&self) -> bool {
        self.events.delta_mode()
    }

    /// Report relative movement and keep the cursor pinned to the surface centre
    pub fn set_delta_mode(&mut self, enabled: bool) {
        if enabled == self.events.delta_mode() {
            return;
        }
        self.events.set_delta_mode(enabled);
        if enabled && self.surface.is_some() {
            let (x, y) = self.surface_metrics().centre();
            self.platform.warp_cursor(x, y);
        }
        self.apply_cursor_visibility();
    }

    /// Show or hide the cursor over the surface
    ///
    /// The cursor is always shown while the application is inactive and
    /// always hidden in delta mode.
    pub fn set_mouse_cursor_visible(&mut self, visible: bool) {
        self.events.set_cursor_visible(visible);
        self.apply_cursor_visibility();
    }

    /// The cursor visibility last requested with `set_mouse_cursor_visible`
    ///
    /// Delta mode and focus loss may override it on screen.
    pub fn is_mouse_cursor_visible(&self) -> bool {
        self.events.cursor_visible()
    }

    /// Cursor position in event space (origin bottom-left)
    pub fn mouse_position(&self) -> (i32, i32) {
        let (x, y) = self.platform.cursor_position();
        self.surface_metrics().to_event_space(x, y)
    }

    /// Move the cursor to an event-space position
    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        let (x, y) = self.surface_metrics().to_native_space(x, y);
        self.platform.warp_cursor(x, y);
    }

    fn surface_metrics(&self) -> SurfaceMetrics {
        let (width, height) = self.platform.surface_size().unwrap_or_default();
        SurfaceMetrics { width, height }
    }

    /// Push the effective cursor visibility to the platform if it changed
    pub(super) fn apply_cursor_visibility(&mut self) {
        let visible = self.events.effective_cursor_visible();
        if self.cursor_shown != Some(visible) {
            self.platform.set_cursor_visible(visible);
            self.cursor_shown = Some(visible);
        }
    }
}
