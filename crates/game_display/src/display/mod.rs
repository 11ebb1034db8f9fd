//! The display context object
//!
//! [`Display`] owns the platform, the mode catalog, the surface and its
//! context, the render loop with its fade, offscreen targets and the event
//! pipeline. All state that a windowing layer would otherwise keep in
//! globals lives here, so `shutdown` resets everything and `init` may be
//! called again.
//!
//! ```no_run
//! use game_display::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let platform = GlfwPlatform::new()?;
//!     let mut display = Display::open(Box::new(platform), &DisplaySettings::default())?;
//!     while !display.was_quit_requested() {
//!         display.poll();
//!         while let Some(event) = display.dequeue_event() {
//!             log::debug!("{event}");
//!         }
//!         if display.begin_render()? {
//!             // draw with OpenGL
//!             display.end_render()?;
//!         }
//!     }
//!     display.shutdown();
//!     Ok(())
//! }
//! ```

mod frame;
mod input;
mod video;

#[cfg(test)]
mod tests;

use crate::core::config::DisplaySettings;
use crate::error::{DisplayError, DisplayResult};
use crate::foundation::{abort, logging, time::Clock};
use crate::input::EventPipeline;
use crate::platform::Platform;
use crate::render::{DrawCallback, Fade, OffscreenTargets, RenderLoop};
use crate::video::{DisplayMode, GraphicsContext, ModeCatalog, SurfaceController};
use std::fmt;

/// Lifecycle phase of a [`Display`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, `init` not yet called
    Uninitialized,
    /// Between `init` and `shutdown`
    Initialized,
    /// After `shutdown`; `init` may be called again
    Shutdown,
}

/// Windowing and OpenGL context manager
pub struct Display {
    platform: Box<dyn Platform>,
    phase: Phase,
    catalog: ModeCatalog,
    startup_mode: Option<DisplayMode>,
    surface: Option<SurfaceController>,
    context: Option<GraphicsContext>,
    frames: RenderLoop,
    fade: Fade,
    draw_callback: Option<DrawCallback>,
    offscreen: OffscreenTargets,
    events: EventPipeline,
    cursor_shown: Option<bool>,
    clock: Clock,
}

impl Display {
    /// Create an uninitialised display on top of `platform`
    pub fn new(platform: Box<dyn Platform>) -> Self {
        log::debug!("Creating display on the {} platform", platform.name());
        Self {
            platform,
            phase: Phase::Uninitialized,
            catalog: ModeCatalog::new(),
            startup_mode: None,
            surface: None,
            context: None,
            frames: RenderLoop::new(),
            fade: Fade::default(),
            draw_callback: None,
            offscreen: OffscreenTargets::new(),
            events: EventPipeline::new(),
            cursor_shown: None,
            clock: Clock::new(),
        }
    }

    /// Create a display and apply the non-surface parts of `settings`
    pub fn with_settings(platform: Box<dyn Platform>, settings: &DisplaySettings) -> Self {
        let mut display = Self::new(platform);
        display.apply_settings(settings);
        display
    }

    /// Create, initialise and bring up surface and context in one go
    pub fn open(platform: Box<dyn Platform>, settings: &DisplaySettings) -> DisplayResult<Self> {
        let mut display = Self::with_settings(platform, settings);
        display.init()?;
        display.init_video(&settings.video)?;
        display.init_gl(&settings.gl)?;
        Ok(display)
    }

    /// Apply fade time, tracing and input options
    ///
    /// The trace switch is process-wide, so the last settings applied win.
    pub fn apply_settings(&mut self, settings: &DisplaySettings) {
        self.fade.set_duration_secs(settings.fade_time_secs);
        logging::set_trace_enabled(settings.trace_enabled);
        self.events.set_alt_esc_enabled(settings.alt_esc_enabled);
        self.events.set_key_repeat(settings.key_repeat);
    }

    /// Enumerate display modes and record the startup mode
    pub fn init(&mut self) -> DisplayResult<()> {
        if self.phase == Phase::Initialized {
            return Err(DisplayError::contract("display is already initialized"));
        }
        let desktop = self.platform.desktop_mode().map_err(DisplayError::ModeList)?;
        self.catalog.build(self.platform.as_mut())?;
        self.startup_mode = Some(desktop);
        self.phase = Phase::Initialized;
        log::info!(
            "Display initialized on {}: desktop {desktop}, {} modes",
            self.platform.name(),
            self.catalog.len()
        );
        Ok(())
    }

    /// Tear everything down and restore the display
    ///
    /// Safe to call in any phase. Offscreen targets go first, then the
    /// context, then the surface (restoring any mode switch and capture).
    pub fn shutdown(&mut self) {
        if self.frames.in_frame() {
            log::warn!("Shutting down inside a frame; the frame is discarded");
        }
        self.frames.reset(std::time::Instant::now());
        self.offscreen.destroy_all(self.platform.as_mut());
        if let Some(context) = self.context.take() {
            context.destroy(self.platform.as_mut());
        }
        if let Some(surface) = self.surface.take() {
            surface.teardown(self.platform.as_mut());
        }
        self.fade.reset();
        self.platform.set_fade_level(0.0);
        if self.cursor_shown == Some(false) {
            self.platform.set_cursor_visible(true);
        }
        self.cursor_shown = None;
        self.events.reset();
        self.draw_callback = None;
        self.catalog = ModeCatalog::new();
        self.startup_mode = None;
        if self.phase == Phase::Initialized {
            log::info!("Display shut down");
        }
        self.phase = Phase::Shutdown;
    }

    /// Current lifecycle phase
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    fn require_initialized(&self, operation: &str) -> DisplayResult<()> {
        if self.phase == Phase::Initialized {
            Ok(())
        } else {
            Err(DisplayError::contract(format!("{operation} called before init")))
        }
    }

    /// The platform backend
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// The platform backend as its concrete type
    pub fn platform_ref<T: Platform + 'static>(&self) -> Option<&T> {
        self.platform.as_any().downcast_ref::<T>()
    }

    /// Mutable access to the platform backend as its concrete type
    pub fn platform_mut<T: Platform + 'static>(&mut self) -> Option<&mut T> {
        self.platform.as_any_mut().downcast_mut::<T>()
    }

    /// Seconds since the display was created
    pub fn timer_seconds(&self) -> f64 {
        self.clock.timer_seconds()
    }

    /// Milliseconds since the display was created, wrapping
    pub fn millisecond_timer(&self) -> u32 {
        self.clock.millisecond_timer()
    }

    /// Restore the display, report a fatal error and exit the process
    pub fn abort_with_message(&mut self, title: &str, args: fmt::Arguments<'_>) -> ! {
        self.shutdown();
        abort::abort_with_message(title, args)
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        if self.phase == Phase::Initialized {
            self.shutdown();
        }
    }
}
