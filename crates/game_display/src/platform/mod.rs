//! Native platform seam
//!
//! Everything that touches the host windowing system goes through the
//! [`Platform`] trait. The display controllers only ever see this trait, which
//! keeps the state machines testable and lets a host pick a backend at runtime.
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Display (controllers)       │
//! └─────────────┬───────────────────┘
//!               │ Box<dyn Platform>
//!      ┌────────▼────────┐
//!      │ Platform trait  │
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ GlfwPlatform          │ ← monitors, windows, GL contexts
//!   │ HeadlessPlatform      │ ← simulated display for tests
//!   └───────────────────────┘
//! ```

pub mod glfw_backend;
pub mod headless;
pub mod native;

pub use glfw_backend::GlfwPlatform;
pub use headless::{CurrentContext, HeadlessCall, HeadlessConfig, HeadlessPlatform};
pub use native::{KeyAction, NativeEvent, NativeEventKind};

use crate::core::config::WindowLevel;
use crate::render::offscreen::{ColourBuffer, InternalFormat, TextureTarget};
use crate::video::context::GlInfo;
use crate::video::mode::DisplayMode;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a platform backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The windowing library could not be initialised
    #[error("platform initialization failed: {0}")]
    InitializationFailed(String),

    /// A required device or resource is not present
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The backend cannot do what was asked
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A native call failed
    #[error("native error: {0}")]
    Native(String),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// How a surface covers the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Decorated window of the requested size
    Windowed,
    /// Undecorated window covering the desktop without a mode switch
    FullscreenWindow {
        /// Stacking level
        level: WindowLevel,
    },
    /// Surface owning the whole display at its current (possibly switched) mode
    FullscreenDisplay,
}

/// Everything needed to create the primary surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    /// Window title, UTF-8
    pub title: String,
    /// Client width in pixels
    pub width: u32,
    /// Client height in pixels
    pub height: u32,
    /// Initial presentation
    pub presentation: Presentation,
    /// Whether the user may resize the window
    pub resizable: bool,
}

/// Minimum pixel format requirements handed to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormatRequest {
    /// Minimum colour bits (RGB, excluding alpha)
    pub colour_bits: u32,
    /// Minimum alpha bits
    pub alpha_bits: u32,
    /// Minimum depth bits
    pub depth_bits: u32,
    /// Minimum stencil bits
    pub stencil_bits: u32,
    /// Multisample count, 0 when MSAA is off
    pub samples: u32,
}

/// Pixel format a backend actually produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormat {
    /// Colour bits (RGB, excluding alpha)
    pub colour_bits: u32,
    /// Alpha bits
    pub alpha_bits: u32,
    /// Depth bits
    pub depth_bits: u32,
    /// Stencil bits
    pub stencil_bits: u32,
    /// Multisample count, 0 when MSAA is off
    pub samples: u32,
}

impl PixelFormat {
    /// Names of the fields that fall short of `request`
    pub fn shortfalls(&self, request: &PixelFormatRequest) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.colour_bits < request.colour_bits {
            missing.push("colour");
        }
        if self.alpha_bits < request.alpha_bits {
            missing.push("alpha");
        }
        if self.depth_bits < request.depth_bits {
            missing.push("depth");
        }
        if self.stencil_bits < request.stencil_bits {
            missing.push("stencil");
        }
        if request.samples > 1 && self.samples < request.samples {
            missing.push("samples");
        }
        missing
    }
}

/// Description of an offscreen target for the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffscreenDescriptor {
    /// Texture target the buffer will be bound as
    pub target: TextureTarget,
    /// Internal texture format
    pub internal_format: InternalFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Opaque handle to a backend-owned offscreen buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeTarget(pub u64);

/// The native windowing layer
///
/// All methods run on the thread that owns the native event loop. Surface and
/// context methods are only called by the display in a valid order: a surface
/// exists before a context is created, and the context is destroyed before the
/// surface.
pub trait Platform {
    /// Backend name for diagnostics
    fn name(&self) -> &'static str;

    /// All modes the primary display reports, in any order, duplicates allowed
    fn display_modes(&mut self) -> PlatformResult<Vec<DisplayMode>>;

    /// The mode the primary display is currently using
    fn desktop_mode(&mut self) -> PlatformResult<DisplayMode>;

    /// Take exclusive ownership of the primary display
    fn capture_display(&mut self) -> PlatformResult<()>;

    /// Give up exclusive ownership; no-op when not captured
    fn release_display(&mut self);

    /// Switch the primary display to `mode`
    fn switch_display_mode(&mut self, mode: &DisplayMode) -> PlatformResult<()>;

    /// Restore the mode that was active before any switch; no-op when not switched
    fn restore_display_mode(&mut self);

    /// Create the primary surface
    fn create_surface(&mut self, descriptor: &SurfaceDescriptor) -> PlatformResult<()>;

    /// Move the existing surface to a new presentation without touching its context
    fn set_presentation(
        &mut self,
        presentation: Presentation,
        width: u32,
        height: u32,
        animate: bool,
    ) -> PlatformResult<()>;

    /// Destroy the primary surface
    fn destroy_surface(&mut self);

    /// Current client size of the primary surface
    fn surface_size(&self) -> Option<(u32, u32)>;

    /// False while the surface is minimised or otherwise not on screen
    fn surface_visible(&self) -> bool;

    /// Create the primary OpenGL context and make it current
    fn create_context(&mut self, request: &PixelFormatRequest) -> PlatformResult<PixelFormat>;

    /// Destroy the primary context
    fn destroy_context(&mut self);

    /// 0 disables vsync, 1 syncs every refresh, 2 every other refresh
    fn set_swap_interval(&mut self, interval: u32);

    /// Present the back buffer of the primary surface
    fn swap_buffers(&mut self);

    /// Driver strings from the primary context
    fn context_info(&mut self) -> PlatformResult<GlInfo>;

    /// Driver strings from a temporary context, which must be torn down before returning
    fn probe_context_info(&mut self, request: &PixelFormatRequest) -> PlatformResult<GlInfo>;

    /// Overlay darkness: 0 shows the frame as drawn, 1 is fully black
    fn set_fade_level(&mut self, level: f32);

    /// Create an offscreen buffer
    fn create_offscreen(
        &mut self,
        descriptor: &OffscreenDescriptor,
        request: &PixelFormatRequest,
    ) -> PlatformResult<(NativeTarget, PixelFormat)>;

    /// Release an offscreen buffer
    fn destroy_offscreen(&mut self, target: NativeTarget);

    /// Direct rendering to `target`, or the primary surface for `None`
    fn bind_render_target(&mut self, target: Option<NativeTarget>) -> PlatformResult<()>;

    /// Load the named buffer of `source` into the bound texture of `destination`
    fn copy_to_texture(
        &mut self,
        destination: Option<NativeTarget>,
        source: NativeTarget,
        buffer: ColourBuffer,
    ) -> PlatformResult<()>;

    /// Collect pending native events without blocking
    fn pump_events(&mut self) -> Vec<NativeEvent>;

    /// Block until an event is pending or `timeout` elapses
    fn wait_events(&mut self, timeout: Duration);

    /// Default handling for an event the pipeline did not consume
    fn forward_event(&mut self, event: &NativeEvent);

    /// Cursor position in surface pixels, origin top-left
    fn cursor_position(&self) -> (f64, f64);

    /// Move the cursor, surface pixels with origin top-left
    fn warp_cursor(&mut self, x: f64, y: f64);

    /// Show or hide the cursor while it is over the surface
    fn set_cursor_visible(&mut self, visible: bool);

    /// Get access to the concrete type for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get mutable access to the concrete type for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
