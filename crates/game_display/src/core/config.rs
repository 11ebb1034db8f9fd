//! # Display Configuration
//!
//! Configuration structures for the display subsystems. The surface and the
//! OpenGL context each take their own structure; [`DisplaySettings`] bundles
//! both with the render-loop and input options so a whole setup can live in a
//! single TOML or RON file.
//!
//! ## Example
//!
//! ```toml
//! fade_time_secs = 0.5
//! trace_enabled = false
//! alt_esc_enabled = true
//! key_repeat = true
//!
//! [video]
//! disposition = "FullscreenWindow"
//! title = "Asteroids"
//! accept_closest_mode = true
//! capture_display = true
//! enable_resizing = true
//! window_level = "Default"
//! use_native_fullscreen = false
//!
//! [video.mode]
//! width = 1280
//! height = 720
//! bits_per_pixel = 32
//!
//! [gl]
//! colour_bits = 24
//! depth_bits = 24
//! alpha_bits = 8
//! stencil_bits = 8
//! msaa_samples = 4
//! swap_interval = 1
//! ```

use crate::platform::PixelFormatRequest;
use crate::render::fade::DEFAULT_FADE_TIME_SECS;
use crate::video::mode::DisplayMode;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// How the primary surface occupies the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    /// No surface; never valid for initialisation
    None,
    /// Decorated window
    Window,
    /// Whole display at the current desktop mode
    Fullscreen,
    /// Whole display after switching to the requested mode
    FullscreenSetMode,
    /// Borderless window covering the desktop, no mode switch
    FullscreenWindow,
}

impl Disposition {
    /// Whether the surface covers the whole display
    pub const fn is_fullscreen(self) -> bool {
        matches!(
            self,
            Self::Fullscreen | Self::FullscreenSetMode | Self::FullscreenWindow
        )
    }

    /// Whether the display is exclusively owned (the app cannot be seen behind other windows)
    pub const fn owns_display(self) -> bool {
        matches!(self, Self::Fullscreen | Self::FullscreenSetMode)
    }
}

/// Stacking level of a fullscreen window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowLevel {
    /// Ordinary application window level
    #[default]
    Default,
    /// Above ordinary windows, like a floating panel
    Panel,
    /// Above everything except the system's own overlays
    VeryHigh,
}

/// # Video Configuration
///
/// Describes the primary surface. After initialisation the display keeps a
/// live copy whose `mode` reflects the actual size of the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Windowed or one of the fullscreen variants
    pub disposition: Disposition,
    /// Requested resolution; bits 0 means any depth
    pub mode: DisplayMode,
    /// Window title
    pub title: String,
    /// Fall back to the nearest catalog mode when there is no exact match
    pub accept_closest_mode: bool,
    /// Take exclusive ownership of the display in the fullscreen dispositions
    pub capture_display: bool,
    /// Let the user resize a windowed surface
    pub enable_resizing: bool,
    /// Stacking level for [`Disposition::FullscreenWindow`]
    pub window_level: WindowLevel,
    /// Use the platform's animated fullscreen transition where it has one
    pub use_native_fullscreen: bool,
}

impl VideoConfig {
    /// Windowed configuration of the given size
    pub fn windowed(width: u32, height: u32) -> Self {
        Self {
            disposition: Disposition::Window,
            mode: DisplayMode::new(width, height, 32),
            ..Self::default()
        }
    }

    /// Set the disposition
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Set the requested mode
    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable closest-mode fallback
    pub fn with_accept_closest_mode(mut self, accept: bool) -> Self {
        self.accept_closest_mode = accept;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.disposition {
            Disposition::None => {
                return Err("disposition None cannot be used to initialise a surface".to_string())
            }
            Disposition::Window | Disposition::FullscreenWindow | Disposition::FullscreenSetMode => {
                if self.mode.width == 0 || self.mode.height == 0 {
                    return Err(format!(
                        "{:?} needs a non-zero size, got {}",
                        self.disposition, self.mode
                    ));
                }
            }
            Disposition::Fullscreen => {}
        }
        Ok(())
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            disposition: Disposition::Window,
            mode: DisplayMode::new(800, 600, 32),
            title: "Game".to_string(),
            accept_closest_mode: true,
            capture_display: true,
            enable_resizing: true,
            window_level: WindowLevel::Default,
            use_native_fullscreen: false,
        }
    }
}

/// Highest accepted swap interval
pub const MAX_SWAP_INTERVAL: u32 = 2;

/// # OpenGL Configuration
///
/// Minimum pixel format for the context. The negotiated values may be higher
/// but never lower; a driver that cannot meet a minimum fails creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    /// Colour bits (RGB, excluding alpha)
    pub colour_bits: u32,
    /// Depth buffer bits
    pub depth_bits: u32,
    /// Alpha bits
    pub alpha_bits: u32,
    /// Stencil bits
    pub stencil_bits: u32,
    /// MSAA samples; 0 or 1 disables multisampling
    pub msaa_samples: u32,
    /// 0 no vsync, 1 vsync, 2 every other refresh
    pub swap_interval: u32,
}

impl GlConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.swap_interval > MAX_SWAP_INTERVAL {
            return Err(format!(
                "swap interval {} is above the maximum of {MAX_SWAP_INTERVAL}",
                self.swap_interval
            ));
        }
        Ok(())
    }

    /// Whether multisampling is requested
    pub const fn msaa_enabled(&self) -> bool {
        self.msaa_samples > 1
    }

    /// Pixel format minimums for the primary context
    pub const fn pixel_format_request(&self) -> PixelFormatRequest {
        PixelFormatRequest {
            colour_bits: self.colour_bits,
            alpha_bits: self.alpha_bits,
            depth_bits: self.depth_bits,
            stencil_bits: self.stencil_bits,
            samples: if self.msaa_enabled() {
                self.msaa_samples
            } else {
                0
            },
        }
    }

    /// Pixel format minimums for an offscreen target
    ///
    /// Colour and alpha depth are not constrained: the texture's internal
    /// format decides how copied pixels are stored.
    pub const fn offscreen_request(&self) -> PixelFormatRequest {
        let mut request = self.pixel_format_request();
        request.colour_bits = 0;
        request.alpha_bits = 0;
        request
    }
}

impl Default for GlConfig {
    fn default() -> Self {
        Self {
            colour_bits: 24,
            depth_bits: 24,
            alpha_bits: 8,
            stencil_bits: 8,
            msaa_samples: 4,
            swap_interval: 1,
        }
    }
}

/// # Complete Display Settings
///
/// Everything needed to bring a display up, in one serializable structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Surface configuration
    pub video: VideoConfig,
    /// OpenGL context configuration
    pub gl: GlConfig,
    /// Fade duration in seconds
    pub fade_time_secs: f32,
    /// Enable trace output
    pub trace_enabled: bool,
    /// Alt+Esc requests quit
    pub alt_esc_enabled: bool,
    /// Auto-repeated key presses are delivered
    pub key_repeat: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            video: VideoConfig::default(),
            gl: GlConfig::default(),
            fade_time_secs: DEFAULT_FADE_TIME_SECS,
            trace_enabled: false,
            alt_esc_enabled: true,
            key_repeat: true,
        }
    }
}

impl Config for DisplaySettings {
    fn validate(&self) -> Result<(), ConfigError> {
        self.video.validate().map_err(ConfigError::Invalid)?;
        self.gl.validate().map_err(ConfigError::Invalid)?;
        if !self.fade_time_secs.is_finite() || self.fade_time_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fade time must be a non-negative number of seconds, got {}",
                self.fade_time_secs
            )));
        }
        Ok(())
    }
}
