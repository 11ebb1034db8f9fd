//! OpenGL context ownership
//!
//! A [`GraphicsContext`] records the negotiated pixel format of the primary
//! context. The native context itself lives in the platform; it is created
//! here, verified against the request and torn down on failure.

use crate::core::config::GlConfig;
use crate::error::{DisplayError, DisplayResult};
use crate::platform::{PixelFormat, Platform};

/// Driver identification strings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlInfo {
    /// `GL_VERSION`
    pub version: String,
    /// `GL_EXTENSIONS`, space separated
    pub extensions: String,
    /// `GL_VENDOR`
    pub vendor: String,
    /// `GL_RENDERER`
    pub renderer: String,
}

impl GlInfo {
    /// Whether the driver lists `name` among its extensions
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.split_ascii_whitespace().any(|ext| ext == name)
    }
}

/// The live primary OpenGL context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsContext {
    requested: GlConfig,
    negotiated: GlConfig,
    pixel_format: PixelFormat,
}

impl GraphicsContext {
    /// Create the primary context and verify its pixel format
    pub fn create(platform: &mut dyn Platform, config: &GlConfig) -> DisplayResult<Self> {
        config.validate().map_err(DisplayError::InvalidConfig)?;

        let request = config.pixel_format_request();
        let pixel_format = platform
            .create_context(&request)
            .map_err(DisplayError::ContextCreation)?;

        let missing = pixel_format.shortfalls(&request);
        if !missing.is_empty() {
            platform.destroy_context();
            return Err(DisplayError::PixelFormatUnavailable(format!(
                "{} below the requested minimum (requested {request:?}, got {pixel_format:?})",
                missing.join(", ")
            )));
        }

        platform.set_swap_interval(config.swap_interval);

        let negotiated = GlConfig {
            colour_bits: pixel_format.colour_bits,
            depth_bits: pixel_format.depth_bits,
            alpha_bits: pixel_format.alpha_bits,
            stencil_bits: pixel_format.stencil_bits,
            msaa_samples: pixel_format.samples,
            swap_interval: config.swap_interval,
        };
        log::info!("OpenGL context created: {negotiated:?}");

        Ok(Self {
            requested: *config,
            negotiated,
            pixel_format,
        })
    }

    /// Tear down the native context
    pub fn destroy(self, platform: &mut dyn Platform) {
        platform.destroy_context();
        log::debug!("OpenGL context destroyed");
    }

    /// What the driver actually provided
    pub const fn config(&self) -> &GlConfig {
        &self.negotiated
    }

    /// What the caller asked for
    pub const fn requested(&self) -> &GlConfig {
        &self.requested
    }

    /// Negotiated pixel format
    pub const fn pixel_format(&self) -> &PixelFormat {
        &self.pixel_format
    }
}

/// Read the driver strings
///
/// With a live context its strings are returned. Otherwise a temporary hidden
/// context is created from `probe` (or the default configuration) and torn
/// down before returning.
pub fn query_info(
    platform: &mut dyn Platform,
    context: Option<&GraphicsContext>,
    probe: Option<&GlConfig>,
) -> DisplayResult<GlInfo> {
    if context.is_some() {
        return platform.context_info().map_err(DisplayError::ContextCreation);
    }
    let probe = probe.copied().unwrap_or_default();
    probe.validate().map_err(DisplayError::InvalidConfig)?;
    log::debug!("Probing OpenGL driver strings without a live context");
    platform
        .probe_context_info(&probe.pixel_format_request())
        .map_err(DisplayError::ContextCreation)
}
