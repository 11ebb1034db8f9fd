//! Modes, surface and context operations

use super::Display;
use crate::core::config::{Disposition, GlConfig, VideoConfig};
use crate::error::{DisplayError, DisplayResult};
use crate::render::{RedrawReason, RedrawRequest};
use crate::video::{context, DisplayMode, GlInfo, GraphicsContext, SurfaceController};
use std::time::Instant;

impl Display {
    /// Re-enumerate display modes, e.g. after a monitor change
    pub fn build_mode_list(&mut self) -> DisplayResult<&[DisplayMode]> {
        self.require_initialized("build_mode_list")?;
        self.catalog.build(self.platform.as_mut())
    }

    /// Catalog of display modes, largest first
    pub fn mode_list(&self) -> &[DisplayMode] {
        self.catalog.modes()
    }

    /// Number of catalog entries
    pub fn mode_count(&self) -> usize {
        self.catalog.len()
    }

    /// Catalog entry at `index`
    pub fn mode(&self, index: usize) -> DisplayResult<DisplayMode> {
        self.catalog.get(index)
    }

    /// Resolve `requested` against the catalog
    pub fn match_mode(&self, requested: &DisplayMode, accept_closest: bool) -> DisplayResult<DisplayMode> {
        self.catalog.match_mode(requested, accept_closest)
    }

    /// Desktop mode at `init` time
    pub fn startup_mode(&self) -> DisplayResult<DisplayMode> {
        self.startup_mode
            .ok_or_else(|| DisplayError::contract("startup_mode called before init"))
    }

    /// Aspect ratio of the desktop at `init` time
    pub fn startup_aspect_ratio(&self) -> DisplayResult<f32> {
        Ok(self.startup_mode()?.aspect_ratio())
    }

    /// Create the primary surface
    ///
    /// Entering a display-owning disposition fades in from black, so set the
    /// fade time before calling this.
    pub fn init_video(&mut self, config: &VideoConfig) -> DisplayResult<()> {
        self.require_initialized("init_video")?;
        if self.surface.is_some() {
            return Err(DisplayError::contract("init_video called with a surface already up"));
        }
        let desktop = self.startup_mode()?;

        let blackout = config.disposition.owns_display();
        if blackout {
            self.fade.snap_to_black();
            self.platform.set_fade_level(1.0);
        }

        match SurfaceController::init(self.platform.as_mut(), &self.catalog, config, desktop) {
            Ok(surface) => {
                self.surface = Some(surface);
                if blackout {
                    self.fade.fade_from_black(Instant::now());
                }
                self.apply_cursor_visibility();
                Ok(())
            }
            Err(e) => {
                if blackout {
                    self.fade.reset();
                    self.platform.set_fade_level(0.0);
                }
                log::error!("init_video failed: {e}");
                Err(e)
            }
        }
    }

    /// Create the OpenGL context for the surface
    ///
    /// On failure the surface is torn down as well and the display restored.
    pub fn init_gl(&mut self, config: &GlConfig) -> DisplayResult<()> {
        self.require_initialized("init_gl")?;
        if self.surface.is_none() {
            return Err(DisplayError::contract("init_gl called before init_video"));
        }
        if self.context.is_some() {
            return Err(DisplayError::contract("init_gl called with a context already up"));
        }

        match GraphicsContext::create(self.platform.as_mut(), config) {
            Ok(context) => {
                self.context = Some(context);
                self.frames.reset(Instant::now());
                Ok(())
            }
            Err(e) => {
                log::error!("init_gl failed: {e}");
                if let Some(surface) = self.surface.take() {
                    surface.teardown(self.platform.as_mut());
                }
                self.fade.reset();
                self.platform.set_fade_level(0.0);
                Err(e)
            }
        }
    }

    /// The live video configuration
    pub fn video_config(&self) -> Option<&VideoConfig> {
        self.surface.as_ref().map(SurfaceController::config)
    }

    /// The negotiated OpenGL configuration
    pub fn gl_config(&self) -> Option<&GlConfig> {
        self.context.as_ref().map(GraphicsContext::config)
    }

    /// Current disposition, [`Disposition::None`] without a surface
    pub fn disposition(&self) -> Disposition {
        self.surface
            .as_ref()
            .map_or(Disposition::None, SurfaceController::disposition)
    }

    /// Size the surface has, or returns to, as a window
    pub fn window_dimensions(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(SurfaceController::windowed_size)
    }

    /// Current surface size
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(SurfaceController::size)
    }

    /// Width over height of the current surface
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.surface.as_ref().map(SurfaceController::aspect_ratio)
    }

    /// Switch between `Window` and `FullscreenWindow` without losing the context
    pub fn toggle_fullscreen_window(&mut self) -> DisplayResult<()> {
        if self.frames.in_frame() {
            let err = DisplayError::contract("toggle_fullscreen_window called inside a frame");
            log::error!("{err}");
            return Err(err);
        }
        let desktop = self.startup_mode()?;
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| DisplayError::contract("toggle_fullscreen_window called without a surface"))?;
        let (width, height) = surface.toggle_fullscreen_window(self.platform.as_mut(), desktop)?;
        self.redraw(RedrawReason::FullscreenToggle, width, height);
        Ok(())
    }

    /// OpenGL driver strings, from a temporary context if none is live
    pub fn gl_info(&mut self, probe: Option<&GlConfig>) -> DisplayResult<GlInfo> {
        context::query_info(self.platform.as_mut(), self.context.as_ref(), probe)
    }

    pub(super) fn handle_surface_resize(&mut self, width: u32, height: u32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if surface.handle_resize(width, height) {
            self.redraw(RedrawReason::Resize, width, height);
        }
    }

    /// Run the draw callback and present its frame with the fade overlay
    pub(super) fn redraw(&mut self, reason: RedrawReason, width: u32, height: u32) {
        if self.context.is_none() || self.frames.in_frame() {
            return;
        }
        let Some(callback) = self.draw_callback.as_mut() else {
            return;
        };
        callback(&RedrawRequest {
            reason,
            width,
            height,
        });
        let level = self.fade.advance(Instant::now());
        self.platform.set_fade_level(level);
        self.platform.swap_buffers();
    }
}
