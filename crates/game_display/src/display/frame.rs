//! Frame bracketing, fades and offscreen targets

use super::Display;
use crate::core::config::GlConfig;
use crate::error::{DisplayError, DisplayResult};
use crate::foundation::time::FrameStats;
use crate::platform::OffscreenDescriptor;
use crate::render::{
    ColourBuffer, DrawCallback, FadeState, InternalFormat, OffscreenId, OffscreenTarget,
    RedrawRequest, TextureBinding, TextureSlot, TextureTarget,
};
use std::time::Instant;

impl Display {
    /// Open a frame
    ///
    /// Returns `Ok(false)` when drawing would be wasted: the surface is not on
    /// screen, or the application owns the display but is in the background.
    /// No frame is open in that case and `end_render` must not be called.
    pub fn begin_render(&mut self) -> DisplayResult<bool> {
        if self.context.is_none() {
            let err = DisplayError::contract("begin_render called without a context");
            log::error!("{err}");
            return Err(err);
        }
        if self.frames.in_frame() {
            let err = DisplayError::contract("begin_render called twice without end or discard");
            log::error!("{err}");
            return Err(err);
        }
        if !self.platform.surface_visible() {
            return Ok(false);
        }
        if self.disposition().owns_display() && !self.events.app_active() {
            return Ok(false);
        }
        self.frames.begin()?;
        Ok(true)
    }

    /// Close the frame, apply the fade overlay and present
    pub fn end_render(&mut self) -> DisplayResult<()> {
        let now = Instant::now();
        if let Err(e) = self.frames.end(now) {
            log::error!("{e}");
            return Err(e);
        }
        let level = self.fade.advance(now);
        self.platform.set_fade_level(level);
        self.platform.swap_buffers();
        Ok(())
    }

    /// Close the frame without presenting
    pub fn discard_render(&mut self) -> DisplayResult<()> {
        self.frames.discard().map_err(|e| {
            log::error!("{e}");
            e
        })
    }

    /// Whether a frame is open
    pub fn in_frame(&self) -> bool {
        self.frames.in_frame()
    }

    /// Presented-frame statistics since the context was created
    pub fn frame_stats(&self) -> FrameStats {
        self.frames.stats()
    }

    /// Start darkening the screen; no-op if already black or going there
    pub fn fade_to_black(&mut self) {
        self.fade.fade_to_black(Instant::now());
    }

    /// Start revealing the screen; no-op if already clear or going there
    pub fn fade_from_black(&mut self) {
        self.fade.fade_from_black(Instant::now());
    }

    /// Where the fade currently is
    pub fn fade_state(&self) -> FadeState {
        self.fade.state()
    }

    /// Whether a fade is in progress
    pub fn is_fading(&self) -> bool {
        self.fade.is_fading()
    }

    /// Duration of a full fade in seconds
    pub fn fade_time(&self) -> f32 {
        self.fade.duration_secs()
    }

    /// Set the duration of a full fade; negative values clamp to zero
    pub fn set_fade_time(&mut self, secs: f32) {
        self.fade.set_duration_secs(secs);
    }

    /// Install the hook that draws a frame on resize and fullscreen toggle
    pub fn set_draw_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&RedrawRequest) + 'static,
    {
        let callback: DrawCallback = Box::new(callback);
        self.draw_callback = Some(callback);
    }

    /// Remove the draw hook
    pub fn clear_draw_callback(&mut self) {
        self.draw_callback = None;
    }

    /// Create an offscreen target sharing resources with the primary context
    ///
    /// Depth, stencil and multisampling follow `gl`; colour and alpha depth
    /// follow `format`.
    pub fn create_offscreen(
        &mut self,
        target: TextureTarget,
        format: InternalFormat,
        width: u32,
        height: u32,
        gl: &GlConfig,
    ) -> DisplayResult<OffscreenId> {
        if self.context.is_none() {
            return Err(DisplayError::contract("create_offscreen called without a context"));
        }
        let descriptor = OffscreenDescriptor {
            target,
            internal_format: format,
            width,
            height,
        };
        self.offscreen
            .create(self.platform.as_mut(), descriptor, gl)
            .map_err(|e| {
                log::error!("create_offscreen failed: {e}");
                e
            })
    }

    /// Release an offscreen target
    ///
    /// Textures copied from it become [`TextureBinding::Invalidated`]; if it
    /// was the render target, rendering returns to the primary surface.
    pub fn destroy_offscreen(&mut self, id: OffscreenId) -> DisplayResult<()> {
        self.offscreen.destroy(self.platform.as_mut(), id)
    }

    /// Direct rendering to an offscreen target, or back to the surface for `None`
    pub fn set_render_target(&mut self, target: Option<OffscreenId>) -> DisplayResult<()> {
        if self.context.is_none() {
            return Err(DisplayError::contract("set_render_target called without a context"));
        }
        self.offscreen.set_render_target(self.platform.as_mut(), target)
    }

    /// The offscreen target being rendered to, `None` for the surface
    pub fn render_target(&self) -> Option<OffscreenId> {
        self.offscreen.active()
    }

    /// Load `source`'s colour buffer into the texture bound in `destination`
    pub fn copy_to_texture(
        &mut self,
        destination: TextureSlot,
        source: OffscreenId,
        buffer: ColourBuffer,
    ) -> DisplayResult<()> {
        self.offscreen
            .copy_to_texture(self.platform.as_mut(), destination, source, buffer)
    }

    /// Repeat the last copy into `destination`
    pub fn refresh_texture(&mut self, destination: TextureSlot) -> DisplayResult<()> {
        self.offscreen.refresh_texture(self.platform.as_mut(), destination)
    }

    /// What was last copied into `destination`
    pub fn texture_binding(&self, destination: TextureSlot) -> Option<TextureBinding> {
        self.offscreen.binding(destination)
    }

    /// Look up a live offscreen target
    pub fn offscreen_target(&self, id: OffscreenId) -> Option<&OffscreenTarget> {
        self.offscreen.get(id)
    }
}
