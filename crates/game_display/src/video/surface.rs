//! Primary surface lifecycle and disposition changes
//!
//! The controller owns the live [`VideoConfig`] and whatever display state it
//! had to change to show the surface (capture, mode switch). Every step that
//! touches the display is undone if a later step fails, and again on
//! teardown.

use crate::core::config::{Disposition, VideoConfig};
use crate::error::{DisplayError, DisplayResult};
use crate::platform::{Platform, Presentation, SurfaceDescriptor};
use crate::video::catalog::ModeCatalog;
use crate::video::mode::DisplayMode;

/// The primary surface and the display state it depends on
#[derive(Debug)]
pub struct SurfaceController {
    config: VideoConfig,
    windowed_size: (u32, u32),
    captured: bool,
    mode_switched: bool,
}

impl SurfaceController {
    /// Bring up the primary surface for `config`
    ///
    /// `desktop` is the mode the display used when the process started.
    pub fn init(
        platform: &mut dyn Platform,
        catalog: &ModeCatalog,
        config: &VideoConfig,
        desktop: DisplayMode,
    ) -> DisplayResult<Self> {
        config.validate().map_err(DisplayError::InvalidConfig)?;

        let mut surface = Self {
            config: config.clone(),
            windowed_size: (config.mode.width, config.mode.height),
            captured: false,
            mode_switched: false,
        };
        if surface.config.mode.bits_per_pixel == 0 {
            surface.config.mode.bits_per_pixel = desktop.bits_per_pixel;
        }

        match config.disposition {
            Disposition::None => {
                return Err(DisplayError::InvalidConfig(
                    "disposition None cannot be initialised".to_string(),
                ))
            }
            Disposition::FullscreenSetMode => {
                let target = catalog.match_mode(&config.mode, config.accept_closest_mode)?;
                surface.capture_if_requested(platform)?;
                if let Err(source) = platform.switch_display_mode(&target) {
                    surface.release(platform);
                    return Err(DisplayError::ModeSwitch {
                        mode: target,
                        source,
                    });
                }
                surface.mode_switched = true;
                surface.config.mode = target;
                surface.create(platform, Presentation::FullscreenDisplay, target.width, target.height)?;
            }
            Disposition::Fullscreen => {
                surface.capture_if_requested(platform)?;
                surface.config.mode = desktop;
                surface.create(platform, Presentation::FullscreenDisplay, desktop.width, desktop.height)?;
            }
            Disposition::Window => {
                let (width, height) = surface.windowed_size;
                surface.create(platform, Presentation::Windowed, width, height)?;
            }
            Disposition::FullscreenWindow => {
                let level = config.window_level;
                surface.config.mode.width = desktop.width;
                surface.config.mode.height = desktop.height;
                surface.create(
                    platform,
                    Presentation::FullscreenWindow { level },
                    desktop.width,
                    desktop.height,
                )?;
            }
        }

        log::info!(
            "Surface initialised: {:?} at {} (windowed size {}x{})",
            surface.config.disposition,
            surface.config.mode,
            surface.windowed_size.0,
            surface.windowed_size.1
        );
        Ok(surface)
    }

    fn capture_if_requested(&mut self, platform: &mut dyn Platform) -> DisplayResult<()> {
        if self.config.capture_display {
            platform
                .capture_display()
                .map_err(DisplayError::DisplayCapture)?;
            self.captured = true;
        }
        Ok(())
    }

    fn create(
        &mut self,
        platform: &mut dyn Platform,
        presentation: Presentation,
        width: u32,
        height: u32,
    ) -> DisplayResult<()> {
        let descriptor = SurfaceDescriptor {
            title: self.config.title.clone(),
            width,
            height,
            presentation,
            resizable: self.config.enable_resizing,
        };
        if let Err(e) = platform.create_surface(&descriptor) {
            self.release(platform);
            return Err(DisplayError::SurfaceCreation(e));
        }
        Ok(())
    }

    /// Undo mode switch and capture, in reverse order
    fn release(&mut self, platform: &mut dyn Platform) {
        if self.mode_switched {
            platform.restore_display_mode();
            self.mode_switched = false;
        }
        if self.captured {
            platform.release_display();
            self.captured = false;
        }
    }

    /// Destroy the surface and restore the display
    pub fn teardown(mut self, platform: &mut dyn Platform) {
        platform.destroy_surface();
        self.release(platform);
        log::debug!("Surface torn down");
    }

    /// Switch between `Window` and `FullscreenWindow` in place
    ///
    /// Returns the new surface size. The context is untouched.
    pub fn toggle_fullscreen_window(
        &mut self,
        platform: &mut dyn Platform,
        desktop: DisplayMode,
    ) -> DisplayResult<(u32, u32)> {
        let animate = self.config.use_native_fullscreen;
        let (next, presentation, (width, height)) = match self.config.disposition {
            Disposition::Window => (
                Disposition::FullscreenWindow,
                Presentation::FullscreenWindow {
                    level: self.config.window_level,
                },
                (desktop.width, desktop.height),
            ),
            Disposition::FullscreenWindow => {
                (Disposition::Window, Presentation::Windowed, self.windowed_size)
            }
            other => {
                return Err(DisplayError::contract(format!(
                    "cannot toggle fullscreen window from {other:?}"
                )))
            }
        };

        if next == Disposition::FullscreenWindow {
            self.windowed_size = (self.config.mode.width, self.config.mode.height);
        }
        platform
            .set_presentation(presentation, width, height, animate)
            .map_err(DisplayError::SurfaceCreation)?;

        self.config.disposition = next;
        self.config.mode.width = width;
        self.config.mode.height = height;
        log::info!("Toggled to {next:?} at {width}x{height}");
        Ok((width, height))
    }

    /// Apply a size change reported by the platform
    ///
    /// Returns false when the disposition ignores resizes.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> bool {
        match self.config.disposition {
            Disposition::Window | Disposition::FullscreenWindow => {
                if self.config.disposition == Disposition::Window {
                    self.windowed_size = (width, height);
                }
                self.config.mode.width = width;
                self.config.mode.height = height;
                true
            }
            other => {
                log::debug!("Ignoring resize to {width}x{height} in {other:?}");
                false
            }
        }
    }

    /// The live configuration
    pub const fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Current disposition
    pub const fn disposition(&self) -> Disposition {
        self.config.disposition
    }

    /// Current surface size
    pub const fn size(&self) -> (u32, u32) {
        (self.config.mode.width, self.config.mode.height)
    }

    /// Size the surface has (or will have again) as a window
    pub const fn windowed_size(&self) -> (u32, u32) {
        self.windowed_size
    }

    /// Current width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.config.mode.aspect_ratio()
    }

    /// Whether the display is exclusively captured
    pub const fn is_captured(&self) -> bool {
        self.captured
    }
}
