//! GLFW backend
//!
//! GLFW creates a window and its OpenGL context in one call, so the native
//! window is created lazily: `create_surface` records the descriptor and
//! `create_context` brings up window and context together with the requested
//! pixel-format hints. Mode switches happen by giving the window a monitor at
//! the target resolution; GLFW restores the desktop mode itself when the
//! window leaves fullscreen or is destroyed.
//!
//! Fades are applied to the primary monitor's gamma ramp. Offscreen targets
//! are hidden windows sharing the primary context.

mod gl;
mod keymap;

use super::{
    NativeEvent, NativeTarget, OffscreenDescriptor, PixelFormat, PixelFormatRequest, Platform,
    PlatformError, PlatformResult, Presentation, SurfaceDescriptor,
};
use crate::core::config::WindowLevel;
use crate::render::offscreen::ColourBuffer;
use crate::video::context::GlInfo;
use crate::video::mode::DisplayMode;
use gl::GlFunctions;
use glfw::Context;
use std::collections::HashMap;
use std::time::Duration;

type EventReceiver = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {error:?}: {description}");
}

fn mode_from_vidmode(mode: &glfw::VidMode) -> DisplayMode {
    let colour = mode.red_bits + mode.green_bits + mode.blue_bits;
    DisplayMode::new(mode.width, mode.height, if colour > 16 { 32 } else { 16 })
}

fn apply_pixel_format_hints(glfw: &mut glfw::Glfw, request: &PixelFormatRequest, visible: bool) {
    // A zero minimum leaves the channel to the driver.
    let bits = |value: u32| (value > 0).then_some(value);
    let per_channel = bits(request.colour_bits / 3);
    glfw.default_window_hints();
    glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
    glfw.window_hint(glfw::WindowHint::RedBits(per_channel));
    glfw.window_hint(glfw::WindowHint::GreenBits(per_channel));
    glfw.window_hint(glfw::WindowHint::BlueBits(per_channel));
    glfw.window_hint(glfw::WindowHint::AlphaBits(bits(request.alpha_bits)));
    glfw.window_hint(glfw::WindowHint::DepthBits(Some(request.depth_bits)));
    glfw.window_hint(glfw::WindowHint::StencilBits(Some(request.stencil_bits)));
    glfw.window_hint(glfw::WindowHint::Samples(Some(request.samples)));
    glfw.window_hint(glfw::WindowHint::Visible(visible));
}

#[derive(Debug, Clone)]
struct SavedGammaRamp {
    red: Vec<u16>,
    green: Vec<u16>,
    blue: Vec<u16>,
}

impl SavedGammaRamp {
    fn scaled(&self, factor: f32) -> glfw::GammaRamp {
        let scale = |channel: &[u16]| -> Vec<u16> {
            channel
                .iter()
                .map(|&v| (f32::from(v) * factor).round() as u16)
                .collect()
        };
        glfw::GammaRamp {
            red: scale(&self.red),
            green: scale(&self.green),
            blue: scale(&self.blue),
        }
    }
}

struct OffscreenWindow {
    window: glfw::PWindow,
    _events: EventReceiver,
    descriptor: OffscreenDescriptor,
}

/// Platform backed by GLFW windows, monitors and OpenGL contexts
pub struct GlfwPlatform {
    glfw: glfw::Glfw,
    pending_surface: Option<SurfaceDescriptor>,
    window: Option<glfw::PWindow>,
    events: Option<EventReceiver>,
    presentation: Presentation,
    windowed_pos: (i32, i32),
    gl: Option<GlFunctions>,
    offscreen: HashMap<NativeTarget, OffscreenWindow>,
    next_target: u64,
    active_target: Option<NativeTarget>,
    saved_gamma: Option<SavedGammaRamp>,
    fade_level: f32,
    target_mode: Option<DisplayMode>,
    captured: bool,
}

impl GlfwPlatform {
    /// Initialise GLFW
    pub fn new() -> PlatformResult<Self> {
        let glfw = glfw::init(log_glfw_error)
            .map_err(|e| PlatformError::InitializationFailed(format!("{e:?}")))?;
        log::info!("GLFW {} initialised", glfw::get_version_string());
        Ok(Self {
            glfw,
            pending_surface: None,
            window: None,
            events: None,
            presentation: Presentation::Windowed,
            windowed_pos: (64, 64),
            gl: None,
            offscreen: HashMap::new(),
            next_target: 1,
            active_target: None,
            saved_gamma: None,
            fade_level: 0.0,
            target_mode: None,
            captured: false,
        })
    }

    fn primary_window(&mut self) -> PlatformResult<&mut glfw::PWindow> {
        self.window
            .as_mut()
            .ok_or_else(|| PlatformError::Unavailable("no primary window".to_string()))
    }

    fn gl(&self) -> PlatformResult<GlFunctions> {
        self.gl
            .ok_or_else(|| PlatformError::Unavailable("no OpenGL context".to_string()))
    }

    /// Make the context rendering is directed to current again
    fn restore_current(&mut self) {
        let window = match self.active_target {
            Some(target) => self.offscreen.get_mut(&target).map(|o| &mut o.window),
            None => self.window.as_mut(),
        };
        if let Some(window) = window {
            window.make_current();
        }
    }

    fn fullscreen_size(&self, descriptor: &SurfaceDescriptor) -> (u32, u32) {
        self.target_mode
            .map_or((descriptor.width, descriptor.height), |m| (m.width, m.height))
    }

    fn create_primary_window(
        &mut self,
        descriptor: &SurfaceDescriptor,
    ) -> PlatformResult<(glfw::PWindow, EventReceiver)> {
        let title = descriptor.title.as_str();
        let created = match descriptor.presentation {
            Presentation::Windowed => {
                self.glfw
                    .window_hint(glfw::WindowHint::Resizable(descriptor.resizable));
                self.glfw
                    .create_window(descriptor.width, descriptor.height, title, glfw::WindowMode::Windowed)
                    .map(|(mut window, events)| {
                        window.set_pos(self.windowed_pos.0, self.windowed_pos.1);
                        (window, events)
                    })
            }
            Presentation::FullscreenWindow { level } => {
                self.glfw.window_hint(glfw::WindowHint::Decorated(false));
                self.glfw
                    .window_hint(glfw::WindowHint::Floating(level != WindowLevel::Default));
                let origin = self
                    .glfw
                    .with_primary_monitor(|_, monitor| monitor.map_or((0, 0), |m| m.get_pos()));
                self.glfw
                    .create_window(descriptor.width, descriptor.height, title, glfw::WindowMode::Windowed)
                    .map(|(mut window, events)| {
                        window.set_pos(origin.0, origin.1);
                        (window, events)
                    })
            }
            Presentation::FullscreenDisplay => {
                let (width, height) = self.fullscreen_size(descriptor);
                self.glfw.with_primary_monitor(|glfw, monitor| {
                    let monitor = monitor?;
                    glfw.create_window(width, height, title, glfw::WindowMode::FullScreen(&*monitor))
                })
            }
        };
        created.ok_or_else(|| PlatformError::Native("window creation failed".to_string()))
    }
}

impl Platform for GlfwPlatform {
    fn name(&self) -> &'static str {
        "glfw"
    }

    fn display_modes(&mut self) -> PlatformResult<Vec<DisplayMode>> {
        self.glfw
            .with_primary_monitor(|_, monitor| {
                monitor.map(|m| m.get_video_modes().iter().map(mode_from_vidmode).collect::<Vec<_>>())
            })
            .ok_or_else(|| PlatformError::Unavailable("no primary monitor".to_string()))
    }

    fn desktop_mode(&mut self) -> PlatformResult<DisplayMode> {
        self.glfw
            .with_primary_monitor(|_, monitor| monitor.and_then(|m| m.get_video_mode()))
            .map(|mode| mode_from_vidmode(&mode))
            .ok_or_else(|| PlatformError::Unavailable("no primary monitor".to_string()))
    }

    fn capture_display(&mut self) -> PlatformResult<()> {
        // A fullscreen GLFW window already owns its monitor.
        self.captured = true;
        log::debug!("Display captured");
        Ok(())
    }

    fn release_display(&mut self) {
        if self.captured {
            self.captured = false;
            log::debug!("Display released");
        }
    }

    fn switch_display_mode(&mut self, mode: &DisplayMode) -> PlatformResult<()> {
        let supported = self.display_modes()?.iter().any(|m| m.same_size(mode));
        if !supported {
            return Err(PlatformError::Unsupported(format!("{mode} is not offered by the monitor")));
        }
        self.target_mode = Some(*mode);
        Ok(())
    }

    fn restore_display_mode(&mut self) {
        if self.target_mode.take().is_some() {
            if let Some(window) = self.window.as_mut() {
                let (width, height) = window.get_size();
                window.set_monitor(
                    glfw::WindowMode::Windowed,
                    self.windowed_pos.0,
                    self.windowed_pos.1,
                    width.max(1) as u32,
                    height.max(1) as u32,
                    None,
                );
            }
        }
    }

    fn create_surface(&mut self, descriptor: &SurfaceDescriptor) -> PlatformResult<()> {
        if self.pending_surface.is_some() || self.window.is_some() {
            return Err(PlatformError::Unsupported("surface already exists".to_string()));
        }
        self.presentation = descriptor.presentation;
        self.pending_surface = Some(descriptor.clone());
        Ok(())
    }

    fn set_presentation(
        &mut self,
        presentation: Presentation,
        width: u32,
        height: u32,
        animate: bool,
    ) -> PlatformResult<()> {
        if animate {
            log::debug!("GLFW has no animated fullscreen transition, switching directly");
        }
        if let Some(pending) = self.pending_surface.as_mut() {
            pending.presentation = presentation;
            pending.width = width;
            pending.height = height;
        }
        let previous = self.presentation;
        let Some(window) = self.window.as_mut() else {
            self.presentation = presentation;
            return Ok(());
        };

        if previous == Presentation::Windowed {
            self.windowed_pos = window.get_pos();
        }
        match presentation {
            Presentation::Windowed => {
                window.set_decorated(true);
                window.set_floating(false);
                window.set_monitor(
                    glfw::WindowMode::Windowed,
                    self.windowed_pos.0,
                    self.windowed_pos.1,
                    width,
                    height,
                    None,
                );
            }
            Presentation::FullscreenWindow { level } => {
                let origin = self
                    .glfw
                    .with_primary_monitor(|_, monitor| monitor.map_or((0, 0), |m| m.get_pos()));
                window.set_decorated(false);
                window.set_floating(level != WindowLevel::Default);
                window.set_monitor(glfw::WindowMode::Windowed, origin.0, origin.1, width, height, None);
            }
            Presentation::FullscreenDisplay => {
                self.glfw.with_primary_monitor(|_, monitor| {
                    monitor
                        .map(|m| window.set_monitor(glfw::WindowMode::FullScreen(&*m), 0, 0, width, height, None))
                        .ok_or_else(|| PlatformError::Unavailable("no primary monitor".to_string()))
                })?;
            }
        }
        self.presentation = presentation;
        Ok(())
    }

    fn destroy_surface(&mut self) {
        self.pending_surface = None;
        self.events = None;
        if self.window.take().is_some() {
            log::debug!("GLFW window destroyed");
        }
    }

    fn surface_size(&self) -> Option<(u32, u32)> {
        match self.window.as_ref() {
            Some(window) => {
                let (width, height) = window.get_size();
                Some((width.max(0) as u32, height.max(0) as u32))
            }
            None => self.pending_surface.as_ref().map(|d| (d.width, d.height)),
        }
    }

    fn surface_visible(&self) -> bool {
        self.window
            .as_ref()
            .is_some_and(|w| w.is_visible() && !w.is_iconified())
    }

    fn create_context(&mut self, request: &PixelFormatRequest) -> PlatformResult<PixelFormat> {
        let descriptor = self
            .pending_surface
            .clone()
            .ok_or_else(|| PlatformError::Unavailable("no surface to attach to".to_string()))?;
        if self.window.is_some() {
            return Err(PlatformError::Unsupported("context already exists".to_string()));
        }

        apply_pixel_format_hints(&mut self.glfw, request, true);
        let (mut window, events) = self.create_primary_window(&descriptor)?;
        window.make_current();
        window.set_all_polling(true);

        let gl = GlFunctions::load(&mut window)?;
        let format = gl.pixel_format();
        log::info!("GLFW window created with {format:?}");

        self.gl = Some(gl);
        self.window = Some(window);
        self.events = Some(events);
        self.active_target = None;
        Ok(format)
    }

    fn destroy_context(&mut self) {
        // The context dies with the window; keep the descriptor so a new
        // context can be created for the same surface.
        if let Some(window) = self.window.take() {
            let (width, height) = window.get_size();
            if let Some(pending) = self.pending_surface.as_mut() {
                pending.width = width.max(1) as u32;
                pending.height = height.max(1) as u32;
                pending.presentation = self.presentation;
            }
        }
        self.events = None;
        self.gl = None;
        self.active_target = None;
    }

    fn set_swap_interval(&mut self, interval: u32) {
        let interval = match interval {
            0 => glfw::SwapInterval::None,
            n => glfw::SwapInterval::Sync(n),
        };
        self.glfw.set_swap_interval(interval);
    }

    fn swap_buffers(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.swap_buffers();
        }
    }

    fn context_info(&mut self) -> PlatformResult<GlInfo> {
        Ok(self.gl()?.info())
    }

    fn probe_context_info(&mut self, request: &PixelFormatRequest) -> PlatformResult<GlInfo> {
        apply_pixel_format_hints(&mut self.glfw, request, false);
        let (mut probe, _events) = self
            .glfw
            .create_window(16, 16, "probe", glfw::WindowMode::Windowed)
            .ok_or_else(|| PlatformError::Native("probe context creation failed".to_string()))?;
        probe.make_current();
        let info = GlFunctions::load(&mut probe).map(|gl| gl.info());
        drop(probe);
        self.restore_current();
        info
    }

    fn set_fade_level(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        if (level - self.fade_level).abs() < f32::EPSILON {
            return;
        }
        self.fade_level = level;

        if level <= 0.0 {
            if let Some(saved) = self.saved_gamma.take() {
                self.glfw.with_primary_monitor(|_, monitor| {
                    if let Some(monitor) = monitor {
                        monitor.set_gamma_ramp(&mut saved.scaled(1.0));
                    }
                });
            }
            return;
        }

        let saved = &mut self.saved_gamma;
        self.glfw.with_primary_monitor(|_, monitor| {
            let Some(monitor) = monitor else { return };
            let original = saved.get_or_insert_with(|| {
                let ramp = monitor.get_gamma_ramp();
                SavedGammaRamp {
                    red: ramp.red,
                    green: ramp.green,
                    blue: ramp.blue,
                }
            });
            monitor.set_gamma_ramp(&mut original.scaled(1.0 - level));
        });
    }

    fn create_offscreen(
        &mut self,
        descriptor: &OffscreenDescriptor,
        request: &PixelFormatRequest,
    ) -> PlatformResult<(NativeTarget, PixelFormat)> {
        let gl = self.gl()?;
        apply_pixel_format_hints(&mut self.glfw, request, false);
        let primary = self.primary_window()?;
        let (mut window, events) = primary
            .create_shared(descriptor.width, descriptor.height, "offscreen", glfw::WindowMode::Windowed)
            .ok_or_else(|| PlatformError::Native("offscreen context creation failed".to_string()))?;
        window.make_current();
        let format = gl.pixel_format();
        self.restore_current();

        let target = NativeTarget(self.next_target);
        self.next_target += 1;
        self.offscreen.insert(
            target,
            OffscreenWindow {
                window,
                _events: events,
                descriptor: *descriptor,
            },
        );
        Ok((target, format))
    }

    fn destroy_offscreen(&mut self, target: NativeTarget) {
        if self.offscreen.remove(&target).is_some() && self.active_target == Some(target) {
            self.active_target = None;
            self.restore_current();
        }
    }

    fn bind_render_target(&mut self, target: Option<NativeTarget>) -> PlatformResult<()> {
        match target {
            Some(target) => {
                let offscreen = self
                    .offscreen
                    .get_mut(&target)
                    .ok_or_else(|| PlatformError::Unavailable(format!("{target:?} is not live")))?;
                offscreen.window.make_current();
            }
            None => self.primary_window()?.make_current(),
        }
        self.active_target = target;
        Ok(())
    }

    fn copy_to_texture(
        &mut self,
        destination: Option<NativeTarget>,
        source: NativeTarget,
        buffer: ColourBuffer,
    ) -> PlatformResult<()> {
        let gl = self.gl()?;
        let source_window = self
            .offscreen
            .get_mut(&source)
            .ok_or_else(|| PlatformError::Unavailable(format!("{source:?} is not live")))?;
        let descriptor = source_window.descriptor;
        source_window.window.make_current();
        let pixels = gl.read_pixels(buffer, descriptor.width, descriptor.height);

        let destination_window = match destination {
            Some(target) => self.offscreen.get_mut(&target).map(|o| &mut o.window),
            None => self.window.as_mut(),
        };
        let result = match destination_window {
            Some(window) => {
                window.make_current();
                gl.upload(
                    descriptor.target,
                    descriptor.internal_format,
                    descriptor.width,
                    descriptor.height,
                    &pixels,
                );
                Ok(())
            }
            None => Err(PlatformError::Unavailable("texture destination is not live".to_string())),
        };
        self.restore_current();
        result
    }

    fn pump_events(&mut self) -> Vec<NativeEvent> {
        self.glfw.poll_events();
        let (Some(events), Some(window)) = (self.events.as_ref(), self.window.as_ref()) else {
            return Vec::new();
        };
        let cursor = window.get_cursor_pos();
        glfw::flush_messages(events)
            .map(|(timestamp, event)| keymap::translate(timestamp, event, cursor))
            .collect()
    }

    fn wait_events(&mut self, timeout: Duration) {
        self.glfw.wait_events_timeout(timeout.as_secs_f64());
    }

    fn forward_event(&mut self, event: &NativeEvent) {
        log::trace!("Unhandled native event {:?}", event.kind);
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.window
            .as_ref()
            .map_or((0.0, 0.0), |window| window.get_cursor_pos())
    }

    fn warp_cursor(&mut self, x: f64, y: f64) {
        if let Some(window) = self.window.as_mut() {
            window.set_cursor_pos(x, y);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(window) = self.window.as_mut() {
            window.set_cursor_mode(if visible {
                glfw::CursorMode::Normal
            } else {
                glfw::CursorMode::Hidden
            });
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

impl Drop for GlfwPlatform {
    fn drop(&mut self) {
        // Never leave the monitor dark.
        self.set_fade_level(0.0);
    }
}
