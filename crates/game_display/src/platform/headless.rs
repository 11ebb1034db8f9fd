//! Simulated display for tests and display-less hosts
//!
//! `HeadlessPlatform` keeps just enough state to behave like a real display:
//! a mode list, a desktop mode that can be switched and restored, one surface
//! whose size follows presentation changes, and a pixel-format ceiling the
//! "driver" cannot exceed. Every state-changing call is recorded so tests can
//! assert on ordering, and individual steps can be told to fail.

use super::{
    NativeEvent, NativeEventKind, NativeTarget, OffscreenDescriptor, PixelFormat,
    PixelFormatRequest, Platform, PlatformError, PlatformResult, Presentation, SurfaceDescriptor,
};
use crate::render::offscreen::ColourBuffer;
use crate::video::context::GlInfo;
use crate::video::mode::DisplayMode;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Behaviour of a [`HeadlessPlatform`]
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Raw mode list, reported as-is (unsorted, duplicates allowed)
    pub modes: Vec<DisplayMode>,
    /// Mode in use before any switch
    pub desktop_mode: DisplayMode,
    /// Best pixel format the simulated driver can produce
    pub max_pixel_format: PixelFormat,
    /// Driver strings
    pub gl_info: GlInfo,
    /// Mode enumeration fails
    pub fail_mode_list: bool,
    /// Display capture fails
    pub fail_capture: bool,
    /// Mode switches fail
    pub fail_mode_switch: bool,
    /// Surface creation fails
    pub fail_surface: bool,
    /// Context creation fails
    pub fail_context: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            modes: vec![
                DisplayMode::new(1920, 1080, 32),
                DisplayMode::new(1280, 720, 32),
                DisplayMode::new(1024, 768, 32),
                DisplayMode::new(800, 600, 32),
                DisplayMode::new(800, 600, 16),
                DisplayMode::new(640, 480, 32),
                DisplayMode::new(1280, 720, 32),
            ],
            desktop_mode: DisplayMode::new(1920, 1080, 32),
            max_pixel_format: PixelFormat {
                colour_bits: 48,
                alpha_bits: 16,
                depth_bits: 32,
                stencil_bits: 8,
                samples: 8,
            },
            gl_info: GlInfo {
                version: "2.1 Headless".to_string(),
                extensions: "GL_ARB_texture_rectangle GL_ARB_multisample".to_string(),
                vendor: "game_display".to_string(),
                renderer: "Headless".to_string(),
            },
            fail_mode_list: false,
            fail_capture: false,
            fail_mode_switch: false,
            fail_surface: false,
            fail_context: false,
        }
    }
}

/// A recorded platform call
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessCall {
    /// `capture_display`
    CaptureDisplay,
    /// `release_display` while captured
    ReleaseDisplay,
    /// `switch_display_mode`
    SwitchMode(DisplayMode),
    /// `restore_display_mode` while switched
    RestoreMode,
    /// `create_surface`
    CreateSurface(SurfaceDescriptor),
    /// `set_presentation`
    SetPresentation {
        /// New presentation
        presentation: Presentation,
        /// New width
        width: u32,
        /// New height
        height: u32,
        /// Animated transition requested
        animate: bool,
    },
    /// `destroy_surface`
    DestroySurface,
    /// `create_context`
    CreateContext,
    /// `destroy_context`
    DestroyContext,
    /// `set_swap_interval`
    SwapInterval(u32),
    /// `swap_buffers`
    SwapBuffers,
    /// `probe_context_info`
    ProbeContext,
    /// `create_offscreen`
    CreateOffscreen(NativeTarget),
    /// `destroy_offscreen`
    DestroyOffscreen(NativeTarget),
    /// `bind_render_target`
    BindRenderTarget(Option<NativeTarget>),
    /// `copy_to_texture`
    CopyToTexture {
        /// Destination context
        destination: Option<NativeTarget>,
        /// Source buffer
        source: NativeTarget,
        /// Buffer read
        buffer: ColourBuffer,
    },
    /// `warp_cursor`
    WarpCursor(f64, f64),
    /// `set_cursor_visible`
    CursorVisible(bool),
}

/// Which simulated context rendering calls would reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentContext {
    /// Nothing is current
    None,
    /// The primary context
    Primary,
    /// The context of an offscreen buffer
    Offscreen(NativeTarget),
    /// A hidden context used only to read driver strings
    Temporary,
}

#[derive(Debug, Clone)]
struct SimulatedSurface {
    presentation: Presentation,
    width: u32,
    height: u32,
    iconified: bool,
}

/// Simulated display
#[derive(Debug)]
pub struct HeadlessPlatform {
    config: HeadlessConfig,
    current_mode: DisplayMode,
    mode_switched: bool,
    captured: bool,
    surface: Option<SimulatedSurface>,
    context: bool,
    offscreen: HashMap<NativeTarget, OffscreenDescriptor>,
    next_target: u64,
    active_target: Option<NativeTarget>,
    current: CurrentContext,
    fade_level: f32,
    cursor: (f64, f64),
    cursor_visible: bool,
    pending: VecDeque<NativeEvent>,
    forwarded: Vec<NativeEvent>,
    calls: Vec<HeadlessCall>,
    clock: f64,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl HeadlessPlatform {
    /// Create a simulated display
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            current_mode: config.desktop_mode,
            config,
            mode_switched: false,
            captured: false,
            surface: None,
            context: false,
            offscreen: HashMap::new(),
            next_target: 1,
            active_target: None,
            current: CurrentContext::None,
            fade_level: 0.0,
            cursor: (0.0, 0.0),
            cursor_visible: true,
            pending: VecDeque::new(),
            forwarded: Vec::new(),
            calls: Vec::new(),
            clock: 0.0,
        }
    }

    /// Mutable access to the failure switches and caps
    pub fn config_mut(&mut self) -> &mut HeadlessConfig {
        &mut self.config
    }

    /// Calls recorded so far
    pub fn calls(&self) -> &[HeadlessCall] {
        &self.calls
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Mode the simulated display is using
    pub const fn current_mode(&self) -> DisplayMode {
        self.current_mode
    }

    /// Whether the display is captured
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    /// Whether a surface exists
    pub const fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Presentation of the surface, if any
    pub fn presentation(&self) -> Option<Presentation> {
        self.surface.as_ref().map(|s| s.presentation)
    }

    /// Whether the primary context exists
    pub const fn has_context(&self) -> bool {
        self.context
    }

    /// The context that is current right now
    pub const fn current_context(&self) -> CurrentContext {
        self.current
    }

    /// Number of live offscreen buffers
    pub fn offscreen_count(&self) -> usize {
        self.offscreen.len()
    }

    /// Last overlay level applied
    pub const fn fade_level(&self) -> f32 {
        self.fade_level
    }

    /// Whether the cursor is shown
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Events handed back for default handling
    pub fn forwarded(&self) -> &[NativeEvent] {
        &self.forwarded
    }

    /// Queue a native event for the next pump
    pub fn push_event(&mut self, kind: NativeEventKind) {
        self.clock += 0.001;
        self.pending.push_back(NativeEvent::new(self.clock, kind));
    }

    /// Queue a native event with an explicit timestamp
    pub fn push_event_at(&mut self, timestamp: f64, kind: NativeEventKind) {
        self.clock = self.clock.max(timestamp);
        self.pending.push_back(NativeEvent::new(timestamp, kind));
    }

    /// Simulate the user dragging the window to a new size
    pub fn simulate_user_resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.width = width;
            surface.height = height;
        }
        self.push_event(NativeEventKind::Resized { width, height });
    }

    /// Simulate minimising or restoring the window
    pub fn set_iconified(&mut self, iconified: bool) {
        if let Some(surface) = self.surface.as_mut() {
            surface.iconified = iconified;
        }
        self.push_event(NativeEventKind::Iconified(iconified));
    }

    fn negotiate(&self, request: &PixelFormatRequest) -> PixelFormat {
        let max = &self.config.max_pixel_format;
        PixelFormat {
            colour_bits: request.colour_bits.min(max.colour_bits),
            alpha_bits: request.alpha_bits.min(max.alpha_bits),
            depth_bits: request.depth_bits.min(max.depth_bits),
            stencil_bits: request.stencil_bits.min(max.stencil_bits),
            samples: request.samples.min(max.samples),
        }
    }

    /// Make the context rendering is directed to current again
    fn restore_current(&mut self) {
        self.current = match self.active_target {
            Some(target) if self.offscreen.contains_key(&target) => CurrentContext::Offscreen(target),
            _ if self.context => CurrentContext::Primary,
            _ => CurrentContext::None,
        };
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn display_modes(&mut self) -> PlatformResult<Vec<DisplayMode>> {
        if self.config.fail_mode_list {
            return Err(PlatformError::Unavailable("no display attached".to_string()));
        }
        Ok(self.config.modes.clone())
    }

    fn desktop_mode(&mut self) -> PlatformResult<DisplayMode> {
        Ok(self.config.desktop_mode)
    }

    fn capture_display(&mut self) -> PlatformResult<()> {
        if self.config.fail_capture {
            return Err(PlatformError::Native("capture refused".to_string()));
        }
        self.captured = true;
        self.calls.push(HeadlessCall::CaptureDisplay);
        Ok(())
    }

    fn release_display(&mut self) {
        if self.captured {
            self.captured = false;
            self.calls.push(HeadlessCall::ReleaseDisplay);
        }
    }

    fn switch_display_mode(&mut self, mode: &DisplayMode) -> PlatformResult<()> {
        if self.config.fail_mode_switch {
            return Err(PlatformError::Native(format!("mode {mode} rejected")));
        }
        self.current_mode = *mode;
        self.mode_switched = true;
        self.calls.push(HeadlessCall::SwitchMode(*mode));
        Ok(())
    }

    fn restore_display_mode(&mut self) {
        if self.mode_switched {
            self.current_mode = self.config.desktop_mode;
            self.mode_switched = false;
            self.calls.push(HeadlessCall::RestoreMode);
        }
    }

    fn create_surface(&mut self, descriptor: &SurfaceDescriptor) -> PlatformResult<()> {
        if self.config.fail_surface {
            return Err(PlatformError::Native("window server refused".to_string()));
        }
        if self.surface.is_some() {
            return Err(PlatformError::Unsupported("surface already exists".to_string()));
        }
        self.surface = Some(SimulatedSurface {
            presentation: descriptor.presentation,
            width: descriptor.width,
            height: descriptor.height,
            iconified: false,
        });
        self.cursor = (f64::from(descriptor.width / 2), f64::from(descriptor.height / 2));
        self.calls.push(HeadlessCall::CreateSurface(descriptor.clone()));
        Ok(())
    }

    fn set_presentation(
        &mut self,
        presentation: Presentation,
        width: u32,
        height: u32,
        animate: bool,
    ) -> PlatformResult<()> {
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| PlatformError::Unavailable("no surface".to_string()))?;
        surface.presentation = presentation;
        surface.width = width;
        surface.height = height;
        self.calls.push(HeadlessCall::SetPresentation {
            presentation,
            width,
            height,
            animate,
        });
        Ok(())
    }

    fn destroy_surface(&mut self) {
        if self.surface.take().is_some() {
            self.calls.push(HeadlessCall::DestroySurface);
        }
    }

    fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(|s| (s.width, s.height))
    }

    fn surface_visible(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| !s.iconified)
    }

    fn create_context(&mut self, request: &PixelFormatRequest) -> PlatformResult<PixelFormat> {
        if self.surface.is_none() {
            return Err(PlatformError::Unavailable("no surface to attach to".to_string()));
        }
        if self.config.fail_context {
            return Err(PlatformError::Native("no accelerated renderer".to_string()));
        }
        self.context = true;
        self.active_target = None;
        self.current = CurrentContext::Primary;
        self.calls.push(HeadlessCall::CreateContext);
        Ok(self.negotiate(request))
    }

    fn destroy_context(&mut self) {
        if self.context {
            self.context = false;
            self.active_target = None;
            self.current = CurrentContext::None;
            self.calls.push(HeadlessCall::DestroyContext);
        }
    }

    fn set_swap_interval(&mut self, interval: u32) {
        self.calls.push(HeadlessCall::SwapInterval(interval));
    }

    fn swap_buffers(&mut self) {
        self.calls.push(HeadlessCall::SwapBuffers);
    }

    fn context_info(&mut self) -> PlatformResult<GlInfo> {
        if !self.context {
            return Err(PlatformError::Unavailable("no current context".to_string()));
        }
        Ok(self.config.gl_info.clone())
    }

    fn probe_context_info(&mut self, _request: &PixelFormatRequest) -> PlatformResult<GlInfo> {
        if self.config.fail_context {
            return Err(PlatformError::Native("no accelerated renderer".to_string()));
        }
        self.current = CurrentContext::Temporary;
        self.calls.push(HeadlessCall::ProbeContext);
        let info = self.config.gl_info.clone();
        self.restore_current();
        Ok(info)
    }

    fn set_fade_level(&mut self, level: f32) {
        self.fade_level = level;
    }

    fn create_offscreen(
        &mut self,
        descriptor: &OffscreenDescriptor,
        request: &PixelFormatRequest,
    ) -> PlatformResult<(NativeTarget, PixelFormat)> {
        if self.config.fail_context {
            return Err(PlatformError::Native("no accelerated renderer".to_string()));
        }
        let target = NativeTarget(self.next_target);
        self.next_target += 1;
        self.offscreen.insert(target, *descriptor);
        // The new context is current while its format is read.
        self.current = CurrentContext::Offscreen(target);
        let format = self.negotiate(request);
        self.restore_current();
        self.calls.push(HeadlessCall::CreateOffscreen(target));
        Ok((target, format))
    }

    fn destroy_offscreen(&mut self, target: NativeTarget) {
        if self.offscreen.remove(&target).is_some() {
            if self.active_target == Some(target) {
                self.active_target = None;
            }
            self.restore_current();
            self.calls.push(HeadlessCall::DestroyOffscreen(target));
        }
    }

    fn bind_render_target(&mut self, target: Option<NativeTarget>) -> PlatformResult<()> {
        if let Some(target) = target {
            if !self.offscreen.contains_key(&target) {
                return Err(PlatformError::Unavailable(format!("{target:?} is not live")));
            }
        } else if !self.context {
            return Err(PlatformError::Unavailable("no primary context".to_string()));
        }
        self.active_target = target;
        self.restore_current();
        self.calls.push(HeadlessCall::BindRenderTarget(target));
        Ok(())
    }

    fn copy_to_texture(
        &mut self,
        destination: Option<NativeTarget>,
        source: NativeTarget,
        buffer: ColourBuffer,
    ) -> PlatformResult<()> {
        if !self.offscreen.contains_key(&source) {
            // A real driver would read freed memory here.
            return Err(PlatformError::Unavailable(format!("{source:?} is not live")));
        }
        self.current = CurrentContext::Offscreen(source);
        self.calls.push(HeadlessCall::CopyToTexture {
            destination,
            source,
            buffer,
        });
        self.restore_current();
        Ok(())
    }

    fn pump_events(&mut self) -> Vec<NativeEvent> {
        self.pending.drain(..).collect()
    }

    fn wait_events(&mut self, timeout: Duration) {
        if self.pending.is_empty() {
            std::thread::sleep(timeout);
        }
    }

    fn forward_event(&mut self, event: &NativeEvent) {
        self.forwarded.push(event.clone());
    }

    fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    fn warp_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
        self.calls.push(HeadlessCall::WarpCursor(x, y));
        // Hosts report programmatic cursor moves like user ones.
        self.push_event(NativeEventKind::MouseMoved { x, y });
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
        self.calls.push(HeadlessCall::CursorVisible(visible));
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_switch_and_restore() {
        let mut platform = HeadlessPlatform::default();
        let mode = DisplayMode::new(800, 600, 16);
        platform.switch_display_mode(&mode).unwrap();
        assert_eq!(platform.current_mode(), mode);
        platform.restore_display_mode();
        platform.restore_display_mode();
        assert_eq!(platform.current_mode(), DisplayMode::new(1920, 1080, 32));
        assert_eq!(
            platform.calls(),
            &[HeadlessCall::SwitchMode(mode), HeadlessCall::RestoreMode]
        );
    }

    #[test]
    fn test_negotiation_is_capped() {
        let mut config = HeadlessConfig::default();
        config.max_pixel_format.depth_bits = 16;
        let platform = HeadlessPlatform::new(config);
        let format = platform.negotiate(&PixelFormatRequest {
            colour_bits: 24,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            samples: 4,
        });
        assert_eq!(format.depth_bits, 16);
        assert_eq!(format.samples, 4);
    }

    #[test]
    fn test_driver_query_restores_current_context() {
        let mut platform = HeadlessPlatform::default();
        let request = PixelFormatRequest::default();
        platform.probe_context_info(&request).unwrap();
        assert_eq!(platform.current_context(), CurrentContext::None);

        platform
            .create_surface(&SurfaceDescriptor {
                title: String::new(),
                width: 320,
                height: 240,
                presentation: Presentation::Windowed,
                resizable: false,
            })
            .unwrap();
        platform.create_context(&request).unwrap();
        platform.probe_context_info(&request).unwrap();
        assert_eq!(platform.current_context(), CurrentContext::Primary);
    }

    #[test]
    fn test_context_requires_surface() {
        let mut platform = HeadlessPlatform::default();
        assert!(platform.create_context(&PixelFormatRequest::default()).is_err());
    }
}
