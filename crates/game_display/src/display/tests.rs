use super::*;
use crate::core::config::{Disposition, GlConfig, VideoConfig};
use crate::error::ErrorKind;
use crate::input::{Event, Key, Modifiers};
use crate::foundation::logging::TRACE_SWITCH_LOCK;
use crate::platform::{
    CurrentContext, HeadlessCall, HeadlessConfig, HeadlessPlatform, KeyAction, NativeEventKind, NativeTarget,
    Platform, Presentation,
};
use crate::render::{ColourBuffer, FadeState, InternalFormat, RedrawReason, RedrawRequest, TextureBinding, TextureTarget};
use approx::assert_relative_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn display_with(config: HeadlessConfig) -> Display {
    let mut display = Display::new(Box::new(HeadlessPlatform::new(config)));
    display.init().unwrap();
    display
}

fn headless(display: &Display) -> &HeadlessPlatform {
    display.platform_ref::<HeadlessPlatform>().unwrap()
}

fn headless_mut(display: &mut Display) -> &mut HeadlessPlatform {
    display.platform_mut::<HeadlessPlatform>().unwrap()
}

fn windowed_display() -> Display {
    let mut display = display_with(HeadlessConfig::default());
    display.init_video(&VideoConfig::windowed(800, 600)).unwrap();
    display.init_gl(&GlConfig::default()).unwrap();
    display
}

fn set_mode_config(width: u32, height: u32) -> VideoConfig {
    VideoConfig::default()
        .with_disposition(Disposition::FullscreenSetMode)
        .with_mode(DisplayMode::new(width, height, 32))
}

fn record_redraws(display: &mut Display) -> Rc<RefCell<Vec<RedrawRequest>>> {
    let redraws = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&redraws);
    display.set_draw_callback(move |request| sink.borrow_mut().push(*request));
    redraws
}

fn count_calls(display: &Display, wanted: &HeadlessCall) -> usize {
    headless(display).calls().iter().filter(|call| *call == wanted).count()
}

fn drain(display: &mut Display) -> Vec<Event> {
    std::iter::from_fn(|| display.dequeue_event()).collect()
}

thread_local! {
    static LOGGED_ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Collects error records per test thread
struct ErrorCapture;

impl log::Log for ErrorCapture {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::Level::Error
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            LOGGED_ERRORS.with(|errors| errors.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static ERROR_CAPTURE: ErrorCapture = ErrorCapture;

fn capture_errors() {
    if log::set_logger(&ERROR_CAPTURE).is_ok() {
        log::set_max_level(log::LevelFilter::Error);
    }
    LOGGED_ERRORS.with(|errors| errors.borrow_mut().clear());
}

fn logged_errors() -> Vec<String> {
    LOGGED_ERRORS.with(|errors| errors.borrow().clone())
}

fn created_native_target(display: &Display) -> NativeTarget {
    headless(display)
        .calls()
        .iter()
        .rev()
        .find_map(|call| match call {
            HeadlessCall::CreateOffscreen(target) => Some(*target),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_init_builds_unique_catalog_largest_first() {
    let display = display_with(HeadlessConfig::default());
    assert_eq!(display.phase(), Phase::Initialized);
    assert_eq!(display.mode_count(), 6);

    let modes = display.mode_list();
    for pair in modes.windows(2) {
        assert!(pair[0].area() >= pair[1].area());
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(display.mode(0).unwrap(), DisplayMode::new(1920, 1080, 32));
    assert_eq!(
        display.mode(6).map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    assert_eq!(display.startup_mode().unwrap(), DisplayMode::new(1920, 1080, 32));
    assert_relative_eq!(display.startup_aspect_ratio().unwrap(), 16.0 / 9.0, epsilon = 1e-5);
}

#[test]
fn test_operations_before_init_are_rejected() {
    let mut display = Display::new(Box::new(HeadlessPlatform::default()));
    assert_eq!(display.phase(), Phase::Uninitialized);
    assert_eq!(
        display.init_video(&VideoConfig::default()).map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    assert!(display.startup_mode().is_err());
    assert_eq!(
        display.begin_render().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );

    display.init().unwrap();
    assert_eq!(display.init().map_err(|e| e.kind()), Err(ErrorKind::ContractViolation));
}

#[test]
fn test_mode_list_failure_fails_init() {
    let config = HeadlessConfig {
        fail_mode_list: true,
        ..HeadlessConfig::default()
    };
    let mut display = Display::new(Box::new(HeadlessPlatform::new(config)));
    let err = display.init().unwrap_err();
    assert!(matches!(err, DisplayError::ModeList(_)));
    assert_eq!(err.kind(), ErrorKind::Initialization);
    assert_eq!(display.phase(), Phase::Uninitialized);
}

#[test]
fn test_closest_matching_decides_set_mode_init() {
    let mut display = display_with(HeadlessConfig::default());

    let strict = set_mode_config(1000, 700).with_accept_closest_mode(false);
    let err = display.init_video(&strict).unwrap_err();
    assert!(matches!(err, DisplayError::NoMatchingMode { .. }));
    assert!(!headless(&display).has_surface());
    assert_eq!(display.disposition(), Disposition::None);
    assert_relative_eq!(headless(&display).fade_level(), 0.0);

    let lenient = set_mode_config(1000, 700).with_accept_closest_mode(true);
    display.init_video(&lenient).unwrap();
    assert_eq!(headless(&display).current_mode(), DisplayMode::new(1024, 768, 32));
    assert_eq!(display.video_config().unwrap().mode, DisplayMode::new(1024, 768, 32));
    assert_eq!(display.disposition(), Disposition::FullscreenSetMode);
}

#[test]
fn test_mode_switch_failure_releases_capture() {
    let mut display = display_with(HeadlessConfig {
        fail_mode_switch: true,
        ..HeadlessConfig::default()
    });
    let err = display.init_video(&set_mode_config(1280, 720)).unwrap_err();
    assert!(matches!(err, DisplayError::ModeSwitch { .. }));

    let platform = headless(&display);
    assert_eq!(
        platform.calls(),
        &[HeadlessCall::CaptureDisplay, HeadlessCall::ReleaseDisplay]
    );
    assert!(!platform.is_captured());
    assert_eq!(platform.current_mode(), DisplayMode::new(1920, 1080, 32));
}

#[test]
fn test_surface_failure_restores_mode_then_capture() {
    let mut display = display_with(HeadlessConfig {
        fail_surface: true,
        ..HeadlessConfig::default()
    });
    let err = display.init_video(&set_mode_config(1280, 720)).unwrap_err();
    assert!(matches!(err, DisplayError::SurfaceCreation(_)));

    let platform = headless(&display);
    assert_eq!(
        platform.calls(),
        &[
            HeadlessCall::CaptureDisplay,
            HeadlessCall::SwitchMode(DisplayMode::new(1280, 720, 32)),
            HeadlessCall::RestoreMode,
            HeadlessCall::ReleaseDisplay,
        ]
    );
    assert_eq!(platform.current_mode(), DisplayMode::new(1920, 1080, 32));
    assert_relative_eq!(platform.fade_level(), 0.0);
}

#[test]
fn test_context_failure_tears_down_surface() {
    let mut display = display_with(HeadlessConfig {
        fail_context: true,
        ..HeadlessConfig::default()
    });
    display.init_video(&set_mode_config(1280, 720)).unwrap();
    let err = display.init_gl(&GlConfig::default()).unwrap_err();
    assert!(matches!(err, DisplayError::ContextCreation(_)));

    let platform = headless(&display);
    assert!(!platform.has_surface());
    assert!(!platform.is_captured());
    assert_eq!(platform.current_mode(), DisplayMode::new(1920, 1080, 32));
    assert_eq!(display.disposition(), Disposition::None);
}

#[test]
fn test_pixel_format_below_minimum_is_rejected() {
    let mut config = HeadlessConfig::default();
    config.max_pixel_format.depth_bits = 16;
    let mut display = display_with(config);
    display.init_video(&VideoConfig::windowed(640, 480)).unwrap();

    let err = display.init_gl(&GlConfig::default()).unwrap_err();
    assert!(matches!(err, DisplayError::PixelFormatUnavailable(_)));
    assert!(!headless(&display).has_context());

    // A request the driver can satisfy succeeds once the surface is back.
    display.init_video(&VideoConfig::windowed(640, 480)).unwrap();
    let relaxed = GlConfig {
        depth_bits: 16,
        ..GlConfig::default()
    };
    display.init_gl(&relaxed).unwrap();
    assert_eq!(display.gl_config().unwrap().depth_bits, 16);
}

#[test]
fn test_frame_pairing_violations() {
    let mut display = windowed_display();
    assert_eq!(display.end_render().map_err(|e| e.kind()), Err(ErrorKind::ContractViolation));
    assert_eq!(
        display.discard_render().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );

    assert!(display.begin_render().unwrap());
    assert_eq!(
        display.begin_render().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    display.end_render().unwrap();
    assert_eq!(count_calls(&display, &HeadlessCall::SwapBuffers), 1);

    assert!(display.begin_render().unwrap());
    display.discard_render().unwrap();
    assert!(!display.in_frame());
    assert_eq!(count_calls(&display, &HeadlessCall::SwapBuffers), 1);
    assert_eq!(display.frame_stats().frame_count, 1);
}

#[test]
fn test_nested_begin_render_is_logged_and_keeps_frame_open() {
    capture_errors();
    let mut display = windowed_display();
    assert!(display.begin_render().unwrap());
    assert_eq!(
        display.begin_render().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    assert!(display.in_frame());
    assert!(logged_errors()
        .iter()
        .any(|line| line.contains("begin_render called twice")));

    display.end_render().unwrap();
    assert!(!display.in_frame());
    assert_eq!(count_calls(&display, &HeadlessCall::SwapBuffers), 1);
}

#[test]
fn test_begin_render_requires_context() {
    let mut display = display_with(HeadlessConfig::default());
    display.init_video(&VideoConfig::windowed(640, 480)).unwrap();
    assert_eq!(
        display.begin_render().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
}

#[test]
fn test_begin_render_skips_minimised_surface() {
    let mut display = windowed_display();
    headless_mut(&mut display).set_iconified(true);
    display.poll();
    assert!(!display.begin_render().unwrap());
    assert!(!display.in_frame());

    headless_mut(&mut display).set_iconified(false);
    display.poll();
    assert!(display.begin_render().unwrap());
    display.end_render().unwrap();
}

#[test]
fn test_begin_render_skips_inactive_fullscreen_only() {
    let mut windowed = windowed_display();
    headless_mut(&mut windowed).push_event(NativeEventKind::Focus(false));
    windowed.poll();
    assert!(!windowed.is_app_active());
    assert!(windowed.begin_render().unwrap());
    windowed.discard_render().unwrap();

    let mut fullscreen = display_with(HeadlessConfig::default());
    fullscreen
        .init_video(&VideoConfig::default().with_disposition(Disposition::Fullscreen))
        .unwrap();
    fullscreen.init_gl(&GlConfig::default()).unwrap();
    headless_mut(&mut fullscreen).push_event(NativeEventKind::Focus(false));
    fullscreen.poll();
    assert!(!fullscreen.begin_render().unwrap());

    headless_mut(&mut fullscreen).push_event(NativeEventKind::Focus(true));
    fullscreen.poll();
    assert!(fullscreen.begin_render().unwrap());
    fullscreen.end_render().unwrap();
}

#[test]
fn test_fade_requests_are_idempotent() {
    let mut display = windowed_display();
    display.set_fade_time(0.0);

    display.fade_from_black();
    assert_eq!(display.fade_state(), FadeState::Visible);

    display.fade_to_black();
    assert_eq!(display.fade_state(), FadeState::Black);
    display.fade_to_black();
    assert_eq!(display.fade_state(), FadeState::Black);

    assert!(display.begin_render().unwrap());
    display.end_render().unwrap();
    assert_relative_eq!(headless(&display).fade_level(), 1.0);

    display.fade_from_black();
    assert!(display.begin_render().unwrap());
    display.end_render().unwrap();
    assert_relative_eq!(headless(&display).fade_level(), 0.0);
}

#[test]
fn test_fade_in_progress_reports_fading() {
    let mut display = windowed_display();
    display.set_fade_time(10.0);
    assert_relative_eq!(display.fade_time(), 10.0);
    display.fade_to_black();
    assert!(display.is_fading());
    assert_eq!(display.fade_state(), FadeState::FadingOut);
    display.fade_to_black();
    assert_eq!(display.fade_state(), FadeState::FadingOut);
}

#[test]
fn test_fullscreen_init_starts_black_and_fades_in() {
    let mut display = display_with(HeadlessConfig::default());
    display.set_fade_time(0.0);
    display
        .init_video(&VideoConfig::default().with_disposition(Disposition::Fullscreen))
        .unwrap();
    assert_relative_eq!(headless(&display).fade_level(), 1.0);
    assert!(headless(&display).is_captured());

    display.init_gl(&GlConfig::default()).unwrap();
    assert!(display.begin_render().unwrap());
    display.end_render().unwrap();
    assert_relative_eq!(headless(&display).fade_level(), 0.0);

    let mut slow = display_with(HeadlessConfig::default());
    slow.init_video(&VideoConfig::default().with_disposition(Disposition::Fullscreen))
        .unwrap();
    assert_eq!(slow.fade_state(), FadeState::FadingIn);
}

#[test]
fn test_double_toggle_restores_windowed_size_without_new_context() {
    let mut display = windowed_display();
    let redraws = record_redraws(&mut display);

    display.toggle_fullscreen_window().unwrap();
    assert_eq!(display.disposition(), Disposition::FullscreenWindow);
    assert_eq!(display.surface_size(), Some((1920, 1080)));
    assert_eq!(
        headless(&display).presentation(),
        Some(Presentation::FullscreenWindow {
            level: Default::default()
        })
    );

    display.toggle_fullscreen_window().unwrap();
    assert_eq!(display.disposition(), Disposition::Window);
    assert_eq!(display.surface_size(), Some((800, 600)));
    assert_eq!(display.window_dimensions(), Some((800, 600)));
    assert_eq!(count_calls(&display, &HeadlessCall::CreateContext), 1);

    let redraws = redraws.borrow();
    assert_eq!(redraws.len(), 2);
    assert!(redraws.iter().all(|r| r.reason == RedrawReason::FullscreenToggle));
    assert_eq!((redraws[1].width, redraws[1].height), (800, 600));
}

#[test]
fn test_toggle_rejected_mid_frame_and_from_fullscreen() {
    let mut display = windowed_display();
    assert!(display.begin_render().unwrap());
    assert_eq!(
        display.toggle_fullscreen_window().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    display.end_render().unwrap();
    assert_eq!(display.disposition(), Disposition::Window);

    let mut fullscreen = display_with(HeadlessConfig::default());
    fullscreen.init_video(&set_mode_config(1280, 720)).unwrap();
    assert_eq!(
        fullscreen.toggle_fullscreen_window().map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
}

#[test]
fn test_resize_in_window_redraws_without_event() {
    let mut display = windowed_display();
    let redraws = record_redraws(&mut display);

    headless_mut(&mut display).simulate_user_resize(1024, 700);
    display.poll();

    assert_eq!(display.surface_size(), Some((1024, 700)));
    assert_eq!(display.window_dimensions(), Some((1024, 700)));
    assert_eq!(display.pending_events(), 0);
    assert_eq!(
        *redraws.borrow(),
        vec![RedrawRequest {
            reason: RedrawReason::Resize,
            width: 1024,
            height: 700,
        }]
    );
}

#[test]
fn test_resize_ignored_in_set_mode() {
    let mut display = display_with(HeadlessConfig::default());
    display.init_video(&set_mode_config(1280, 720)).unwrap();
    display.init_gl(&GlConfig::default()).unwrap();
    let redraws = record_redraws(&mut display);

    headless_mut(&mut display).simulate_user_resize(640, 480);
    display.poll();

    assert_eq!(display.surface_size(), Some((1280, 720)));
    assert!(redraws.borrow().is_empty());
}

#[test]
fn test_event_queue_is_fifo() {
    let mut display = display_with(HeadlessConfig::default());
    assert_eq!(display.dequeue_event(), None);
    assert_eq!(display.pending_events(), 0);

    let first = Event::AppActivate {
        modifiers: Modifiers::empty(),
    };
    let second = Event::Char {
        modifiers: Modifiers::LEFT_SHIFT,
        character: 'Q',
    };
    display.queue_event(first.clone()).unwrap();
    display.queue_event(second.clone()).unwrap();
    assert_eq!(drain(&mut display), vec![first, second]);
    assert_eq!(display.dequeue_event(), None);
}

#[test]
fn test_queue_event_rejects_malformed_events() {
    let mut display = display_with(HeadlessConfig::default());
    let bad = Event::MouseMove {
        modifiers: Modifiers::empty(),
        x: 0,
        y: 1,
        delta_x: f32::INFINITY,
        delta_y: 0.0,
    };
    assert_eq!(display.queue_event(bad).map_err(|e| e.kind()), Err(ErrorKind::ContractViolation));
    assert_eq!(display.pending_events(), 0);
}

#[test]
fn test_poll_translates_keys_and_close() {
    let mut display = windowed_display();
    let platform = headless_mut(&mut display);
    platform.push_event(NativeEventKind::Key {
        key: Key::from_char('a'),
        scancode: 38,
        action: KeyAction::Press,
    });
    platform.push_event(NativeEventKind::CloseRequested);
    display.poll();

    assert_eq!(
        drain(&mut display),
        vec![Event::KeyDown {
            modifiers: Modifiers::empty(),
            key: Key::from_char('a'),
            scancode: 38,
            is_repeat: false,
        }]
    );
    assert!(display.was_quit_requested());
    display.set_quit_requested(false);
    assert!(!display.was_quit_requested());
}

#[test]
fn test_alt_esc_can_be_disabled() {
    let mut display = windowed_display();
    display.set_alt_esc_enabled(false);
    let platform = headless_mut(&mut display);
    platform.push_event(NativeEventKind::ModifierKey {
        modifier: Modifiers::LEFT_ALT,
        pressed: true,
    });
    platform.push_event(NativeEventKind::Key {
        key: Key::ESCAPE,
        scancode: 9,
        action: KeyAction::Press,
    });
    display.poll();
    assert!(!display.was_quit_requested());
    assert_eq!(display.modifiers(), Modifiers::LEFT_ALT);
    assert_eq!(drain(&mut display).len(), 2);
}

#[test]
fn test_unconsumed_events_are_forwarded() {
    let mut display = windowed_display();
    headless_mut(&mut display).push_event(NativeEventKind::Other("expose".to_string()));
    headless_mut(&mut display).push_event(NativeEventKind::Char('x'));
    display.poll();

    let forwarded = headless(&display).forwarded();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].kind, NativeEventKind::Other("expose".to_string()));
    assert_eq!(display.pending_events(), 1);
}

#[test]
fn test_delta_mode_reports_relative_motion_and_swallows_warps() {
    let mut display = windowed_display();
    display.set_delta_mode(true);
    assert!(display.app_owns_mouse());
    assert!(!headless(&display).cursor_visible());
    assert_eq!(count_calls(&display, &HeadlessCall::WarpCursor(400.0, 300.0)), 1);

    // The initial warp comes back as a zero-delta move.
    display.poll();
    assert_eq!(display.pending_events(), 0);

    headless_mut(&mut display).push_event(NativeEventKind::MouseMoved { x: 410.0, y: 295.0 });
    display.poll();
    assert_eq!(
        drain(&mut display),
        vec![Event::MouseMove {
            modifiers: Modifiers::empty(),
            x: 400,
            y: 300,
            delta_x: 10.0,
            delta_y: -5.0,
        }]
    );

    display.poll();
    assert_eq!(display.pending_events(), 0);
    assert_eq!(count_calls(&display, &HeadlessCall::WarpCursor(400.0, 300.0)), 2);

    display.set_delta_mode(false);
    assert!(!display.app_owns_mouse());
    assert!(headless(&display).cursor_visible());
}

#[test]
fn test_delta_mode_sums_batched_moves_to_true_motion() {
    let mut display = windowed_display();
    display.set_delta_mode(true);
    display.poll();

    // Both moves are pumped before either warp back to the centre happens.
    headless_mut(&mut display).push_event(NativeEventKind::MouseMoved { x: 410.0, y: 300.0 });
    headless_mut(&mut display).push_event(NativeEventKind::MouseMoved { x: 420.0, y: 300.0 });
    display.poll();
    let (total_x, total_y) = drain(&mut display)
        .into_iter()
        .fold((0.0, 0.0), |(sx, sy), event| match event {
            Event::MouseMove { delta_x, delta_y, .. } => (sx + delta_x, sy + delta_y),
            other => panic!("unexpected {other:?}"),
        });
    assert_relative_eq!(total_x, 20.0);
    assert_relative_eq!(total_y, 0.0);

    display.poll();
    assert_eq!(display.pending_events(), 0);
    assert_eq!(headless(&display).cursor_position(), (400.0, 300.0));
}

#[test]
fn test_mouse_position_uses_bottom_left_origin() {
    let mut display = windowed_display();
    assert_eq!(display.mouse_position(), (400, 300));

    display.set_mouse_position(10, 1);
    assert_eq!(headless(&display).cursor_position(), (10.0, 599.0));
    assert_eq!(display.mouse_position(), (10, 1));
}

#[test]
fn test_requested_cursor_visibility_is_reported() {
    let mut display = windowed_display();
    assert!(display.is_mouse_cursor_visible());

    display.set_mouse_cursor_visible(false);
    assert!(!display.is_mouse_cursor_visible());

    // Delta mode hides the cursor without changing the request.
    display.set_mouse_cursor_visible(true);
    display.set_delta_mode(true);
    assert!(display.is_mouse_cursor_visible());
    assert!(!headless(&display).cursor_visible());
}

#[test]
fn test_cursor_visibility_is_idempotent() {
    let mut display = windowed_display();
    headless_mut(&mut display).clear_calls();

    display.set_mouse_cursor_visible(false);
    display.set_mouse_cursor_visible(false);
    assert_eq!(count_calls(&display, &HeadlessCall::CursorVisible(false)), 1);

    // Losing focus always shows the cursor.
    headless_mut(&mut display).push_event(NativeEventKind::Focus(false));
    display.poll();
    assert!(headless(&display).cursor_visible());
    headless_mut(&mut display).push_event(NativeEventKind::Focus(true));
    display.poll();
    assert!(!headless(&display).cursor_visible());
}

#[test]
fn test_offscreen_copy_then_destroy_invalidates_binding() {
    let mut display = windowed_display();
    let id = display
        .create_offscreen(TextureTarget::Texture2D, InternalFormat::Rgba8, 256, 256, &GlConfig::default())
        .unwrap();
    assert_eq!(display.offscreen_target(id).unwrap().size(), (256, 256));

    display.copy_to_texture(None, id, ColourBuffer::Back).unwrap();
    assert_eq!(
        display.texture_binding(None),
        Some(TextureBinding::Bound {
            source: id,
            buffer: ColourBuffer::Back,
        })
    );
    display.refresh_texture(None).unwrap();

    display.set_render_target(Some(id)).unwrap();
    assert_eq!(display.render_target(), Some(id));

    display.destroy_offscreen(id).unwrap();
    assert_eq!(display.render_target(), None);
    assert_eq!(display.texture_binding(None), Some(TextureBinding::Invalidated));
    assert_eq!(headless(&display).offscreen_count(), 0);

    assert_eq!(display.refresh_texture(None).map_err(|e| e.kind()), Err(ErrorKind::ContractViolation));
    assert_eq!(
        display.copy_to_texture(None, id, ColourBuffer::Front).map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    assert_eq!(display.destroy_offscreen(id).map_err(|e| e.kind()), Err(ErrorKind::ContractViolation));
}

#[test]
fn test_float_offscreen_on_eight_bit_framebuffer() {
    let mut config = HeadlessConfig::default();
    config.max_pixel_format.colour_bits = 24;
    config.max_pixel_format.alpha_bits = 8;
    let mut display = display_with(config);
    display.init_video(&VideoConfig::windowed(640, 480)).unwrap();
    display.init_gl(&GlConfig::default()).unwrap();

    for format in [InternalFormat::Rgb16F, InternalFormat::Rgba16F] {
        let id = display
            .create_offscreen(TextureTarget::Texture2D, format, 64, 64, &GlConfig::default())
            .unwrap();
        let target = display.offscreen_target(id).unwrap();
        assert_eq!(target.descriptor().internal_format, format);
        assert_eq!(target.pixel_format().depth_bits, 24);
    }

    // Depth and stencil minimums still apply.
    let deep = GlConfig {
        stencil_bits: 16,
        ..GlConfig::default()
    };
    assert!(matches!(
        display.create_offscreen(TextureTarget::Texture2D, InternalFormat::Rgba16F, 64, 64, &deep),
        Err(DisplayError::PixelFormatUnavailable(_))
    ));
    assert_eq!(headless(&display).offscreen_count(), 2);
}

#[test]
fn test_offscreen_requires_context() {
    let mut display = display_with(HeadlessConfig::default());
    assert_eq!(
        display
            .create_offscreen(TextureTarget::Texture2D, InternalFormat::Rgb8, 64, 64, &GlConfig::default())
            .map_err(|e| e.kind()),
        Err(ErrorKind::ContractViolation)
    );
    assert_eq!(display.set_render_target(None).map_err(|e| e.kind()), Err(ErrorKind::ContractViolation));
}

#[test]
fn test_shutdown_restores_display_and_allows_reinit() {
    let mut display = display_with(HeadlessConfig::default());
    display.init_video(&set_mode_config(1280, 720)).unwrap();
    display.init_gl(&GlConfig::default()).unwrap();
    display.set_mouse_cursor_visible(false);
    display
        .create_offscreen(TextureTarget::TextureRectangle, InternalFormat::Rgb16F, 32, 32, &GlConfig::default())
        .unwrap();
    assert_eq!(headless(&display).current_mode(), DisplayMode::new(1280, 720, 32));

    display.shutdown();
    assert_eq!(display.phase(), Phase::Shutdown);
    let platform = headless(&display);
    assert_eq!(platform.current_mode(), DisplayMode::new(1920, 1080, 32));
    assert!(!platform.is_captured());
    assert!(!platform.has_surface());
    assert!(!platform.has_context());
    assert_eq!(platform.offscreen_count(), 0);
    assert!(platform.cursor_visible());
    assert_relative_eq!(platform.fade_level(), 0.0);
    assert!(display.mode_list().is_empty());

    display.init().unwrap();
    assert_eq!(display.mode_count(), 6);
    display.init_video(&VideoConfig::windowed(640, 480)).unwrap();
    display.init_gl(&GlConfig::default()).unwrap();
    assert!(display.begin_render().unwrap());
    display.end_render().unwrap();
}

#[test]
fn test_gl_info_without_context_leaves_nothing_current() {
    let mut display = display_with(HeadlessConfig::default());
    let info = display.gl_info(None).unwrap();
    assert_eq!(info.renderer, "Headless");
    assert!(info.has_extension("GL_ARB_texture_rectangle"));
    assert_eq!(headless(&display).current_context(), CurrentContext::None);
    assert!(!headless(&display).has_context());
    assert_eq!(count_calls(&display, &HeadlessCall::ProbeContext), 1);

    display.init_video(&VideoConfig::windowed(640, 480)).unwrap();
    display.init_gl(&GlConfig::default()).unwrap();
    display.gl_info(None).unwrap();
    assert_eq!(count_calls(&display, &HeadlessCall::ProbeContext), 1);
}

#[test]
fn test_driver_queries_keep_application_context_current() {
    let mut display = windowed_display();
    let id = display
        .create_offscreen(TextureTarget::Texture2D, InternalFormat::Rgba8, 64, 64, &GlConfig::default())
        .unwrap();
    let native = created_native_target(&display);
    assert_eq!(headless(&display).current_context(), CurrentContext::Primary);

    display.set_render_target(Some(id)).unwrap();
    assert_eq!(headless(&display).current_context(), CurrentContext::Offscreen(native));

    let request = GlConfig::default().pixel_format_request();
    headless_mut(&mut display).probe_context_info(&request).unwrap();
    display.gl_info(Some(&GlConfig::default())).unwrap();
    assert_eq!(headless(&display).current_context(), CurrentContext::Offscreen(native));

    display.set_render_target(None).unwrap();
    headless_mut(&mut display).probe_context_info(&request).unwrap();
    display.gl_info(None).unwrap();
    assert_eq!(headless(&display).current_context(), CurrentContext::Primary);

    // Destroying the active target hands rendering back to the primary context.
    display.set_render_target(Some(id)).unwrap();
    display.destroy_offscreen(id).unwrap();
    assert_eq!(headless(&display).current_context(), CurrentContext::Primary);
}

#[test]
fn test_open_applies_settings() {
    let _switch = TRACE_SWITCH_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let settings = DisplaySettings {
        fade_time_secs: 1.5,
        key_repeat: false,
        ..DisplaySettings::default()
    };
    let display = Display::open(Box::new(HeadlessPlatform::default()), &settings).unwrap();
    assert_relative_eq!(display.fade_time(), 1.5);
    assert!(!display.key_repeat());
    assert_eq!(display.disposition(), Disposition::Window);
    assert_eq!(display.surface_size(), Some((800, 600)));
    assert_relative_eq!(display.aspect_ratio().unwrap(), 4.0 / 3.0, epsilon = 1e-5);
    assert!(headless(&display).has_context());
}

#[test]
fn test_apply_settings_switches_tracing_both_ways() {
    let _switch = TRACE_SWITCH_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let mut display = display_with(HeadlessConfig::default());
    let mut settings = DisplaySettings {
        trace_enabled: true,
        ..DisplaySettings::default()
    };
    display.apply_settings(&settings);
    assert!(logging::trace_enabled());

    settings.trace_enabled = false;
    display.apply_settings(&settings);
    assert!(!logging::trace_enabled());
}
