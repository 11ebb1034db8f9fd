//! Display demo application
//!
//! Opens a window (or a fullscreen display) through the GLFW backend and logs
//! every event. Keys:
//!
//! - `B` fades to black, or back again
//! - `F` toggles between window and fullscreen window
//! - `M` toggles mouse delta mode
//! - `Esc` (or Alt+Esc, or closing the window) quits
//!
//! Usage: `display_demo [settings.toml|settings.ron] [WxH[xBITS]] [--list-modes]`

use game_display::foundation::logging;
use game_display::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
enum DemoError {
    #[error("settings: {0}")]
    Settings(#[from] game_display::core::ConfigError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Platform(#[from] game_display::platform::PlatformError),

    #[error("unrecognised argument '{0}'")]
    Argument(String),
}

#[derive(Default)]
struct Options {
    settings_path: Option<PathBuf>,
    mode: Option<DisplayMode>,
    list_modes: bool,
}

impl Options {
    fn from_args(args: impl Iterator<Item = String>) -> Result<Self, DemoError> {
        let mut options = Self::default();
        for arg in args {
            if arg == "--list-modes" {
                options.list_modes = true;
            } else if arg.ends_with(".toml") || arg.ends_with(".ron") {
                options.settings_path = Some(PathBuf::from(arg));
            } else {
                let mode = arg
                    .parse::<DisplayMode>()
                    .map_err(|_| DemoError::Argument(arg.clone()))?;
                options.mode = Some(mode);
            }
        }
        Ok(options)
    }

    fn settings(&self) -> Result<DisplaySettings, DemoError> {
        let mut settings = match &self.settings_path {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                DisplaySettings::load_from_file(path)?
            }
            None => DisplaySettings::default(),
        };
        settings.video.title = "Display Demo".to_string();
        if let Some(mode) = self.mode {
            settings.video.mode = mode;
        }
        Ok(settings)
    }
}

struct DemoApp {
    display: Display,
    frames_logged: u64,
}

impl DemoApp {
    fn new(settings: &DisplaySettings) -> Result<Self, DemoError> {
        let platform = GlfwPlatform::new()?;
        let mut display = Display::open(Box::new(platform), settings)?;
        display.set_draw_callback(|request| {
            log::info!(
                "Redraw for {:?} at {}x{}",
                request.reason,
                request.width,
                request.height
            );
        });

        match display.gl_info(None) {
            Ok(info) => log::info!("OpenGL {} on {} ({})", info.version, info.renderer, info.vendor),
            Err(e) => log::warn!("Could not read driver strings: {e}"),
        }

        Ok(Self {
            display,
            frames_logged: 0,
        })
    }

    fn handle_event(&mut self, event: &Event) -> Result<(), DemoError> {
        log::debug!("{event}");
        let Event::KeyDown {
            key,
            is_repeat: false,
            ..
        } = event
        else {
            return Ok(());
        };

        if *key == Key::ESCAPE {
            self.display.set_quit_requested(true);
        } else if *key == Key::from_char('b') {
            match self.display.fade_state() {
                FadeState::Visible | FadeState::FadingIn => self.display.fade_to_black(),
                FadeState::Black | FadeState::FadingOut => self.display.fade_from_black(),
            }
        } else if *key == Key::from_char('f') {
            if let Err(e) = self.display.toggle_fullscreen_window() {
                log::warn!("Cannot toggle fullscreen: {e}");
            }
        } else if *key == Key::from_char('m') {
            let enabled = !self.display.delta_mode();
            self.display.set_delta_mode(enabled);
            log::info!("Delta mode {}", if enabled { "on" } else { "off" });
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), DemoError> {
        while !self.display.was_quit_requested() {
            self.display.poll();
            while let Some(event) = self.display.dequeue_event() {
                self.handle_event(&event)?;
            }

            if self.display.begin_render()? {
                self.display.end_render()?;
            } else {
                self.display.sleep(0.1);
            }

            let stats = self.display.frame_stats();
            if stats.frame_count >= self.frames_logged + 600 {
                self.frames_logged = stats.frame_count;
                log::info!("{} frames, {:.1} fps", stats.frame_count, stats.average_fps());
            }
        }
        self.display.shutdown();
        Ok(())
    }
}

fn list_modes(settings: &DisplaySettings) -> Result<(), DemoError> {
    let mut display = Display::with_settings(Box::new(GlfwPlatform::new()?), settings);
    display.init()?;
    println!("Desktop: {}", display.startup_mode()?);
    for (index, mode) in display.mode_list().iter().enumerate() {
        println!("{index:3}: {mode}");
    }
    display.shutdown();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting display demo");

    let options = Options::from_args(std::env::args().skip(1))?;
    let settings = options.settings()?;

    if options.list_modes {
        list_modes(&settings)?;
        return Ok(());
    }

    let mut app = DemoApp::new(&settings)?;
    match app.run() {
        Ok(()) => {
            log::info!("Display demo finished");
            Ok(())
        }
        Err(e) => {
            log::error!("Display demo failed: {e}");
            Err(e.into())
        }
    }
}
