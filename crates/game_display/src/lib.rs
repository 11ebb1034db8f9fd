//! # Game Display
//!
//! Display surfaces, OpenGL contexts and input events for real-time games.
//!
//! ## Features
//!
//! - **Display Modes**: Enumerate, parse and match fullscreen resolutions
//! - **Dispositions**: Windowed, fullscreen at the desktop mode, fullscreen
//!   with a mode switch, and borderless fullscreen windows with live toggling
//! - **OpenGL Contexts**: Minimum pixel formats verified after creation
//! - **Render Loop**: Paired begin/end frames with fades to and from black
//! - **Events**: Keyboard, mouse, scroll and focus events in one FIFO queue,
//!   including a relative-motion delta mode
//! - **Offscreen Targets**: Shared-context buffers copied into textures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use game_display::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     game_display::foundation::logging::init();
//!
//!     let settings = DisplaySettings {
//!         video: VideoConfig::windowed(1280, 720).with_title("Asteroids"),
//!         ..DisplaySettings::default()
//!     };
//!     let mut display = Display::open(Box::new(GlfwPlatform::new()?), &settings)?;
//!
//!     while !display.was_quit_requested() {
//!         display.poll();
//!         while let Some(event) = display.dequeue_event() {
//!             if let Event::KeyDown { key, .. } = event {
//!                 if key == Key::from_char('f') {
//!                     display.toggle_fullscreen_window()?;
//!                 }
//!             }
//!         }
//!         if display.begin_render()? {
//!             display.end_render()?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Configuration and shared infrastructure
pub mod config;
pub mod core;
pub mod error;
pub mod foundation;

// Display layers
pub mod display;
pub mod input;
pub mod platform;
pub mod render;
pub mod video;

pub use display::{Display, Phase};
pub use error::{DisplayError, DisplayResult, ErrorKind};

/// Common imports for display users
pub mod prelude {
    pub use crate::{
        core::{Config, Disposition, DisplaySettings, GlConfig, VideoConfig, WindowLevel},
        display::{Display, Phase},
        error::{DisplayError, DisplayResult, ErrorKind},
        input::{Event, EventType, Key, Modifiers, MouseButton},
        platform::{GlfwPlatform, HeadlessPlatform, Platform},
        render::{
            ColourBuffer, FadeState, InternalFormat, OffscreenId, RedrawReason, RedrawRequest,
            TextureBinding, TextureTarget,
        },
        video::{DisplayMode, GlInfo},
    };
}
