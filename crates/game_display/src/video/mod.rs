//! # Video
//!
//! Display modes, the primary surface and its OpenGL context.
//!
//! ## Lifecycle
//!
//! ```text
//! ModeCatalog::build ─► SurfaceController::init ─► GraphicsContext::create
//!                              │   ▲                        │
//!                  toggle /    │   │ context survives       │
//!                  resize      ▼   │                        ▼
//!                        (same surface)          GraphicsContext::destroy
//!                                                           │
//!                                               SurfaceController::teardown
//! ```

pub mod catalog;
pub mod context;
pub mod mode;
pub mod surface;

pub use catalog::ModeCatalog;
pub use context::{query_info, GlInfo, GraphicsContext};
pub use mode::{DisplayMode, ModeParseError};
pub use surface::SurfaceController;
