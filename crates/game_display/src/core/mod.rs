//! # Core Display Module
//!
//! Shared configuration types used by every display subsystem.
//!
//! ## Organization
//!
//! - **Config**: surface, OpenGL and bundled display settings
//! - **Foundation**: logging, abort and timing utilities

pub mod config;

pub use crate::foundation;

pub use config::{
    Config, ConfigError, ConfigFormat, Disposition, DisplaySettings, GlConfig, VideoConfig,
    WindowLevel,
};
