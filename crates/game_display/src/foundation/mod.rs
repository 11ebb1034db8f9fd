//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the display layer:
//! - Logging and the redirectable trace sink
//! - Fatal-error reporting
//! - Time management

pub mod abort;
pub mod logging;
pub mod time;
