//! Display error types

use crate::platform::PlatformError;
use crate::video::mode::{DisplayMode, ModeParseError};
use thiserror::Error;

/// Broad category of a [`DisplayError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Something could not be brought up; any partial state was rolled back
    Initialization,
    /// The caller broke the calling protocol; no state changed
    ContractViolation,
    /// Text input could not be parsed
    Parse,
    /// The platform failed in a way the display cannot recover from
    Fatal,
}

/// Display system errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    /// The platform could not enumerate display modes
    #[error("failed to enumerate display modes: {0}")]
    ModeList(PlatformError),

    /// No catalog entry matches and closest matching is off
    #[error("no display mode matches {requested}")]
    NoMatchingMode {
        /// The mode that was asked for
        requested: DisplayMode,
    },

    /// The configuration cannot be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Exclusive display capture was refused
    #[error("failed to capture the display: {0}")]
    DisplayCapture(PlatformError),

    /// The display refused a mode switch
    #[error("failed to switch display mode to {mode}: {source}")]
    ModeSwitch {
        /// Target mode
        mode: DisplayMode,
        /// Platform failure
        source: PlatformError,
    },

    /// The primary surface could not be created
    #[error("failed to create surface: {0}")]
    SurfaceCreation(PlatformError),

    /// The OpenGL context could not be created
    #[error("failed to create OpenGL context: {0}")]
    ContextCreation(PlatformError),

    /// The driver's best pixel format is below the requested minimum
    #[error("pixel format unavailable: {0}")]
    PixelFormatUnavailable(String),

    /// An offscreen target could not be created
    #[error("failed to create offscreen target: {0}")]
    OffscreenCreation(PlatformError),

    /// The caller broke the calling protocol
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Catalog index past the end
    #[error("mode index {index} out of range (catalog has {count} modes)")]
    ModeIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Catalog length
        count: usize,
    },

    /// Mode string could not be parsed
    #[error(transparent)]
    Parse(#[from] ModeParseError),

    /// Unrecoverable platform failure
    #[error("fatal platform error: {0}")]
    Fatal(PlatformError),
}

impl DisplayError {
    /// Shorthand for a [`DisplayError::ContractViolation`]
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ModeList(_)
            | Self::NoMatchingMode { .. }
            | Self::InvalidConfig(_)
            | Self::DisplayCapture(_)
            | Self::ModeSwitch { .. }
            | Self::SurfaceCreation(_)
            | Self::ContextCreation(_)
            | Self::PixelFormatUnavailable(_)
            | Self::OffscreenCreation(_) => ErrorKind::Initialization,
            Self::ContractViolation(_) | Self::ModeIndexOutOfRange { .. } => {
                ErrorKind::ContractViolation
            }
            Self::Parse(_) => ErrorKind::Parse,
            Self::Fatal(_) => ErrorKind::Fatal,
        }
    }
}

/// Result type for display operations
pub type DisplayResult<T> = Result<T, DisplayError>;
