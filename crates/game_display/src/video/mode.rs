//! Display mode values and mode-string parsing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A display resolution as reported by the platform
///
/// `bits_per_pixel` is the total pixel depth (e.g. 32 for 8-bit RGBA). A value of
/// zero in a request means "any depth".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayMode {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Total bits per pixel, or 0 when unspecified
    pub bits_per_pixel: u32,
}

impl DisplayMode {
    /// Create a new display mode
    pub const fn new(width: u32, height: u32, bits_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
        }
    }

    /// Pixel area, used for catalog ordering
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height, or 0 for a degenerate mode
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// True when width, height and depth are all identical
    pub fn same_mode(a: &Self, b: &Self) -> bool {
        a == b
    }

    /// Whether this mode has the same resolution as `other`, ignoring depth
    pub const fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Parse `"<width>x<height>"` or `"<width>x<height>x<bits>"`
    ///
    /// The separator is case-insensitive and only ASCII digits are accepted.
    /// Width and height must be non-zero.
    pub fn parse(text: &str) -> Result<Self, ModeParseError> {
        if text.is_empty() {
            return Err(ModeParseError::Empty);
        }

        let mut fields = [0u32; 3];
        let mut count = 0;
        for part in text.split(|c| c == 'x' || c == 'X') {
            if count == fields.len() {
                return Err(ModeParseError::Malformed(text.to_string()));
            }
            fields[count] = parse_number(part, text)?;
            count += 1;
        }

        if count < 2 {
            return Err(ModeParseError::Malformed(text.to_string()));
        }
        if fields[0] == 0 || fields[1] == 0 {
            return Err(ModeParseError::ZeroDimension(text.to_string()));
        }

        Ok(Self::new(fields[0], fields[1], fields[2]))
    }
}

fn parse_number(part: &str, text: &str) -> Result<u32, ModeParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModeParseError::Malformed(text.to_string()));
    }
    part.parse()
        .map_err(|_| ModeParseError::OutOfRange(text.to_string()))
}

impl FromStr for DisplayMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bits_per_pixel == 0 {
            write!(f, "{}x{}", self.width, self.height)
        } else {
            write!(f, "{}x{}x{}", self.width, self.height, self.bits_per_pixel)
        }
    }
}

/// Mode string parse failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeParseError {
    /// Nothing to parse
    #[error("empty display mode string")]
    Empty,

    /// Not of the form WIDTHxHEIGHT or WIDTHxHEIGHTxBITS
    #[error("malformed display mode string {0:?}, expected WIDTHxHEIGHT or WIDTHxHEIGHTxBITS")]
    Malformed(String),

    /// A field does not fit in 32 bits
    #[error("display mode value out of range in {0:?}")]
    OutOfRange(String),

    /// Width or height is zero
    #[error("display mode {0:?} has a zero dimension")]
    ZeroDimension(String),
}
