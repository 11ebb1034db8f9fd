//! Frame pairing and redraw requests

use crate::error::{DisplayError, DisplayResult};
use crate::foundation::time::{FrameStats, FrameTimer};
use std::time::Instant;

/// Why the display is asking for a frame outside the application's loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawReason {
    /// The user resized the window
    Resize,
    /// The surface switched between window and fullscreen window
    FullscreenToggle,
}

/// Argument passed to the draw callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawRequest {
    /// What triggered the redraw
    pub reason: RedrawReason,
    /// Surface width to draw at
    pub width: u32,
    /// Surface height to draw at
    pub height: u32,
}

/// Application hook that draws one frame's content on demand
pub type DrawCallback = Box<dyn FnMut(&RedrawRequest)>;

/// Tracks whether a frame is open and times presented frames
#[derive(Debug, Clone, Default)]
pub struct RenderLoop {
    in_frame: bool,
    timer: FrameTimer,
}

impl RenderLoop {
    /// Create an idle render loop
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame is open
    pub const fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Open a frame
    pub fn begin(&mut self) -> DisplayResult<()> {
        if self.in_frame {
            return Err(DisplayError::contract("begin_render called twice without end or discard"));
        }
        self.in_frame = true;
        Ok(())
    }

    /// Close the open frame as presented at `now`
    pub fn end(&mut self, now: Instant) -> DisplayResult<()> {
        self.close("end_render")?;
        self.timer.record_frame(now);
        Ok(())
    }

    /// Close the open frame without presenting
    pub fn discard(&mut self) -> DisplayResult<()> {
        self.close("discard_render")
    }

    fn close(&mut self, operation: &str) -> DisplayResult<()> {
        if !self.in_frame {
            return Err(DisplayError::contract(format!(
                "{operation} called without begin_render"
            )));
        }
        self.in_frame = false;
        Ok(())
    }

    /// Forget any open frame and restart timing
    pub fn reset(&mut self, now: Instant) {
        self.in_frame = false;
        self.timer.reset(now);
    }

    /// Presented-frame statistics
    pub fn stats(&self) -> FrameStats {
        self.timer.stats()
    }
}
