//! Fade to and from black
//!
//! The fade is a single overlay level between 0 (frame shown as drawn) and 1
//! (black). It moves at a constant rate of `1 / duration` per second and is
//! advanced by the render loop, so a reversal mid-fade continues from
//! wherever the level currently is.

use std::time::Instant;

/// Default fade duration in seconds
pub const DEFAULT_FADE_TIME_SECS: f32 = 0.35;

/// Fade state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Nothing overlaid
    Visible,
    /// Level rising towards black
    FadingOut,
    /// Fully black
    Black,
    /// Level falling towards visible
    FadingIn,
}

/// Overlay fade controller
#[derive(Debug, Clone)]
pub struct Fade {
    state: FadeState,
    level: f32,
    duration_secs: f32,
    last_update: Option<Instant>,
}

impl Default for Fade {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_TIME_SECS)
    }
}

impl Fade {
    /// Create a visible fade with the given duration
    pub fn new(duration_secs: f32) -> Self {
        Self {
            state: FadeState::Visible,
            level: 0.0,
            duration_secs: duration_secs.max(0.0),
            last_update: None,
        }
    }

    /// Current state
    pub const fn state(&self) -> FadeState {
        self.state
    }

    /// Current overlay level
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Fade duration in seconds
    pub const fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    /// Change the duration used by later fades; negative values mean instant
    pub fn set_duration_secs(&mut self, secs: f32) {
        self.duration_secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    }

    /// True while the level is moving
    pub const fn is_fading(&self) -> bool {
        matches!(self.state, FadeState::FadingOut | FadeState::FadingIn)
    }

    /// Start fading to black; no-op when already black or fading out
    pub fn fade_to_black(&mut self, now: Instant) {
        if matches!(self.state, FadeState::Black | FadeState::FadingOut) {
            return;
        }
        self.state = FadeState::FadingOut;
        self.last_update = Some(now);
        self.settle_if_instant();
    }

    /// Start fading back in; no-op when already visible or fading in
    pub fn fade_from_black(&mut self, now: Instant) {
        if matches!(self.state, FadeState::Visible | FadeState::FadingIn) {
            return;
        }
        self.state = FadeState::FadingIn;
        self.last_update = Some(now);
        self.settle_if_instant();
    }

    /// Jump straight to black
    pub fn snap_to_black(&mut self) {
        self.state = FadeState::Black;
        self.level = 1.0;
        self.last_update = None;
    }

    /// Jump straight to visible
    pub fn reset(&mut self) {
        self.state = FadeState::Visible;
        self.level = 0.0;
        self.last_update = None;
    }

    /// Move the level to where it should be at `now` and return it
    pub fn advance(&mut self, now: Instant) -> f32 {
        if !self.is_fading() {
            return self.level;
        }
        let elapsed = self
            .last_update
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_update = Some(now);

        let step = if self.duration_secs > 0.0 {
            elapsed / self.duration_secs
        } else {
            1.0
        };
        match self.state {
            FadeState::FadingOut => {
                self.level = (self.level + step).min(1.0);
                if self.level >= 1.0 {
                    self.state = FadeState::Black;
                }
            }
            FadeState::FadingIn => {
                self.level = (self.level - step).max(0.0);
                if self.level <= 0.0 {
                    self.state = FadeState::Visible;
                }
            }
            FadeState::Visible | FadeState::Black => {}
        }
        self.level
    }

    fn settle_if_instant(&mut self) {
        if self.duration_secs <= 0.0 {
            match self.state {
                FadeState::FadingOut => self.snap_to_black(),
                FadeState::FadingIn => self.reset(),
                FadeState::Visible | FadeState::Black => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn ms(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[test]
    fn test_fade_out_reaches_black() {
        let start = Instant::now();
        let mut fade = Fade::new(1.0);
        fade.fade_to_black(start);
        assert_eq!(fade.state(), FadeState::FadingOut);

        assert_relative_eq!(fade.advance(ms(start, 250)), 0.25, epsilon = 1e-4);
        assert_relative_eq!(fade.advance(ms(start, 1500)), 1.0);
        assert_eq!(fade.state(), FadeState::Black);
    }

    #[test]
    fn test_fade_requests_are_idempotent() {
        let start = Instant::now();
        let mut fade = Fade::new(1.0);
        fade.fade_from_black(start);
        assert_eq!(fade.state(), FadeState::Visible);

        fade.fade_to_black(start);
        fade.advance(ms(start, 500));
        // A second request must not restart the fade.
        fade.fade_to_black(ms(start, 500));
        assert_relative_eq!(fade.level(), 0.5, epsilon = 1e-4);
        fade.advance(ms(start, 1000));
        assert_eq!(fade.state(), FadeState::Black);
        fade.fade_to_black(ms(start, 1100));
        assert_eq!(fade.state(), FadeState::Black);
    }

    #[test]
    fn test_reversal_continues_from_current_level() {
        let start = Instant::now();
        let mut fade = Fade::new(1.0);
        fade.fade_to_black(start);
        fade.advance(ms(start, 400));
        fade.fade_from_black(ms(start, 400));
        assert_eq!(fade.state(), FadeState::FadingIn);
        assert_relative_eq!(fade.advance(ms(start, 500)), 0.3, epsilon = 1e-4);
        assert_relative_eq!(fade.advance(ms(start, 900)), 0.0);
        assert_eq!(fade.state(), FadeState::Visible);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let mut fade = Fade::new(0.0);
        fade.fade_to_black(Instant::now());
        assert_eq!(fade.state(), FadeState::Black);
        assert_relative_eq!(fade.level(), 1.0);
        fade.fade_from_black(Instant::now());
        assert_eq!(fade.state(), FadeState::Visible);
    }
}
