//! Display mode catalog
//!
//! The catalog is rebuilt from the platform on demand. It never contains
//! duplicates and is ordered largest area first, then deepest, then widest.

use crate::error::{DisplayError, DisplayResult};
use crate::platform::Platform;
use crate::video::mode::DisplayMode;
use std::cmp::Reverse;

/// Sorted, de-duplicated list of the primary display's modes
#[derive(Debug, Clone, Default)]
pub struct ModeCatalog {
    modes: Vec<DisplayMode>,
}

impl ModeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a raw mode list
    pub fn from_modes(raw: impl IntoIterator<Item = DisplayMode>) -> Self {
        let mut catalog = Self::new();
        catalog.replace(raw.into_iter().collect());
        catalog
    }

    /// Re-enumerate the platform's modes, replacing the stored list
    ///
    /// On failure the previous list is left untouched.
    pub fn build(&mut self, platform: &mut dyn Platform) -> DisplayResult<&[DisplayMode]> {
        let raw = platform.display_modes().map_err(DisplayError::ModeList)?;
        let reported = raw.len();
        self.replace(raw);
        log::debug!(
            "Display mode catalog built: {} modes ({} reported by {})",
            self.modes.len(),
            reported,
            platform.name()
        );
        Ok(&self.modes)
    }

    fn replace(&mut self, mut raw: Vec<DisplayMode>) {
        raw.sort_by_key(|m| (Reverse(m.area()), Reverse(m.bits_per_pixel), Reverse(m.width)));
        raw.dedup();
        self.modes = raw;
    }

    /// All modes in catalog order
    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }

    /// Number of modes
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// True when no modes are known
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Mode at `index`
    pub fn get(&self, index: usize) -> DisplayResult<DisplayMode> {
        self.modes
            .get(index)
            .copied()
            .ok_or(DisplayError::ModeIndexOutOfRange {
                index,
                count: self.modes.len(),
            })
    }

    /// Exact catalog entry for `requested`
    ///
    /// A request with zero bits matches the deepest entry of that size.
    pub fn find_exact(&self, requested: &DisplayMode) -> Option<DisplayMode> {
        self.modes
            .iter()
            .filter(|m| m.same_size(requested))
            .find(|m| requested.bits_per_pixel == 0 || m.bits_per_pixel == requested.bits_per_pixel)
            .copied()
    }

    /// Nearest catalog entry by squared distance over width and height
    ///
    /// Ties prefer an entry with the requested depth, then catalog order.
    pub fn find_closest(&self, requested: &DisplayMode) -> Option<DisplayMode> {
        self.modes
            .iter()
            .enumerate()
            .min_by_key(|(index, m)| {
                let dw = i64::from(m.width) - i64::from(requested.width);
                let dh = i64::from(m.height) - i64::from(requested.height);
                let depth_mismatch = requested.bits_per_pixel != 0
                    && m.bits_per_pixel != requested.bits_per_pixel;
                (dw * dw + dh * dh, depth_mismatch, *index)
            })
            .map(|(_, m)| *m)
    }

    /// Resolve a requested mode against the catalog
    pub fn match_mode(&self, requested: &DisplayMode, accept_closest: bool) -> DisplayResult<DisplayMode> {
        if let Some(mode) = self.find_exact(requested) {
            return Ok(mode);
        }
        if accept_closest {
            if let Some(mode) = self.find_closest(requested) {
                log::info!("No exact display mode for {requested}, using closest {mode}");
                return Ok(mode);
            }
        }
        Err(DisplayError::NoMatchingMode {
            requested: *requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModeCatalog {
        ModeCatalog::from_modes([
            DisplayMode::new(640, 480, 16),
            DisplayMode::new(1280, 1024, 32),
            DisplayMode::new(800, 600, 32),
            DisplayMode::new(640, 480, 32),
            DisplayMode::new(1280, 1024, 32),
            DisplayMode::new(1024, 768, 32),
            DisplayMode::new(800, 600, 32),
        ])
    }

    #[test]
    fn test_sorted_by_area_without_duplicates() {
        let catalog = catalog();
        let modes = catalog.modes();
        assert_eq!(modes.len(), 5);
        for pair in modes.windows(2) {
            assert!(pair[0].area() >= pair[1].area());
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(modes[0], DisplayMode::new(1280, 1024, 32));
        // Same area: deeper first.
        assert_eq!(modes[3], DisplayMode::new(640, 480, 32));
        assert_eq!(modes[4], DisplayMode::new(640, 480, 16));
    }

    #[test]
    fn test_get_out_of_range() {
        let catalog = catalog();
        assert_eq!(catalog.get(1).ok(), Some(DisplayMode::new(1024, 768, 32)));
        assert_eq!(
            catalog.get(5),
            Err(DisplayError::ModeIndexOutOfRange { index: 5, count: 5 })
        );
    }

    #[test]
    fn test_exact_match() {
        let catalog = catalog();
        assert_eq!(
            catalog.match_mode(&DisplayMode::new(640, 480, 16), false).ok(),
            Some(DisplayMode::new(640, 480, 16))
        );
        // Unspecified depth picks the deepest entry.
        assert_eq!(
            catalog.match_mode(&DisplayMode::new(640, 480, 0), false).ok(),
            Some(DisplayMode::new(640, 480, 32))
        );
    }

    #[test]
    fn test_closest_match_toggle() {
        let catalog = catalog();
        let requested = DisplayMode::new(1000, 750, 32);
        assert_eq!(
            catalog.match_mode(&requested, false),
            Err(DisplayError::NoMatchingMode { requested })
        );
        assert_eq!(
            catalog.match_mode(&requested, true).ok(),
            Some(DisplayMode::new(1024, 768, 32))
        );
    }

    #[test]
    fn test_closest_prefers_requested_depth() {
        let catalog = catalog();
        assert_eq!(
            catalog.find_closest(&DisplayMode::new(650, 490, 16)),
            Some(DisplayMode::new(640, 480, 16))
        );
        assert_eq!(ModeCatalog::new().find_closest(&DisplayMode::new(1, 1, 0)), None);
    }
}
