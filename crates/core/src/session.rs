//! Caller-owned collection of images between generate calls.
//!
//! A [`LayoutSession`] keeps the user's image list, per-image scale factors,
//! selection state and the layout request. The engine reads it on every
//! generate call and keeps nothing itself.

use crate::item::Item;
use crate::overlay::OverlayRequest;
use crate::ratio::AspectRatio;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Factor applied by one "zoom" step on selected images.
pub const SCALE_STEP: f64 = 1.1;

/// Smallest scale a zoom-out step can reach.
pub const MIN_SCALE: f64 = 0.1;

/// One image in the session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionEntry {
    /// Where the image came from (path or any unique key).
    pub source: String,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Current scale factor.
    pub scale: f64,
    /// Whether the image is selected for bulk operations.
    pub selected: bool,
    /// Whether the packer may rotate the image.
    pub allow_rotation: bool,
}

impl SessionEntry {
    /// Scale change in whole percent, truncated toward zero.
    pub fn scale_percent(&self) -> i32 {
        ((self.scale - 1.0) * 100.0) as i32
    }
}

/// The caller's working set of images plus layout options.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSession {
    entries: Vec<SessionEntry>,
    padding: Option<u32>,
    ratio: AspectRatio,
    page_count: usize,
    overlay: OverlayRequest,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutSession {
    /// Creates an empty session targeting A-series paper on one page.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            padding: None,
            ratio: AspectRatio::default(),
            page_count: 1,
            overlay: OverlayRequest::default(),
        }
    }

    /// Adds images given as `(source, width, height)`.
    ///
    /// Sources already in the session and images with a zero dimension are
    /// skipped. Returns the number of images added.
    pub fn add_items<I, S>(&mut self, images: I) -> usize
    where
        I: IntoIterator<Item = (S, u32, u32)>,
        S: Into<String>,
    {
        let mut added = 0;
        for (source, width, height) in images {
            let source = source.into();
            if self.entries.iter().any(|e| e.source == source) {
                log::debug!("skipping duplicate image {source}");
                continue;
            }
            if width == 0 || height == 0 {
                log::warn!("skipping {source}: empty image ({width}x{height})");
                continue;
            }
            self.entries.push(SessionEntry {
                source,
                width,
                height,
                scale: 1.0,
                selected: false,
                allow_rotation: true,
            });
            added += 1;
        }
        added
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the session holds no images.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets the scale of one image. Returns false for an unknown index or a
    /// non-positive scale.
    pub fn set_scale(&mut self, index: usize, scale: f64) -> bool {
        if !(scale.is_finite() && scale > 0.0) {
            return false;
        }
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.scale = scale;
                true
            }
            None => false,
        }
    }

    /// Allows or forbids rotating one image.
    pub fn set_rotation(&mut self, index: usize, allow: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.allow_rotation = allow;
                true
            }
            None => false,
        }
    }

    /// Enlarges every selected image by [`SCALE_STEP`]. Returns how many changed.
    pub fn scale_selected_up(&mut self) -> usize {
        self.update_selected(|scale| scale * SCALE_STEP)
    }

    /// Shrinks every selected image by [`SCALE_STEP`], not below [`MIN_SCALE`].
    pub fn scale_selected_down(&mut self) -> usize {
        self.update_selected(|scale| (scale / SCALE_STEP).max(MIN_SCALE))
    }

    fn update_selected(&mut self, f: impl Fn(f64) -> f64) -> usize {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|e| e.selected) {
            entry.scale = f(entry.scale);
            changed += 1;
        }
        changed
    }

    /// Selects or deselects one image.
    pub fn select(&mut self, index: usize, selected: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Selects every image. Returns how many were newly selected.
    pub fn select_all(&mut self) -> usize {
        let mut count = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.selected) {
            entry.selected = true;
            count += 1;
        }
        count
    }

    /// Deselects every image. Returns how many were deselected.
    pub fn deselect_all(&mut self) -> usize {
        let mut count = 0;
        for entry in self.entries.iter_mut().filter(|e| e.selected) {
            entry.selected = false;
            count += 1;
        }
        count
    }

    /// Flips the selection of every image. Returns how many were toggled.
    pub fn invert_selection(&mut self) -> usize {
        for entry in &mut self.entries {
            entry.selected = !entry.selected;
        }
        self.entries.len()
    }

    /// Number of selected images.
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.selected).count()
    }

    /// Removes the selected images. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.selected);
        before - self.entries.len()
    }

    /// Removes every image.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Padding around every image, if enabled.
    pub fn padding(&self) -> Option<u32> {
        self.padding
    }

    /// Enables padding of the given size, or disables it with `None`.
    pub fn set_padding(&mut self, padding: Option<u32>) {
        self.padding = padding;
    }

    /// Target `height / width` ratio.
    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    /// Sets the target ratio.
    pub fn set_ratio(&mut self, ratio: AspectRatio) {
        self.ratio = ratio;
    }

    /// Requested number of pages.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Sets the requested number of pages (at least one).
    pub fn set_page_count(&mut self, pages: usize) {
        self.page_count = pages.max(1);
    }

    /// Overlay requested on every page.
    pub fn overlay(&self) -> &OverlayRequest {
        &self.overlay
    }

    /// Sets the overlay request.
    pub fn set_overlay(&mut self, overlay: OverlayRequest) {
        self.overlay = overlay;
    }

    /// Builds the engine's item list; item IDs are entry indices.
    pub fn items(&self) -> Vec<Item> {
        let padding = self.padding.unwrap_or(0);
        self.entries
            .iter()
            .enumerate()
            .map(|(id, e)| {
                Item::new(id, e.width, e.height)
                    .with_scale(e.scale)
                    .with_padding(padding)
                    .with_rotation(e.allow_rotation)
            })
            .collect()
    }
}

/// Parses padding typed by a user. Anything but a plain non-negative integer
/// means no padding.
pub fn parse_padding(text: &str) -> u32 {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn session() -> LayoutSession {
        let mut s = LayoutSession::new();
        s.add_items([("a.jpg", 400, 300), ("b.png", 200, 100), ("c.jpg", 50, 50)]);
        s
    }

    #[test]
    fn test_add_skips_duplicates_and_empty_images() {
        let mut s = session();
        let added = s.add_items([("a.jpg", 400, 300), ("d.jpg", 0, 10), ("e.png", 10, 10)]);
        assert_eq!(added, 1);
        assert_eq!(s.len(), 4);
        assert_eq!(s.entries()[3].source, "e.png");
    }

    #[test]
    fn test_scale_selected() {
        let mut s = session();
        assert_eq!(s.scale_selected_up(), 0);

        s.select(0, true);
        s.select(2, true);
        assert_eq!(s.scale_selected_up(), 2);
        assert_relative_eq!(s.entries()[0].scale, 1.1);
        assert_eq!(s.entries()[0].scale_percent(), 10);
        assert_relative_eq!(s.entries()[1].scale, 1.0);

        for _ in 0..40 {
            s.scale_selected_down();
        }
        assert_relative_eq!(s.entries()[2].scale, MIN_SCALE);
        assert_eq!(s.entries()[2].scale_percent(), -90);
    }

    #[test]
    fn test_selection_operations() {
        let mut s = session();
        assert_eq!(s.select_all(), 3);
        assert_eq!(s.select_all(), 0);
        assert_eq!(s.deselect_all(), 3);
        s.select(1, true);
        assert_eq!(s.invert_selection(), 3);
        assert_eq!(s.selected_count(), 2);
        assert!(!s.select(9, true));
    }

    #[test]
    fn test_remove_selected_and_clear() {
        let mut s = session();
        s.select(0, true);
        s.select(2, true);
        assert_eq!(s.remove_selected(), 2);
        assert_eq!(s.len(), 1);
        assert_eq!(s.entries()[0].source, "b.png");
        assert_eq!(s.clear(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn test_items_carry_scale_and_padding() {
        let mut s = session();
        s.set_padding(Some(10));
        assert!(s.set_scale(1, 2.0));
        assert!(!s.set_scale(1, -1.0));
        s.set_rotation(2, false);

        let items = s.items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].id(), 1);
        assert_eq!(items[1].footprint().width, 420);
        assert_eq!(items[1].footprint().height, 220);
        assert!(!items[2].allows_rotation());
    }

    #[test]
    fn test_page_count_is_at_least_one() {
        let mut s = session();
        s.set_page_count(0);
        assert_eq!(s.page_count(), 1);
    }

    #[test]
    fn test_parse_padding() {
        assert_eq!(parse_padding("10"), 10);
        assert_eq!(parse_padding(" 25 "), 25);
        assert_eq!(parse_padding("-5"), 0);
        assert_eq!(parse_padding("ten"), 0);
        assert_eq!(parse_padding("1.5"), 0);
        assert_eq!(parse_padding(""), 0);
    }
}
