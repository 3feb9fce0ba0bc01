//! Logo and watermark overlay types.

use crate::geometry::{Rect, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Intrinsic size of a logo image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogoSpec {
    /// Logo width in pixels.
    pub width: u32,
    /// Logo height in pixels.
    pub height: u32,
}

impl LogoSpec {
    /// Creates a logo of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest uniformly scaled copy that fits `max`, never enlarged.
    ///
    /// Returns `None` if the result would collapse below one pixel.
    pub fn fit_within(&self, max: Size) -> Option<Size> {
        if self.width == 0 || self.height == 0 || max.is_empty() {
            return None;
        }
        let scale = (max.width as f64 / self.width as f64)
            .min(max.height as f64 / self.height as f64)
            .min(1.0);
        let width = (self.width as f64 * scale).floor() as u32;
        let height = (self.height as f64 * scale).floor() as u32;
        if width == 0 || height == 0 {
            None
        } else {
            Some(Size::new(width, height))
        }
    }
}

/// Watermark text and its preferred typography.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextSpec {
    /// Caption text.
    pub content: String,
    /// Preferred font size.
    pub font_size: u32,
    /// Typeface name handed to the text measurer.
    pub typeface: String,
}

impl TextSpec {
    /// Creates a caption.
    pub fn new(content: impl Into<String>, font_size: u32, typeface: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size,
            typeface: typeface.into(),
        }
    }
}

/// What to place in the leftover space of a page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayRequest {
    /// Optional logo.
    pub logo: Option<LogoSpec>,
    /// Optional watermark caption.
    pub text: Option<TextSpec>,
}

impl OverlayRequest {
    /// Returns true if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.logo.is_none() && self.text_content().is_none()
    }

    /// The caption, ignoring blank text.
    pub fn text_content(&self) -> Option<&TextSpec> {
        self.text
            .as_ref()
            .filter(|t| !t.content.trim().is_empty())
    }
}

/// Where the caption ended up and at which size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextPlacement {
    /// Bounding box of the rendered caption.
    pub rect: Rect,
    /// Font size after shrinking.
    pub font_size: u32,
}

/// Result of overlay placement on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OverlayPlacement {
    /// The free rectangle that was chosen.
    pub target: Rect,
    /// Logo rectangle, if a logo was placed.
    pub logo: Option<Rect>,
    /// Caption placement, if text was placed.
    pub text: Option<TextPlacement>,
}

impl OverlayPlacement {
    /// Returns true if both logo and text were placed.
    pub fn is_side_by_side(&self) -> bool {
        self.logo.is_some() && self.text.is_some()
    }
}

/// Black-box text measurement supplied by the caller.
pub trait TextMeasure {
    /// Bounding box of `text` rendered at `font_size` in `typeface`.
    fn measure(&self, text: &str, font_size: u32, typeface: &str) -> Size;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, u32, &str) -> Size,
{
    fn measure(&self, text: &str, font_size: u32, typeface: &str) -> Size {
        self(text, font_size, typeface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_never_enlarged() {
        let logo = LogoSpec::new(100, 50);
        assert_eq!(logo.fit_within(Size::new(500, 500)), Some(Size::new(100, 50)));
    }

    #[test]
    fn test_logo_scaled_down_uniformly() {
        let logo = LogoSpec::new(100, 50);
        assert_eq!(logo.fit_within(Size::new(50, 500)), Some(Size::new(50, 25)));
        assert_eq!(logo.fit_within(Size::new(500, 10)), Some(Size::new(20, 10)));
    }

    #[test]
    fn test_logo_collapse() {
        let logo = LogoSpec::new(1000, 10);
        assert!(logo.fit_within(Size::new(50, 50)).is_none());
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let request = OverlayRequest {
            logo: None,
            text: Some(TextSpec::new("   ", 12, "Sans")),
        };
        assert!(request.is_empty());
        assert!(request.text_content().is_none());
    }

    #[test]
    fn test_closure_measure() {
        let measure = |text: &str, size: u32, _: &str| Size::new(text.len() as u32 * size, size);
        assert_eq!(measure.measure("abc", 10, "Sans"), Size::new(30, 10));
    }
}
