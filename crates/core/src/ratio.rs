//! Aspect ratios and paper presets.
//!
//! Ratios are always expressed as `height / width`.

use crate::geometry::Size;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A positive, finite `height / width` ratio.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// A 1:1 canvas.
    pub const SQUARE: AspectRatio = AspectRatio(1.0);
    /// A-series paper held upright (`√2`).
    pub const A_SERIES: AspectRatio = AspectRatio(std::f64::consts::SQRT_2);
    /// B/C-series (`1/√2`).
    pub const B_SERIES: AspectRatio = AspectRatio(std::f64::consts::FRAC_1_SQRT_2);
    /// US Letter held upright (`11 / 8.5`).
    pub const LETTER: AspectRatio = AspectRatio(11.0 / 8.5);

    /// Creates a ratio, rejecting zero, negative and non-finite values.
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio.is_finite() && ratio > 0.0 {
            Ok(Self(ratio))
        } else {
            Err(Error::InvalidConfig(format!(
                "aspect ratio must be positive and finite, got {ratio}"
            )))
        }
    }

    /// Ratio of a `width x height` rectangle.
    pub fn from_dimensions(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "ratio width must be positive, got {width}"
            )));
        }
        Self::new(height / width)
    }

    /// Parses a ratio, falling back to a square canvas on bad input.
    pub fn parse_lenient(text: &str) -> Self {
        text.parse().unwrap_or_else(|e| {
            log::warn!("{e}; falling back to a 1:1 canvas");
            Self::SQUARE
        })
    }

    /// Returns the raw `height / width` value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the ratio of the same shape turned by 90°.
    pub fn inverse(&self) -> Self {
        Self(1.0 / self.0)
    }

    /// Canvas height for a given width, rounded to the nearest pixel (at least 1).
    pub fn height_for(&self, width: u32) -> u32 {
        let height = (width as f64 * self.0).round();
        if height < 1.0 {
            1
        } else if height >= u32::MAX as f64 {
            u32::MAX
        } else {
            height as u32
        }
    }

    /// Canvas of this ratio with the given width.
    pub fn canvas(&self, width: u32) -> Size {
        Size::new(width, self.height_for(width))
    }

    /// Named presets as `(name, ratio)` pairs.
    pub fn presets() -> [(&'static str, AspectRatio); 5] {
        [
            ("a-series", Self::A_SERIES),
            ("b-series", Self::B_SERIES),
            ("c-series", Self::B_SERIES),
            ("letter", Self::LETTER),
            ("square", Self::SQUARE),
        ]
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::A_SERIES
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl TryFrom<f64> for AspectRatio {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AspectRatio> for f64 {
    fn from(ratio: AspectRatio) -> f64 {
        ratio.0
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    /// Accepts a preset name, `"W:H"`, or a decimal `height / width` value.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim().to_ascii_lowercase();
        match text.as_str() {
            "a" | "a-series" | "a4" | "iso" => return Ok(Self::A_SERIES),
            "b" | "b-series" | "c" | "c-series" => return Ok(Self::B_SERIES),
            "letter" => return Ok(Self::LETTER),
            "square" => return Ok(Self::SQUARE),
            _ => {}
        }

        let invalid = || Error::InvalidConfig(format!("invalid aspect ratio '{}'", s.trim()));

        if let Some((w, h)) = text.split_once(':') {
            let width: f64 = w.trim().parse().map_err(|_| invalid())?;
            let height: f64 = h.trim().parse().map_err(|_| invalid())?;
            return Self::from_dimensions(width, height).map_err(|_| invalid());
        }

        let value: f64 = text.parse().map_err(|_| invalid())?;
        Self::new(value).map_err(|_| invalid())
    }
}

/// Standard paper sizes, upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PaperSize {
    /// 297 × 420 mm.
    A3,
    /// 210 × 297 mm.
    #[default]
    A4,
    /// 148 × 210 mm.
    A5,
    /// 8.5 × 11 in.
    Letter,
}

impl PaperSize {
    /// Physical `(width, height)` in millimetres.
    pub fn millimetres(&self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
        }
    }

    /// Pixel dimensions at the given resolution, truncated.
    pub fn pixels(&self, dpi: u32) -> Size {
        let (w, h) = self.millimetres();
        let to_px = |mm: f64| (mm / 25.4 * dpi as f64) as u32;
        Size::new(to_px(w), to_px(h))
    }

    /// Upright aspect ratio of the sheet.
    pub fn ratio(&self) -> AspectRatio {
        let (w, h) = self.millimetres();
        AspectRatio(h / w)
    }

    /// All presets.
    pub fn all() -> [PaperSize; 4] {
        [PaperSize::A3, PaperSize::A4, PaperSize::A5, PaperSize::Letter]
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaperSize::A3 => "a3",
            PaperSize::A4 => "a4",
            PaperSize::A5 => "a5",
            PaperSize::Letter => "letter",
        };
        f.write_str(name)
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a3" => Ok(PaperSize::A3),
            "a4" => Ok(PaperSize::A4),
            "a5" => Ok(PaperSize::A5),
            "letter" => Ok(PaperSize::Letter),
            other => Err(Error::InvalidConfig(format!("unknown paper size '{other}'"))),
        }
    }
}
