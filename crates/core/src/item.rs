//! Items to be packed.

use crate::geometry::Size;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable index of an item in the caller's original ordering.
pub type ItemId = usize;

/// A rectangular image to be placed on a canvas.
///
/// The placement footprint is the scaled image plus `padding` on all four
/// sides: `(round(w·s) + 2p, round(h·s) + 2p)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    id: ItemId,
    width: u32,
    height: u32,
    scale: f64,
    padding: u32,
    allow_rotation: bool,
}

impl Item {
    /// Creates an unscaled, unpadded item that may be rotated.
    pub fn new(id: ItemId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            scale: 1.0,
            padding: 0,
            allow_rotation: true,
        }
    }

    /// Sets the uniform scale factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the padding applied on every side of the scaled image.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Allows or forbids 90° rotation.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Returns the item ID.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the intrinsic width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the intrinsic height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the padding.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Returns whether the item may be rotated by 90°.
    pub fn allows_rotation(&self) -> bool {
        self.allow_rotation
    }

    /// Scaled image size without padding. No side rounds below one pixel.
    pub fn scaled_size(&self) -> Size {
        Size::new(
            scale_side(self.width, self.scale),
            scale_side(self.height, self.scale),
        )
    }

    /// Un-rotated placement footprint, saturating at `u32::MAX` per side.
    ///
    /// [`Item::validate`] rejects items whose footprint saturates.
    pub fn footprint(&self) -> Size {
        let scaled = self.scaled_size();
        let pad = self.padding.saturating_mul(2);
        Size::new(
            scaled.width.saturating_add(pad),
            scaled.height.saturating_add(pad),
        )
    }

    fn footprint_overflows(&self) -> bool {
        let pad = 2.0 * self.padding as f64;
        let too_big = |side: u32| (side as f64 * self.scale).round() + pad >= u32::MAX as f64;
        too_big(self.width) || too_big(self.height)
    }

    /// Footprint after a 90° rotation.
    pub fn rotated_footprint(&self) -> Size {
        self.footprint().swapped()
    }

    /// Area of the footprint including padding.
    pub fn footprint_area(&self) -> u64 {
        self.footprint().area()
    }

    /// Area of the scaled image alone.
    pub fn image_area(&self) -> u64 {
        self.scaled_size().area()
    }

    /// Footprints this item may be placed with, paired with the rotation flag.
    ///
    /// The un-rotated footprint always comes first. A square footprint yields
    /// a single entry since rotating it changes nothing.
    pub fn orientations(&self) -> Vec<(Size, bool)> {
        let upright = self.footprint();
        let mut out = vec![(upright, false)];
        if self.allow_rotation && upright.width != upright.height {
            out.push((upright.swapped(), true));
        }
        out
    }

    /// Returns true if the footprint fits `bin` in at least one allowed orientation.
    pub fn fits_within(&self, bin: &Size) -> bool {
        self.orientations()
            .iter()
            .any(|(size, _)| size.fits_within(bin))
    }

    /// Validates the item.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidItem {
                id: self.id,
                reason: format!("dimensions must be positive, got {}x{}", self.width, self.height),
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidItem {
                id: self.id,
                reason: format!("scale must be positive, got {}", self.scale),
            });
        }
        if self.footprint_overflows() {
            return Err(Error::InvalidItem {
                id: self.id,
                reason: format!(
                    "footprint of {}x{} at scale {} with padding {} is too large",
                    self.width, self.height, self.scale, self.padding
                ),
            });
        }
        Ok(())
    }
}

fn scale_side(side: u32, scale: f64) -> u32 {
    let scaled = (side as f64 * scale).round();
    if scaled < 1.0 {
        1
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}
