//! Integer geometry primitives.
//!
//! All coordinates are pixels with the origin at the top-left corner of the
//! canvas; `y` grows downwards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    /// Extent along x.
    pub width: u32,
    /// Extent along y.
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns the size with width and height exchanged.
    pub fn swapped(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if `self` fits inside `other` without rotation.
    pub fn fits_within(&self, other: &Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Length of the longer side.
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Creates a rectangle of the given size at `(x, y)`.
    pub const fn at(x: u32, y: u32, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns the size of the rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the area in square pixels.
    pub fn area(&self) -> u64 {
        self.size().area()
    }

    /// Returns true if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if the two rectangles share a region of positive area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Computes the overlapping region, if it has positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Returns true if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if a rectangle of `size` fits inside without rotation.
    pub fn can_hold(&self, size: Size) -> bool {
        size.fits_within(&self.size())
    }

    /// Shrinks the rectangle by `inset` on every side.
    ///
    /// Returns an empty rectangle at the centre when the inset consumes it.
    pub fn inset(&self, inset: u32) -> Rect {
        let width = self.width.saturating_sub(inset.saturating_mul(2));
        let height = self.height.saturating_sub(inset.saturating_mul(2));
        let dx = (self.width - width) / 2;
        let dy = (self.height - height) / 2;
        Rect::new(self.x + dx, self.y + dy, width, height)
    }

    /// Joins two rectangles that share one complete edge.
    ///
    /// Returns `None` unless the union is itself a rectangle.
    pub fn merge(&self, other: &Rect) -> Option<Rect> {
        if self.x == other.x && self.width == other.width {
            if self.bottom() == other.y {
                return Some(Rect::new(self.x, self.y, self.width, self.height + other.height));
            }
            if other.bottom() == self.y {
                return Some(Rect::new(self.x, other.y, self.width, self.height + other.height));
            }
        }
        if self.y == other.y && self.height == other.height {
            if self.right() == other.x {
                return Some(Rect::new(self.x, self.y, self.width + other.width, self.height));
            }
            if other.right() == self.x {
                return Some(Rect::new(other.x, self.y, self.width + other.width, self.height));
            }
        }
        None
    }
}
