//! Placement representation for positioned items.

use crate::geometry::{Rect, Size};
use crate::item::ItemId;
use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The placement of a single item on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The ID of the placed item.
    pub item_id: ItemId,
    /// Left edge of the footprint.
    pub x: u32,
    /// Top edge of the footprint.
    pub y: u32,
    /// Placed footprint width (already swapped when rotated).
    pub width: u32,
    /// Placed footprint height (already swapped when rotated).
    pub height: u32,
    /// Whether the item was turned by 90°.
    pub rotated: bool,
    /// Padding inside the footprint around the image.
    pub padding: u32,
}

impl Placement {
    /// Creates a placement of `size` at `(x, y)`.
    pub fn new(item_id: ItemId, x: u32, y: u32, size: Size, rotated: bool) -> Self {
        Self {
            item_id,
            x,
            y,
            width: size.width,
            height: size.height,
            rotated,
            padding: 0,
        }
    }

    /// Sets the padding inside the footprint.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the footprint rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Returns the rectangle covered by the image itself.
    pub fn content_rect(&self) -> Rect {
        self.rect().inset(self.padding)
    }
}

/// Placements of items in a single bin.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementResult {
    /// Size of the bin the items were placed in.
    pub bin: Size,
    /// Placements ordered by item ID.
    pub placements: Vec<Placement>,
}

impl PlacementResult {
    /// Creates an empty result for a bin.
    pub fn new(bin: Size) -> Self {
        Self {
            bin,
            placements: Vec::new(),
        }
    }

    /// Adds a placement.
    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Orders placements by item ID.
    pub fn sort_by_id(&mut self) {
        self.placements.sort_by_key(|p| p.item_id);
    }

    /// Returns the number of placed items.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns true if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Looks up the placement of an item.
    pub fn get(&self, item_id: ItemId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.item_id == item_id)
    }

    /// Iterates the placements.
    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    /// Sum of all footprint areas.
    pub fn footprint_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect().area()).sum()
    }

    /// Returns the first pair of placements whose footprints overlap.
    pub fn find_overlap(&self) -> Option<(ItemId, ItemId)> {
        for (i, a) in self.placements.iter().enumerate() {
            for b in &self.placements[i + 1..] {
                if a.rect().intersects(&b.rect()) {
                    return Some((a.item_id, b.item_id));
                }
            }
        }
        None
    }

    /// Returns true if every footprint lies inside the bin.
    pub fn within_bin(&self) -> bool {
        let bin = Rect::from_size(self.bin);
        self.placements.iter().all(|p| bin.contains(&p.rect()))
    }
}

impl<'a> IntoIterator for &'a PlacementResult {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// Outcome of a pack attempt that could not place every item.
///
/// The successfully placed subset never overlaps and stays inspectable.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartialFailure {
    /// Items that were placed.
    pub placed: PlacementResult,
    /// Items that fit the bin in principle but found no free space.
    pub unplaced: Vec<ItemId>,
    /// Items larger than the bin in every allowed orientation.
    pub infeasible: Vec<ItemId>,
}

impl PartialFailure {
    /// Number of items placed.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Number of items that were handed to the packer.
    pub fn requested_count(&self) -> usize {
        self.placed.len() + self.unplaced.len() + self.infeasible.len()
    }

    /// All item IDs that were not placed, in ascending order.
    pub fn missing(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .unplaced
            .iter()
            .chain(self.infeasible.iter())
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Converts the failure of the last of `attempts` pack calls into an error.
    ///
    /// An item too large for the bin is reported ahead of a plain shortage.
    pub fn into_error(self, attempts: usize) -> Error {
        match self.infeasible.first() {
            Some(&id) => Error::InfeasibleItem {
                id,
                bin_width: self.placed.bin.width,
                bin_height: self.placed.bin.height,
            },
            None => Error::PackingExhausted {
                placed: self.placed_count(),
                requested: self.requested_count(),
                attempts,
            },
        }
    }
}
