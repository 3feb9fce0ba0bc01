//! Guillotine rectangle packer.
//!
//! Items are placed largest first into the best-fitting free rectangle of a
//! single bin. The packer never gives up early: items that find no space are
//! collected and packing continues with the rest, so a failed attempt still
//! reports how far it got.

use crate::free_space::FreeRectSet;
use photopack_core::geometry::{Rect, Size};
use photopack_core::item::{Item, ItemId};
use photopack_core::placement::{PartialFailure, Placement, PlacementResult};
use photopack_core::solver::{BinPacker, Config, PackResult, SplitRule};
use std::cmp::Reverse;

/// Best-area-fit packer over a guillotine free-space tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuillotinePacker {
    split_rule: SplitRule,
    merge_free_rects: bool,
}

/// A candidate spot for one item.
#[derive(Debug, Clone, Copy)]
struct Fit {
    rect: Rect,
    size: Size,
    rotated: bool,
}

impl Default for GuillotinePacker {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GuillotinePacker {
    /// Creates a packer with the given split rule and merge setting.
    pub fn new(split_rule: SplitRule, merge_free_rects: bool) -> Self {
        Self {
            split_rule,
            merge_free_rects,
        }
    }

    /// Creates a packer from the engine configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.split_rule, config.merge_free_rects)
    }

    /// Free space left by a finished placement, split the way this packer splits.
    pub fn free_space(&self, result: &PlacementResult) -> FreeRectSet {
        FreeRectSet::after_placement(result, self.split_rule, self.merge_free_rects)
    }

    /// Scans the free rectangles for the tightest spot.
    ///
    /// Candidates rank by leftover area, then the shorter leftover side, then
    /// rectangle order, then un-rotated before rotated.
    fn best_fit(free: &FreeRectSet, item: &Item) -> Option<Fit> {
        let mut best: Option<((u64, u32, usize, bool), Fit)> = None;
        for (index, rect) in free.rects().iter().enumerate() {
            for (size, rotated) in item.orientations() {
                if !rect.can_hold(size) {
                    continue;
                }
                let leftover_area = rect.area() - size.area();
                let leftover_side = (rect.width - size.width).min(rect.height - size.height);
                let key = (leftover_area, leftover_side, index, rotated);
                if best.as_ref().map_or(true, |(k, _)| key < *k) {
                    best = Some((
                        key,
                        Fit {
                            rect: *rect,
                            size,
                            rotated,
                        },
                    ));
                }
            }
        }
        best.map(|(_, fit)| fit)
    }
}

/// Processing order: descending footprint area, then ID, then slice position.
fn packing_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| (Reverse(items[i].footprint_area()), items[i].id(), i));
    order
}

impl BinPacker for GuillotinePacker {
    fn pack(&self, items: &[Item], bin_width: u32, bin_height: u32) -> PackResult {
        let bin = Size::new(bin_width, bin_height);
        let mut free = FreeRectSet::new(bin)
            .with_split_rule(self.split_rule)
            .with_merge(self.merge_free_rects);
        let mut result = PlacementResult::new(bin);
        let mut unplaced: Vec<ItemId> = Vec::new();
        let mut infeasible: Vec<ItemId> = Vec::new();

        for index in packing_order(items) {
            let item = &items[index];
            if !item.fits_within(&bin) {
                infeasible.push(item.id());
                continue;
            }
            match Self::best_fit(&free, item) {
                Some(fit) => {
                    let placement =
                        Placement::new(item.id(), fit.rect.x, fit.rect.y, fit.size, fit.rotated)
                            .with_padding(item.padding());
                    free.subtract(placement.rect());
                    result.push(placement);
                }
                None => unplaced.push(item.id()),
            }
        }

        result.sort_by_id();
        if unplaced.is_empty() && infeasible.is_empty() {
            Ok(result)
        } else {
            unplaced.sort_unstable();
            infeasible.sort_unstable();
            Err(PartialFailure {
                placed: result,
                unplaced,
                infeasible,
            })
        }
    }
}
