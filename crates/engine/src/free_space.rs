//! Free-space tracking with guillotine splits.
//!
//! The tracker holds the unoccupied parts of a bin as a list of pairwise
//! disjoint rectangles whose union is exactly the free area. Subtracting an
//! occupied region replaces every free rectangle it touches by up to four
//! strips around the overlap.

use photopack_core::geometry::{Rect, Size};
use photopack_core::placement::PlacementResult;
use photopack_core::solver::SplitRule;

/// Disjoint set of free rectangles inside a bin.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeRectSet {
    rects: Vec<Rect>,
    split_rule: SplitRule,
    merge: bool,
}

impl FreeRectSet {
    /// Creates a set covering the whole bin.
    pub fn new(bin: Size) -> Self {
        let rects = if bin.is_empty() {
            Vec::new()
        } else {
            vec![Rect::from_size(bin)]
        };
        Self {
            rects,
            split_rule: SplitRule::default(),
            merge: false,
        }
    }

    /// Sets the split rule used by [`subtract`](Self::subtract).
    pub fn with_split_rule(mut self, rule: SplitRule) -> Self {
        self.split_rule = rule;
        self
    }

    /// Enables joining of neighbours after every subtraction.
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Rebuilds the free space of a finished placement.
    pub fn after_placement(result: &PlacementResult, rule: SplitRule, merge: bool) -> Self {
        let mut set = Self::new(result.bin)
            .with_split_rule(rule)
            .with_merge(merge);
        for placement in result {
            set.subtract(placement.rect());
        }
        set
    }

    /// Removes `occupied` from the free space.
    pub fn subtract(&mut self, occupied: Rect) {
        if occupied.is_empty() {
            return;
        }
        let mut next = Vec::with_capacity(self.rects.len() + 3);
        for free in &self.rects {
            match free.intersection(&occupied) {
                Some(overlap) => next.extend(split(free, &overlap, self.split_rule)),
                None => next.push(*free),
            }
        }
        self.rects = next;
        if self.merge {
            self.merge_adjacent();
        }
    }

    /// Free rectangles whose sides are both at least `min_size`.
    pub fn query(&self, min_size: u32) -> Vec<Rect> {
        self.rects
            .iter()
            .filter(|r| r.width >= min_size && r.height >= min_size)
            .copied()
            .collect()
    }

    /// Joins pairs of rectangles sharing a complete edge until none remain.
    pub fn merge_adjacent(&mut self) {
        'outer: loop {
            for i in 0..self.rects.len() {
                for j in (i + 1)..self.rects.len() {
                    if let Some(merged) = self.rects[i].merge(&self.rects[j]) {
                        self.rects[i] = merged;
                        self.rects.remove(j);
                        continue 'outer;
                    }
                }
            }
            break;
        }
    }

    /// The free rectangles in tracker order.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Consumes the set, returning its rectangles.
    pub fn into_rects(self) -> Vec<Rect> {
        self.rects
    }

    /// Number of free rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns true if no free space is left.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Total free area.
    pub fn free_area(&self) -> u64 {
        self.rects.iter().map(Rect::area).sum()
    }
}

/// Splits `free` around `used`, which must lie inside it.
fn split(free: &Rect, used: &Rect, rule: SplitRule) -> Vec<Rect> {
    let pieces = match rule {
        SplitRule::Vertical => split_vertical(free, used),
        SplitRule::Horizontal => split_horizontal(free, used),
        SplitRule::MaxArea => {
            let vertical = split_vertical(free, used);
            let horizontal = split_horizontal(free, used);
            if largest(&vertical) > largest(&horizontal) {
                vertical
            } else {
                horizontal
            }
        }
    };
    pieces.into_iter().filter(|r| !r.is_empty()).collect()
}

// Left and right strips take the full height of the free rectangle.
fn split_vertical(f: &Rect, u: &Rect) -> [Rect; 4] {
    [
        Rect::new(f.x, f.y, u.x - f.x, f.height),
        Rect::new(u.right(), f.y, f.right() - u.right(), f.height),
        Rect::new(u.x, f.y, u.width, u.y - f.y),
        Rect::new(u.x, u.bottom(), u.width, f.bottom() - u.bottom()),
    ]
}

// Strips above and below take the full width of the free rectangle.
fn split_horizontal(f: &Rect, u: &Rect) -> [Rect; 4] {
    [
        Rect::new(f.x, f.y, f.width, u.y - f.y),
        Rect::new(f.x, u.bottom(), f.width, f.bottom() - u.bottom()),
        Rect::new(f.x, u.y, u.x - f.x, u.height),
        Rect::new(u.right(), u.y, f.right() - u.right(), u.height),
    ]
}

fn largest(rects: &[Rect]) -> u64 {
    rects.iter().map(Rect::area).max().unwrap_or(0)
}
