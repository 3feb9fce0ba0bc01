//! Layout result representation and statistics.

use crate::geometry::{Rect, Size};
use crate::item::ItemId;
use crate::overlay::OverlayPlacement;
use crate::placement::{PartialFailure, PlacementResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canvas orientation relative to the requested ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// The requested ratio as given.
    #[default]
    Portrait,
    /// The requested ratio turned by 90°.
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

/// Whether a page holds every item assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageStatus {
    /// Every assigned item was placed.
    Complete,
    /// The growth loop gave up; `unplaced` lists the items left out.
    Exhausted {
        /// Items that were assigned to this page but not placed.
        unplaced: Vec<ItemId>,
    },
}

/// One physical page of a layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageLayout {
    /// Page index (0-based).
    pub index: usize,
    /// Realized canvas size.
    pub canvas: Size,
    /// Item placements on this page.
    pub placement: PlacementResult,
    /// Residual free rectangles after all placements.
    pub free_rects: Vec<Rect>,
    /// Pack calls spent on this page, search probes included.
    pub attempts: usize,
    /// Completion status.
    pub status: PageStatus,
    /// Overlay placed in the leftover space.
    pub overlay: Option<OverlayPlacement>,
}

impl PageLayout {
    /// A page on which everything fit.
    pub fn complete(
        index: usize,
        placement: PlacementResult,
        free_rects: Vec<Rect>,
        attempts: usize,
    ) -> Self {
        Self {
            index,
            canvas: placement.bin,
            placement,
            free_rects,
            attempts,
            status: PageStatus::Complete,
            overlay: None,
        }
    }

    /// A page that could not hold every assigned item.
    pub fn exhausted(
        index: usize,
        failure: PartialFailure,
        free_rects: Vec<Rect>,
        attempts: usize,
    ) -> Self {
        let unplaced = failure.missing();
        Self {
            index,
            canvas: failure.placed.bin,
            placement: failure.placed,
            free_rects,
            attempts,
            status: PageStatus::Exhausted { unplaced },
            overlay: None,
        }
    }

    /// Returns true if every assigned item was placed.
    pub fn is_complete(&self) -> bool {
        self.status == PageStatus::Complete
    }

    /// IDs of placed items, ascending.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.placement.iter().map(|p| p.item_id).collect()
    }

    /// Canvas area in square pixels.
    pub fn canvas_area(&self) -> u64 {
        self.canvas.area()
    }
}

/// All pages of a generated layout.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanvasLayout {
    /// Orientation chosen for the canvas.
    pub orientation: Orientation,
    /// Pages ordered by index.
    pub pages: Vec<PageLayout>,
}

impl CanvasLayout {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if every page is complete.
    pub fn is_complete(&self) -> bool {
        self.pages.iter().all(PageLayout::is_complete)
    }

    /// Total number of placed items across pages.
    pub fn placed_count(&self) -> usize {
        self.pages.iter().map(|p| p.placement.len()).sum()
    }

    /// Pages that ran out of attempts.
    pub fn failed_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| !p.is_complete())
            .map(|p| p.index)
            .collect()
    }
}

/// Area share of one item on its page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemShare {
    /// The item.
    pub item_id: ItemId,
    /// `image area / canvas area * 100`.
    pub area_percent: f64,
}

/// Area statistics for one page.
///
/// Item areas are image areas; padding counts as unused space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageStats {
    /// Page index.
    pub page_index: usize,
    /// Canvas area.
    pub canvas_area: u64,
    /// Sum of placed image areas.
    pub item_area: u64,
    /// `(canvas area - item area) / canvas area * 100`.
    pub unused_area_percent: f64,
    /// Per-item shares in placement order.
    pub items: Vec<ItemShare>,
}

impl PageStats {
    /// Computes statistics for a page.
    pub fn from_page(page: &PageLayout) -> Self {
        let canvas_area = page.canvas_area();
        let percent = |area: u64| {
            if canvas_area == 0 {
                0.0
            } else {
                area as f64 / canvas_area as f64 * 100.0
            }
        };

        let mut item_area = 0;
        let items = page
            .placement
            .iter()
            .map(|p| {
                let area = p.content_rect().area();
                item_area += area;
                ItemShare {
                    item_id: p.item_id,
                    area_percent: percent(area),
                }
            })
            .collect();

        Self {
            page_index: page.index,
            canvas_area,
            item_area,
            unused_area_percent: percent(canvas_area.saturating_sub(item_area)),
            items,
        }
    }
}

/// Summary of a generated layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutSummary {
    /// Items handed to the engine.
    pub total_requested: usize,
    /// Items placed.
    pub total_placed: usize,
    /// Pages produced.
    pub pages: usize,
    /// Pages that hold all of their items.
    pub complete_pages: usize,
    /// Unused area over all pages.
    pub unused_area_percent: f64,
    /// Chosen orientation.
    pub orientation: Orientation,
}

impl LayoutSummary {
    /// Summarises a layout produced for `requested` items.
    pub fn new(layout: &CanvasLayout, stats: &[PageStats], requested: usize) -> Self {
        let canvas_area: u64 = stats.iter().map(|s| s.canvas_area).sum();
        let item_area: u64 = stats.iter().map(|s| s.item_area).sum();
        let unused_area_percent = if canvas_area == 0 {
            0.0
        } else {
            canvas_area.saturating_sub(item_area) as f64 / canvas_area as f64 * 100.0
        };
        Self {
            total_requested: requested,
            total_placed: layout.placed_count(),
            pages: layout.page_count(),
            complete_pages: layout.pages.iter().filter(|p| p.is_complete()).count(),
            unused_area_percent,
            orientation: layout.orientation,
        }
    }
}

/// Everything a generate call hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutReport {
    /// The pages.
    pub layout: CanvasLayout,
    /// Statistics per page, same order as the pages.
    pub stats: Vec<PageStats>,
    /// Overall summary.
    pub summary: LayoutSummary,
}

impl LayoutReport {
    /// Builds a report, computing statistics from the layout.
    pub fn new(layout: CanvasLayout, requested: usize) -> Self {
        let stats: Vec<PageStats> = layout.pages.iter().map(PageStats::from_page).collect();
        let summary = LayoutSummary::new(&layout, &stats, requested);
        Self {
            layout,
            stats,
            summary,
        }
    }

    /// Area share of an item on whichever page holds it.
    pub fn item_area_percent(&self, item_id: ItemId) -> Option<f64> {
        self.stats
            .iter()
            .flat_map(|s| s.items.iter())
            .find(|share| share.item_id == item_id)
            .map(|share| share.area_percent)
    }

    /// Human readable one-line status, in the spirit of the desktop app's status bar.
    pub fn status_line(&self) -> String {
        let first = self.layout.pages.first().map(|p| p.canvas).unwrap_or_default();
        format!(
            "Orientation: {}. Canvas size: {}x{} pixels. Pages: {}. Placed {} of {}. Unused area percentage: {:.2}%.",
            self.summary.orientation,
            first.width,
            first.height,
            self.summary.pages,
            self.summary.total_placed,
            self.summary.total_requested,
            self.summary.unused_area_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Placement;
    use approx::assert_relative_eq;

    fn page_with(placements: Vec<Placement>, canvas: Size) -> PageLayout {
        let mut result = PlacementResult::new(canvas);
        for p in placements {
            result.push(p);
        }
        PageLayout::complete(0, result, Vec::new(), 1)
    }

    #[test]
    fn test_full_canvas_has_no_waste() {
        let page = page_with(
            vec![
                Placement::new(0, 0, 0, Size::new(100, 100), false),
                Placement::new(1, 100, 0, Size::new(100, 100), false),
                Placement::new(2, 200, 0, Size::new(100, 100), false),
            ],
            Size::new(300, 100),
        );
        let stats = PageStats::from_page(&page);
        assert_relative_eq!(stats.unused_area_percent, 0.0);
        for share in &stats.items {
            assert_relative_eq!(share.area_percent, 100.0 / 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_padding_counts_as_unused() {
        let page = page_with(
            vec![Placement::new(0, 0, 0, Size::new(70, 70), false).with_padding(10)],
            Size::new(70, 70),
        );
        let stats = PageStats::from_page(&page);
        assert_eq!(stats.item_area, 2_500);
        assert_relative_eq!(stats.unused_area_percent, (4_900.0 - 2_500.0) / 4_900.0 * 100.0);
    }

    #[test]
    fn test_report_summary() {
        let page = page_with(
            vec![Placement::new(3, 0, 0, Size::new(100, 50), true)],
            Size::new(100, 100),
        );
        let layout = CanvasLayout {
            orientation: Orientation::Landscape,
            pages: vec![page],
        };
        let report = LayoutReport::new(layout, 2);
        assert_eq!(report.summary.total_placed, 1);
        assert_eq!(report.summary.total_requested, 2);
        assert_relative_eq!(report.summary.unused_area_percent, 50.0);
        assert_relative_eq!(report.item_area_percent(3).unwrap(), 50.0);
        assert!(report.item_area_percent(0).is_none());
        assert!(report.status_line().contains("landscape"));
    }

    #[test]
    fn test_exhausted_page() {
        let failure = PartialFailure {
            placed: PlacementResult::new(Size::new(10, 10)),
            unplaced: vec![4, 1],
            infeasible: vec![2],
        };
        let page = PageLayout::exhausted(1, failure, Vec::new(), 20);
        assert!(!page.is_complete());
        assert_eq!(
            page.status,
            PageStatus::Exhausted {
                unplaced: vec![1, 2, 4]
            }
        );
        let layout = CanvasLayout {
            orientation: Orientation::Portrait,
            pages: vec![page],
        };
        assert_eq!(layout.failed_pages(), vec![1]);
        assert!(!layout.is_complete());
    }
}
