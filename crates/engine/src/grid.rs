//! Uniform grid arrangement on a fixed canvas.
//!
//! Each image gets one equal cell and is scaled uniformly, up or down, to
//! the largest size that fits the cell minus its padding. The image's own
//! scale factor plays no part since every image is fitted to its cell.

use crate::free_space::FreeRectSet;
use photopack_core::geometry::{Rect, Size};
use photopack_core::item::{Item, ItemId};
use photopack_core::placement::{PartialFailure, Placement, PlacementResult};
use photopack_core::result::{CanvasLayout, Orientation, PageLayout};
use photopack_core::solver::{GridPolicy, SplitRule};
use photopack_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One item in its grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCell {
    /// The item.
    pub item_id: ItemId,
    /// The whole cell.
    pub cell: Rect,
    /// Where the image itself lands.
    pub placed: Rect,
    /// Scale applied to the intrinsic image size.
    pub scale: f64,
    /// Whether the image was turned by 90°.
    pub rotated: bool,
}

/// A grid arrangement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridLayout {
    /// Canvas the grid covers.
    pub canvas: Size,
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
    /// Cells in item order, filled row by row.
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    /// Total area covered by images.
    pub fn covered_area(&self) -> u64 {
        self.cells.iter().map(|c| c.placed.area()).sum()
    }

    /// Converts the grid into a single-page layout.
    ///
    /// Images whose padding leaves no room in their cell are dropped and the
    /// page is reported as exhausted with their ids.
    pub fn into_layout(self) -> CanvasLayout {
        let orientation = if self.canvas.height >= self.canvas.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };
        let mut placement = PlacementResult::new(self.canvas);
        let mut dropped = Vec::new();
        for cell in &self.cells {
            if cell.placed.is_empty() {
                dropped.push(cell.item_id);
                continue;
            }
            placement.push(Placement::new(
                cell.item_id,
                cell.placed.x,
                cell.placed.y,
                cell.placed.size(),
                cell.rotated,
            ));
        }
        placement.sort_by_id();
        let free = FreeRectSet::after_placement(&placement, SplitRule::default(), true);
        let page = if dropped.is_empty() {
            PageLayout::complete(0, placement, free.into_rects(), 1)
        } else {
            log::warn!("grid cells too small for items {dropped:?}");
            let failure = PartialFailure {
                placed: placement,
                unplaced: dropped,
                infeasible: Vec::new(),
            };
            PageLayout::exhausted(0, failure, free.into_rects(), 1)
        };
        CanvasLayout {
            orientation,
            pages: vec![page],
        }
    }
}

/// Scale and rotation that make `image` as large as possible inside `room`.
fn fit(image: Size, room: Size, allow_rotation: bool) -> (f64, bool) {
    if image.is_empty() || room.is_empty() {
        return (0.0, false);
    }
    let scale = |w: u32, h: u32| (room.width as f64 / w as f64).min(room.height as f64 / h as f64);
    let upright = scale(image.width, image.height);
    if allow_rotation {
        let turned = scale(image.height, image.width);
        if turned > upright {
            return (turned, true);
        }
    }
    (upright, false)
}

fn fitted_size(image: Size, scale: f64, rotated: bool) -> Size {
    let size = Size::new(
        (image.width as f64 * scale).floor() as u32,
        (image.height as f64 * scale).floor() as u32,
    );
    if rotated {
        size.swapped()
    } else {
        size
    }
}

fn place_cells(items: &[Item], canvas: Size, cols: u32, rows: u32) -> Vec<GridCell> {
    let cell_size = Size::new(canvas.width / cols, canvas.height / rows);
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let (col, row) = (i as u32 % cols, i as u32 / cols);
            let cell = Rect::new(
                col * cell_size.width,
                row * cell_size.height,
                cell_size.width,
                cell_size.height,
            );
            let room = cell.inset(item.padding());
            let image = Size::new(item.width(), item.height());
            let (scale, rotated) = fit(image, room.size(), item.allows_rotation());
            let size = fitted_size(image, scale, rotated);
            let placed = Rect::new(
                room.x + (room.width - size.width.min(room.width)) / 2,
                room.y + (room.height - size.height.min(room.height)) / 2,
                size.width.min(room.width),
                size.height.min(room.height),
            );
            GridCell {
                item_id: item.id(),
                cell,
                placed,
                scale,
                rotated,
            }
        })
        .collect()
}

/// Picks the column count for `policy`. Ties go to fewer columns.
fn choose_columns(items: &[Item], canvas: Size, policy: GridPolicy) -> Option<u32> {
    let n = items.len() as u32;
    let candidates = (1..=n).filter_map(|cols| {
        let rows = n.div_ceil(cols);
        let usable = canvas.width / cols > 0 && canvas.height / rows > 0;
        usable.then_some((cols, rows))
    });

    match policy {
        GridPolicy::MatchAspect => {
            let avg_aspect = items
                .iter()
                .map(|i| i.height() as f64 / i.width() as f64)
                .sum::<f64>()
                / n as f64;
            let target = canvas.height as f64 / canvas.width as f64;
            let mut best: Option<(f64, u32)> = None;
            for (cols, rows) in candidates {
                let diff = (avg_aspect * rows as f64 / cols as f64 - target).abs();
                if best.map_or(true, |(d, _)| diff < d) {
                    best = Some((diff, cols));
                }
            }
            best.map(|(_, cols)| cols)
        }
        GridPolicy::MaximizeCoverage => {
            let mut best: Option<(u64, u32)> = None;
            for (cols, rows) in candidates {
                let covered: u64 = place_cells(items, canvas, cols, rows)
                    .iter()
                    .map(|c| c.placed.area())
                    .sum();
                if best.map_or(true, |(a, _)| covered > a) {
                    best = Some((covered, cols));
                }
            }
            best.map(|(_, cols)| cols)
        }
    }
}

/// Lays `items` out in a uniform grid on `canvas`.
pub fn arrange(items: &[Item], canvas: Size, policy: GridPolicy) -> Result<GridLayout> {
    if items.is_empty() {
        return Err(Error::NoItems);
    }
    for item in items {
        item.validate()?;
    }
    if canvas.is_empty() {
        return Err(Error::InvalidConfig(format!(
            "grid canvas must not be empty, got {}x{}",
            canvas.width, canvas.height
        )));
    }

    let cols = choose_columns(items, canvas, policy).ok_or_else(|| {
        Error::InvalidConfig(format!(
            "a {}x{} canvas is too small for {} grid cells",
            canvas.width,
            canvas.height,
            items.len()
        ))
    })?;
    let rows = (items.len() as u32).div_ceil(cols);
    log::debug!("grid {cols}x{rows} on {}x{}", canvas.width, canvas.height);

    Ok(GridLayout {
        canvas,
        cols,
        rows,
        cells: place_cells(items, canvas, cols, rows),
    })
}
