//! Minimal canvas search at a fixed aspect ratio.
//!
//! The search treats the packer as a feasibility oracle and binary searches
//! the canvas width, with `height = round(width * ratio)`. Feasibility is
//! assumed monotonic in the width; a packer that is not monotonic may make
//! the search settle on a locally minimal width.

use photopack_core::geometry::Size;
use photopack_core::item::Item;
use photopack_core::placement::PlacementResult;
use photopack_core::ratio::AspectRatio;
use photopack_core::result::Orientation;
use photopack_core::solver::BinPacker;
use photopack_core::{Error, Result};

/// A canvas that holds every item, with the placement that proved it.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedCanvas {
    /// Canvas dimensions.
    pub size: Size,
    /// Ratio the canvas was searched at.
    pub ratio: AspectRatio,
    /// Placement found at `size`.
    pub placement: PlacementResult,
    /// Number of pack calls spent.
    pub probes: usize,
}

/// The orientation picked by [`choose_orientation`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationChoice {
    /// Which way the canvas is turned.
    pub orientation: Orientation,
    /// The winning canvas.
    pub canvas: SizedCanvas,
}

/// Smallest width whose canvas height reaches `height`.
fn width_for_height(height: u32, ratio: AspectRatio) -> u64 {
    let estimate = ((height as f64 - 0.5) / ratio.value()).ceil();
    let mut width = if estimate < 1.0 {
        1
    } else if estimate >= u32::MAX as f64 {
        u32::MAX
    } else {
        estimate as u32
    };
    // float rounding can leave the estimate one pixel off either way
    while width > 1 && ratio.height_for(width - 1) >= height {
        width -= 1;
    }
    while width < u32::MAX && ratio.height_for(width) < height {
        width += 1;
    }
    width as u64
}

/// Smallest width whose canvas area reaches `area`.
fn width_for_area(area: u64, ratio: AspectRatio) -> u64 {
    let canvas_area = |w: u64| w * ratio.height_for(w.min(u32::MAX as u64) as u32) as u64;
    let mut width = ((area as f64 / ratio.value()).sqrt().floor() as u64).max(1);
    while width > 1 && canvas_area(width - 1) >= area {
        width -= 1;
    }
    while width < u32::MAX as u64 && canvas_area(width) < area {
        width += 1;
    }
    width
}

/// Smallest width at which the item fits in some allowed orientation.
fn item_min_width(item: &Item, ratio: AspectRatio) -> u64 {
    item.orientations()
        .into_iter()
        .map(|(size, _)| (size.width as u64).max(width_for_height(size.height, ratio)))
        .min()
        .unwrap_or(1)
}

/// Inclusive `(low, high)` range of widths searched for `items`.
///
/// `low` is the largest per-item minimal width or the narrowest canvas with
/// enough area, whichever is larger.
/// `high` is twice the sum of the largest footprint sides, widened until its
/// height can hold the largest side.
pub fn search_bounds(items: &[Item], ratio: AspectRatio) -> (u32, u32) {
    let per_item = items
        .iter()
        .map(|item| item_min_width(item, ratio))
        .max()
        .unwrap_or(1);

    let total_area: u64 = items.iter().map(Item::footprint_area).sum();
    let low = per_item.max(width_for_area(total_area, ratio));

    let side_sum: u64 = items.iter().map(|i| i.footprint().max_side() as u64).sum();
    let max_side = items
        .iter()
        .map(|i| i.footprint().max_side())
        .max()
        .unwrap_or(1);
    let high = (2 * side_sum)
        .max(width_for_height(max_side, ratio))
        .max(low);

    let clamp = |w: u64| w.min(u32::MAX as u64) as u32;
    (clamp(low), clamp(high))
}

/// Finds the narrowest canvas of `ratio` into which `packer` places every item.
pub fn minimal_canvas<P>(packer: &P, items: &[Item], ratio: AspectRatio) -> Result<SizedCanvas>
where
    P: BinPacker + ?Sized,
{
    if items.is_empty() {
        return Err(Error::NoItems);
    }

    let (mut low, mut high) = search_bounds(items, ratio);
    log::debug!("searching widths {low}..={high} at ratio {ratio}");

    let mut probes = 0;
    let mut best: Option<PlacementResult> = None;

    while low < high {
        let mid = low + (high - low) / 2;
        probes += 1;
        match packer.pack(items, mid, ratio.height_for(mid)) {
            Ok(result) => {
                log::debug!("probe {probes}: width {mid} fits");
                high = mid;
                best = Some(result);
            }
            Err(failure) => {
                log::debug!(
                    "probe {probes}: width {mid} placed {}/{}",
                    failure.placed_count(),
                    items.len()
                );
                low = mid + 1;
            }
        }
    }

    // Without an earlier success `low` is the untested upper bound.
    let placement = match best {
        Some(result) => result,
        None => {
            probes += 1;
            match packer.pack(items, low, ratio.height_for(low)) {
                Ok(result) => result,
                Err(failure) => return Err(failure.into_error(probes)),
            }
        }
    };

    Ok(SizedCanvas {
        size: placement.bin,
        ratio,
        placement,
        probes,
    })
}

/// Runs the search for `ratio` and its inverse and keeps the smaller canvas.
///
/// Ties favour portrait. If only one orientation succeeds it wins; if both
/// fail the portrait error is returned. Both searches run on the rayon pool.
pub fn choose_orientation<P>(
    packer: &P,
    items: &[Item],
    ratio: AspectRatio,
) -> Result<OrientationChoice>
where
    P: BinPacker + ?Sized,
{
    if ratio == ratio.inverse() {
        let canvas = minimal_canvas(packer, items, ratio)?;
        return Ok(OrientationChoice {
            orientation: Orientation::Portrait,
            canvas,
        });
    }

    let (portrait, landscape) = rayon::join(
        || minimal_canvas(packer, items, ratio),
        || minimal_canvas(packer, items, ratio.inverse()),
    );

    let choice = match (portrait, landscape) {
        (Ok(p), Ok(l)) => {
            if l.size.area() < p.size.area() {
                OrientationChoice {
                    orientation: Orientation::Landscape,
                    canvas: l,
                }
            } else {
                OrientationChoice {
                    orientation: Orientation::Portrait,
                    canvas: p,
                }
            }
        }
        (Ok(p), Err(e)) => {
            log::debug!("landscape search failed: {e}");
            OrientationChoice {
                orientation: Orientation::Portrait,
                canvas: p,
            }
        }
        (Err(e), Ok(l)) => {
            log::debug!("portrait search failed: {e}");
            OrientationChoice {
                orientation: Orientation::Landscape,
                canvas: l,
            }
        }
        (Err(e), Err(_)) => return Err(e),
    };

    log::info!(
        "chose {} canvas {}x{}",
        choice.orientation,
        choice.canvas.size.width,
        choice.canvas.size.height
    );
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::GuillotinePacker;
    use photopack_core::placement::PartialFailure;
    use photopack_core::solver::PackResult;

    #[test]
    fn test_width_for_height_is_exact() {
        let r = AspectRatio::A_SERIES;
        for h in [1, 2, 50, 141, 142, 1000] {
            let w = width_for_height(h, r) as u32;
            assert!(r.height_for(w) >= h);
            if w > 1 {
                assert!(r.height_for(w - 1) < h);
            }
        }
    }

    #[test]
    fn test_bounds_contain_answer() {
        let items = vec![Item::new(0, 200, 100)];
        let (low, high) = search_bounds(&items, AspectRatio::SQUARE);
        assert_eq!(low, 200);
        assert!(high >= low);

        let (low, _) = search_bounds(&items, AspectRatio::new(0.5).unwrap());
        assert_eq!(low, 200);
    }

    #[test]
    fn test_area_bound() {
        let items: Vec<Item> = (0..4).map(|i| Item::new(i, 100, 100)).collect();
        let (low, _) = search_bounds(&items, AspectRatio::SQUARE);
        assert_eq!(low, 200);
        assert_eq!(width_for_area(40_001, AspectRatio::SQUARE), 201);
    }

    #[test]
    fn test_single_item_square_ratio() {
        let packer = GuillotinePacker::default();
        let items = vec![Item::new(0, 200, 100)];
        let canvas = minimal_canvas(&packer, &items, AspectRatio::SQUARE).unwrap();
        assert_eq!(canvas.size, Size::new(200, 200));
    }

    #[test]
    fn test_landscape_wins_for_wide_item() {
        let packer = GuillotinePacker::default();
        let items = vec![Item::new(0, 200, 100).with_rotation(false)];
        let choice = choose_orientation(&packer, &items, AspectRatio::new(2.0).unwrap()).unwrap();
        assert_eq!(choice.orientation, Orientation::Landscape);
        assert_eq!(choice.canvas.size, Size::new(200, 100));
    }

    #[test]
    fn test_square_ratio_tie_is_portrait() {
        let packer = GuillotinePacker::default();
        let items = vec![Item::new(0, 100, 100), Item::new(1, 100, 100)];
        let choice = choose_orientation(&packer, &items, AspectRatio::SQUARE).unwrap();
        assert_eq!(choice.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_result_is_minimal() {
        let packer = GuillotinePacker::default();
        let items: Vec<Item> = (0..6).map(|i| Item::new(i, 60 + i as u32 * 10, 40)).collect();
        let ratio = AspectRatio::A_SERIES;
        let canvas = minimal_canvas(&packer, &items, ratio).unwrap();
        let w = canvas.size.width;
        assert!(canvas.placement.find_overlap().is_none());
        assert!(canvas.placement.within_bin());
        assert_eq!(canvas.size.height, ratio.height_for(w));
        assert!(!packer.fits(&items, w - 1, ratio.height_for(w - 1)));
    }

    struct NeverFits;

    impl BinPacker for NeverFits {
        fn pack(&self, items: &[Item], w: u32, h: u32) -> PackResult {
            Err(PartialFailure {
                placed: PlacementResult::new(Size::new(w, h)),
                unplaced: items.iter().map(Item::id).collect(),
                infeasible: Vec::new(),
            })
        }
    }

    #[test]
    fn test_exhausted_when_upper_bound_fails() {
        let items = vec![Item::new(0, 10, 10)];
        match minimal_canvas(&NeverFits, &items, AspectRatio::SQUARE) {
            Err(Error::PackingExhausted {
                placed,
                requested,
                attempts,
            }) => {
                assert_eq!(placed, 0);
                assert_eq!(requested, 1);
                // widths 15, 18 and 19 inside 10..=20, then 20 itself
                assert_eq!(attempts, 4);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(choose_orientation(&NeverFits, &items, AspectRatio::A_SERIES).is_err());
    }

    #[test]
    fn test_no_items() {
        let packer = GuillotinePacker::default();
        assert!(matches!(
            minimal_canvas(&packer, &[], AspectRatio::SQUARE),
            Err(Error::NoItems)
        ));
    }
}
