//! Spreading items over several pages.
//!
//! Items are cut into contiguous slices, one per page. Every page starts from
//! a shared base canvas derived from the minimal canvas of the full set and
//! grows on its own until its slice fits or the attempt budget runs out.

use crate::free_space::FreeRectSet;
use crate::sizing::choose_orientation;
use photopack_core::geometry::Size;
use photopack_core::item::Item;
use photopack_core::ratio::AspectRatio;
use photopack_core::result::{CanvasLayout, PageLayout};
use photopack_core::solver::{BinPacker, Config};
use photopack_core::{Error, Result};
use rayon::prelude::*;
use std::ops::Range;

/// Splits `len` items into `pages` contiguous ranges of near-equal size.
///
/// The first `len % pages` ranges get one extra item. `pages` is clamped to
/// `1..=len`.
pub fn partition(len: usize, pages: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let pages = pages.clamp(1, len);
    let base = len / pages;
    let extra = len % pages;

    let mut ranges = Vec::with_capacity(pages);
    let mut start = 0;
    for page in 0..pages {
        let size = base + usize::from(page < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

fn scale_side(side: u32, factor: f64) -> u64 {
    (side as f64 * factor).ceil() as u64
}

fn clamp_side(side: u64) -> u32 {
    side.min(u32::MAX as u64) as u32
}

/// Scales a canvas by `factor`, rounding up.
pub fn scale_canvas(size: Size, factor: f64) -> Size {
    Size::new(
        clamp_side(scale_side(size.width, factor).max(1)),
        clamp_side(scale_side(size.height, factor).max(1)),
    )
}

/// The next retry canvas: scaled by `factor` and at least one pixel larger
/// on each side.
pub fn grow_canvas(size: Size, factor: f64) -> Size {
    let grow = |side: u32| clamp_side(scale_side(side, factor).max(side as u64 + 1));
    Size::new(grow(size.width), grow(size.height))
}

/// Packs one slice, growing the canvas after every failed attempt.
pub fn pack_page<P>(
    packer: &P,
    index: usize,
    items: &[Item],
    base: Size,
    config: &Config,
) -> PageLayout
where
    P: BinPacker + ?Sized,
{
    let max_attempts = config.max_attempts.max(1);
    let mut canvas = base;
    let mut attempt = 1;

    loop {
        match packer.pack(items, canvas.width, canvas.height) {
            Ok(placement) => {
                let free = FreeRectSet::after_placement(
                    &placement,
                    config.split_rule,
                    config.merge_free_rects,
                );
                log::debug!(
                    "page {index}: {} items on {}x{} after {attempt} attempt(s)",
                    placement.len(),
                    canvas.width,
                    canvas.height
                );
                return PageLayout::complete(index, placement, free.into_rects(), attempt);
            }
            Err(failure) if attempt >= max_attempts => {
                log::warn!(
                    "page {index}: gave up after {attempt} attempts at {}x{}, {} of {} items placed",
                    canvas.width,
                    canvas.height,
                    failure.placed_count(),
                    items.len()
                );
                let free = FreeRectSet::after_placement(
                    &failure.placed,
                    config.split_rule,
                    config.merge_free_rects,
                );
                return PageLayout::exhausted(index, failure, free.into_rects(), attempt);
            }
            Err(failure) => {
                let next = grow_canvas(canvas, config.retry_growth);
                log::debug!(
                    "page {index}: attempt {attempt} placed {}/{} at {}x{}, retrying at {}x{}",
                    failure.placed_count(),
                    items.len(),
                    canvas.width,
                    canvas.height,
                    next.width,
                    next.height
                );
                canvas = next;
                attempt += 1;
            }
        }
    }
}

/// Packs each slice on its own page starting from `base`.
///
/// Pages run on the rayon pool when `config.parallel_pages` is set and come
/// back ordered by page index either way.
pub fn pack_pages<P>(
    packer: &P,
    items: &[Item],
    slices: Vec<Range<usize>>,
    base: Size,
    config: &Config,
) -> Vec<PageLayout>
where
    P: BinPacker + ?Sized,
{
    if config.parallel_pages {
        slices
            .into_par_iter()
            .enumerate()
            .map(|(index, range)| pack_page(packer, index, &items[range], base, config))
            .collect()
    } else {
        slices
            .into_iter()
            .enumerate()
            .map(|(index, range)| pack_page(packer, index, &items[range], base, config))
            .collect()
    }
}

/// Distributes `items` over `page_count` pages of `ratio`.
///
/// The shared base canvas is the minimal canvas of the whole set, in its
/// better orientation, scaled by `config.base_growth`. A page that exhausts
/// its attempts is reported in its status; the other pages are unaffected.
pub fn distribute<P>(
    packer: &P,
    items: &[Item],
    page_count: usize,
    ratio: AspectRatio,
    config: &Config,
) -> Result<CanvasLayout>
where
    P: BinPacker + ?Sized,
{
    if items.is_empty() {
        return Err(Error::NoItems);
    }
    for item in items {
        item.validate()?;
    }

    let pages = page_count.clamp(1, items.len());
    if pages != page_count {
        log::debug!("page count {page_count} clamped to {pages}");
    }

    let choice = choose_orientation(packer, items, ratio)?;
    let base = scale_canvas(choice.canvas.size, config.base_growth);
    log::debug!(
        "base canvas {}x{} for {pages} page(s)",
        base.width,
        base.height
    );

    let pages = pack_pages(packer, items, partition(items.len(), pages), base, config);
    Ok(CanvasLayout {
        orientation: choice.orientation,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::GuillotinePacker;
    use photopack_core::placement::{PartialFailure, PlacementResult};
    use photopack_core::result::PageStatus;
    use photopack_core::solver::PackResult;
    use std::sync::Mutex;

    #[test]
    fn test_partition_sizes() {
        assert_eq!(partition(5, 2), vec![0..3, 3..5]);
        assert_eq!(partition(7, 3), vec![0..3, 3..5, 5..7]);
        assert_eq!(partition(3, 10), vec![0..1, 1..2, 2..3]);
        assert_eq!(partition(4, 0), vec![0..4]);
        assert!(partition(0, 3).is_empty());
    }

    #[test]
    fn test_grow_is_strict() {
        assert_eq!(grow_canvas(Size::new(100, 141), 1.05), Size::new(105, 149));
        assert_eq!(grow_canvas(Size::new(1, 1), 1.05), Size::new(2, 2));
        assert_eq!(scale_canvas(Size::new(200, 283), 1.5), Size::new(300, 425));
    }

    /// Fails until the canvas reaches a width, recording every canvas tried.
    struct Threshold {
        min_width: u32,
        seen: Mutex<Vec<Size>>,
    }

    impl BinPacker for Threshold {
        fn pack(&self, items: &[Item], w: u32, h: u32) -> PackResult {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(Size::new(w, h));
            }
            if w >= self.min_width {
                GuillotinePacker::default().pack(items, w, h)
            } else {
                Err(PartialFailure {
                    placed: PlacementResult::new(Size::new(w, h)),
                    unplaced: items.iter().map(Item::id).collect(),
                    infeasible: Vec::new(),
                })
            }
        }
    }

    #[test]
    fn test_retries_grow_strictly() {
        let packer = Threshold {
            min_width: 130,
            seen: Mutex::new(Vec::new()),
        };
        let items = vec![Item::new(0, 50, 50)];
        let page = pack_page(&packer, 0, &items, Size::new(100, 100), &Config::default());
        assert!(page.is_complete());

        let seen = packer.seen.lock().unwrap();
        assert_eq!(seen.len(), page.attempts);
        assert!(seen.len() > 1);
        for pair in seen.windows(2) {
            assert!(pair[1].width > pair[0].width);
            assert!(pair[1].height > pair[0].height);
        }
    }

    #[test]
    fn test_exhaustion_is_per_page() {
        let packer = Threshold {
            min_width: u32::MAX,
            seen: Mutex::new(Vec::new()),
        };
        let items = vec![Item::new(0, 50, 50), Item::new(1, 50, 50)];
        let config = Config::default().with_retry(1.05, 4);
        let page = pack_page(&packer, 3, &items, Size::new(100, 100), &config);
        assert_eq!(page.attempts, 4);
        assert_eq!(page.index, 3);
        assert_eq!(
            page.status,
            PageStatus::Exhausted {
                unplaced: vec![0, 1]
            }
        );
    }

    #[test]
    fn test_five_items_on_two_pages() {
        let packer = GuillotinePacker::default();
        let items: Vec<Item> = (0..5).map(|i| Item::new(i, 100, 80)).collect();
        for parallel in [true, false] {
            let config = Config::default().with_parallel_pages(parallel);
            let layout = distribute(&packer, &items, 2, AspectRatio::A_SERIES, &config).unwrap();
            assert_eq!(layout.page_count(), 2);
            assert_eq!(layout.pages[0].item_ids(), vec![0, 1, 2]);
            assert_eq!(layout.pages[1].item_ids(), vec![3, 4]);
            assert!(layout.is_complete());
            assert_eq!(layout.pages[0].canvas, layout.pages[1].canvas);
        }
    }

    #[test]
    fn test_invalid_item_rejected() {
        let packer = GuillotinePacker::default();
        let items = vec![Item::new(0, 10, 10), Item::new(1, 0, 10)];
        assert!(matches!(
            distribute(&packer, &items, 1, AspectRatio::SQUARE, &Config::default()),
            Err(Error::InvalidItem { id: 1, .. })
        ));
        assert!(matches!(
            distribute(&packer, &[], 1, AspectRatio::SQUARE, &Config::default()),
            Err(Error::NoItems)
        ));
    }
}
