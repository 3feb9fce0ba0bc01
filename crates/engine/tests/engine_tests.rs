//! Integration tests for photopack-engine.

use photopack_core::geometry::{Rect, Size};
use photopack_core::placement::PlacementResult;
use photopack_core::result::PageStatus;
use photopack_core::Error;
use photopack_engine::{
    distribute, minimal_canvas, AspectRatio, BinPacker, Config, Engine, FreeRectSet,
    GuillotinePacker, Item, LayoutSession, OverlayRequest,
};

fn mixed_items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let w = 40 + (i as u32 * 37) % 160;
            let h = 30 + (i as u32 * 53) % 140;
            Item::new(i, w, h)
                .with_scale(0.5 + (i % 4) as f64 * 0.25)
                .with_padding((i % 3) as u32 * 4)
                .with_rotation(i % 5 != 0)
        })
        .collect()
}

fn assert_valid_page(placement: &PlacementResult, free_rects: &[Rect]) {
    // no two footprints overlap
    assert!(placement.find_overlap().is_none());
    assert!(placement.within_bin());

    // footprints never exceed the canvas
    assert!(placement.footprint_area() <= placement.bin.area());

    // free space lies in the canvas and misses every footprint
    let bin = Rect::from_size(placement.bin);
    for free in free_rects {
        assert!(bin.contains(free), "{free:?} outside {bin:?}");
        for p in placement {
            assert!(!free.intersects(&p.rect()), "{free:?} hits item {}", p.item_id);
        }
    }
}

mod properties {
    use super::*;

    #[test]
    fn test_minimal_canvas_layout_is_valid() {
        let items = mixed_items(25);
        let packer = GuillotinePacker::default();
        for ratio in [AspectRatio::A_SERIES, AspectRatio::B_SERIES, AspectRatio::SQUARE] {
            let canvas = minimal_canvas(&packer, &items, ratio).unwrap();
            assert_eq!(canvas.placement.len(), items.len());
            let free = packer.free_space(&canvas.placement);
            assert_valid_page(&canvas.placement, free.rects());
            assert_eq!(
                free.free_area() + canvas.placement.footprint_area(),
                canvas.size.area()
            );
        }
    }

    #[test]
    fn test_rotated_footprint_is_swapped_padded_size() {
        let items = vec![Item::new(0, 40, 10).with_scale(2.0).with_padding(3)];
        let packer = GuillotinePacker::default();
        let result = packer.pack(&items, 30, 90).unwrap();
        let p = result.get(0).unwrap();
        assert!(p.rotated);
        assert_eq!(Size::new(p.width, p.height), items[0].footprint().swapped());
        assert_eq!(Size::new(p.width, p.height), Size::new(26, 86));
    }

    #[test]
    fn test_identical_inputs_give_identical_layouts() {
        let items = mixed_items(30);
        let engine = Engine::default_config();
        let a = engine.pack(&items, AspectRatio::A_SERIES, 3).unwrap();
        let b = engine.pack(&items, AspectRatio::A_SERIES, 3).unwrap();
        assert_eq!(a, b);

        let sequential = Engine::new(Config::default().with_parallel_pages(false));
        let c = sequential.pack(&items, AspectRatio::A_SERIES, 3).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_every_item_on_exactly_one_page() {
        let items = mixed_items(17);
        let packer = GuillotinePacker::default();
        let layout =
            distribute(&packer, &items, 4, AspectRatio::A_SERIES, &Config::default()).unwrap();
        assert_eq!(layout.page_count(), 4);

        let mut ids: Vec<usize> = layout.pages.iter().flat_map(|p| p.item_ids()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..17).collect::<Vec<_>>());

        for page in &layout.pages {
            assert_eq!(page.status, PageStatus::Complete);
            assert_valid_page(&page.placement, &page.free_rects);
        }
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn test_three_squares_fill_strip() {
        let items: Vec<Item> = (0..3).map(|i| Item::new(i, 100, 100)).collect();
        let result = GuillotinePacker::default().pack(&items, 300, 100).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.footprint_area(), result.bin.area());
    }

    #[test]
    fn test_wide_item_on_square_canvas() {
        let items = vec![Item::new(0, 200, 100)];
        let canvas = minimal_canvas(&GuillotinePacker::default(), &items, AspectRatio::SQUARE)
            .unwrap();
        assert_eq!(canvas.size, Size::new(200, 200));
    }

    #[test]
    fn test_five_items_over_two_pages() {
        let mut session = LayoutSession::new();
        session.add_items((0..5).map(|i| (format!("img{i}.jpg"), 120, 90)));
        session.set_page_count(2);

        let report = Engine::default_config().generate(&session).unwrap();
        let pages = &report.layout.pages;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].placement.len(), 3);
        assert_eq!(pages[1].placement.len(), 2);
        assert_eq!(report.summary.total_placed, 5);
    }

    #[test]
    fn test_padding_grows_footprint() {
        let item = Item::new(0, 50, 50).with_padding(10);
        assert_eq!(item.footprint(), Size::new(70, 70));

        let canvas = minimal_canvas(&GuillotinePacker::default(), &[item], AspectRatio::SQUARE)
            .unwrap();
        assert_eq!(canvas.size, Size::new(70, 70));
        let p = canvas.placement.get(0).unwrap();
        assert_eq!(p.content_rect(), Rect::new(10, 10, 50, 50));
    }

    #[test]
    fn test_free_rect_below_strip() {
        let mut free = FreeRectSet::new(Size::new(300, 300));
        free.subtract(Rect::new(0, 0, 300, 100));
        assert_eq!(free.rects(), &[Rect::new(0, 100, 300, 200)]);
    }
}

mod reporting {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_area_percentages_ignore_padding() {
        let mut session = LayoutSession::new();
        session.add_items([("a.png", 50, 50)]);
        session.set_padding(Some(10));
        session.set_ratio(AspectRatio::SQUARE);

        let report = Engine::default_config().generate(&session).unwrap();
        assert_eq!(report.layout.pages[0].canvas, Size::new(70, 70));
        assert_relative_eq!(
            report.item_area_percent(0).unwrap(),
            2_500.0 / 4_900.0 * 100.0
        );
        assert_relative_eq!(
            report.summary.unused_area_percent,
            2_400.0 / 4_900.0 * 100.0
        );
    }

    #[test]
    fn test_oversized_item_is_a_typed_error() {
        let items = vec![Item::new(0, 4000, 3000).with_scale(1e7).with_padding(10)];
        let result = Engine::default_config().generate_items(
            &items,
            AspectRatio::SQUARE,
            1,
            &OverlayRequest::default(),
        );
        assert!(matches!(result, Err(Error::InvalidItem { id: 0, .. })));
    }

    #[test]
    fn test_empty_session_is_an_error() {
        let session = LayoutSession::new();
        assert!(Engine::default_config().generate(&session).is_err());
    }

    #[test]
    fn test_page_count_clamped_to_items() {
        let items: Vec<Item> = (0..2).map(|i| Item::new(i, 60, 40)).collect();
        let report = Engine::default_config()
            .generate_items(&items, AspectRatio::A_SERIES, 9, &OverlayRequest::default())
            .unwrap();
        assert_eq!(report.layout.page_count(), 2);
    }
}
