//! Layout engine facade.

use crate::distributor::distribute;
use crate::grid::{self, GridLayout};
use crate::overlay::{place_overlay, ApproxTextMeasure};
use crate::packer::GuillotinePacker;
use crate::sizing::choose_orientation;
use photopack_core::item::Item;
use photopack_core::overlay::{OverlayRequest, TextMeasure};
use photopack_core::ratio::AspectRatio;
use photopack_core::result::{CanvasLayout, LayoutReport, PageLayout};
use photopack_core::session::LayoutSession;
use photopack_core::solver::{Config, Strategy};
use photopack_core::{Error, Result};

/// Canvas layout engine.
///
/// Holds only configuration; every generate call starts from scratch.
pub struct Engine {
    config: Config,
    packer: GuillotinePacker,
    measure: Box<dyn TextMeasure + Send + Sync>,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    pub fn new(config: Config) -> Self {
        let packer = GuillotinePacker::from_config(&config);
        Self {
            config,
            packer,
            measure: Box::new(ApproxTextMeasure::default()),
        }
    }

    /// Creates an engine with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Replaces the text measurement used for captions.
    pub fn with_text_measure<M>(mut self, measure: M) -> Self
    where
        M: TextMeasure + Send + Sync + 'static,
    {
        self.measure = Box::new(measure);
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The packer used for free packing.
    pub fn packer(&self) -> &GuillotinePacker {
        &self.packer
    }

    /// Generates a layout for everything in `session`.
    pub fn generate(&self, session: &LayoutSession) -> Result<LayoutReport> {
        let items = session.items();
        self.generate_items(
            &items,
            session.ratio(),
            session.page_count(),
            session.overlay(),
        )
    }

    /// Generates a layout for an explicit item list.
    pub fn generate_items(
        &self,
        items: &[Item],
        ratio: AspectRatio,
        page_count: usize,
        overlay: &OverlayRequest,
    ) -> Result<LayoutReport> {
        self.config.validate()?;

        let mut layout = match self.config.strategy {
            Strategy::FreePack => self.pack(items, ratio, page_count)?,
            Strategy::Grid => {
                if page_count > 1 {
                    log::warn!(
                        "grid strategy lays out a single page, ignoring {page_count} pages"
                    );
                }
                self.arrange_grid(items, ratio)?.into_layout()
            }
        };

        if !overlay.is_empty() {
            self.attach_overlays(&mut layout, overlay);
        }
        Ok(LayoutReport::new(layout, items.len()))
    }

    /// Packs `items` onto `page_count` canvases of `ratio`.
    ///
    /// A single page gets the minimal canvas itself; several pages go through
    /// the distributor and share a grown base canvas.
    pub fn pack(
        &self,
        items: &[Item],
        ratio: AspectRatio,
        page_count: usize,
    ) -> Result<CanvasLayout> {
        if items.is_empty() {
            return Err(Error::NoItems);
        }
        for item in items {
            item.validate()?;
        }

        if page_count.clamp(1, items.len()) > 1 {
            return distribute(&self.packer, items, page_count, ratio, &self.config);
        }

        let choice = choose_orientation(&self.packer, items, ratio)?;
        let free = self.packer.free_space(&choice.canvas.placement);
        Ok(CanvasLayout {
            orientation: choice.orientation,
            pages: vec![PageLayout::complete(
                0,
                choice.canvas.placement,
                free.into_rects(),
                choice.canvas.probes,
            )],
        })
    }

    /// Lays `items` out in a grid on the configured paper.
    ///
    /// The paper is turned to landscape when `ratio` is below one.
    pub fn arrange_grid(&self, items: &[Item], ratio: AspectRatio) -> Result<GridLayout> {
        let mut canvas = self.config.paper.pixels(self.config.dpi);
        if ratio.value() < 1.0 {
            canvas = canvas.swapped();
        }
        grid::arrange(items, canvas, self.config.grid_policy)
    }

    fn attach_overlays(&self, layout: &mut CanvasLayout, overlay: &OverlayRequest) {
        for page in &mut layout.pages {
            match place_overlay(&page.free_rects, overlay, self.measure.as_ref(), &self.config) {
                Ok(placement) => page.overlay = Some(placement),
                Err(e) => log::info!("page {}: no overlay placed: {e}", page.index),
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photopack_core::geometry::Size;
    use photopack_core::overlay::LogoSpec;
    use photopack_core::ratio::PaperSize;
    use photopack_core::result::Orientation;

    #[test]
    fn test_generate_from_session() {
        let mut session = LayoutSession::new();
        session.add_items([("a.jpg", 100, 100), ("b.jpg", 100, 100), ("c.jpg", 100, 100)]);
        session.set_ratio(AspectRatio::new(1.0 / 3.0).unwrap());

        let report = Engine::default_config().generate(&session).unwrap();
        assert_eq!(report.summary.total_placed, 3);
        assert_eq!(report.layout.pages[0].canvas, Size::new(300, 100));
        assert!(report.summary.unused_area_percent.abs() < 1e-9);
    }

    #[test]
    fn test_overlay_attached_when_space_left() {
        let engine = Engine::default_config();
        let overlay = OverlayRequest {
            logo: Some(LogoSpec::new(40, 20)),
            text: None,
        };
        let items = vec![Item::new(0, 300, 100)];
        let report = engine
            .generate_items(&items, AspectRatio::SQUARE, 1, &overlay)
            .unwrap();
        let page = &report.layout.pages[0];
        assert_eq!(page.canvas, Size::new(300, 300));
        let placed = page.overlay.expect("overlay");
        assert_eq!(placed.target.y, 100);
    }

    #[test]
    fn test_overlay_failure_is_not_fatal() {
        let engine = Engine::default_config();
        let overlay = OverlayRequest {
            logo: Some(LogoSpec::new(40, 20)),
            text: None,
        };
        let items = vec![Item::new(0, 100, 100)];
        let report = engine
            .generate_items(&items, AspectRatio::SQUARE, 1, &overlay)
            .unwrap();
        assert!(report.layout.pages[0].overlay.is_none());
    }

    #[test]
    fn test_grid_strategy_uses_paper() {
        let config = Config::default()
            .with_strategy(Strategy::Grid)
            .with_paper(PaperSize::A4, 300);
        let engine = Engine::new(config);
        let items: Vec<Item> = (0..4).map(|i| Item::new(i, 400, 300)).collect();

        let report = engine
            .generate_items(&items, AspectRatio::B_SERIES, 1, &OverlayRequest::default())
            .unwrap();
        assert_eq!(report.layout.orientation, Orientation::Landscape);
        assert_eq!(report.layout.pages[0].canvas, Size::new(3507, 2480));
        assert_eq!(report.summary.total_placed, 4);
    }

    #[test]
    fn test_single_page_reports_search_probes() {
        let engine = Engine::default_config();
        let items: Vec<Item> = (0..5).map(|i| Item::new(i, 120, 80)).collect();
        let layout = engine.pack(&items, AspectRatio::SQUARE, 1).unwrap();
        let canvas = crate::sizing::minimal_canvas(engine.packer(), &items, AspectRatio::SQUARE)
            .unwrap();
        assert_eq!(layout.pages[0].attempts, canvas.probes);
        assert!(layout.pages[0].attempts >= 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let engine = Engine::new(Config::default().with_retry(0.9, 3));
        let result = engine.generate_items(
            &[Item::new(0, 10, 10)],
            AspectRatio::SQUARE,
            1,
            &OverlayRequest::default(),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
