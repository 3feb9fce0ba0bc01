//! Logo and caption placement in leftover canvas space.

use photopack_core::geometry::{Rect, Size};
use photopack_core::overlay::{
    LogoSpec, OverlayPlacement, OverlayRequest, TextMeasure, TextPlacement, TextSpec,
};
use photopack_core::solver::{Config, OverlayPolicy};
use photopack_core::{Error, Result};

/// Fixed-advance text metrics for callers without a font engine.
///
/// Every character is `advance * font_size` wide and a line is
/// `line_height * font_size` tall, both rounded up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMeasure {
    /// Character advance as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, font_size: u32, _typeface: &str) -> Size {
        let chars = text.chars().count() as f64;
        let size = font_size as f64;
        Size::new(
            (chars * size * self.advance).ceil() as u32,
            (size * self.line_height).ceil() as u32,
        )
    }
}

/// Picks the free rectangle that receives the overlay.
///
/// Ties resolve to the top-most, then left-most rectangle.
pub fn select_target(free_rects: &[Rect], policy: OverlayPolicy) -> Option<Rect> {
    let position = |r: &Rect| (r.y, r.x);
    match policy {
        OverlayPolicy::Largest => free_rects
            .iter()
            .filter(|r| !r.is_empty())
            .min_by_key(|r| (std::cmp::Reverse(r.area()), position(r)))
            .copied(),
        OverlayPolicy::SmallestFitting { min_size } => free_rects
            .iter()
            .filter(|r| !r.is_empty() && r.width >= min_size && r.height >= min_size)
            .min_by_key(|r| (r.area(), position(r)))
            .copied(),
    }
}

/// Largest font size, stepping down from the preferred one, whose text fits `fits`.
///
/// The preferred size is always tried, even below `config.min_font_size`.
/// The last step is clamped to the minimum.
fn shrink_text<M, F>(
    measure: &M,
    text: &TextSpec,
    config: &Config,
    mut fits: F,
) -> Option<(Size, u32)>
where
    M: TextMeasure + ?Sized,
    F: FnMut(Size) -> bool,
{
    if text.font_size == 0 {
        return None;
    }
    let step = config.font_step.max(1);
    let floor = config.min_font_size.max(1);
    let mut font = text.font_size;
    loop {
        let size = measure.measure(&text.content, font, &text.typeface);
        if fits(size) {
            return Some((size, font));
        }
        if font <= floor {
            return None;
        }
        font = font.saturating_sub(step).max(floor);
    }
}

fn centred(target: &Rect, size: Size) -> Rect {
    Rect::new(
        target.x + (target.width - size.width) / 2,
        target.y + (target.height - size.height) / 2,
        size.width,
        size.height,
    )
}

fn side_by_side<M>(
    target: &Rect,
    logo: &LogoSpec,
    text: &TextSpec,
    measure: &M,
    config: &Config,
) -> Option<OverlayPlacement>
where
    M: TextMeasure + ?Sized,
{
    let gap = config.overlay_gap;
    let mut logo_size = None;
    let (text_size, font) = shrink_text(measure, text, config, |t| {
        if t.height > target.height || t.width as u64 + gap as u64 + 1 > target.width as u64 {
            return false;
        }
        let room = Size::new(target.width - gap - t.width, target.height);
        logo_size = logo.fit_within(room);
        logo_size.is_some()
    })?;
    let logo_size = logo_size?;

    let block = Size::new(
        logo_size.width + gap + text_size.width,
        logo_size.height.max(text_size.height),
    );
    let area = centred(target, block);
    let logo_rect = Rect::new(
        area.x,
        area.y + (block.height - logo_size.height) / 2,
        logo_size.width,
        logo_size.height,
    );
    let text_rect = Rect::new(
        area.x + logo_size.width + gap,
        area.y + (block.height - text_size.height) / 2,
        text_size.width,
        text_size.height,
    );
    Some(OverlayPlacement {
        target: *target,
        logo: Some(logo_rect),
        text: Some(TextPlacement {
            rect: text_rect,
            font_size: font,
        }),
    })
}

/// Places the requested logo and caption in one free rectangle.
///
/// With both present they go side by side, the caption shrinking in
/// `config.font_step` steps and the logo scaled down to the remaining width.
/// Failing that the logo alone, then the caption alone, is tried. The placed
/// block is centred in the target.
pub fn place_overlay<M>(
    free_rects: &[Rect],
    request: &OverlayRequest,
    measure: &M,
    config: &Config,
) -> Result<OverlayPlacement>
where
    M: TextMeasure + ?Sized,
{
    if request.is_empty() {
        return Err(Error::InvalidConfig("overlay request is empty".into()));
    }
    let target = select_target(free_rects, config.overlay_policy).ok_or(Error::NoOverlaySpace)?;
    let text = request.text_content();

    if let (Some(logo), Some(text)) = (&request.logo, text) {
        if let Some(placement) = side_by_side(&target, logo, text, measure, config) {
            return Ok(placement);
        }
        log::debug!("logo and caption do not fit side by side in {target:?}");
    }

    if let Some(size) = request.logo.and_then(|logo| logo.fit_within(target.size())) {
        return Ok(OverlayPlacement {
            target,
            logo: Some(centred(&target, size)),
            text: None,
        });
    }

    if let Some(text) = text {
        let limit = target.size();
        if let Some((size, font)) = shrink_text(measure, text, config, |t| t.fits_within(&limit)) {
            return Ok(OverlayPlacement {
                target,
                logo: None,
                text: Some(TextPlacement {
                    rect: centred(&target, size),
                    font_size: font,
                }),
            });
        }
    }

    Err(Error::NoOverlaySpace)
}
