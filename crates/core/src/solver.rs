//! Packer trait and engine configuration.

use crate::item::Item;
use crate::placement::{PartialFailure, PlacementResult};
use crate::ratio::PaperSize;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Minimal canvas found by guillotine packing (default).
    #[default]
    FreePack,
    /// Uniform grid on a fixed paper size.
    Grid,
}

/// How a free rectangle is cut around an occupied region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitRule {
    /// Left and right strips span the full height of the free rectangle.
    Vertical,
    /// Strips above and below span the full width of the free rectangle.
    Horizontal,
    /// Whichever of the two leaves the larger single strip.
    #[default]
    MaxArea,
}

/// Which free rectangle receives the logo/watermark overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverlayPolicy {
    /// The free rectangle with the largest area.
    #[default]
    Largest,
    /// The smallest free rectangle whose sides are both at least `min_size`.
    SmallestFitting {
        /// Minimum side length.
        min_size: u32,
    },
}

/// Column selection rule for [`Strategy::Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GridPolicy {
    /// Grid aspect closest to the canvas aspect.
    MatchAspect,
    /// Largest total area of items scaled into their cells.
    #[default]
    MaximizeCoverage,
}

/// Engine configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Layout strategy.
    pub strategy: Strategy,

    /// Free rectangle split rule.
    pub split_rule: SplitRule,

    /// Join free rectangles sharing a full edge after each placement.
    pub merge_free_rects: bool,

    /// Multiplier applied to the minimal canvas to get the shared page size
    /// when items are spread over several pages.
    pub base_growth: f64,

    /// Multiplier applied to a page canvas after a failed attempt.
    pub retry_growth: f64,

    /// Maximum pack attempts per page, including the first.
    pub max_attempts: usize,

    /// Pack pages on the rayon thread pool.
    pub parallel_pages: bool,

    // Overlay parameters
    /// Target selection for the overlay.
    pub overlay_policy: OverlayPolicy,

    /// Horizontal gap between logo and text.
    pub overlay_gap: u32,

    /// Font size decrement while shrinking text to fit.
    pub font_step: u32,

    /// Smallest font size tried.
    pub min_font_size: u32,

    // Grid parameters
    /// Column selection rule for the grid strategy.
    pub grid_policy: GridPolicy,

    /// Paper used by the grid strategy.
    pub paper: PaperSize,

    /// Resolution used to turn the paper into pixels.
    pub dpi: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            split_rule: SplitRule::default(),
            merge_free_rects: true,
            base_growth: 1.5,
            retry_growth: 1.05,
            max_attempts: 20,
            parallel_pages: true,
            overlay_policy: OverlayPolicy::default(),
            overlay_gap: 10,
            font_step: 2,
            min_font_size: 8,
            grid_policy: GridPolicy::default(),
            paper: PaperSize::default(),
            dpi: 300,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the layout strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the split rule.
    pub fn with_split_rule(mut self, rule: SplitRule) -> Self {
        self.split_rule = rule;
        self
    }

    /// Enables or disables merging of adjacent free rectangles.
    pub fn with_merge_free_rects(mut self, merge: bool) -> Self {
        self.merge_free_rects = merge;
        self
    }

    /// Sets the shared page growth factor.
    pub fn with_base_growth(mut self, factor: f64) -> Self {
        self.base_growth = factor;
        self
    }

    /// Sets the retry growth factor and attempt bound.
    pub fn with_retry(mut self, factor: f64, max_attempts: usize) -> Self {
        self.retry_growth = factor;
        self.max_attempts = max_attempts;
        self
    }

    /// Enables or disables parallel page packing.
    pub fn with_parallel_pages(mut self, parallel: bool) -> Self {
        self.parallel_pages = parallel;
        self
    }

    /// Sets the overlay selection policy.
    pub fn with_overlay_policy(mut self, policy: OverlayPolicy) -> Self {
        self.overlay_policy = policy;
        self
    }

    /// Sets the gap between logo and text.
    pub fn with_overlay_gap(mut self, gap: u32) -> Self {
        self.overlay_gap = gap;
        self
    }

    /// Sets the font shrink step and lower bound.
    pub fn with_font_limits(mut self, step: u32, min_size: u32) -> Self {
        self.font_step = step;
        self.min_font_size = min_size;
        self
    }

    /// Sets the grid column policy.
    pub fn with_grid_policy(mut self, policy: GridPolicy) -> Self {
        self.grid_policy = policy;
        self
    }

    /// Sets the paper and resolution for the grid strategy.
    pub fn with_paper(mut self, paper: PaperSize, dpi: u32) -> Self {
        self.paper = paper;
        self.dpi = dpi;
        self
    }

    /// Checks that every factor and bound is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_growth.is_finite() && self.base_growth >= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "base growth must be at least 1.0, got {}",
                self.base_growth
            )));
        }
        if !(self.retry_growth.is_finite() && self.retry_growth > 1.0) {
            return Err(Error::InvalidConfig(format!(
                "retry growth must exceed 1.0, got {}",
                self.retry_growth
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max attempts must be at least 1".into()));
        }
        if self.font_step == 0 || self.min_font_size == 0 {
            return Err(Error::InvalidConfig(
                "font step and minimum font size must be positive".into(),
            ));
        }
        if self.dpi == 0 {
            return Err(Error::InvalidConfig("dpi must be positive".into()));
        }
        Ok(())
    }
}

/// Outcome of a single pack attempt.
pub type PackResult = std::result::Result<PlacementResult, PartialFailure>;

/// A packer that places items into one bin of fixed size.
///
/// The sizing search and the distributor only see packers through this
/// trait and use it as a feasibility oracle.
pub trait BinPacker: Sync {
    /// Places `items` into a `bin_width x bin_height` bin.
    ///
    /// Must be deterministic: identical inputs give identical results.
    fn pack(&self, items: &[Item], bin_width: u32, bin_height: u32) -> PackResult;

    /// Returns true if every item fits.
    fn fits(&self, items: &[Item], bin_width: u32, bin_height: u32) -> bool {
        self.pack(items, bin_width, bin_height).is_ok()
    }
}
