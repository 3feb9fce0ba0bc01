//! # Photopack Core
//!
//! Core types and traits for the photopack canvas packing engine.
//!
//! This crate holds everything the engine and its front ends share: integer
//! geometry, items and their padded footprints, placement results, aspect
//! ratios, overlay requests, the caller-side session and the [`BinPacker`]
//! seam used as a feasibility oracle by the sizing search.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Size`], [`Rect`]
//! - **Items**: [`Item`] with scale, padding and rotation permission
//! - **Results**: [`PlacementResult`], [`PartialFailure`], [`CanvasLayout`], [`LayoutReport`]
//! - **Solver seam**: [`BinPacker`] and the engine [`Config`]
//! - **Session**: [`LayoutSession`] for callers that keep a working set between runs
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod item;
pub mod overlay;
pub mod placement;
pub mod ratio;
pub mod result;
pub mod session;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{Rect, Size};
pub use item::{Item, ItemId};
pub use overlay::{
    LogoSpec, OverlayPlacement, OverlayRequest, TextMeasure, TextPlacement, TextSpec,
};
pub use placement::{PartialFailure, Placement, PlacementResult};
pub use ratio::{AspectRatio, PaperSize};
pub use result::{
    CanvasLayout, ItemShare, LayoutReport, LayoutSummary, Orientation, PageLayout, PageStats,
    PageStatus,
};
pub use session::{parse_padding, LayoutSession, SessionEntry};
pub use solver::{
    BinPacker, Config, GridPolicy, OverlayPolicy, PackResult, SplitRule, Strategy,
};
