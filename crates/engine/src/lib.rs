//! # Photopack Engine
//!
//! Canvas packing algorithms for photo collages.
//!
//! This crate finds the smallest canvas of a given aspect ratio that holds a
//! set of rectangular images, spreads images over several pages, and places
//! a logo or caption in the space that is left over.
//!
//! ## Components
//!
//! - [`FreeRectSet`]: guillotine free-space tracker
//! - [`GuillotinePacker`]: best-area-fit packer implementing [`BinPacker`]
//! - [`sizing`]: binary search for the minimal canvas and orientation choice
//! - [`distributor`]: multi-page distribution with per-page growth
//! - [`overlay`]: logo and caption placement
//! - [`grid`]: uniform grid arrangement on fixed paper
//! - [`Engine`]: ties everything together for one generate call
//!
//! ## Example
//!
//! ```rust
//! use photopack_engine::{AspectRatio, Engine, Item, OverlayRequest};
//!
//! let items = vec![Item::new(0, 100, 100), Item::new(1, 100, 100), Item::new(2, 100, 100)];
//! let engine = Engine::default_config();
//! let report = engine
//!     .generate_items(&items, AspectRatio::SQUARE, 1, &OverlayRequest::default())
//!     .unwrap();
//! assert_eq!(report.summary.total_placed, 3);
//! ```

pub mod distributor;
pub mod engine;
pub mod free_space;
pub mod grid;
pub mod overlay;
pub mod packer;
pub mod sizing;

// Re-exports
pub use distributor::{distribute, grow_canvas, partition};
pub use engine::Engine;
pub use free_space::FreeRectSet;
pub use grid::{GridCell, GridLayout};
pub use overlay::{place_overlay, select_target, ApproxTextMeasure};
pub use packer::GuillotinePacker;
pub use photopack_core::{
    AspectRatio, BinPacker, CanvasLayout, Config, Error, Item, LayoutReport, LayoutSession,
    OverlayRequest, Placement, PlacementResult, Result, Strategy,
};
pub use sizing::{choose_orientation, minimal_canvas, OrientationChoice, SizedCanvas};
