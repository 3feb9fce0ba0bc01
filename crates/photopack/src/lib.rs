//! # Photopack
//!
//! Packs rectangular photos onto the smallest canvas of a given aspect ratio
//! and finds room for a logo or caption in what is left.
//!
//! This crate bundles:
//! - **Core types**: geometry, items, results, configuration, sessions
//! - **Engine**: guillotine packer, canvas sizing search, multi-page
//!   distribution, overlay placement and grid arrangement
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "engine")]
//! # {
//! use photopack::{AspectRatio, Engine, LayoutSession};
//!
//! let mut session = LayoutSession::new();
//! session.add_items([("a.jpg", 400, 300), ("b.jpg", 300, 400)]);
//! session.set_ratio(AspectRatio::A_SERIES);
//!
//! let report = Engine::default_config().generate(&session).unwrap();
//! assert_eq!(report.summary.total_placed, 2);
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `engine` (default): packing algorithms
//! - `serde`: Serialization support

/// Core types and traits.
pub use photopack_core as core;

/// Packing algorithms.
#[cfg(feature = "engine")]
pub use photopack_engine as engine;

// Re-export commonly used types at root level
pub use photopack_core::{
    AspectRatio, BinPacker, CanvasLayout, Config, Error, Item, LayoutReport, LayoutSession,
    PaperSize, Placement, Result, Strategy,
};

#[cfg(feature = "engine")]
pub use photopack_engine::{Engine, GuillotinePacker};
