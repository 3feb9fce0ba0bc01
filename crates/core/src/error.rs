//! Error types for photopack.

use crate::item::ItemId;
use thiserror::Error;

/// Result type alias for photopack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while sizing, packing or decorating a canvas.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid item provided.
    #[error("Invalid item {id}: {reason}")]
    InvalidItem {
        /// The offending item.
        id: ItemId,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// Nothing was given to pack.
    #[error("No items to pack")]
    NoItems,

    /// A single item does not fit the canvas in any allowed orientation.
    #[error("Item {id} does not fit a {bin_width}x{bin_height} canvas in any orientation")]
    InfeasibleItem {
        /// The item that cannot be placed.
        id: ItemId,
        /// Width of the canvas that was tried.
        bin_width: u32,
        /// Height of the canvas that was tried.
        bin_height: u32,
    },

    /// A search or growth loop ran out of attempts without placing everything.
    #[error("Could not fit all items: placed {placed} of {requested} after {attempts} attempts")]
    PackingExhausted {
        /// Items placed by the last attempt.
        placed: usize,
        /// Items requested.
        requested: usize,
        /// Number of pack attempts made.
        attempts: usize,
    },

    /// No free rectangle can host the requested overlay.
    #[error("No free space large enough for the overlay")]
    NoOverlaySpace,
}

impl Error {
    /// Returns true for errors that only mean "no layout for this request".
    ///
    /// Infeasible items, exhausted searches and a missing overlay spot qualify.
    pub fn is_packing_failure(&self) -> bool {
        matches!(
            self,
            Error::InfeasibleItem { .. } | Error::PackingExhausted { .. } | Error::NoOverlaySpace
        )
    }
}
