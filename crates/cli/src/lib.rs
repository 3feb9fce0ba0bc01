//! # Photopack CLI
//!
//! Request parsing behind the `photopack` command.
//!
//! A request is a JSON file listing images and layout options:
//!
//! ```json
//! {
//!   "images": [{ "source": "a.jpg", "width": 4000, "height": 3000 }],
//!   "ratio": "a-series",
//!   "pages": 1,
//!   "padding": 10,
//!   "overlay": { "logo": { "width": 600, "height": 200 } }
//! }
//! ```

pub mod request;

pub use request::{ImageEntry, LayoutRequest, PaddingValue, RequestError};
