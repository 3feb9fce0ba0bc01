//! JSON layout requests.

use photopack_core::overlay::OverlayRequest;
use photopack_core::ratio::AspectRatio;
use photopack_core::session::{parse_padding, LayoutSession};
use photopack_core::solver::Config;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Request loading errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid request.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request names no images.
    #[error("request contains no images")]
    Empty,
}

/// Padding given either as a number or as text typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PaddingValue {
    /// A plain pixel count.
    Pixels(u32),
    /// Free text; anything but digits means no padding.
    Text(String),
}

impl PaddingValue {
    /// Padding in pixels.
    pub fn pixels(&self) -> u32 {
        match self {
            PaddingValue::Pixels(px) => *px,
            PaddingValue::Text(text) => parse_padding(text),
        }
    }
}

/// One image of a request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageEntry {
    /// Path or key identifying the image; duplicates are dropped.
    #[serde(default)]
    pub source: Option<String>,
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Scale factor.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Whether the image may be turned by 90°.
    #[serde(default = "default_rotation")]
    pub allow_rotation: bool,
}

fn default_scale() -> f64 {
    1.0
}

fn default_rotation() -> bool {
    true
}

/// A layout request as read from disk.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutRequest {
    /// Images to lay out.
    pub images: Vec<ImageEntry>,
    /// Target ratio: preset name, `"W:H"` or decimal.
    #[serde(default)]
    pub ratio: Option<String>,
    /// Number of pages.
    #[serde(default)]
    pub pages: Option<usize>,
    /// Padding around every image.
    #[serde(default)]
    pub padding: Option<PaddingValue>,
    /// Logo and caption to place in leftover space.
    #[serde(default)]
    pub overlay: OverlayRequest,
    /// Engine configuration overrides.
    #[serde(default)]
    pub config: Option<Config>,
}

impl LayoutRequest {
    /// Parses a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        let request: LayoutRequest = serde_json::from_str(json)?;
        if request.images.is_empty() {
            return Err(RequestError::Empty);
        }
        Ok(request)
    }

    /// Reads a request from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Engine configuration, defaults where the request gives none.
    pub fn config(&self) -> Config {
        self.config.clone().unwrap_or_default()
    }

    /// Builds the session the engine works on.
    pub fn to_session(&self) -> LayoutSession {
        let mut session = LayoutSession::new();
        for (i, image) in self.images.iter().enumerate() {
            let source = image
                .source
                .clone()
                .unwrap_or_else(|| format!("image-{i}"));
            if session.add_items([(source, image.width, image.height)]) == 0 {
                continue;
            }
            let index = session.len() - 1;
            if !session.set_scale(index, image.scale) {
                log::warn!("image {i}: ignoring invalid scale {}", image.scale);
            }
            session.set_rotation(index, image.allow_rotation);
        }

        if let Some(ratio) = &self.ratio {
            session.set_ratio(AspectRatio::parse_lenient(ratio));
        }
        if let Some(pages) = self.pages {
            session.set_page_count(pages);
        }
        if let Some(padding) = &self.padding {
            session.set_padding(Some(padding.pixels()));
        }
        session.set_overlay(self.overlay.clone());
        session
    }
}
