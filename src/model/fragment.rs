//! Rendered text fragments.

use super::Point;
use serde::{Deserialize, Serialize};

/// A positioned run of rendered text on the displayed page.
///
/// Fragments are rebuilt on every page render and appear in the engine's
/// reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The fragment text
    pub text: String,

    /// Top-left position in pixels
    #[serde(default)]
    pub position: Point,

    /// Line height in pixels
    #[serde(default)]
    pub height: f64,
}

impl TextFragment {
    /// Create a fragment at the given pixel position.
    pub fn new(text: impl Into<String>, x: f64, y: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            position: Point::new(x, y),
            height,
        }
    }

    /// Create a fragment without position, as used when only text matters.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, 0.0, 0.0, 0.0)
    }
}
