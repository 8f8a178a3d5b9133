//! Page-level geometry types.

use serde::{Deserialize, Serialize};

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Physical size of a page in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    /// Page width in inches
    pub width_inches: f64,

    /// Page height in inches
    pub height_inches: f64,
}

impl PageGeometry {
    /// Create a page geometry from inch dimensions.
    pub fn new(width_inches: f64, height_inches: f64) -> Self {
        Self {
            width_inches,
            height_inches,
        }
    }

    /// Create a page geometry from unscaled PDF points (1 point = 1/72 inch).
    pub fn from_points(width: f64, height: f64) -> Self {
        Self::new(width / POINTS_PER_INCH, height / POINTS_PER_INCH)
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(8.5, 11.0)
    }

    /// A4 (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(210.0 / 25.4, 297.0 / 25.4)
    }

    /// Pixel size of this page when rendered at `scale` pixels per point.
    pub fn rendered_size(&self, scale: f64) -> PixelSize {
        PixelSize::new(
            self.width_inches * POINTS_PER_INCH * scale,
            self.height_inches * POINTS_PER_INCH * scale,
        )
    }

    /// Pixels-per-inch scale factors `(scale_x, scale_y)` for a rendered size.
    ///
    /// Returns `None` when either page dimension is not a positive finite
    /// number, since no meaningful mapping exists.
    pub fn scale_factors(&self, rendered: PixelSize) -> Option<(f64, f64)> {
        if !is_positive(self.width_inches) || !is_positive(self.height_inches) {
            return None;
        }
        let sx = rendered.width / self.width_inches;
        let sy = rendered.height / self.height_inches;
        (sx.is_finite() && sy.is_finite()).then_some((sx, sy))
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width_inches > self.height_inches
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Rendered size of a page in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point in either inch or pixel space, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check whether a point lies inside the rectangle (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}
