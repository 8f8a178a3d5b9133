//! Bounding polygon to pixel rectangle mapping.
//!
//! Content items carry their location as a four-corner polygon in page
//! inches, either as a flat `[x1, y1, ..., x4, y4]` array or in the
//! textual `D(page,x1,y1,...,x4,y4)` form. Overlays are drawn as the
//! axis-aligned box enclosing the scaled polygon, so rotation and skew
//! are discarded.
//!
//! # Example
//!
//! ```
//! use pdflens::geometry::map_to_pixel_rect;
//! use pdflens::model::{PageGeometry, PixelRect, PixelSize};
//!
//! let unit_square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
//! let rect = map_to_pixel_rect(
//!     &unit_square,
//!     &PageGeometry::letter(),
//!     PixelSize::new(850.0, 1100.0),
//! );
//! assert_eq!(rect, Some(PixelRect::new(0.0, 0.0, 100.0, 100.0)));
//! ```

use crate::model::{PageGeometry, PixelRect, PixelSize, Point};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Number of coordinates in a flattened four-corner polygon.
pub const POLYGON_LEN: usize = 8;

/// Map a flat inch polygon to the enclosing pixel rectangle.
///
/// Returns `None` when the polygon has fewer than eight entries, any of
/// the first eight is not finite, the page geometry cannot be scaled, or
/// the scaled rectangle overflows.
/// Entries past the eighth are ignored.
pub fn map_to_pixel_rect(
    bounding_box: &[f64],
    geometry: &PageGeometry,
    rendered: PixelSize,
) -> Option<PixelRect> {
    let corners = polygon_points(bounding_box)?;
    map_points(&corners, geometry, rendered)
}

/// Map a parsed `D(...)` box to the enclosing pixel rectangle.
pub fn map_source_box(
    source: &SourceBox,
    geometry: &PageGeometry,
    rendered: PixelSize,
) -> Option<PixelRect> {
    map_points(&source.points, geometry, rendered)
}

/// Split a flat polygon into its four corners.
pub fn polygon_points(bounding_box: &[f64]) -> Option<[Point; 4]> {
    if bounding_box.len() < POLYGON_LEN {
        debug!(
            "skipping polygon with {} coordinates (need {})",
            bounding_box.len(),
            POLYGON_LEN
        );
        return None;
    }
    let p = &bounding_box[..POLYGON_LEN];
    if p.iter().any(|v| !v.is_finite()) {
        debug!("skipping polygon with non-finite coordinates");
        return None;
    }
    Some([
        Point::new(p[0], p[1]),
        Point::new(p[2], p[3]),
        Point::new(p[4], p[5]),
        Point::new(p[6], p[7]),
    ])
}

fn map_points(
    corners: &[Point; 4],
    geometry: &PageGeometry,
    rendered: PixelSize,
) -> Option<PixelRect> {
    let (sx, sy) = geometry.scale_factors(rendered)?;

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for pt in corners {
        let x = pt.x * sx;
        let y = pt.y * sy;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let (width, height) = (max_x - min_x, max_y - min_y);
    if ![min_x, min_y, width, height].iter().all(|v| v.is_finite()) {
        debug!("skipping polygon that overflows when scaled");
        return None;
    }
    Some(PixelRect::new(min_x, min_y, width, height))
}

/// One polygon parsed from the `D(page,x1,y1,...,x4,y4)` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceBox {
    /// Page number (1-indexed)
    pub page: u32,
    /// Corners in page inches
    pub points: [Point; 4],
}

impl SourceBox {
    /// Flatten to the `[x1, y1, ..., x4, y4]` form used by content items.
    pub fn to_bounding_box(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Encode back to `D(...)` text.
    pub fn to_source(&self) -> String {
        format_points(self.page, &self.points)
    }
}

fn source_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"D\(([^()]*)\)").expect("source pattern is valid"))
}

/// Parse a `;`-separated list of `D(...)` boxes.
///
/// Each segment needs exactly nine numeric fields: an integer page
/// followed by eight finite coordinates. Malformed segments are dropped
/// on their own; the rest of the string still parses.
pub fn parse_source(source: &str) -> Vec<SourceBox> {
    source.split(';').filter_map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Option<SourceBox> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }
    let Some(caps) = source_regex().captures(segment) else {
        debug!("dropping malformed source segment: {segment}");
        return None;
    };

    let fields: Vec<&str> = caps[1].split(',').map(str::trim).collect();
    if fields.len() != POLYGON_LEN + 1 {
        debug!("dropping source segment with {} fields", fields.len());
        return None;
    }

    let page: u32 = fields[0].parse().ok()?;
    let mut coords = [0.0f64; POLYGON_LEN];
    for (slot, field) in coords.iter_mut().zip(&fields[1..]) {
        let v: f64 = field.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }

    let points = polygon_points(&coords)?;
    Some(SourceBox { page, points })
}

/// Encode one flat polygon as `D(page,x1,y1,...,x4,y4)`.
///
/// Returns `None` if the polygon has fewer than eight finite entries.
pub fn format_source(page: u32, bounding_box: &[f64]) -> Option<String> {
    polygon_points(bounding_box).map(|pts| format_points(page, &pts))
}

/// Encode several boxes joined by `;`.
pub fn format_sources(boxes: &[SourceBox]) -> String {
    boxes
        .iter()
        .map(SourceBox::to_source)
        .collect::<Vec<_>>()
        .join(";")
}

fn format_points(page: u32, points: &[Point; 4]) -> String {
    let coords: Vec<String> = points
        .iter()
        .flat_map(|p| [p.x.to_string(), p.y.to_string()])
        .collect();
    format!("D({},{})", page, coords.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_at_100dpi() -> (PageGeometry, PixelSize) {
        (PageGeometry::letter(), PixelSize::new(850.0, 1100.0))
    }

    #[test]
    fn test_unit_square() {
        let (g, px) = letter_at_100dpi();
        let rect = map_to_pixel_rect(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0], &g, px).unwrap();
        assert_eq!(rect, PixelRect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_vertex_order_does_not_matter() {
        let (g, px) = letter_at_100dpi();
        let clockwise = [1.0, 2.0, 3.0, 2.0, 3.0, 2.5, 1.0, 2.5];
        let shuffled = [3.0, 2.5, 1.0, 2.0, 1.0, 2.5, 3.0, 2.0];
        let a = map_to_pixel_rect(&clockwise, &g, px).unwrap();
        let b = map_to_pixel_rect(&shuffled, &g, px).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, PixelRect::new(100.0, 200.0, 200.0, 50.0));
    }

    #[test]
    fn test_skewed_polygon_uses_enclosing_box() {
        let (g, px) = letter_at_100dpi();
        let skewed = [1.0, 1.0, 2.0, 1.2, 2.2, 2.0, 0.8, 1.8];
        let rect = map_to_pixel_rect(&skewed, &g, px).unwrap();
        assert!((rect.left - 80.0).abs() < 1e-9);
        assert!((rect.top - 100.0).abs() < 1e-9);
        assert!((rect.right() - 220.0).abs() < 1e-9);
        assert!((rect.bottom() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_anisotropic_scale() {
        let g = PageGeometry::new(10.0, 10.0);
        let rect = map_to_pixel_rect(
            &[1.0, 1.0, 2.0, 1.0, 2.0, 2.0, 1.0, 2.0],
            &g,
            PixelSize::new(1000.0, 500.0),
        )
        .unwrap();
        assert_eq!(rect, PixelRect::new(100.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn test_short_or_invalid_polygon_is_skipped() {
        let (g, px) = letter_at_100dpi();
        assert!(map_to_pixel_rect(&[], &g, px).is_none());
        assert!(map_to_pixel_rect(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0], &g, px).is_none());
        assert!(
            map_to_pixel_rect(&[0.0, f64::NAN, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0], &g, px).is_none()
        );
    }

    #[test]
    fn test_overflowing_polygon_is_skipped() {
        let (g, px) = letter_at_100dpi();
        let huge = [1e307, 0.0, 1e307, 0.0, 1e307, 1.0, 1e307, 1.0];
        assert!(map_to_pixel_rect(&huge, &g, px).is_none());

        let wide = [-1e307, 0.0, 1e307, 0.0, 1e307, 1.0, -1e307, 1.0];
        assert!(map_to_pixel_rect(&wide, &g, px).is_none());
    }

    #[test]
    fn test_extra_coordinates_are_ignored() {
        let (g, px) = letter_at_100dpi();
        let rect =
            map_to_pixel_rect(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 9.0, 9.0], &g, px)
                .unwrap();
        assert_eq!(rect.width, 100.0);
    }

    #[test]
    fn test_parse_source_single() {
        let boxes = parse_source("D(2,1.5,1,3,1,3,1.25,1.5,1.25)");
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].page, 2);
        assert_eq!(boxes[0].points[0], Point::new(1.5, 1.0));
        assert_eq!(
            boxes[0].to_bounding_box(),
            vec![1.5, 1.0, 3.0, 1.0, 3.0, 1.25, 1.5, 1.25]
        );
    }

    #[test]
    fn test_parse_source_drops_malformed_segments() {
        let source = "D(1,0,0,1,0,1,1,0,1);D(1,0,0,1);garbage; D(2, 0.5, 0.5, 1, 0.5, 1, 1, 0.5, 1) ;D(x,0,0,1,0,1,1,0,1)";
        let boxes = parse_source(source);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].page, 1);
        assert_eq!(boxes[1].page, 2);
    }

    #[test]
    fn test_parse_source_empty() {
        assert!(parse_source("").is_empty());
        assert!(parse_source(";;").is_empty());
    }

    #[test]
    fn test_source_roundtrip_through_text() {
        let text = format_source(3, &[0.5, 1.0, 2.0, 1.0, 2.0, 1.5, 0.5, 1.5]).unwrap();
        assert_eq!(text, "D(3,0.5,1,2,1,2,1.5,0.5,1.5)");
        let boxes = parse_source(&format!("{text};{text}"));
        assert_eq!(format_sources(&boxes), format!("{text};{text}"));
        assert!(format_source(1, &[1.0]).is_none());
    }

    #[test]
    fn test_map_source_box_matches_flat_mapping() {
        let (g, px) = letter_at_100dpi();
        let boxes = parse_source("D(1,1,1,2,1,2,2,1,2)");
        let a = map_source_box(&boxes[0], &g, px).unwrap();
        let b = map_to_pixel_rect(&boxes[0].to_bounding_box(), &g, px).unwrap();
        assert_eq!(a, b);
    }
}
