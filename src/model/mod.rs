//! Data model for analyzed documents and rendered pages.
//!
//! Content items arrive from the analysis backend in page-inch
//! coordinates; pages and text fragments come from the rendering engine
//! in pixels. The geometry and locator modules bridge the two.

mod content;
mod document;
mod fragment;
mod page;

pub use content::{ContentItem, ContentType};
pub use document::{AnalyzedDocument, DocumentContent};
pub use fragment::TextFragment;
pub use page::{PageGeometry, PixelRect, PixelSize, Point, POINTS_PER_INCH};
