//! # pdflens
//!
//! Content overlay and Q&A session core for analyzed PDF documents.
//!
//! An analysis backend extracts content items (headings, paragraphs) from
//! a PDF, each with a bounding polygon in page inches. This library maps
//! those polygons onto the rendered page, finds an item's text among the
//! page's rendered text fragments for highlighting, filters and edits the
//! item list, and keeps the whole viewer state in one explicit session.
//!
//! ## Quick Start
//!
//! ```
//! use pdflens::{filter_items, locate_span, map_to_pixel_rect, TypeFilter};
//! use pdflens::model::{ContentItem, ContentType, PageGeometry, PixelSize, TextFragment};
//!
//! let item = ContentItem::new("item-0", 1, ContentType::Paragraph, "Payment due")
//!     .with_bounding_box(vec![1.0, 2.0, 3.0, 2.0, 3.0, 2.25, 1.0, 2.25]);
//!
//! // Where to draw the overlay on a Letter page rendered at 850x1100 px
//! let rect = map_to_pixel_rect(
//!     &item.bounding_box,
//!     &PageGeometry::letter(),
//!     PixelSize::new(850.0, 1100.0),
//! )
//! .unwrap();
//! assert_eq!(rect.left, 100.0);
//!
//! // Which rendered fragments to highlight
//! let fragments = vec![TextFragment::text_only("Payment due"), TextFragment::text_only("Net 30")];
//! assert_eq!(locate_span(&item.content, &fragments), vec![0]);
//!
//! // Search the content list
//! let items = vec![item];
//! assert_eq!(filter_items(&items, &TypeFilter::All, "payment").len(), 1);
//! ```
//!
//! ## Features
//!
//! - **Geometry mapping**: inch polygons and `D(page,...)` sources to pixel rectangles
//! - **Text location**: anchor-window search with word-level fallback
//! - **Session state**: selection, delete/restore, paging with render coalescing
//! - **Stale-response safety**: backend requests keyed by generation
//! - **HTTP client** (`client` feature): the analysis and question endpoints

pub mod client;
pub mod engine;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod json;
pub mod locate;
pub mod model;
pub mod session;
pub mod view;
pub mod viewer;

// Re-export commonly used types
#[cfg(feature = "client")]
pub use client::HttpBackend;
pub use client::{Backend, ClientOptions};
pub use engine::{PageSource, RenderEngine, RenderedPage, DEFAULT_RENDER_SCALE};
pub use error::{Error, Result};
pub use filter::{filter_items, TypeFilter};
pub use geometry::{map_source_box, map_to_pixel_rect, parse_source, SourceBox};
pub use json::{load_analysis, load_fragments, to_json, JsonFormat};
pub use locate::{locate_match, locate_span, LocateOptions, MatchKind, SpanMatch};
pub use model::{
    AnalyzedDocument, ContentItem, ContentType, DocumentContent, PageGeometry, PixelRect,
    PixelSize, Point, TextFragment,
};
pub use session::{ChatKind, ChatMessage, Notification, Session, Ticket};
pub use view::{overlay_boxes, OverlayBox, Presenter, ViewModel};
pub use viewer::{Viewer, ViewerOptions};
