//! Extracted content items.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of extracted content, serialized as a lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Titles, section headings, numbered clauses
    Heading,

    /// Body text
    #[default]
    Paragraph,

    /// Any tag this version does not know about
    #[serde(other)]
    Other,
}

impl ContentType {
    /// The wire tag (`"heading"`, `"paragraph"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Heading => "heading",
            ContentType::Paragraph => "paragraph",
            ContentType::Other => "other",
        }
    }

    /// Capitalized label for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Heading => "Heading",
            ContentType::Paragraph => "Paragraph",
            ContentType::Other => "Other",
        }
    }

    /// Parse a wire tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "heading" => Some(ContentType::Heading),
            "paragraph" => Some(ContentType::Paragraph),
            "other" => Some(ContentType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted document fact with its location on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Unique identifier
    pub id: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Content kind
    #[serde(rename = "type")]
    pub content_type: ContentType,

    /// Extracted text
    pub content: String,

    /// Polygon `[x1, y1, x2, y2, x3, y3, x4, y4]` in page inches
    #[serde(default)]
    pub bounding_box: Vec<f64>,

    /// All regions in `D(page,x1,y1,...)` form, `;`-separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ContentItem {
    /// Create an item without geometry.
    pub fn new(
        id: impl Into<String>,
        page: u32,
        content_type: ContentType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            page,
            content_type,
            content: content.into(),
            bounding_box: Vec::new(),
            source: None,
        }
    }

    /// Attach a bounding polygon.
    pub fn with_bounding_box(mut self, bbox: impl Into<Vec<f64>>) -> Self {
        self.bounding_box = bbox.into();
        self
    }

    /// Attach a `D(...)` source string.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the item sits on the given page.
    pub fn is_on_page(&self, page: u32) -> bool {
        self.page == page
    }
}
