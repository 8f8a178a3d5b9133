//! Document-level types.

use super::ContentItem;
use serde::{Deserialize, Serialize};

/// An analyzed document as returned by the analysis backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    /// Original upload name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Path the rendering engine should load the PDF from
    pub file_path: String,

    /// Extracted content
    pub content: DocumentContent,
}

impl AnalyzedDocument {
    /// Create a document from a file path and its extracted items.
    pub fn new(file_path: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            filename: None,
            file_path: file_path.into(),
            content: DocumentContent {
                items,
                ..Default::default()
            },
        }
    }

    /// Extracted items in backend order.
    pub fn items(&self) -> &[ContentItem] {
        &self.content.items
    }

    /// Number of pages the backend saw, falling back to the highest item page.
    pub fn page_count(&self) -> u32 {
        if self.content.page_count > 0 {
            return self.content.page_count;
        }
        self.content.items.iter().map(|i| i.page).max().unwrap_or(0)
    }

    /// Check if the document has no extracted items.
    pub fn is_empty(&self) -> bool {
        self.content.items.is_empty()
    }
}

/// The `content` object of an analysis response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    /// Extracted items
    #[serde(default)]
    pub items: Vec<ContentItem>,

    /// Full document text used as question context
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_text: String,

    /// Page count reported by the backend (0 if unknown)
    #[serde(default)]
    pub page_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentType;

    #[test]
    fn test_parse_analyze_response() {
        let json = r#"{
            "filename": "contract.pdf",
            "filePath": "/uploads/1700000000-contract.pdf",
            "content": {
                "items": [
                    {"id": "item-0", "type": "heading", "content": "AGREEMENT", "page": 1,
                     "boundingBox": [1, 1, 3, 1, 3, 1.5, 1, 1.5],
                     "source": "D(1,1,1,3,1,3,1.5,1,1.5)"},
                    {"id": "item-1", "type": "paragraph", "content": "Payment due", "page": 2,
                     "boundingBox": []}
                ],
                "fullText": "AGREEMENT\n\nPayment due\n\n",
                "pageCount": 3
            }
        }"#;
        let doc: AnalyzedDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.filename.as_deref(), Some("contract.pdf"));
        assert_eq!(doc.items().len(), 2);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.items()[0].content_type, ContentType::Heading);
        assert_eq!(doc.items()[1].page, 2);
    }

    #[test]
    fn test_page_count_fallback() {
        let doc = AnalyzedDocument::new(
            "/uploads/a.pdf",
            vec![
                ContentItem::new("a", 1, ContentType::Paragraph, "x"),
                ContentItem::new("b", 4, ContentType::Paragraph, "y"),
            ],
        );
        assert_eq!(doc.page_count(), 4);
        assert!(AnalyzedDocument::default().is_empty());
    }
}
