//! Content list filtering and search.

use crate::model::{ContentItem, ContentType};
use std::fmt;
use std::str::FromStr;

/// Which content types the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Every item
    #[default]
    All,
    /// Only items of one type
    Only(ContentType),
}

impl TypeFilter {
    /// Check if an item passes the type filter.
    pub fn matches(&self, item: &ContentItem) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => item.content_type == *t,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    /// Parse `"all"` or a content type tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        ContentType::from_tag(s)
            .map(TypeFilter::Only)
            .ok_or_else(|| format!("Unknown content type: {}", s))
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(t) => write!(f, "{}", t),
        }
    }
}

/// Check if an item's content contains `query`, ignoring case.
///
/// An empty query matches everything.
pub fn matches_query(item: &ContentItem, query: &str) -> bool {
    query.is_empty() || item.content.to_lowercase().contains(&query.to_lowercase())
}

/// Keep items passing both the type filter and the search query.
///
/// Relative order is preserved.
pub fn filter_items<'a>(
    items: &'a [ContentItem],
    filter: &TypeFilter,
    query: &str,
) -> Vec<&'a ContentItem> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| filter.matches(item))
        .filter(|item| query.is_empty() || item.content.to_lowercase().contains(&query))
        .collect()
}
