//! Page navigation and render serialization.
//!
//! Only one page render is in flight at a time. A request made while a
//! render runs replaces any earlier pending request, and the pending page
//! is issued as soon as the running render completes.

use log::debug;

/// Paging state of the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    current: u32,
    count: u32,
    rendering: bool,
    pending: Option<u32>,
}

impl Paging {
    /// Create paging state with no document loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a freshly loaded document of `count` pages.
    pub fn reset(&mut self, count: u32) {
        *self = Self {
            current: if count > 0 { 1 } else { 0 },
            count,
            rendering: false,
            pending: None,
        };
    }

    /// Page most recently targeted by a render (1-indexed, 0 if none).
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Number of pages in the loaded document (0 if none).
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether a render is in flight.
    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Page waiting for the in-flight render to finish.
    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    /// Whether a document with pages is loaded.
    pub fn has_pages(&self) -> bool {
        self.count > 0
    }

    /// Check if `page` is a valid page number.
    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.count
    }

    /// Whether the previous-page control should be enabled.
    pub fn can_go_back(&self) -> bool {
        self.has_pages() && self.current > 1
    }

    /// Whether the next-page control should be enabled.
    pub fn can_go_forward(&self) -> bool {
        self.has_pages() && self.current < self.count
    }

    /// Request a render of `page`.
    ///
    /// Returns the page to render now, or `None` if the request was parked
    /// behind the in-flight render.
    pub fn request(&mut self, page: u32) -> Option<u32> {
        if self.rendering {
            if let Some(dropped) = self.pending.replace(page) {
                debug!("render of page {dropped} superseded by page {page}");
            }
            return None;
        }
        self.rendering = true;
        self.current = page;
        Some(page)
    }

    /// Mark the in-flight render finished.
    ///
    /// Returns the pending page, which is now in flight, if one was waiting.
    pub fn complete(&mut self) -> Option<u32> {
        self.rendering = false;
        let next = self.pending.take()?;
        self.request(next)
    }
}
