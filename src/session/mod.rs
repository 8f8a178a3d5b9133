//! Viewer session state and its update functions.
//!
//! A [`Session`] holds everything the viewer knows: the analyzed document,
//! the editable item list and its original snapshot, list filters,
//! selection, paging, the displayed page's geometry and text, the
//! question history, and queued notifications. Every user action and
//! every I/O completion is a method call that updates the session
//! synchronously; nothing here touches a rendering surface or the
//! network.
//!
//! # Example
//!
//! ```
//! use pdflens::model::{AnalyzedDocument, ContentItem, ContentType};
//! use pdflens::session::Session;
//!
//! let mut session = Session::new();
//! session.load_document(AnalyzedDocument::new(
//!     "/uploads/contract.pdf",
//!     vec![ContentItem::new("item-0", 1, ContentType::Paragraph, "Payment due")],
//! ));
//!
//! session.delete("item-0");
//! assert!(session.items().is_empty());
//! session.restore_all();
//! assert_eq!(session.items().len(), 1);
//! ```

mod chat;
mod notification;
mod paging;

pub use chat::{ChatKind, ChatMessage, RequestTracker, Ticket};
pub use notification::{Notification, NotificationLevel};
pub use paging::Paging;

use crate::engine::RenderedPage;
use crate::error::Error;
use crate::filter::{filter_items, TypeFilter};
use crate::locate::{locate_span_with_options, LocateOptions};
use crate::model::{AnalyzedDocument, ContentItem, PageGeometry, PixelSize, TextFragment};
use log::{debug, info, warn};

/// Geometry and text of the page currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedPage {
    pub page: u32,
    pub geometry: PageGeometry,
    pub size: PixelSize,
    pub fragments: Vec<TextFragment>,
}

impl From<RenderedPage> for DisplayedPage {
    fn from(r: RenderedPage) -> Self {
        Self {
            page: r.page,
            geometry: r.geometry,
            size: r.size,
            fragments: r.fragments,
        }
    }
}

/// Explicit state of one viewer session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    document: Option<AnalyzedDocument>,
    items: Vec<ContentItem>,
    original: Vec<ContentItem>,
    filter: TypeFilter,
    query: String,
    selected: Option<String>,
    paging: Paging,
    displayed: Option<DisplayedPage>,
    highlights: Vec<usize>,
    pending_highlight: Option<String>,
    chat: Vec<ChatMessage>,
    ask_enabled: bool,
    questions: RequestTracker,
    uploads: RequestTracker,
    upload_name: Option<String>,
    notifications: Vec<Notification>,
    locate_options: LocateOptions,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the options used when highlighting item text.
    pub fn with_locate_options(mut self, options: LocateOptions) -> Self {
        self.locate_options = options;
        self
    }

    // ==================== Accessors ====================

    /// The loaded document, if any.
    pub fn document(&self) -> Option<&AnalyzedDocument> {
        self.document.as_ref()
    }

    /// Current (possibly edited) items.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Items as first loaded.
    pub fn original_items(&self) -> &[ContentItem] {
        &self.original
    }

    /// Get a current item by ID.
    pub fn item(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Active type filter.
    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    /// Active search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Items passing the type filter and query, in list order.
    pub fn visible_items(&self) -> Vec<&ContentItem> {
        filter_items(&self.items, &self.filter, &self.query)
    }

    /// ID of the selected item.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected item.
    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.selected.as_deref().and_then(|id| self.item(id))
    }

    pub fn paging(&self) -> &Paging {
        &self.paging
    }

    /// Geometry and text of the page on screen.
    pub fn displayed_page(&self) -> Option<&DisplayedPage> {
        self.displayed.as_ref()
    }

    /// Indices of highlighted text fragments on the displayed page.
    pub fn highlights(&self) -> &[usize] {
        &self.highlights
    }

    /// Item whose highlight waits for a page render.
    pub fn pending_highlight(&self) -> Option<&str> {
        self.pending_highlight.as_deref()
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Whether a new question may be submitted.
    pub fn ask_enabled(&self) -> bool {
        self.ask_enabled
    }

    /// Whether an upload is being analyzed.
    pub fn is_loading(&self) -> bool {
        self.uploads.in_flight()
    }

    /// Name of the file most recently chosen for upload.
    pub fn upload_name(&self) -> Option<&str> {
        self.upload_name.as_deref()
    }

    /// Whether items were deleted since the last load or restore.
    pub fn can_restore(&self) -> bool {
        self.items.len() < self.original.len()
    }

    /// Queued notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain queued notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    // ==================== Document lifecycle ====================

    /// Start analyzing an upload.
    pub fn begin_upload(&mut self, filename: impl Into<String>) -> Ticket {
        self.upload_name = Some(filename.into());
        self.uploads.issue()
    }

    /// Apply the outcome of an upload.
    ///
    /// A failure leaves every other part of the session untouched. Returns
    /// `false` if the ticket was superseded and the outcome ignored.
    pub fn finish_upload(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalyzedDocument, Error>,
    ) -> bool {
        if !self.uploads.complete(ticket) {
            debug!("ignoring stale upload response #{}", ticket.generation());
            return false;
        }
        match outcome {
            Ok(doc) => self.load_document(doc),
            Err(e) => {
                warn!("analysis failed: {e}");
                self.notify(Notification::error(format!(
                    "Failed to analyze document: {e}"
                )));
            }
        }
        true
    }

    /// Replace the session's document and item snapshot.
    pub fn load_document(&mut self, doc: AnalyzedDocument) {
        info!(
            "loaded {} with {} items",
            doc.file_path,
            doc.items().len()
        );
        self.items = doc.content.items.clone();
        self.original = doc.content.items.clone();
        self.document = Some(doc);
        self.selected = None;
        self.highlights.clear();
        self.pending_highlight = None;
        self.ask_enabled = true;
        self.notify(Notification::success("Document analyzed successfully!"));
    }

    /// The rendering engine opened the document.
    ///
    /// Returns the first page to render.
    pub fn engine_loaded(&mut self, page_count: u32) -> Option<u32> {
        self.paging.reset(page_count);
        self.displayed = None;
        if page_count == 0 {
            return None;
        }
        self.paging.request(1)
    }

    /// The rendering engine could not open the document.
    pub fn engine_failed(&mut self, error: &Error) {
        warn!("failed to load PDF: {error}");
        self.paging.reset(0);
        self.displayed = None;
        self.notify(Notification::error("Failed to load PDF"));
    }

    // ==================== Paging ====================

    /// Request a page render, coalescing with any render in flight.
    ///
    /// Returns the page to render now, if any.
    pub fn request_render(&mut self, page: u32) -> Option<u32> {
        self.paging.request(page)
    }

    /// Navigate to `page`. Out-of-range pages and sessions without a
    /// rendered document are ignored.
    pub fn go_to_page(&mut self, page: u32) -> Option<u32> {
        if !self.paging.contains(page) {
            return None;
        }
        self.request_render(page)
    }

    pub fn next_page(&mut self) -> Option<u32> {
        if !self.paging.can_go_forward() {
            return None;
        }
        self.go_to_page(self.paging.current() + 1)
    }

    pub fn prev_page(&mut self) -> Option<u32> {
        if !self.paging.can_go_back() {
            return None;
        }
        self.go_to_page(self.paging.current() - 1)
    }

    /// Record a completed render.
    ///
    /// Applies a highlight that was waiting for this page, then returns the
    /// next page to render if a request arrived during the render.
    pub fn finish_render(&mut self, rendered: RenderedPage) -> Option<u32> {
        let page = rendered.page;
        self.displayed = Some(rendered.into());
        self.highlights.clear();

        if let Some(id) = self.pending_highlight.clone() {
            match self.item(&id).map(|i| i.page) {
                Some(p) if p == page => {
                    self.pending_highlight = None;
                    self.highlight_item(&id);
                }
                Some(_) => {}
                None => self.pending_highlight = None,
            }
        } else if let Some(id) = self.selected.clone() {
            if self.item(&id).is_some_and(|i| i.page == page) {
                self.highlight_item(&id);
            }
        }

        self.paging.complete()
    }

    /// Record a failed render so queued requests can proceed.
    pub fn abort_render(&mut self, error: &Error) -> Option<u32> {
        warn!("page render failed: {error}");
        self.paging.complete()
    }

    // ==================== List controls ====================

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    // ==================== Selection ====================

    /// Select an item, or deselect it if it is already selected.
    ///
    /// Selecting an item on another page requests that page and defers the
    /// text highlight until the render finishes. An item whose page is not
    /// in the document is selected without navigating. Returns the page to
    /// render now, if any.
    pub fn select(&mut self, id: &str) -> Option<u32> {
        if self.selected.as_deref() == Some(id) {
            self.clear_selection();
            return None;
        }
        let page = self.item(id)?.page;

        self.selected = Some(id.to_string());
        self.highlights.clear();
        self.pending_highlight = None;

        if self.paging.has_pages() && page != self.paging.current() {
            if !self.paging.contains(page) {
                debug!(
                    "{id} is on page {page}, outside 1..={}; not navigating",
                    self.paging.count()
                );
                return None;
            }
            self.pending_highlight = Some(id.to_string());
            return self.go_to_page(page);
        }
        if self.paging.is_rendering() {
            // the target page is still being drawn; highlight once it lands
            self.pending_highlight = Some(id.to_string());
            return None;
        }
        self.highlight_item(id);
        None
    }

    /// Clear selection, details, and all highlights.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.highlights.clear();
        self.pending_highlight = None;
    }

    fn highlight_item(&mut self, id: &str) {
        let Some(item) = self.items.iter().find(|i| i.id == id) else {
            return;
        };
        self.highlights = match &self.displayed {
            Some(shown) if shown.page == item.page => {
                locate_span_with_options(&item.content, &shown.fragments, &self.locate_options)
            }
            _ => Vec::new(),
        };
        if self.highlights.is_empty() {
            debug!("no text located for {}", item.id);
        }
    }

    // ==================== Editing ====================

    /// Delete an item. Unknown IDs are ignored.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.items.iter().position(|i| i.id == id) else {
            return false;
        };
        let item = self.items.remove(index);

        if self.selected.as_deref() == Some(id) {
            self.clear_selection();
        }
        if self.pending_highlight.as_deref() == Some(id) {
            self.pending_highlight = None;
        }

        self.notify(Notification::success(format!(
            "{} deleted",
            item.content_type.label()
        )));
        true
    }

    /// Restore every item from the original snapshot.
    pub fn restore_all(&mut self) {
        self.items = self.original.clone();
        self.clear_selection();
        self.notify(Notification::success("All items restored"));
    }

    // ==================== Questions ====================

    /// Submit a question.
    ///
    /// Blank questions are ignored. A new question supersedes any question
    /// still in flight.
    pub fn begin_question(&mut self, question: &str) -> Option<(Ticket, String)> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        self.chat
            .push(ChatMessage::new(ChatKind::Question, question));
        self.ask_enabled = false;
        Some((self.questions.issue(), question.to_string()))
    }

    /// Apply the backend's answer to a question.
    ///
    /// Returns `false` if a newer question superseded this one.
    pub fn finish_question(&mut self, ticket: Ticket, outcome: Result<String, Error>) -> bool {
        if !self.questions.complete(ticket) {
            debug!("ignoring stale answer #{}", ticket.generation());
            return false;
        }
        let message = match outcome {
            Ok(answer) => ChatMessage::new(ChatKind::Answer, answer),
            Err(e) => {
                warn!("query failed: {e}");
                ChatMessage::new(
                    ChatKind::Error,
                    format!("Sorry, I couldn't process your question: {e}"),
                )
            }
        };
        self.chat.push(message);
        self.ask_enabled = true;
        true
    }
}
