//! Integration tests for the viewer controller.

use pdflens::error::{Error, Result};
use pdflens::model::{AnalyzedDocument, ContentItem, ContentType, PageGeometry, PixelSize, TextFragment};
use pdflens::session::{ChatKind, Notification};
use pdflens::{Backend, PageSource, Presenter, RenderEngine, TypeFilter, ViewModel, Viewer};
use std::cell::RefCell;

/// Mock backend returning canned responses.
struct MockBackend {
    document: Option<AnalyzedDocument>,
    answer: std::result::Result<String, String>,
    uploads: RefCell<Vec<String>>,
}

impl MockBackend {
    fn new(document: AnalyzedDocument) -> Self {
        Self {
            document: Some(document),
            answer: Ok("Within 30 days.".to_string()),
            uploads: RefCell::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            document: None,
            answer: Err("Failed to process query".to_string()),
            uploads: RefCell::new(Vec::new()),
        }
    }
}

impl Backend for MockBackend {
    async fn analyze(&self, filename: &str, _data: Vec<u8>) -> Result<AnalyzedDocument> {
        self.uploads.borrow_mut().push(filename.to_string());
        self.document
            .clone()
            .ok_or_else(|| Error::api(500, "Failed to analyze document"))
    }

    async fn query(&self, _question: &str) -> Result<String> {
        self.answer.clone().map_err(|e| Error::api(500, e))
    }
}

/// Mock engine whose pages carry fixed text.
struct MockEngine {
    pages: Vec<Vec<&'static str>>,
    fail_open: bool,
}

struct MockSource {
    pages: Vec<Vec<&'static str>>,
}

impl PageSource for MockSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, _page: u32) -> Result<PageGeometry> {
        Ok(PageGeometry::letter())
    }

    fn render_page(&mut self, _page: u32, _scale: f64) -> Result<PixelSize> {
        Ok(PixelSize::new(850.0, 1100.0))
    }

    fn text_fragments(&mut self, page: u32, _scale: f64) -> Result<Vec<TextFragment>> {
        let texts = self
            .pages
            .get(page as usize - 1)
            .ok_or_else(|| Error::PageOutOfRange(page, self.pages.len() as u32))?;
        Ok(texts.iter().map(|t| TextFragment::text_only(*t)).collect())
    }
}

impl RenderEngine for MockEngine {
    type Source = MockSource;

    fn open(&self, _file_path: &str) -> Result<MockSource> {
        if self.fail_open {
            return Err(Error::Engine("Invalid PDF structure".to_string()));
        }
        Ok(MockSource {
            pages: self.pages.clone(),
        })
    }
}

/// Presenter that records what it was asked to show.
#[derive(Default)]
struct Recorder {
    views: Vec<ViewModel>,
    notifications: Vec<Notification>,
}

impl Presenter for Recorder {
    fn present(&mut self, view: &ViewModel) {
        self.views.push(view.clone());
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }
}

impl Recorder {
    fn last(&self) -> &ViewModel {
        self.views.last().expect("nothing presented")
    }
}

fn contract() -> AnalyzedDocument {
    AnalyzedDocument::new(
        "/uploads/1700000000000-contract.pdf",
        vec![
            ContentItem::new("item-0", 1, ContentType::Heading, "SERVICE AGREEMENT")
                .with_bounding_box(vec![1.0, 1.0, 7.0, 1.0, 7.0, 1.5, 1.0, 1.5]),
            ContentItem::new("item-1", 1, ContentType::Paragraph, "The buyer shall pay the seller")
                .with_bounding_box(vec![1.0, 2.0, 7.0, 2.0, 7.0, 3.0, 1.0, 3.0]),
            ContentItem::new("item-2", 2, ContentType::Paragraph, "Signed by both parties")
                .with_bounding_box(vec![1.0, 9.0, 5.0, 9.0, 5.0, 9.5, 1.0, 9.5]),
        ],
    )
}

fn engine() -> MockEngine {
    MockEngine {
        pages: vec![
            vec!["SERVICE AGREEMENT", "The buyer shall", "pay the seller"],
            vec!["Signed by both parties"],
        ],
        fail_open: false,
    }
}

async fn loaded_viewer() -> Viewer<MockBackend, MockEngine, Recorder> {
    let mut viewer = Viewer::new(MockBackend::new(contract()), engine(), Recorder::default());
    assert!(viewer.upload("contract.pdf", b"%PDF-1.7".to_vec()).await);
    viewer
}

// ==================== Upload ====================

#[tokio::test]
async fn test_upload_renders_first_page_with_overlay() {
    let viewer = loaded_viewer().await;
    let view = viewer.presenter().last();

    assert_eq!(view.count_label, "3 of 3 items");
    assert!(view.navigation.visible);
    assert_eq!(view.navigation.current, 1);
    assert_eq!(view.navigation.total, 2);
    assert!(!view.navigation.prev_enabled);
    assert!(view.navigation.next_enabled);
    assert!(view.ask_enabled);
    assert!(!view.loading);

    // 850 px / 8.5 in = 100 px per inch
    let ids: Vec<_> = view.overlay.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["item-0", "item-1"]);
    assert_eq!(view.overlay[1].rect.top, 200.0);
    assert_eq!(view.overlay[1].rect.height, 100.0);

    assert_eq!(
        viewer.presenter().notifications,
        vec![Notification::success("Document analyzed successfully!")]
    );
}

#[tokio::test]
async fn test_upload_shows_loading_while_in_flight() {
    let viewer = loaded_viewer().await;
    assert!(viewer.presenter().views[0].loading);
    assert!(!viewer.presenter().last().loading);
}

#[tokio::test]
async fn test_failed_analysis_notifies() {
    let mut viewer = Viewer::new(MockBackend::failing(), engine(), Recorder::default());
    assert!(!viewer.upload("contract.pdf", Vec::new()).await);

    let notes = &viewer.presenter().notifications;
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_error());
    assert!(notes[0].message.starts_with("Failed to analyze document: "));
    assert!(viewer.session().document().is_none());
    assert!(!viewer.presenter().last().navigation.visible);
}

#[tokio::test]
async fn test_engine_failure_keeps_items() {
    let mut engine = engine();
    engine.fail_open = true;
    let mut viewer = Viewer::new(MockBackend::new(contract()), engine, Recorder::default());
    viewer.upload("contract.pdf", Vec::new()).await;

    let view = viewer.presenter().last();
    assert_eq!(view.rows.len(), 3);
    assert!(view.overlay.is_empty());
    assert!(!view.navigation.visible);
    assert!(viewer
        .presenter()
        .notifications
        .iter()
        .any(|n| n.message == "Failed to load PDF"));
}

#[tokio::test]
async fn test_upload_file_rejects_non_pdf() {
    let mut viewer = Viewer::new(MockBackend::new(contract()), engine(), Recorder::default());
    assert!(!viewer.upload_file("notes.txt").await);
    assert!(viewer.session().document().is_none());
    assert!(viewer.backend().uploads.borrow().is_empty());
}

// ==================== Selection ====================

#[tokio::test]
async fn test_select_highlights_split_text() {
    let mut viewer = loaded_viewer().await;
    viewer.select("item-1");

    let view = viewer.presenter().last();
    assert_eq!(view.highlights, vec![0, 1, 2]);
    let details = view.details.as_ref().unwrap();
    assert_eq!(details.page_label, "Page 1");
    assert_eq!(details.content_type, ContentType::Paragraph);
    assert!(view.overlay.iter().any(|b| b.id == "item-1" && b.selected));
    assert!(view.rows.iter().any(|r| r.id == "item-1" && r.active));
}

#[tokio::test]
async fn test_select_on_other_page_navigates_then_highlights() {
    let mut viewer = loaded_viewer().await;
    viewer.select("item-2");

    let view = viewer.presenter().last();
    assert_eq!(view.navigation.current, 2);
    assert_eq!(view.highlights, vec![0]);
    assert_eq!(view.overlay.len(), 1);
    assert!(viewer.session().pending_highlight().is_none());
}

#[tokio::test]
async fn test_select_again_deselects() {
    let mut viewer = loaded_viewer().await;
    viewer.select("item-0");
    viewer.select("item-0");

    let view = viewer.presenter().last();
    assert!(view.details.is_none());
    assert!(view.highlights.is_empty());
    assert!(view.overlay.iter().all(|b| !b.selected));
}

// ==================== Editing and Filtering ====================

#[tokio::test]
async fn test_delete_and_restore() {
    let mut viewer = loaded_viewer().await;
    viewer.delete("item-0");

    let view = viewer.presenter().last();
    assert_eq!(view.count_label, "2 of 3 items");
    assert!(view.restore_visible);
    assert!(view.overlay.iter().all(|b| b.id != "item-0"));
    assert!(viewer
        .presenter()
        .notifications
        .contains(&Notification::success("Heading deleted")));

    viewer.restore_all();
    let view = viewer.presenter().last();
    assert_eq!(view.count_label, "3 of 3 items");
    assert!(!view.restore_visible);
}

#[tokio::test]
async fn test_filter_and_search() {
    let mut viewer = loaded_viewer().await;

    viewer.set_filter(TypeFilter::Only(ContentType::Heading));
    assert_eq!(viewer.presenter().last().rows.len(), 1);

    viewer.set_filter(TypeFilter::All);
    viewer.set_query("SIGNED");
    let view = viewer.presenter().last();
    assert_eq!(view.count_label, "1 matches");
    assert_eq!(view.rows[0].id, "item-2");

    viewer.set_query("zebra");
    let view = viewer.presenter().last();
    assert_eq!(view.empty_message.as_deref(), Some("No items match \"zebra\""));

    viewer.clear_query();
    assert_eq!(viewer.presenter().last().rows.len(), 3);
}

// ==================== Navigation ====================

#[tokio::test]
async fn test_page_navigation_bounds() {
    let mut viewer = loaded_viewer().await;
    viewer.prev_page();
    assert_eq!(viewer.presenter().last().navigation.current, 1);

    viewer.next_page();
    let nav = viewer.presenter().last().navigation;
    assert_eq!(nav.current, 2);
    assert!(nav.prev_enabled);
    assert!(!nav.next_enabled);

    viewer.next_page();
    assert_eq!(viewer.presenter().last().navigation.current, 2);

    viewer.go_to_page(9);
    assert_eq!(viewer.presenter().last().navigation.current, 2);
    viewer.go_to_page(1);
    assert_eq!(viewer.presenter().last().navigation.current, 1);
}

// ==================== Questions ====================

#[tokio::test]
async fn test_ask_appends_answer() {
    let mut viewer = loaded_viewer().await;
    viewer.ask("  When is payment due?  ").await.unwrap();

    let view = viewer.presenter().last();
    let entries: Vec<_> = view.chat.iter().map(|m| (m.kind, m.text.as_str())).collect();
    assert_eq!(
        entries,
        vec![
            (ChatKind::Question, "When is payment due?"),
            (ChatKind::Answer, "Within 30 days."),
        ]
    );
    assert!(view.ask_enabled);
}

#[tokio::test]
async fn test_ask_blank_is_ignored() {
    let mut viewer = loaded_viewer().await;
    let presented = viewer.presenter().views.len();
    viewer.ask("   ").await.unwrap();
    assert_eq!(viewer.presenter().views.len(), presented);
    assert!(viewer.session().chat().is_empty());
}

#[tokio::test]
async fn test_ask_error_entry() {
    let backend = MockBackend {
        answer: Err("Failed to process query".to_string()),
        ..MockBackend::new(contract())
    };
    let mut viewer = Viewer::new(backend, engine(), Recorder::default());
    assert!(viewer.upload("contract.pdf", Vec::new()).await);
    viewer.ask("Who signs?").await.unwrap();

    let chat = viewer.session().chat();
    assert_eq!(chat.len(), 2);
    assert_eq!(chat[1].kind, ChatKind::Error);
    assert_eq!(
        chat[1].text,
        "Sorry, I couldn't process your question: Failed to process query"
    );
}

#[tokio::test]
async fn test_ask_without_document() {
    let mut viewer = Viewer::new(MockBackend::new(contract()), engine(), Recorder::default());
    let err = viewer.ask("Who signs?").await.unwrap_err();
    assert!(matches!(err, Error::NoDocument));
    assert!(viewer.session().chat().is_empty());
    assert!(viewer.presenter().views.is_empty());
}
