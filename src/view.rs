//! View computation and the presentation seam.
//!
//! [`ViewModel::from_session`] derives everything a surface needs to draw
//! from a [`Session`]: list rows and labels, the detail pane, overlay boxes
//! for the displayed page, highlighted fragments, and control states. A
//! [`Presenter`] applies a view model to a concrete surface.
//!
//! # Example
//!
//! ```
//! use pdflens::session::Session;
//! use pdflens::view::ViewModel;
//!
//! let view = ViewModel::from_session(&Session::new());
//! assert_eq!(view.count_label, "0 items");
//! assert_eq!(view.empty_message.as_deref(), Some("No content extracted yet"));
//! ```

use crate::geometry::map_to_pixel_rect;
use crate::model::{ContentItem, ContentType, PageGeometry, PixelRect, PixelSize};
use crate::session::{ChatMessage, Notification, Session};
use serde::Serialize;

/// One row of the content list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub content_type: ContentType,
    pub page: u32,
    pub text: String,
    pub active: bool,
}

/// The detail pane for the selected item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Details {
    pub id: String,
    pub content: String,
    pub page_label: String,
    pub content_type: ContentType,
}

/// A bounding box drawn over the displayed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayBox {
    pub id: String,
    /// Position in the current item list
    pub index: usize,
    pub content_type: ContentType,
    pub rect: PixelRect,
    pub selected: bool,
}

/// State of the page navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Navigation {
    pub visible: bool,
    pub current: u32,
    pub total: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Everything a presenter needs to draw the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub rows: Vec<ListRow>,
    pub count_label: String,
    pub restore_visible: bool,
    pub empty_message: Option<String>,
    pub details: Option<Details>,
    pub overlay: Vec<OverlayBox>,
    pub highlights: Vec<usize>,
    pub navigation: Navigation,
    pub ask_enabled: bool,
    pub loading: bool,
    pub chat: Vec<ChatMessage>,
}

impl ViewModel {
    /// Derive the view of a session.
    pub fn from_session(session: &Session) -> Self {
        let visible = session.visible_items();
        let selected = session.selected_id();
        let query = session.query();
        let total = session.items().len();

        let count_label = if total == 0 {
            "0 items".to_string()
        } else if !query.is_empty() {
            format!("{} matches", visible.len())
        } else {
            format!("{} of {} items", total, session.original_items().len())
        };

        let empty_message = if total == 0 {
            Some("No content extracted yet".to_string())
        } else if visible.is_empty() {
            Some(if query.is_empty() {
                "No items match the filter".to_string()
            } else {
                format!("No items match \"{}\"", query)
            })
        } else {
            None
        };

        let rows = visible
            .iter()
            .map(|item| ListRow {
                id: item.id.clone(),
                content_type: item.content_type,
                page: item.page,
                text: item.content.clone(),
                active: selected == Some(item.id.as_str()),
            })
            .collect();

        let details = session.selected_item().map(|item| Details {
            id: item.id.clone(),
            content: item.content.clone(),
            page_label: format!("Page {}", item.page),
            content_type: item.content_type,
        });

        let overlay = match session.displayed_page() {
            Some(shown) => overlay_boxes(
                session.items(),
                shown.page,
                &shown.geometry,
                shown.size,
                selected,
            ),
            None => Vec::new(),
        };

        let paging = session.paging();
        let navigation = Navigation {
            visible: paging.has_pages(),
            current: paging.current(),
            total: paging.count(),
            prev_enabled: paging.can_go_back(),
            next_enabled: paging.can_go_forward(),
        };

        Self {
            rows,
            count_label,
            restore_visible: total > 0 && session.can_restore(),
            empty_message,
            details,
            overlay,
            highlights: session.highlights().to_vec(),
            navigation,
            ask_enabled: session.ask_enabled(),
            loading: session.is_loading(),
            chat: session.chat().to_vec(),
        }
    }
}

/// Overlay boxes for the items on `page`.
///
/// Items on other pages and items without a usable polygon are skipped.
pub fn overlay_boxes(
    items: &[ContentItem],
    page: u32,
    geometry: &PageGeometry,
    rendered: PixelSize,
    selected: Option<&str>,
) -> Vec<OverlayBox> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_on_page(page))
        .filter_map(|(index, item)| {
            let rect = map_to_pixel_rect(&item.bounding_box, geometry, rendered)?;
            Some(OverlayBox {
                id: item.id.clone(),
                index,
                content_type: item.content_type,
                rect,
                selected: selected == Some(item.id.as_str()),
            })
        })
        .collect()
}

/// Applies view state to a concrete surface.
pub trait Presenter {
    /// Redraw the surface from a view model.
    fn present(&mut self, view: &ViewModel);

    /// Show a transient notification.
    fn notify(&mut self, notification: &Notification) {
        let _ = notification;
    }
}
