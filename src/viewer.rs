//! Viewer controller.
//!
//! [`Viewer`] wires a [`Session`] to a [`Backend`], a [`RenderEngine`], and a
//! [`Presenter`]. Each public method is one user action: it updates the
//! session, performs the I/O the action needs, feeds the outcome back into
//! the session, and redraws through the presenter.

use crate::client::{ensure_pdf, Backend};
use crate::engine::{PageSource, RenderEngine, DEFAULT_RENDER_SCALE};
use crate::error::{Error, Result};
use crate::filter::TypeFilter;
use crate::locate::LocateOptions;
use crate::session::Session;
use crate::view::{Presenter, ViewModel};
use log::debug;
use std::path::Path;

/// Options for the viewer controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerOptions {
    /// Render scale in pixels per PDF point
    pub render_scale: f64,

    /// Text locator options used for highlighting
    pub locate: LocateOptions,
}

impl ViewerOptions {
    /// Create viewer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render scale.
    pub fn with_render_scale(mut self, scale: f64) -> Self {
        self.render_scale = scale;
        self
    }

    /// Set the locator options.
    pub fn with_locate_options(mut self, options: LocateOptions) -> Self {
        self.locate = options;
        self
    }
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            render_scale: DEFAULT_RENDER_SCALE,
            locate: LocateOptions::default(),
        }
    }
}

/// Controller for one viewer session.
pub struct Viewer<B, E, P>
where
    B: Backend,
    E: RenderEngine,
    P: Presenter,
{
    session: Session,
    backend: B,
    engine: E,
    source: Option<E::Source>,
    presenter: P,
    options: ViewerOptions,
}

impl<B, E, P> Viewer<B, E, P>
where
    B: Backend,
    E: RenderEngine,
    P: Presenter,
{
    /// Create a viewer with default options.
    pub fn new(backend: B, engine: E, presenter: P) -> Self {
        Self::with_options(backend, engine, presenter, ViewerOptions::default())
    }

    /// Create a viewer with explicit options.
    pub fn with_options(backend: B, engine: E, presenter: P, options: ViewerOptions) -> Self {
        Self {
            session: Session::new().with_locate_options(options.locate),
            backend,
            engine,
            source: None,
            presenter,
            options,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Current view of the session.
    pub fn view(&self) -> ViewModel {
        ViewModel::from_session(&self.session)
    }

    fn refresh(&mut self) {
        for notification in self.session.take_notifications() {
            self.presenter.notify(&notification);
        }
        let view = ViewModel::from_session(&self.session);
        self.presenter.present(&view);
    }

    // ==================== Document ====================

    /// Read a PDF from disk and upload it.
    ///
    /// The file is read with blocking `std::fs::read` before the request is
    /// sent. Use [`Viewer::upload`] with bytes already in memory when the
    /// executor must not block.
    pub async fn upload_file<T: AsRef<Path>>(&mut self, path: T) -> bool {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data = ensure_pdf(&filename).and_then(|_| std::fs::read(path).map_err(Error::from));
        match data {
            Ok(data) => self.upload(&filename, data).await,
            Err(e) => {
                let ticket = self.session.begin_upload(filename);
                self.session.finish_upload(ticket, Err(e));
                self.refresh();
                false
            }
        }
    }

    /// Upload a document for analysis and open it on success.
    ///
    /// Returns `true` if the document was loaded.
    pub async fn upload(&mut self, filename: &str, data: Vec<u8>) -> bool {
        let ticket = self.session.begin_upload(filename);
        self.refresh();

        let outcome = self.backend.analyze(filename, data).await;
        let succeeded = outcome.is_ok();
        let applied = self.session.finish_upload(ticket, outcome);
        if applied && succeeded {
            self.open_document();
        }
        self.refresh();
        applied && succeeded
    }

    fn open_document(&mut self) {
        let Some(path) = self.session.document().map(|d| d.file_path.clone()) else {
            return;
        };
        match self.engine.open(&path) {
            Ok(source) => {
                let first = self.session.engine_loaded(source.page_count());
                self.source = Some(source);
                self.drive_render(first);
            }
            Err(e) => {
                self.source = None;
                self.session.engine_failed(&e);
            }
        }
    }

    fn drive_render(&mut self, mut next: Option<u32>) {
        while let Some(page) = next {
            let Some(source) = self.source.as_mut() else {
                break;
            };
            debug!("rendering page {page}");
            next = match source.render(page, self.options.render_scale) {
                Ok(rendered) => self.session.finish_render(rendered),
                Err(e) => self.session.abort_render(&e),
            };
        }
    }

    // ==================== Navigation ====================

    pub fn go_to_page(&mut self, page: u32) {
        let next = self.session.go_to_page(page);
        self.drive_render(next);
        self.refresh();
    }

    pub fn next_page(&mut self) {
        let next = self.session.next_page();
        self.drive_render(next);
        self.refresh();
    }

    pub fn prev_page(&mut self) {
        let next = self.session.prev_page();
        self.drive_render(next);
        self.refresh();
    }

    // ==================== Content list ====================

    /// Select or deselect an item, from the list or from its overlay box.
    pub fn select(&mut self, id: &str) {
        let next = self.session.select(id);
        self.drive_render(next);
        self.refresh();
    }

    pub fn delete(&mut self, id: &str) {
        self.session.delete(id);
        self.refresh();
    }

    pub fn restore_all(&mut self) {
        self.session.restore_all();
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.session.set_filter(filter);
        self.refresh();
    }

    pub fn set_query(&mut self, query: &str) {
        self.session.set_query(query);
        self.refresh();
    }

    pub fn clear_query(&mut self) {
        self.session.clear_query();
        self.refresh();
    }

    // ==================== Questions ====================

    /// Ask the backend a question and record the answer or error.
    ///
    /// Backend failures become chat entries. Asking before a document is
    /// loaded fails with [`Error::NoDocument`] and leaves the chat untouched.
    pub async fn ask(&mut self, question: &str) -> Result<()> {
        if self.session.document().is_none() {
            return Err(Error::NoDocument);
        }
        let Some((ticket, question)) = self.session.begin_question(question) else {
            return Ok(());
        };
        self.refresh();

        let outcome = self.backend.query(&question).await;
        self.session.finish_question(ticket, outcome);
        self.refresh();
        Ok(())
    }
}
