//! Rendering engine boundary.
//!
//! The viewer does not rasterize PDFs itself. A rendering engine opens the
//! file the analysis backend stored and exposes each page's physical size,
//! a render call, and the positioned text fragments of the rendered page.

use crate::error::Result;
use crate::model::{PageGeometry, PixelSize, TextFragment};

/// Default render scale in pixels per PDF point.
pub const DEFAULT_RENDER_SCALE: f64 = 1.725;

/// Everything the session needs from one completed page render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Page number (1-indexed)
    pub page: u32,
    /// Unscaled physical page size
    pub geometry: PageGeometry,
    /// Pixel size of the rendered bitmap
    pub size: PixelSize,
    /// Text fragments in reading order, in rendered pixels
    pub fragments: Vec<TextFragment>,
}

/// An opened document handle.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Unscaled physical size of a page.
    fn page_size(&self, page: u32) -> Result<PageGeometry>;

    /// Render a page and return the bitmap size in pixels.
    fn render_page(&mut self, page: u32, scale: f64) -> Result<PixelSize>;

    /// Extract positioned text fragments of a page at the given scale.
    fn text_fragments(&mut self, page: u32, scale: f64) -> Result<Vec<TextFragment>>;

    /// Render a page and collect its geometry and text in one call.
    fn render(&mut self, page: u32, scale: f64) -> Result<RenderedPage> {
        let geometry = self.page_size(page)?;
        let size = self.render_page(page, scale)?;
        let fragments = self.text_fragments(page, scale)?;
        Ok(RenderedPage {
            page,
            geometry,
            size,
            fragments,
        })
    }
}

/// Opens documents by the path the analysis backend returned.
pub trait RenderEngine {
    /// Handle type for an opened document.
    type Source: PageSource;

    /// Open a document.
    fn open(&self, file_path: &str) -> Result<Self::Source>;
}
