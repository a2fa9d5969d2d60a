//! PDF page rasterization.
//!
//! The PDF engine sits behind [`PdfRenderer`]; [`rasterize`] turns the
//! selected slide numbers into PNG-encoded [`RasterPage`]s.

pub mod pdfium;
pub mod raster;

pub use pdfium::{bind_pdfium, PdfiumRenderer};
pub use raster::{encode_png, rasterize};

use slidepick_core::{PixelBuffer, Result};

/// Access to the pages of a loaded PDF.
pub trait PdfRenderer {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render the page at a 0-based index to RGB pixels.
    fn render_page(&self, index: usize) -> Result<PixelBuffer>;
}
