//! PDFium-backed renderer.

use crate::PdfRenderer;
use pdfium_render::prelude::*;
use slidepick_core::{Error, PixelBuffer, Result};
use std::path::Path;

/// Bind to the PDFium shared library.
///
/// Searches, in order:
/// 1. `library_dir`, when given
/// 2. Current directory (`./libpdfium.so` or the platform equivalent)
/// 3. System library paths
pub fn bind_pdfium(library_dir: Option<&Path>) -> Result<Pdfium> {
    let local = || Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"));

    let bindings = match library_dir {
        Some(dir) => {
            let dir = dir.to_string_lossy().to_string();
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
                .or_else(|_| local())
        }
        None => local(),
    }
    .or_else(|_| Pdfium::bind_to_system_library())
    .map_err(|e| {
        Error::RenderError(format!(
            "Failed to load the PDFium library. Place libpdfium next to the binary, pass --pdfium-dir, or install it system-wide: {:?}",
            e
        ))
    })?;

    Ok(Pdfium::new(bindings))
}

/// A PDF document loaded into PDFium.
pub struct PdfiumRenderer<'a> {
    document: PdfDocument<'a>,
    scale: f32,
}

impl<'a> PdfiumRenderer<'a> {
    /// Load a PDF held in memory.
    ///
    /// `scale` maps PDF points to pixels; 1.0 renders at 72 DPI.
    pub fn load(pdfium: &'a Pdfium, pdf: Vec<u8>, scale: f32) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::RenderError(format!(
                "render scale must be a positive finite number, got {}",
                scale
            )));
        }

        let document = pdfium
            .load_pdf_from_byte_vec(pdf, None)
            .map_err(|e| Error::RenderError(format!("Failed to load PDF: {:?}", e)))?;

        Ok(Self { document, scale })
    }
}

impl PdfRenderer for PdfiumRenderer<'_> {
    fn page_count(&self) -> usize {
        usize::try_from(self.document.pages().len()).unwrap_or(0)
    }

    fn render_page(&self, index: usize) -> Result<PixelBuffer> {
        let page_index = PdfPageIndex::try_from(index).map_err(|_| {
            Error::RenderError(format!("page index {} exceeds PDFium limits", index))
        })?;

        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| Error::RenderError(format!("Failed to load page {}: {:?}", index, e)))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(self.scale);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::RenderError(format!("Failed to render page {}: {:?}", index, e)))?;

        let width = u32::try_from(bitmap.width())
            .map_err(|_| Error::RenderError(format!("page {} has a negative width", index)))?;
        let height = u32::try_from(bitmap.height())
            .map_err(|_| Error::RenderError(format!("page {} has a negative height", index)))?;

        Ok(PixelBuffer {
            width,
            height,
            samples: rgba_to_rgb(&bitmap.as_rgba_bytes()),
        })
    }
}

/// Drop the alpha channel of tightly packed RGBA samples.
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for pixel in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
    }
    rgb
}
