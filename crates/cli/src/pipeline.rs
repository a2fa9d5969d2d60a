//! End-to-end extraction: classify, convert, rasterize, assemble.
//!
//! Classification only needs the presentation bytes, so its result is
//! produced first and stays usable when a later stage fails.

use slidepick_convert::Converter;
use slidepick_core::{Result, ScanReport};
use slidepick_pptx::PptxDecoder;
use slidepick_render::{rasterize, PdfRenderer};
use slidepick_report::build_report;

/// Decode a presentation and select the slides worth extracting.
pub fn classify(presentation: &[u8], filename: &str) -> Result<ScanReport> {
    let decoded = PptxDecoder::new().decode_bytes(presentation, filename)?;
    Ok(ScanReport::from_presentation(&decoded))
}

/// Convert the presentation, render the selected slides and assemble the
/// DOCX report.
///
/// `open_renderer` loads the converted PDF into a renderer.
pub fn render_report<C, R, F>(
    presentation: &[u8],
    scan: &ScanReport,
    converter: &C,
    open_renderer: F,
) -> Result<Vec<u8>>
where
    C: Converter + ?Sized,
    R: PdfRenderer,
    F: FnOnce(Vec<u8>) -> Result<R>,
{
    let pdf = converter.convert(presentation)?;
    let renderer = open_renderer(pdf)?;
    let pages = rasterize(&renderer, &scan.merged)?;
    build_report(&pages)
}
