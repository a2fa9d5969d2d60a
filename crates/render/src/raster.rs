//! Rasterizing selected slides and encoding them as PNG.

use crate::PdfRenderer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use slidepick_core::{Error, MergedSlideSet, PixelBuffer, RasterPage, Result};

/// Render one PNG per selected slide, in the order of `slides`.
///
/// Slide `n` is page `n - 1` of the PDF. Every slide number is checked
/// against the page count before anything is rendered, so a mismatch between
/// presentation and PDF produces no partial output.
pub fn rasterize<R: PdfRenderer + ?Sized>(
    renderer: &R,
    slides: &MergedSlideSet,
) -> Result<Vec<RasterPage>> {
    let page_count = renderer.page_count();
    if let Some(ordinal) = slides.iter().find(|&n| n == 0 || n > page_count) {
        return Err(Error::OrdinalOutOfRange {
            ordinal,
            page_count,
        });
    }

    let mut pages = Vec::with_capacity(slides.len());
    for slide_number in slides.iter() {
        let pixels = renderer.render_page(slide_number - 1)?;
        let png = encode_png(&pixels)?;
        log::debug!(
            "Slide {}: rendered {}x{} ({} byte(s) PNG)",
            slide_number,
            pixels.width,
            pixels.height,
            png.len()
        );
        pages.push(RasterPage {
            slide_number,
            width: pixels.width,
            height: pixels.height,
            png,
        });
    }

    log::info!("Rasterized {} of {} page(s)", pages.len(), page_count);
    Ok(pages)
}

/// Encode an RGB pixel buffer as PNG.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    if pixels.width == 0 || pixels.height == 0 {
        return Err(Error::EncodeError(format!(
            "cannot encode an empty {}x{} image",
            pixels.width, pixels.height
        )));
    }
    if pixels.samples.len() != pixels.expected_len() {
        return Err(Error::EncodeError(format!(
            "{}x{} RGB image needs {} byte(s), got {}",
            pixels.width,
            pixels.height,
            pixels.expected_len(),
            pixels.samples.len()
        )));
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            &pixels.samples,
            pixels.width,
            pixels.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| Error::EncodeError(e.to_string()))?;

    Ok(png)
}
