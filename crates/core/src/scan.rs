//! Slide scanning.
//!
//! Two independent passes over the same presentation: one records the first
//! image of interest per slide, the other records slides with at least one
//! visually significant shape. A slide can qualify under both.

use crate::classify::classify_image;
use crate::merge::merge;
use crate::types::{ImageExtension, MergedSlideSet, Presentation, Slide};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slide number to the format of the first image of interest on that slide.
pub type ImageSlideMap = BTreeMap<usize, ImageExtension>;

/// Find slides containing an image of interest.
pub fn scan_image_slides(presentation: &Presentation) -> ImageSlideMap {
    let mut image_slides = ImageSlideMap::new();
    for slide in &presentation.slides {
        if let Some(ext) = first_image_of_interest(slide) {
            log::debug!("Slide {}: image of interest ({})", slide.number, ext);
            image_slides.insert(slide.number, ext);
        }
    }
    image_slides
}

/// Find slides containing at least one picture, table, chart, group or
/// auto-shape, in slide order.
pub fn scan_visual_slides(presentation: &Presentation) -> Vec<usize> {
    let mut visual_slides = Vec::new();
    for slide in &presentation.slides {
        if has_visual_element(slide) {
            log::debug!("Slide {}: visual element", slide.number);
            visual_slides.push(slide.number);
        }
    }
    visual_slides
}

/// The first allow-listed image on the slide, in document order.
/// Remaining shapes are not inspected once one matches.
fn first_image_of_interest(slide: &Slide) -> Option<ImageExtension> {
    for shape in &slide.shapes {
        if let Some(ext) = classify_image(shape) {
            return Some(ext);
        }
    }
    None
}

/// Whether any shape on the slide is visually significant.
/// Stops at the first match.
fn has_visual_element(slide: &Slide) -> bool {
    for shape in &slide.shapes {
        if shape.kind.is_visual() {
            return true;
        }
    }
    false
}

/// Outcome of classifying a presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Slides with an image of interest and its format.
    pub image_slides: ImageSlideMap,

    /// Slides with a visually significant shape.
    pub visual_slides: Vec<usize>,

    /// Union of both, ascending.
    pub merged: MergedSlideSet,
}

impl ScanReport {
    /// Run both scans and merge their results.
    pub fn from_presentation(presentation: &Presentation) -> Self {
        let image_slides = scan_image_slides(presentation);
        let visual_slides = scan_visual_slides(presentation);
        let merged = merge(image_slides.keys().copied(), visual_slides.iter().copied());

        log::info!(
            "{}: {} slide(s), {} with images, {} with visual elements, {} selected",
            presentation.filename,
            presentation.slides.len(),
            image_slides.len(),
            visual_slides.len(),
            merged.len()
        );

        Self {
            image_slides,
            visual_slides,
            merged,
        }
    }
}
