//! Core domain types, shape classification, slide scanning and slide-set
//! merging for extracting visual slides from presentations.

pub mod classify;
pub mod error;
pub mod merge;
pub mod scan;
pub mod types;

pub use classify::{classify_image, IMAGE_EXTENSIONS};
pub use error::{ConversionError, Error, Result};
pub use merge::merge;
pub use scan::{scan_image_slides, scan_visual_slides, ImageSlideMap, ScanReport};
pub use types::{
    ImageExtension, MergedSlideSet, PixelBuffer, Presentation, RasterPage, Shape, ShapeImage,
    ShapeKind, Slide,
};
