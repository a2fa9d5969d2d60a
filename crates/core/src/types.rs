//! Domain types for presentations, slide selections and rendered pages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded presentation: its slides and their top-level shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}

/// A single slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Top-level shapes in document order.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }
}

/// A visual element placed on a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Display name from the shape's non-visual properties.
    pub name: String,

    /// Kind of the shape.
    pub kind: ShapeKind,

    /// Embedded image, for pictures that reference one.
    pub image: Option<ShapeImage>,
}

impl Shape {
    /// Create a shape without image data.
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            image: None,
        }
    }

    /// Attach embedded image data.
    pub fn with_image(mut self, image: ShapeImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Shape kinds the extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Picture,
    Table,
    Chart,
    Group,
    AutoShape,
    /// Text boxes, placeholders, freeforms, connectors, media and anything else.
    Other,
}

impl ShapeKind {
    /// Whether shapes of this kind make a slide worth extracting.
    pub fn is_visual(self) -> bool {
        match self {
            ShapeKind::Picture
            | ShapeKind::Table
            | ShapeKind::Chart
            | ShapeKind::Group
            | ShapeKind::AutoShape => true,
            ShapeKind::Other => false,
        }
    }
}

/// Image bytes embedded in a shape, with the file name of the image part.
#[derive(Clone, Serialize, Deserialize)]
pub struct ShapeImage {
    /// File name of the image part, e.g. `image3.png`.
    pub filename: String,

    /// Raw image bytes.
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl ShapeImage {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

impl fmt::Debug for ShapeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeImage")
            .field("filename", &self.filename)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Image formats of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Gif,
    Bmp,
    Tif,
    Tiff,
}

impl ImageExtension {
    /// Every extension in the allow-list.
    pub const ALL: [ImageExtension; 7] = [
        ImageExtension::Png,
        ImageExtension::Jpg,
        ImageExtension::Jpeg,
        ImageExtension::Gif,
        ImageExtension::Bmp,
        ImageExtension::Tif,
        ImageExtension::Tiff,
    ];

    /// Match a bare extension (no dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(ext))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tif => "tif",
            Self::Tiff => "tiff",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorted, duplicate-free slide numbers selected for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedSlideSet(Vec<usize>);

impl MergedSlideSet {
    /// Build from any slide numbers, sorting and collapsing duplicates.
    pub fn from_unsorted(mut numbers: Vec<usize>) -> Self {
        numbers.sort_unstable();
        numbers.dedup();
        Self(numbers)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A rendered page as 8-bit RGB samples, row-major, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub samples: Vec<u8>,
}

impl PixelBuffer {
    /// Number of sample bytes a buffer of this size must hold.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.samples.len())
            .finish()
    }
}

/// A rasterized slide, encoded as PNG.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterPage {
    /// 1-based slide number the page was rendered for.
    pub slide_number: usize,

    /// Pixel width of the encoded image.
    pub width: u32,

    /// Pixel height of the encoded image.
    pub height: u32,

    /// PNG bytes.
    pub png: Vec<u8>,
}

impl fmt::Debug for RasterPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterPage")
            .field("slide_number", &self.slide_number)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}
