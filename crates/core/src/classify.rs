//! Shape classification: does a shape carry an image we care about?

use crate::types::{ImageExtension, Shape};

/// Image formats of interest.
pub const IMAGE_EXTENSIONS: [ImageExtension; 7] = ImageExtension::ALL;

/// Report the image format of a shape if it embeds an allow-listed image.
///
/// Shapes without image data, without a file name, or whose file name has no
/// recognized extension are simply not images of interest.
pub fn classify_image(shape: &Shape) -> Option<ImageExtension> {
    let image = shape.image.as_ref()?;
    let ext = file_extension(&image.filename)?;
    ImageExtension::from_extension(ext)
}

/// Extension of the last path segment, without the dot.
///
/// A leading dot does not start an extension (`.png` has none), and a
/// trailing dot yields none.
fn file_extension(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem_end = name.trim_start_matches('.').len();
    let name = &name[name.len() - stem_end..];
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}
