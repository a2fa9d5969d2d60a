//! Error types for visual slide extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting visual slides.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input or output file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (PPTX input or DOCX output).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The presentation could not be converted to PDF.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// A selected slide has no matching page in the rendered PDF.
    #[error("Slide {ordinal} is out of range for a PDF with {page_count} page(s)")]
    OrdinalOutOfRange { ordinal: usize, page_count: usize },

    /// The PDF could not be loaded or a page could not be rendered.
    #[error("PDF rendering error: {0}")]
    RenderError(String),

    /// A rendered page could not be encoded as an image.
    #[error("Image encoding error: {0}")]
    EncodeError(String),

    /// The output document could not be assembled.
    #[error("Report assembly error: {0}")]
    ReportError(String),
}

impl Error {
    /// True for malformed presentation input.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::PptxParseError(_) | Error::ZipError(_) | Error::XmlError(_)
        )
    }

    /// True when the converter output and the presentation disagree.
    ///
    /// These are never caused by the user's input being rejected, so callers
    /// report them differently from conversion failures.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::OrdinalOutOfRange { .. })
    }
}

/// Failures of the remote presentation-to-PDF converter.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The service answered with a non-success status.
    #[error("conversion service rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service could not be reached.
    #[error("conversion service unavailable after {attempts} attempt(s): {message}")]
    Unavailable { attempts: u32, message: String },

    /// The service answered 200 but the body is not a PDF.
    #[error("conversion service returned an invalid payload: {0}")]
    InvalidPayload(String),

    /// The converter is misconfigured (bad endpoint, client setup).
    #[error("invalid converter configuration: {0}")]
    Config(String),
}
