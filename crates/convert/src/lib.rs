//! Presentation-to-PDF conversion.
//!
//! The conversion itself happens in a remote service; this crate provides
//! the [`Converter`] seam, an HTTP client for the service, and a pass-through
//! converter for PDFs that were rendered ahead of time.

pub mod config;
pub mod http;

pub use config::ConverterConfig;
pub use http::HttpConverter;

use slidepick_core::ConversionError;

/// MIME type of the presentations sent for conversion.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Turns presentation bytes into PDF bytes.
pub trait Converter {
    fn convert(&self, presentation: &[u8]) -> Result<Vec<u8>, ConversionError>;
}

/// A PDF that already exists; conversion just hands it back.
#[derive(Debug, Clone)]
pub struct LocalPdf {
    pdf: Vec<u8>,
}

impl LocalPdf {
    pub fn new(pdf: Vec<u8>) -> Self {
        Self { pdf }
    }
}

impl Converter for LocalPdf {
    fn convert(&self, _presentation: &[u8]) -> Result<Vec<u8>, ConversionError> {
        check_pdf_payload(&self.pdf)?;
        Ok(self.pdf.clone())
    }
}

/// Reject payloads that do not look like a PDF.
pub(crate) fn check_pdf_payload(bytes: &[u8]) -> Result<(), ConversionError> {
    if bytes.starts_with(b"%PDF") {
        Ok(())
    } else if bytes.is_empty() {
        Err(ConversionError::InvalidPayload("empty response body".to_string()))
    } else {
        Err(ConversionError::InvalidPayload(format!(
            "expected a PDF, got {} byte(s) starting with {:?}",
            bytes.len(),
            String::from_utf8_lossy(&bytes[..bytes.len().min(16)])
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_pdf() {
        let converter = LocalPdf::new(b"%PDF-1.7\n%%EOF".to_vec());
        assert_eq!(converter.convert(b"ignored").unwrap(), b"%PDF-1.7\n%%EOF");
    }

    #[test]
    fn test_local_pdf_rejects_non_pdf() {
        let converter = LocalPdf::new(b"<html>oops</html>".to_vec());
        assert!(matches!(
            converter.convert(b""),
            Err(ConversionError::InvalidPayload(_))
        ));

        let converter = LocalPdf::new(Vec::new());
        assert!(matches!(
            converter.convert(b""),
            Err(ConversionError::InvalidPayload(_))
        ));
    }
}
