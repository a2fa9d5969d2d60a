//! DOCX report assembly.
//!
//! Produces a Word document with a title followed by one "Slide N" section
//! per rasterized page, each holding the page image at a fixed width.

pub mod docx;

pub use docx::{build_report, ReportBuilder, ReportOptions};

/// MIME type of the generated report.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;
