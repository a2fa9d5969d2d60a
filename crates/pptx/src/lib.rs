//! PPTX (Office Open XML) decoder.
//!
//! Reads .pptx files, which are ZIP archives containing XML documents, into
//! the slide and shape tree used for classification.

pub mod parser;
mod rels;

pub use parser::PptxDecoder;
