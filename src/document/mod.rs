//! Document text extraction
//!
//! The parsing capability sits behind [`DocumentParser`]; [`TextExtractor`]
//! turns any parsed document into one plain-text string.

pub mod extractor;
pub mod memory;
pub mod pdf;
pub mod source;

pub use extractor::TextExtractor;
pub use memory::MemoryDocumentParser;
pub use pdf::LopdfParser;
pub use source::{DocumentHandle, DocumentParser, PageHandle};
