//! Host document-parsing capability
//!
//! Pages are numbered from 1, as in the PDF page tree.

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse raw document bytes
    async fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn DocumentHandle>>;
}

#[async_trait]
pub trait DocumentHandle: Send + Sync {
    fn page_count(&self) -> u32;

    /// Fetch page `number` (1-based)
    async fn page(&self, number: u32) -> Result<Box<dyn PageHandle>>;
}

#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Text runs in layout order
    async fn text_fragments(&self) -> Result<Vec<String>>;
}
