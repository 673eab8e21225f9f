//! In-memory document parser
//!
//! Documents are registered under the exact bytes that "contain" them, so
//! callers can feed the parser arbitrary byte strings and control per-page
//! fragments, latency and failures.

use crate::document::source::{DocumentHandle, DocumentParser, PageHandle};
use crate::{LecternError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct MemoryDocument {
    pages: Arc<Vec<Vec<String>>>,
    open_delay: Option<Duration>,
    broken_page: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentParser {
    documents: HashMap<Vec<u8>, MemoryDocument>,
}

impl MemoryDocumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document whose pages carry the given fragments
    pub fn with_document(mut self, bytes: &[u8], pages: Vec<Vec<&str>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(str::to_string).collect())
            .collect();
        self.documents.entry(bytes.to_vec()).or_default().pages = Arc::new(pages);
        self
    }

    /// Make opening the document take `delay`
    pub fn with_delay(mut self, bytes: &[u8], delay: Duration) -> Self {
        self.documents.entry(bytes.to_vec()).or_default().open_delay = Some(delay);
        self
    }

    /// Make fetching page `number` fail
    pub fn with_broken_page(mut self, bytes: &[u8], number: u32) -> Self {
        self.documents.entry(bytes.to_vec()).or_default().broken_page = Some(number);
        self
    }
}

#[async_trait]
impl DocumentParser for MemoryDocumentParser {
    async fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn DocumentHandle>> {
        let document = self
            .documents
            .get(&bytes)
            .cloned()
            .ok_or_else(|| LecternError::ParseError("Unrecognised document".into()))?;

        if let Some(delay) = document.open_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(Box::new(document))
    }
}

#[async_trait]
impl DocumentHandle for MemoryDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn page(&self, number: u32) -> Result<Box<dyn PageHandle>> {
        if self.broken_page == Some(number) {
            return Err(LecternError::ParseError(format!("Page {} is damaged", number)));
        }

        let fragments = number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or_else(|| LecternError::ParseError(format!("Page {} not found", number)))?;

        Ok(Box::new(MemoryPage { fragments }))
    }
}

struct MemoryPage {
    fragments: Vec<String>,
}

#[async_trait]
impl PageHandle for MemoryPage {
    async fn text_fragments(&self) -> Result<Vec<String>> {
        Ok(self.fragments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_page_numbers_are_one_based() {
        let parser = MemoryDocumentParser::new().with_document(b"d", vec![vec!["x"], vec!["y"]]);
        let doc = parser.open(b"d".to_vec()).await.unwrap();
        assert_eq!(doc.page_count(), 2);

        let first = doc.page(1).await.unwrap().text_fragments().await.unwrap();
        assert_eq!(first, vec!["x"]);
        assert!(doc.page(0).await.is_err());
        assert!(doc.page(3).await.is_err());
    }
}
