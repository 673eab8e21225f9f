//! PDF parsing with lopdf
//!
//! lopdf parsing is synchronous and CPU bound, so it runs on tokio's
//! blocking pool.

use crate::document::source::{DocumentHandle, DocumentParser, PageHandle};
use crate::{LecternError, Result};
use async_trait::async_trait;
use lopdf::Document;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfParser;

impl LopdfParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for LopdfParser {
    async fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn DocumentHandle>> {
        let document = tokio::task::spawn_blocking(move || Document::load_mem(&bytes))
            .await
            .map_err(|e| LecternError::ParseError(format!("PDF parse task failed: {}", e)))?
            .map_err(|e| LecternError::ParseError(format!("Failed to load PDF: {}", e)))?;

        if document.is_encrypted() {
            warn!("Rejecting encrypted PDF");
            return Err(LecternError::ParseError("Encrypted PDFs are not supported".into()));
        }

        // get_pages is keyed by page number, so this is already ascending
        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        debug!("Opened PDF with {} pages", page_numbers.len());

        Ok(Box::new(LopdfDocument {
            document: Arc::new(document),
            page_numbers,
        }))
    }
}

struct LopdfDocument {
    document: Arc<Document>,
    page_numbers: Vec<u32>,
}

#[async_trait]
impl DocumentHandle for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    async fn page(&self, number: u32) -> Result<Box<dyn PageHandle>> {
        let page_number = number
            .checked_sub(1)
            .and_then(|i| self.page_numbers.get(i as usize))
            .copied()
            .ok_or_else(|| LecternError::ParseError(format!("Page {} not found", number)))?;

        Ok(Box::new(LopdfPage {
            document: Arc::clone(&self.document),
            page_number,
        }))
    }
}

struct LopdfPage {
    document: Arc<Document>,
    page_number: u32,
}

#[async_trait]
impl PageHandle for LopdfPage {
    async fn text_fragments(&self) -> Result<Vec<String>> {
        let document = Arc::clone(&self.document);
        let page_number = self.page_number;

        let text = tokio::task::spawn_blocking(move || document.extract_text(&[page_number]))
            .await
            .map_err(|e| LecternError::ParseError(format!("Text task failed: {}", e)))?
            .map_err(|e| {
                LecternError::ParseError(format!(
                    "Failed to extract text from page {}: {}",
                    page_number, e
                ))
            })?;

        Ok(split_fragments(&text))
    }
}

/// lopdf emits one line per text run; each non-blank line is a fragment
fn split_fragments(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
