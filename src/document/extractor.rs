use crate::document::source::DocumentParser;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Separator appended after each page's text
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Produces the full text of a document, page by page
#[derive(Clone)]
pub struct TextExtractor {
    parser: Arc<dyn DocumentParser>,
}

impl TextExtractor {
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        Self { parser }
    }

    /// Extract every page's text in ascending page order.
    ///
    /// Fragments within a page are joined with a single space and each page
    /// is followed by [`PAGE_SEPARATOR`]; the result is trimmed. A document
    /// with no text yields an empty string. Any failure aborts the whole
    /// extraction so callers never see a partial result.
    pub async fn extract(&self, bytes: Vec<u8>) -> Result<String> {
        let document = self.parser.open(bytes).await?;
        let page_count = document.page_count();
        debug!("Extracting text from {} pages", page_count);

        let mut text = String::new();
        for number in 1..=page_count {
            let page = document.page(number).await?;
            let fragments = page.text_fragments().await?;
            text.push_str(&fragments.join(" "));
            text.push_str(PAGE_SEPARATOR);
        }

        let text = text.trim().to_string();
        debug!("Extracted {} chars", text.chars().count());
        Ok(text)
    }
}
