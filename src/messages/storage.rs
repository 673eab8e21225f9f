use super::types::{Sender, TranscriptEntry};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Ordered, append-only transcript shared between the controllers and the view.
///
/// Clones share the same underlying entries.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    entries: Arc<RwLock<Vec<TranscriptEntry>>>,
    scroll_requested: Arc<AtomicBool>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            scroll_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Append an entry and ask the view to scroll to the bottom
    pub fn append(&self, text: impl Into<String>, sender: Sender) -> TranscriptEntry {
        let entry = TranscriptEntry::new(text, sender);
        debug!("Transcript append ({:?}): {} chars", sender, entry.text().len());
        self.entries.write().push(entry.clone());
        self.scroll_requested.store(true, Ordering::Release);
        entry
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.read().clone()
    }

    pub fn last(&self) -> Option<TranscriptEntry> {
        self.entries.read().last().cloned()
    }

    pub fn clear(&self) {
        let removed = {
            let mut entries = self.entries.write();
            let n = entries.len();
            entries.clear();
            n
        };
        debug!("Transcript cleared ({} entries)", removed);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns true once per append burst; the transcript view calls this
    /// each frame to decide whether to jump to the newest entry.
    pub fn take_scroll_request(&self) -> bool {
        self.scroll_requested.swap(false, Ordering::AcqRel)
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}
