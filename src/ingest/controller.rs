//! Ingestion controller
//!
//! Owns the extracted-document slot and drives it through
//! `Idle -> Reading -> {Ready, Failed}`. Extraction runs as a tokio task and
//! reports back over a channel that the UI drains with [`poll_events`].
//! Every attempt carries a generation number; results from an older
//! generation are discarded so the slot only ever holds the text of the
//! most recent selection.
//!
//! [`poll_events`]: IngestionController::poll_events

use crate::document::TextExtractor;
use crate::ingest::preview::preview_text;
use crate::integration::config::IngestConfig;
use crate::messages::{ConversationLog, Sender};
use crate::speech::{SpeechOutput, Utterance};
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender as ChannelSender};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const STATUS_NO_DOCUMENT: &str = "No PDF loaded.";
pub const STATUS_READING: &str = "Reading PDF...";
pub const STATUS_NO_TEXT: &str = "Couldn't extract text from this PDF.";
pub const STATUS_READ_ERROR: &str = "Error reading PDF.";
pub const MSG_READING_DOCUMENT: &str = "Reading text from the uploaded PDF.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Parsed fine but nothing to read
    NoText,
    /// Unreadable or unparseable document
    ReadError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Idle,
    Reading,
    Ready,
    Failed(FailureKind),
}

/// Where a selected document comes from
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

impl DocumentSource {
    /// Name shown in the transcript
    pub fn display_name(&self) -> String {
        match self {
            DocumentSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            DocumentSource::Bytes { name, .. } => name.clone(),
        }
    }

    async fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            DocumentSource::Path(path) => Ok(tokio::fs::read(&path).await?),
            DocumentSource::Bytes { bytes, .. } => Ok(bytes),
        }
    }
}

/// Identifies one ingestion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestTicket {
    pub generation: u64,
    pub name: String,
}

/// Completion report from an extraction task
#[derive(Debug)]
pub struct IngestEvent {
    pub ticket: IngestTicket,
    pub result: Result<String>,
}

pub struct IngestionController {
    extractor: TextExtractor,
    log: ConversationLog,
    speech: Arc<SpeechOutput>,
    config: IngestConfig,
    runtime: Handle,

    state: IngestState,
    status: String,
    extracted: String,
    document_name: Option<String>,
    preview: Option<String>,

    generation: u64,
    discarded: usize,
    task: Option<JoinHandle<()>>,
    event_tx: ChannelSender<IngestEvent>,
    event_rx: Receiver<IngestEvent>,
}

impl IngestionController {
    pub fn new(
        extractor: TextExtractor,
        log: ConversationLog,
        speech: Arc<SpeechOutput>,
        config: IngestConfig,
        runtime: Handle,
    ) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            extractor,
            log,
            speech,
            config,
            runtime,
            state: IngestState::Idle,
            status: STATUS_NO_DOCUMENT.to_string(),
            extracted: String::new(),
            document_name: None,
            preview: None,
            generation: 0,
            discarded: 0,
            task: None,
            event_tx,
            event_rx,
        }
    }

    pub fn state(&self) -> IngestState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current content of the extracted-document slot
    pub fn extracted_text(&self) -> &str {
        &self.extracted
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document_name.as_deref()
    }

    /// Whether the "speak document" action is enabled
    pub fn can_speak(&self) -> bool {
        self.state == IngestState::Ready
    }

    /// Preview text for the input box, handed out once per ready document
    pub fn take_preview(&mut self) -> Option<String> {
        self.preview.take()
    }

    /// Number of results dropped because a newer selection superseded them
    pub fn discarded_results(&self) -> usize {
        self.discarded
    }

    /// Handle a file-picker result. `None` means the user cancelled.
    pub fn select(&mut self, source: Option<DocumentSource>) {
        let Some(source) = source else {
            self.clear_selection();
            return;
        };

        let ticket = self.begin(source.display_name());
        let extractor = self.extractor.clone();
        let tx = self.event_tx.clone();

        let task = self.runtime.spawn(async move {
            let result = match source.into_bytes().await {
                Ok(bytes) => extractor.extract(bytes).await,
                Err(e) => Err(e),
            };
            // The receiver lives as long as the controller
            let _ = tx.send(IngestEvent { ticket, result });
        });
        self.task = Some(task);
    }

    /// Enter `Reading` for a new document and return its ticket.
    /// Any earlier attempt becomes stale.
    pub fn begin(&mut self, name: impl Into<String>) -> IngestTicket {
        self.abort_task();
        self.generation += 1;

        let ticket = IngestTicket {
            generation: self.generation,
            name: name.into(),
        };

        info!("Reading document '{}' (attempt {})", ticket.name, ticket.generation);
        self.state = IngestState::Reading;
        self.status = STATUS_READING.to_string();
        self.extracted.clear();
        self.document_name = Some(ticket.name.clone());
        self.preview = None;
        ticket
    }

    /// Apply an extraction result. Returns false if the ticket is stale and
    /// the result was ignored.
    pub fn finish(&mut self, ticket: &IngestTicket, result: Result<String>) -> bool {
        if ticket.generation != self.generation || self.state != IngestState::Reading {
            debug!(
                "Discarding stale result for '{}' (attempt {}, current {})",
                ticket.name, ticket.generation, self.generation
            );
            self.discarded += 1;
            return false;
        }
        self.task = None;

        match result {
            Ok(text) if !text.is_empty() => {
                let chars = text.chars().count();
                info!("Document '{}' ready ({} chars)", ticket.name, chars);

                self.preview = Some(preview_text(
                    &text,
                    self.config.preview_chars,
                    &self.config.truncation_marker,
                ));
                self.extracted = text;
                self.state = IngestState::Ready;
                self.status = format!("PDF loaded. Extracted ~{} characters.", chars);
                self.log.append(
                    format!("PDF loaded: {}. Ready to speak.", ticket.name),
                    Sender::Bot,
                );
            }
            Ok(_) => {
                info!("Document '{}' has no extractable text", ticket.name);
                self.state = IngestState::Failed(FailureKind::NoText);
                self.status = STATUS_NO_TEXT.to_string();
            }
            Err(e) => {
                warn!("Failed to read document '{}': {}", ticket.name, e);
                self.state = IngestState::Failed(FailureKind::ReadError);
                self.status = STATUS_READ_ERROR.to_string();
            }
        }
        true
    }

    /// Drain completed extraction tasks; returns how many results applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            if self.finish(&event.ticket, event.result) {
                applied += 1;
            }
        }
        applied
    }

    /// Speak the extracted document. Does nothing unless the controller is
    /// `Ready`; returns the started utterance otherwise.
    pub fn speak_document(
        &self,
        voice_index: Option<usize>,
        rate: f32,
        pitch: f32,
    ) -> Result<Option<Utterance>> {
        if !self.can_speak() {
            return Ok(None);
        }

        self.log.append(MSG_READING_DOCUMENT, Sender::Bot);
        self.speech.speak(&self.extracted, voice_index, rate, pitch)
    }

    /// Back to the freshly constructed state
    pub fn reset(&mut self) {
        self.clear_selection();
        self.document_name = None;
    }

    fn clear_selection(&mut self) {
        self.abort_task();
        // Bump so anything still in the channel is stale
        self.generation += 1;
        self.state = IngestState::Idle;
        self.status = STATUS_NO_DOCUMENT.to_string();
        self.extracted.clear();
        self.preview = None;
        debug!("Document selection cleared");
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                debug!("Aborting superseded extraction");
                task.abort();
            }
        }
    }
}

impl Drop for IngestionController {
    fn drop(&mut self) {
        self.abort_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocumentParser;
    use crate::speech::{MemorySpeechHost, SpeechHost};
    use crate::LecternError;

    struct Fixture {
        controller: IngestionController,
        log: ConversationLog,
        host: Arc<MemorySpeechHost>,
    }

    fn fixture(parser: MemoryDocumentParser) -> Fixture {
        let log = ConversationLog::new();
        let host = Arc::new(MemorySpeechHost::new());
        let speech = Arc::new(SpeechOutput::new(Some(host.clone() as Arc<dyn SpeechHost>)));
        let controller = IngestionController::new(
            TextExtractor::new(Arc::new(parser)),
            log.clone(),
            speech,
            IngestConfig::default(),
            Handle::current(),
        );
        Fixture {
            controller,
            log,
            host,
        }
    }

    #[tokio::test]
    async fn test_initial_state() {
        let f = fixture(MemoryDocumentParser::new());
        assert_eq!(f.controller.state(), IngestState::Idle);
        assert_eq!(f.controller.status(), STATUS_NO_DOCUMENT);
        assert!(!f.controller.can_speak());
        assert!(f.controller.extracted_text().is_empty());
    }

    #[tokio::test]
    async fn test_begin_clears_slot_and_disables_speaking() {
        let mut f = fixture(MemoryDocumentParser::new());
        let first = f.controller.begin("a.pdf");
        f.controller.finish(&first, Ok("some text".into()));
        assert!(f.controller.can_speak());

        f.controller.begin("b.pdf");
        assert_eq!(f.controller.state(), IngestState::Reading);
        assert_eq!(f.controller.status(), STATUS_READING);
        assert!(f.controller.extracted_text().is_empty());
        assert!(!f.controller.can_speak());
    }

    #[tokio::test]
    async fn test_ready_transition_side_effects() {
        let mut f = fixture(MemoryDocumentParser::new());
        let ticket = f.controller.begin("report.pdf");
        assert!(f.controller.finish(&ticket, Ok("Hello world".into())));

        assert_eq!(f.controller.state(), IngestState::Ready);
        assert_eq!(f.controller.status(), "PDF loaded. Extracted ~11 characters.");
        assert_eq!(f.controller.extracted_text(), "Hello world");
        assert_eq!(f.controller.take_preview().as_deref(), Some("Hello world"));
        assert_eq!(f.controller.take_preview(), None);

        let last = f.log.last().unwrap();
        assert_eq!(last.text(), "PDF loaded: report.pdf. Ready to speak.");
        assert_eq!(last.sender(), Sender::Bot);
    }

    #[tokio::test]
    async fn test_long_text_preview_is_truncated() {
        let mut f = fixture(MemoryDocumentParser::new());
        let ticket = f.controller.begin("long.pdf");
        f.controller.finish(&ticket, Ok("z".repeat(1000)));

        let preview = f.controller.take_preview().unwrap();
        assert_eq!(preview, format!("{}... [truncated]", "z".repeat(300)));
        assert_eq!(f.controller.extracted_text().len(), 1000);
    }

    #[tokio::test]
    async fn test_empty_result_is_no_text_failure() {
        let mut f = fixture(MemoryDocumentParser::new());
        let ticket = f.controller.begin("scan.pdf");
        f.controller.finish(&ticket, Ok(String::new()));

        assert_eq!(f.controller.state(), IngestState::Failed(FailureKind::NoText));
        assert_eq!(f.controller.status(), STATUS_NO_TEXT);
        assert!(!f.controller.can_speak());
        assert!(f.log.is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_is_read_failure() {
        let mut f = fixture(MemoryDocumentParser::new());
        let ticket = f.controller.begin("corrupt.pdf");
        f.controller
            .finish(&ticket, Err(LecternError::ParseError("bad xref".into())));

        assert_eq!(f.controller.state(), IngestState::Failed(FailureKind::ReadError));
        assert_eq!(f.controller.status(), STATUS_READ_ERROR);
        assert!(f.controller.extracted_text().is_empty());
        assert!(f.controller.take_preview().is_none());
    }

    #[tokio::test]
    async fn test_stale_result_is_ignored() {
        let mut f = fixture(MemoryDocumentParser::new());
        let a = f.controller.begin("a.pdf");
        let b = f.controller.begin("b.pdf");

        assert!(f.controller.finish(&b, Ok("text of B".into())));
        assert!(!f.controller.finish(&a, Ok("text of A".into())));

        assert_eq!(f.controller.extracted_text(), "text of B");
        assert_eq!(f.controller.document_name(), Some("b.pdf"));
        assert_eq!(f.controller.discarded_results(), 1);
    }

    #[tokio::test]
    async fn test_cancel_selection_returns_to_idle() {
        let mut f = fixture(MemoryDocumentParser::new());
        let ticket = f.controller.begin("a.pdf");
        f.controller.select(None);

        assert_eq!(f.controller.state(), IngestState::Idle);
        assert_eq!(f.controller.status(), STATUS_NO_DOCUMENT);
        assert!(!f.controller.can_speak());

        // The abandoned attempt can no longer land
        assert!(!f.controller.finish(&ticket, Ok("late".into())));
        assert!(f.controller.extracted_text().is_empty());
    }

    #[tokio::test]
    async fn test_speak_document_only_when_ready() {
        let mut f = fixture(MemoryDocumentParser::new());
        assert!(f.controller.speak_document(None, 1.0, 1.0).unwrap().is_none());
        assert!(f.host.spoken().is_empty());
        assert!(f.log.is_empty());

        let ticket = f.controller.begin("a.pdf");
        f.controller.finish(&ticket, Ok("Read me".into()));
        let utterance = f.controller.speak_document(None, 1.3, 0.9).unwrap().unwrap();

        assert_eq!(utterance.text, "Read me");
        assert_eq!(f.host.active().map(|u| u.text), Some("Read me".to_string()));
        assert_eq!(f.log.last().unwrap().text(), MSG_READING_DOCUMENT);
    }

    #[tokio::test]
    async fn test_reset() {
        let mut f = fixture(MemoryDocumentParser::new());
        let ticket = f.controller.begin("a.pdf");
        f.controller.finish(&ticket, Ok("text".into()));

        f.controller.reset();
        assert_eq!(f.controller.state(), IngestState::Idle);
        assert!(f.controller.extracted_text().is_empty());
        assert!(f.controller.document_name().is_none());
    }

    #[test]
    fn test_display_name_from_path() {
        let source = DocumentSource::Path(PathBuf::from("/tmp/papers/notes.pdf"));
        assert_eq!(source.display_name(), "notes.pdf");
    }
}
