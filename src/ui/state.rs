//! Application state management
//!
//! Everything the window shows or edits lives here. Controllers are built
//! once in [`AppState::new`] and only touched from the UI thread.

use crate::document::{DocumentParser, TextExtractor};
use crate::ingest::{DocumentSource, IngestState, IngestionController};
use crate::integration::config::AppConfig;
use crate::messages::{ConversationLog, Sender};
use crate::speech::SpeechOutput;
use crate::LecternError;
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, warn};

pub const MSG_SPEAKING_INPUT: &str = "Speaking your text now.";

const MAX_LOG_LINES: usize = 100;

/// Recent activity shown in the debug panel
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub log_messages: VecDeque<String>,
}

impl DebugInfo {
    pub fn new() -> Self {
        Self {
            log_messages: VecDeque::with_capacity(MAX_LOG_LINES),
        }
    }

    pub fn add_log(&mut self, message: impl Into<String>) {
        if self.log_messages.len() >= MAX_LOG_LINES {
            self.log_messages.pop_front();
        }
        self.log_messages.push_back(message.into());
    }
}

/// Central application state
pub struct AppState {
    /// Visible transcript
    pub log: ConversationLog,

    /// Speech adapter shared with the ingestion controller
    pub speech: Arc<SpeechOutput>,

    /// Document ingestion
    pub ingest: IngestionController,

    /// Free-text input
    pub input_text: String,

    /// Path typed into the document field
    pub document_path: String,

    /// Index into the current voice catalog; `None` means host default
    pub selected_voice: Option<usize>,

    pub rate: f32,
    pub pitch: f32,
    pub rate_range: RangeInclusive<f32>,
    pub pitch_range: RangeInclusive<f32>,

    /// Blocking notice the user has to dismiss
    pub notice: Option<String>,

    /// Last non-blocking error, shown in the status line
    pub last_error: Option<String>,

    pub debug_info: DebugInfo,
    pub show_debug_panel: bool,

    last_status: String,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        speech: Arc<SpeechOutput>,
        parser: Arc<dyn DocumentParser>,
        runtime: Handle,
    ) -> Self {
        let log = ConversationLog::new();
        let ingest = IngestionController::new(
            TextExtractor::new(parser),
            log.clone(),
            Arc::clone(&speech),
            config.ingest.clone(),
            runtime,
        );

        let selected_voice = speech.list_voices().default_index();
        let last_status = ingest.status().to_string();

        let mut state = Self {
            log,
            speech,
            ingest,
            input_text: String::new(),
            document_path: String::new(),
            selected_voice,
            rate: config.speech.default_rate,
            pitch: config.speech.default_pitch,
            rate_range: config.speech.min_rate..=config.speech.max_rate,
            pitch_range: config.speech.min_pitch..=config.speech.max_pitch,
            notice: None,
            last_error: None,
            debug_info: DebugInfo::new(),
            show_debug_panel: false,
            last_status,
        };

        if !state.speech.is_supported() {
            state.notice = Some(state.speech.unsupported_error().user_message());
        }
        state
    }

    /// Post the input as a user message and speak it
    pub fn send_message(&mut self) {
        let text = self.input_text.clone();
        if text.trim().is_empty() {
            return;
        }

        self.log.append(text.clone(), Sender::User);
        self.log.append(MSG_SPEAKING_INPUT, Sender::Bot);
        self.speak(&text);
    }

    /// Speak arbitrary text with the current voice settings
    pub fn speak(&mut self, text: &str) {
        let result = self
            .speech
            .speak(text, self.selected_voice, self.rate, self.pitch);
        match result {
            Ok(Some(utterance)) => {
                self.debug_info
                    .add_log(format!("Speaking {} chars", utterance.text.chars().count()));
            }
            Ok(None) => {}
            Err(e) => self.report(e),
        }
    }

    pub fn stop_speech(&mut self) {
        self.speech.stop();
        self.debug_info.add_log("Speech stopped");
    }

    pub fn clear_messages(&mut self) {
        self.log.clear();
        self.debug_info.add_log("Transcript cleared");
    }

    /// Start ingesting a document, or clear the selection with `None`
    pub fn choose_document(&mut self, source: Option<DocumentSource>) {
        if let Some(source) = &source {
            self.debug_info
                .add_log(format!("Selected document: {}", source.display_name()));
        }
        self.ingest.select(source);
    }

    /// Choose the document named in the path field; blank means none
    pub fn choose_document_path(&mut self) {
        let path = self.document_path.trim();
        let source = if path.is_empty() {
            None
        } else {
            Some(DocumentSource::Path(PathBuf::from(path)))
        };
        self.choose_document(source);
    }

    pub fn speak_document(&mut self) {
        let result = self
            .ingest
            .speak_document(self.selected_voice, self.rate, self.pitch);
        if let Err(e) = result {
            self.report(e);
        }
    }

    pub fn is_reading_document(&self) -> bool {
        self.ingest.state() == IngestState::Reading
    }

    /// Apply background results; called once per frame
    pub fn poll_events(&mut self) {
        if self.speech.poll_voice_changes() {
            let catalog = self.speech.list_voices();
            let still_valid = self.selected_voice.map_or(false, |i| i < catalog.len());
            if !still_valid {
                self.selected_voice = catalog.default_index();
            }
            self.debug_info
                .add_log(format!("Voices changed: {} available", catalog.len()));
        }

        for err in self.speech.poll_errors() {
            self.report(err);
        }

        if self.ingest.poll_events() > 0 {
            if let Some(preview) = self.ingest.take_preview() {
                self.input_text = preview;
            }
        }

        if self.ingest.status() != self.last_status {
            self.last_status = self.ingest.status().to_string();
            self.debug_info
                .add_log(format!("Document status: {}", self.last_status));
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn report(&mut self, err: LecternError) {
        match err {
            LecternError::UnsupportedCapability(_) => {
                warn!("{}", err);
                self.notice = Some(err.user_message());
            }
            _ => {
                error!("{}", err);
                self.last_error = Some(err.user_message());
            }
        }
        self.debug_info.add_log(format!("Error: {}", err));
    }
}
