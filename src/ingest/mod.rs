//! Document ingestion: selection, extraction, and hand-off to speech

pub mod controller;
pub mod preview;

pub use controller::{
    DocumentSource, FailureKind, IngestEvent, IngestState, IngestTicket, IngestionController,
};
pub use preview::preview_text;
