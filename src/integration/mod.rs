//! Wiring between configuration and the host backends

pub mod backends;
pub mod config;

pub use backends::{build_speech_output, document_parser};
pub use config::{AppConfig, IngestConfig, SpeechConfig, VoiceModelConfig};
