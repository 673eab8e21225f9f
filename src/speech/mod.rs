//! Speech output
//!
//! This module provides:
//! - The [`SpeechHost`] seam for host text-to-speech capabilities
//! - The [`SpeechOutput`] adapter owning the voice catalog
//! - An in-memory host, and a VITS host when built with `audio-io`

pub mod adapter;
pub mod host;
pub mod memory;
#[cfg(feature = "audio-io")]
pub mod vits;
pub mod voice;

pub use adapter::{SpeechOutput, SPEECH_CAPABILITY};
pub use host::{SpeechHost, Utterance};
pub use memory::MemorySpeechHost;
#[cfg(feature = "audio-io")]
pub use vits::VitsSpeechHost;
pub use voice::{VoiceCatalog, VoiceDescriptor, VoiceOption, NO_VOICES_LABEL};
