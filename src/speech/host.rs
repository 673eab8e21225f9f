//! The host speech capability seam
//!
//! Anything able to vocalize text implements [`SpeechHost`]. The adapter in
//! [`crate::speech::adapter`] never assumes a host exists.

use crate::speech::voice::VoiceDescriptor;
use crate::{LecternError, Result};
use crossbeam_channel::Receiver;
use uuid::Uuid;

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 10.0;
pub const MIN_PITCH: f32 = 0.0;
pub const MAX_PITCH: f32 = 2.0;

/// One request to vocalize a string with a given voice, rate and pitch
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    /// `None` means the host default voice
    pub voice: Option<VoiceDescriptor>,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
        }
    }

    pub fn with_voice(mut self, voice: Option<VoiceDescriptor>) -> Self {
        self.voice = voice;
        self
    }

    /// Rate is clamped to the range hosts accept
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = if rate.is_finite() {
            rate.clamp(MIN_RATE, MAX_RATE)
        } else {
            1.0
        };
        self
    }

    /// Pitch is clamped to the range hosts accept
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = if pitch.is_finite() {
            pitch.clamp(MIN_PITCH, MAX_PITCH)
        } else {
            1.0
        };
        self
    }
}

/// A host text-to-speech capability
pub trait SpeechHost: Send + Sync {
    /// Voices currently available, in host order
    fn available_voices(&self) -> Vec<VoiceDescriptor>;

    /// Fires whenever the host's voice list changes. Hosts with a fixed
    /// voice list return `None`.
    fn voices_changed(&self) -> Option<Receiver<()>> {
        None
    }

    /// Failures that happen after `speak` returned, e.g. on a synthesis
    /// worker. Hosts that fail synchronously return `None`.
    fn errors(&self) -> Option<Receiver<LecternError>> {
        None
    }

    /// Begin speaking. Returns without waiting for the audio to finish.
    fn speak(&self, utterance: Utterance) -> Result<()>;

    /// Stop the current utterance immediately; no-op when idle
    fn cancel(&self);

    /// Whether an utterance is still audible
    fn is_speaking(&self) -> bool;
}
