//! Speech output adapter
//!
//! Wraps an optional [`SpeechHost`] and owns the voice catalog. All speech
//! requests from the UI and the ingestion controller go through here.

use crate::speech::host::{SpeechHost, Utterance};
use crate::speech::voice::VoiceCatalog;
use crate::{LecternError, Result};
use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name used when reporting a missing speech host
pub const SPEECH_CAPABILITY: &str = "Speech synthesis";

pub struct SpeechOutput {
    host: Option<Arc<dyn SpeechHost>>,
    catalog: RwLock<VoiceCatalog>,
    voices_changed: Option<Receiver<()>>,
    errors: Option<Receiver<LecternError>>,
    /// Why there is no host, shown to the user
    unavailable_reason: Option<String>,
}

impl SpeechOutput {
    /// Create the adapter and take an initial voice snapshot
    pub fn new(host: Option<Arc<dyn SpeechHost>>) -> Self {
        let voices_changed = host.as_ref().and_then(|h| h.voices_changed());
        let errors = host.as_ref().and_then(|h| h.errors());
        let output = Self {
            host,
            catalog: RwLock::new(VoiceCatalog::empty()),
            voices_changed,
            errors,
            unavailable_reason: None,
        };

        if output.host.is_none() {
            warn!("No speech host available; speaking is disabled");
        }

        output.refresh_voices();
        output
    }

    /// Adapter for a system without any speech capability
    pub fn unsupported() -> Self {
        Self::new(None)
    }

    /// Adapter without a host, remembering why the host is missing
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut output = Self::new(None);
        output.unavailable_reason = Some(reason.into());
        output
    }

    /// The error reported for any attempt to speak without a host
    pub fn unsupported_error(&self) -> LecternError {
        let what = match &self.unavailable_reason {
            Some(reason) => format!("{} ({})", SPEECH_CAPABILITY, reason),
            None => SPEECH_CAPABILITY.to_string(),
        };
        LecternError::UnsupportedCapability(what)
    }

    pub fn is_supported(&self) -> bool {
        self.host.is_some()
    }

    pub fn list_voices(&self) -> VoiceCatalog {
        self.catalog.read().clone()
    }

    /// Rebuild the catalog wholesale from the host
    pub fn refresh_voices(&self) {
        let voices = self
            .host
            .as_ref()
            .map(|h| h.available_voices())
            .unwrap_or_default();

        info!("Voice catalog rebuilt with {} voices", voices.len());
        *self.catalog.write() = VoiceCatalog::new(voices);
    }

    /// Drain pending host notifications; returns true if the catalog was rebuilt
    pub fn poll_voice_changes(&self) -> bool {
        let Some(rx) = &self.voices_changed else {
            return false;
        };

        let mut changed = false;
        while rx.try_recv().is_ok() {
            changed = true;
        }

        if changed {
            self.refresh_voices();
        }
        changed
    }

    /// Drain failures the host reported after `speak` returned
    pub fn poll_errors(&self) -> Vec<LecternError> {
        match &self.errors {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Speak `text`, pre-empting whatever is currently audible.
    ///
    /// Returns `Ok(None)` without touching the host when `text` has no
    /// visible characters. A missing host is an error the caller must show.
    pub fn speak(
        &self,
        text: &str,
        voice_index: Option<usize>,
        rate: f32,
        pitch: f32,
    ) -> Result<Option<Utterance>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let host = self.host.as_ref().ok_or_else(|| self.unsupported_error())?;

        // Cancel before starting so two utterances are never audible together
        host.cancel();

        let voice = voice_index.and_then(|i| self.catalog.read().get(i).cloned());
        if voice_index.is_some() && voice.is_none() {
            debug!("Voice index {:?} out of range, using host default", voice_index);
        }

        let utterance = Utterance::new(text)
            .with_voice(voice)
            .with_rate(rate)
            .with_pitch(pitch);

        debug!(
            "Speaking {} chars (voice: {:?}, rate: {:.2}, pitch: {:.2})",
            text.len(),
            utterance.voice.as_ref().map(|v| v.name.as_str()),
            utterance.rate,
            utterance.pitch
        );

        host.speak(utterance.clone())?;
        Ok(Some(utterance))
    }

    /// Cancel any in-flight utterance
    pub fn stop(&self) {
        if let Some(host) = &self.host {
            host.cancel();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.host.as_ref().map(|h| h.is_speaking()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::memory::MemorySpeechHost;
    use crate::speech::voice::VoiceDescriptor;

    fn adapter_with_voices() -> (Arc<MemorySpeechHost>, SpeechOutput) {
        let host = Arc::new(MemorySpeechHost::with_voices(vec![
            VoiceDescriptor::new("Amy", "en-US").as_default(),
            VoiceDescriptor::new("Thorsten", "de-DE"),
        ]));
        let output = SpeechOutput::new(Some(host.clone() as Arc<dyn SpeechHost>));
        (host, output)
    }

    #[test]
    fn test_speak_starts_exactly_one_utterance() {
        let (host, output) = adapter_with_voices();

        let started = output.speak("Hello there", None, 1.0, 1.0).unwrap();
        assert!(started.is_some());

        let active = host.active().expect("utterance should be active");
        assert_eq!(active.text, "Hello there");
        assert_eq!(host.spoken().len(), 1);
    }

    #[test]
    fn test_blank_text_is_silent_noop() {
        let (host, output) = adapter_with_voices();

        for text in ["", "   ", "\n\t  \n"] {
            assert!(output.speak(text, Some(0), 1.0, 1.0).unwrap().is_none());
        }
        assert!(host.active().is_none());
        assert!(host.spoken().is_empty());
        assert_eq!(host.cancel_count(), 0);
    }

    #[test]
    fn test_speak_twice_never_overlaps() {
        let (host, output) = adapter_with_voices();

        output.speak("first", None, 1.0, 1.0).unwrap();
        output.speak("second", None, 1.0, 1.0).unwrap();

        assert!(!host.overlap_detected());
        assert_eq!(host.active().map(|u| u.text), Some("second".to_string()));
        assert_eq!(host.spoken().len(), 2);
    }

    #[test]
    fn test_voice_selection_and_fallback() {
        let (host, output) = adapter_with_voices();

        output.speak("guten tag", Some(1), 1.2, 0.8).unwrap();
        let active = host.active().unwrap();
        assert_eq!(active.voice.map(|v| v.name), Some("Thorsten".to_string()));
        assert!((active.rate - 1.2).abs() < f32::EPSILON);
        assert!((active.pitch - 0.8).abs() < f32::EPSILON);

        output.speak("fallback", Some(7), 1.0, 1.0).unwrap();
        assert!(host.active().unwrap().voice.is_none());
    }

    #[test]
    fn test_missing_host_is_reported() {
        let output = SpeechOutput::unsupported();
        assert!(!output.is_supported());

        let err = output.speak("hello", None, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, LecternError::UnsupportedCapability(_)));

        // Blank text stays a no-op even without a host
        assert!(output.speak("  ", None, 1.0, 1.0).unwrap().is_none());

        // Stopping without a host does nothing
        output.stop();
        assert!(!output.is_speaking());
    }

    #[test]
    fn test_unavailable_reason_is_reported() {
        let output = SpeechOutput::unavailable("no voice models configured");
        let err = output.speak("hello", None, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Speech synthesis (no voice models configured) is not supported on this system."
        );
    }

    #[test]
    fn test_host_failures_are_collected() {
        let (host, output) = adapter_with_voices();
        assert!(output.poll_errors().is_empty());

        output.speak("hello", None, 1.0, 1.0).unwrap();
        host.report_error(LecternError::SpeechError("model missing".into()));

        let errors = output.poll_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], LecternError::SpeechError(msg) if msg == "model missing"));
        assert!(output.poll_errors().is_empty());
    }

    #[test]
    fn test_stop_cancels_active_utterance() {
        let (host, output) = adapter_with_voices();
        output.speak("long text", None, 1.0, 1.0).unwrap();
        assert!(output.is_speaking());

        output.stop();
        assert!(!output.is_speaking());

        // Stop when idle is harmless
        output.stop();
        assert!(host.active().is_none());
    }

    #[test]
    fn test_catalog_follows_host_notifications() {
        let host = Arc::new(MemorySpeechHost::new());
        let output = SpeechOutput::new(Some(host.clone() as Arc<dyn SpeechHost>));
        assert!(output.list_voices().is_empty());
        assert!(!output.poll_voice_changes());

        host.set_voices(vec![VoiceDescriptor::new("Amy", "en-US")]);
        assert!(output.poll_voice_changes());
        assert_eq!(output.list_voices().len(), 1);

        host.set_voices(vec![]);
        assert!(output.poll_voice_changes());
        assert!(output.list_voices().is_empty());
    }
}
