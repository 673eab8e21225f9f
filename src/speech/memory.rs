//! In-memory speech host
//!
//! Records utterances instead of producing audio. Used for headless runs
//! and as the test double for the adapter and controllers.

use crate::speech::host::{SpeechHost, Utterance};
use crate::speech::voice::VoiceDescriptor;
use crate::{LecternError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct HostState {
    voices: Vec<VoiceDescriptor>,
    active: Option<Utterance>,
    spoken: Vec<Utterance>,
    cancel_count: usize,
    overlap_detected: bool,
}

pub struct MemorySpeechHost {
    state: Mutex<HostState>,
    changed_tx: Sender<()>,
    changed_rx: Receiver<()>,
    error_tx: Sender<LecternError>,
    error_rx: Receiver<LecternError>,
}

impl MemorySpeechHost {
    pub fn new() -> Self {
        let (changed_tx, changed_rx) = unbounded();
        let (error_tx, error_rx) = unbounded();
        Self {
            state: Mutex::new(HostState::default()),
            changed_tx,
            changed_rx,
            error_tx,
            error_rx,
        }
    }

    pub fn with_voices(voices: Vec<VoiceDescriptor>) -> Self {
        let host = Self::new();
        host.state.lock().voices = voices;
        host
    }

    /// Replace the voice list and notify listeners
    pub fn set_voices(&self, voices: Vec<VoiceDescriptor>) {
        self.state.lock().voices = voices;
        let _ = self.changed_tx.send(());
    }

    /// Utterance that is currently "audible"
    pub fn active(&self) -> Option<Utterance> {
        self.state.lock().active.clone()
    }

    /// Every utterance ever started, oldest first
    pub fn spoken(&self) -> Vec<Utterance> {
        self.state.lock().spoken.clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().cancel_count
    }

    /// True if `speak` was ever called while another utterance was active
    pub fn overlap_detected(&self) -> bool {
        self.state.lock().overlap_detected
    }

    /// Simulate a failure after `speak` returned; the utterance is dropped
    pub fn report_error(&self, err: LecternError) {
        self.state.lock().active = None;
        let _ = self.error_tx.send(err);
    }

    /// Simulate the active utterance reaching its end
    pub fn finish(&self) {
        self.state.lock().active = None;
    }
}

impl Default for MemorySpeechHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechHost for MemorySpeechHost {
    fn available_voices(&self) -> Vec<VoiceDescriptor> {
        self.state.lock().voices.clone()
    }

    fn voices_changed(&self) -> Option<Receiver<()>> {
        Some(self.changed_rx.clone())
    }

    fn errors(&self) -> Option<Receiver<LecternError>> {
        Some(self.error_rx.clone())
    }

    fn speak(&self, utterance: Utterance) -> Result<()> {
        let mut state = self.state.lock();
        if state.active.is_some() {
            state.overlap_detected = true;
        }
        state.spoken.push(utterance.clone());
        state.active = Some(utterance);
        Ok(())
    }

    fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancel_count += 1;
        state.active = None;
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().active.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_speak_without_cancel_flags_overlap() {
        let host = MemorySpeechHost::new();
        host.speak(Utterance::new("a")).unwrap();
        host.speak(Utterance::new("b")).unwrap();
        assert!(host.overlap_detected());
    }

    #[test]
    fn test_finish_clears_active() {
        let host = MemorySpeechHost::new();
        host.speak(Utterance::new("a")).unwrap();
        assert!(host.is_speaking());
        host.finish();
        assert!(!host.is_speaking());
        assert_eq!(host.spoken().len(), 1);
    }
}
