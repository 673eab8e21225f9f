//! Built-in speech host backed by VITS models (sherpa-rs) and cpal output
//!
//! Every configured model is one voice. Synthesis runs on a worker thread;
//! each utterance is tagged with the generation that was current when it
//! was queued, and `cancel` bumps the generation so stale audio is dropped.

use crate::audio::{resample_audio, AudioOutput, PlaybackBuffer};
use crate::integration::config::VoiceModelConfig;
use crate::speech::host::{SpeechHost, Utterance};
use crate::speech::voice::VoiceDescriptor;
use crate::{LecternError, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Longest piece of text handed to the synthesizer in one call
const MAX_CHUNK_CHARS: usize = 400;

const QUEUE_SIZE: usize = 16;

enum SpeechCommand {
    Speak { utterance: Utterance, generation: u64 },
    Shutdown,
}

pub struct VitsSpeechHost {
    voices: Vec<VoiceModelConfig>,
    command_tx: Sender<SpeechCommand>,
    error_rx: Receiver<LecternError>,
    generation: Arc<AtomicU64>,
    synthesizing: Arc<AtomicBool>,
    buffer: PlaybackBuffer,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl VitsSpeechHost {
    /// Open the output device and start the synthesis worker
    pub fn start(voices: Vec<VoiceModelConfig>) -> Result<Self> {
        if voices.is_empty() {
            return Err(LecternError::UnsupportedCapability(
                "no voice models configured".into(),
            ));
        }

        let (command_tx, command_rx) = bounded(QUEUE_SIZE);
        let (ready_tx, ready_rx) = bounded(1);
        let (error_tx, error_rx) = unbounded();
        let generation = Arc::new(AtomicU64::new(0));
        let synthesizing = Arc::new(AtomicBool::new(false));
        let buffer = PlaybackBuffer::new();

        let worker = {
            let voices = voices.clone();
            let generation = Arc::clone(&generation);
            let synthesizing = Arc::clone(&synthesizing);
            let buffer = buffer.clone();
            thread::spawn(move || {
                // cpal streams are not Send on every platform, so the device
                // lives on this thread for its whole life
                let mut output = match AudioOutput::new() {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = output.start(buffer.clone()) {
                    let _ = ready_tx.send(Err(e));
                    return;
                }

                let mut worker = SynthesisWorker {
                    voices,
                    engines: HashMap::new(),
                    device_rate: output.sample_rate(),
                    generation,
                    synthesizing,
                    buffer,
                    error_tx,
                };

                // A broken default voice fails startup instead of the first utterance
                let default_voice = voice_model_index(&worker.voices, None);
                if let Err(e) = worker.engine(default_voice) {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                worker.run(command_rx);
                output.stop();
            })
        };

        ready_rx
            .recv()
            .map_err(|e| LecternError::ChannelError(format!("Speech worker exited: {}", e)))??;

        info!("VITS speech host ready with {} voices", voices.len());

        Ok(Self {
            voices,
            command_tx,
            error_rx,
            generation,
            synthesizing,
            buffer,
            worker: Mutex::new(Some(worker)),
        })
    }
}

impl SpeechHost for VitsSpeechHost {
    fn available_voices(&self) -> Vec<VoiceDescriptor> {
        self.voices.iter().map(|v| v.descriptor()).collect()
    }

    fn errors(&self) -> Option<Receiver<LecternError>> {
        Some(self.error_rx.clone())
    }

    fn speak(&self, utterance: Utterance) -> Result<()> {
        let generation = self.generation.load(Ordering::Acquire);
        self.command_tx
            .try_send(SpeechCommand::Speak {
                utterance,
                generation,
            })
            .map_err(|e| LecternError::SpeechError(format!("Speech queue unavailable: {}", e)))
    }

    fn cancel(&self) {
        let generation = self.buffer.invalidate(&self.generation);
        debug!("Speech cancelled, now at generation {}", generation);
    }

    fn is_speaking(&self) -> bool {
        self.synthesizing.load(Ordering::Acquire) || !self.buffer.is_empty()
    }
}

impl Drop for VitsSpeechHost {
    fn drop(&mut self) {
        self.cancel();
        let _ = self.command_tx.send(SpeechCommand::Shutdown);
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                warn!("Speech worker panicked during shutdown");
            }
        }
    }
}

struct SynthesisWorker {
    voices: Vec<VoiceModelConfig>,
    engines: HashMap<usize, VitsTts>,
    device_rate: u32,
    generation: Arc<AtomicU64>,
    synthesizing: Arc<AtomicBool>,
    buffer: PlaybackBuffer,
    error_tx: Sender<LecternError>,
}

impl SynthesisWorker {
    fn run(mut self, commands: Receiver<SpeechCommand>) {
        info!("Speech worker started");
        while let Ok(command) = commands.recv() {
            match command {
                SpeechCommand::Speak {
                    utterance,
                    generation,
                } => {
                    self.synthesizing.store(true, Ordering::Release);
                    if let Err(e) = self.speak(&utterance, generation) {
                        error!("Synthesis failed: {}", e);
                        let _ = self.error_tx.send(e);
                    }
                    self.synthesizing.store(false, Ordering::Release);
                }
                SpeechCommand::Shutdown => break,
            }
        }
        info!("Speech worker stopped");
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    fn speak(&mut self, utterance: &Utterance, generation: u64) -> Result<()> {
        let index = voice_model_index(&self.voices, utterance.voice.as_ref());
        let speaker_id = self.voices[index].speaker_id;
        if (utterance.pitch - 1.0).abs() > f32::EPSILON {
            debug!("VITS has no pitch control; ignoring pitch {:.2}", utterance.pitch);
        }

        for chunk in chunk_text(&utterance.text, MAX_CHUNK_CHARS) {
            if !self.is_current(generation) {
                debug!("Utterance {} cancelled", utterance.id);
                return Ok(());
            }

            let engine = self.engine(index)?;
            let audio = engine
                .create(&chunk, speaker_id, utterance.rate)
                .map_err(|e| LecternError::SpeechError(format!("Synthesis failed: {}", e)))?;

            let samples = resample_audio(&audio.samples, audio.sample_rate as u32, self.device_rate)?;

            if !self
                .buffer
                .push_if_current(&samples, generation, &self.generation)
            {
                debug!("Dropping stale audio for utterance {}", utterance.id);
                return Ok(());
            }
        }

        Ok(())
    }

    fn engine(&mut self, index: usize) -> Result<&mut VitsTts> {
        if !self.engines.contains_key(&index) {
            let engine = load_engine(&self.voices[index])?;
            self.engines.insert(index, engine);
        }
        self.engines
            .get_mut(&index)
            .ok_or_else(|| LecternError::SpeechError("Voice engine missing".into()))
    }
}

fn load_engine(voice: &VoiceModelConfig) -> Result<VitsTts> {
    for path in [&voice.model_path, &voice.tokens_path] {
        if !Path::new(path).exists() {
            return Err(LecternError::SpeechError(format!(
                "Voice file not found: {:?}",
                path
            )));
        }
    }

    info!("Loading VITS voice '{}' from {:?}", voice.name, voice.model_path);

    let path_string = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default()
    };

    let config = VitsTtsConfig {
        model: voice.model_path.to_string_lossy().to_string(),
        tokens: voice.tokens_path.to_string_lossy().to_string(),
        lexicon: path_string(&voice.lexicon_path),
        data_dir: path_string(&voice.data_dir),
        dict_dir: path_string(&voice.dict_dir),
        ..Default::default()
    };

    Ok(VitsTts::new(config))
}

/// Index of the model to use: the named voice, else the flagged default,
/// else the first model
fn voice_model_index(voices: &[VoiceModelConfig], voice: Option<&VoiceDescriptor>) -> usize {
    voice
        .and_then(|v| voices.iter().position(|m| m.name == v.name))
        .or_else(|| voices.iter().position(|m| m.default))
        .unwrap_or(0)
}

/// Split text into synthesizer-sized pieces at paragraph and sentence
/// boundaries. A single sentence longer than `max_chars` is split on
/// whitespace.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    for paragraph in text.split("\n\n") {
        let mut current = String::new();
        for sentence in paragraph.split_inclusive(['.', '!', '?']) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            if !current.is_empty()
                && current.chars().count() + sentence.chars().count() + 1 > max_chars
            {
                chunks.push(std::mem::take(&mut current));
            }
            if sentence.chars().count() > max_chars {
                for word in sentence.split_whitespace() {
                    if !current.is_empty()
                        && current.chars().count() + word.chars().count() + 1 > max_chars
                    {
                        chunks.push(std::mem::take(&mut current));
                    }
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                }
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, default: bool) -> VoiceModelConfig {
        let mut m = VoiceModelConfig::new(name, format!("{}.onnx", name), "tokens.txt");
        m.default = default;
        m
    }

    #[test]
    fn test_chunk_text_splits_paragraphs() {
        let chunks = chunk_text("First page.\n\nSecond page.", 400);
        assert_eq!(chunks, vec!["First page.", "Second page."]);
    }

    #[test]
    fn test_chunk_text_respects_limit() {
        let text = "One two three. Four five six. Seven eight nine.";
        let chunks = chunk_text(text, 20);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_chunk_text_splits_long_sentence_on_words() {
        let text = "word ".repeat(50);
        let chunks = chunk_text(text.trim(), 32);
        assert!(chunks.iter().all(|c| c.chars().count() <= 32));
        assert_eq!(chunks.join(" ").split_whitespace().count(), 50);
    }

    #[test]
    fn test_chunk_text_skips_blank() {
        assert!(chunk_text("  \n\n  ", 100).is_empty());
    }

    #[test]
    fn test_voice_model_index() {
        let voices = vec![model("amy", false), model("ryan", true)];
        let amy = VoiceDescriptor::new("amy", "en-US");
        let unknown = VoiceDescriptor::new("zed", "en-US");

        assert_eq!(voice_model_index(&voices, Some(&amy)), 0);
        assert_eq!(voice_model_index(&voices, Some(&unknown)), 1);
        assert_eq!(voice_model_index(&voices, None), 1);
        assert_eq!(voice_model_index(&[model("solo", false)], None), 0);
    }

    #[test]
    fn test_missing_model_files_fail_before_synthesis() {
        let err = load_engine(&model("gone", true)).err().unwrap();
        assert!(matches!(err, LecternError::SpeechError(msg) if msg.contains("gone.onnx")));

        // Startup loads the default voice, so a broken model never yields a silent host
        assert!(VitsSpeechHost::start(vec![model("gone", true)]).is_err());
    }

    #[test]
    fn test_start_without_voices_is_unsupported() {
        let err = VitsSpeechHost::start(Vec::new()).err().unwrap();
        assert!(matches!(err, LecternError::UnsupportedCapability(_)));
    }
}
