//! Choose host backends from configuration

use crate::document::{DocumentParser, LopdfParser};
use crate::integration::config::AppConfig;
use crate::speech::SpeechOutput;
use crate::LecternError;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the speech adapter. A host that cannot start is logged and the
/// adapter is created without one, so the UI can tell the user.
pub fn build_speech_output(config: &AppConfig) -> SpeechOutput {
    if !config.enable_audio_output {
        info!("Audio output disabled by configuration");
        return SpeechOutput::unavailable("audio output disabled in configuration");
    }

    if let Err(e) = config.validate() {
        warn!("Not starting speech host: {}", e);
        return SpeechOutput::unavailable(unavailable_reason(&e));
    }

    start_speech_host(config)
}

fn unavailable_reason(err: &LecternError) -> String {
    match err {
        LecternError::UnsupportedCapability(what) => what.clone(),
        other => other.to_string(),
    }
}

#[cfg(feature = "audio-io")]
fn start_speech_host(config: &AppConfig) -> SpeechOutput {
    use crate::speech::VitsSpeechHost;

    match VitsSpeechHost::start(config.speech.voices.clone()) {
        Ok(host) => SpeechOutput::new(Some(Arc::new(host))),
        Err(e) => {
            warn!("Speech host unavailable: {}", e);
            SpeechOutput::unavailable(unavailable_reason(&e))
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn start_speech_host(_config: &AppConfig) -> SpeechOutput {
    warn!("Built without audio-io; no speech host available");
    SpeechOutput::unavailable("built without audio output")
}

pub fn document_parser() -> Arc<dyn DocumentParser> {
    Arc::new(LopdfParser::new())
}
