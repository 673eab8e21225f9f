//! Application configuration
//!
//! Loaded from `<config_dir>/lectern/config.toml` (or `$LECTERN_CONFIG`).
//! A missing file yields the defaults.

use crate::speech::voice::VoiceDescriptor;
use crate::{LecternError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "LECTERN_CONFIG";

/// One installed VITS voice model
#[derive(Clone, Debug, Deserialize)]
pub struct VoiceModelConfig {
    /// Name shown in the voice selector
    pub name: String,

    /// Language tag of the model
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Path to the ONNX model file
    pub model_path: PathBuf,

    /// Path to the tokens file
    pub tokens_path: PathBuf,

    /// Path to the lexicon file (optional for some models)
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// espeak-ng data directory (optional)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Dict directory (optional)
    #[serde(default)]
    pub dict_dir: Option<PathBuf>,

    /// Speaker ID for multi-speaker models
    #[serde(default)]
    pub speaker_id: i32,

    /// Mark this model as the host default voice
    #[serde(default)]
    pub default: bool,
}

fn default_lang() -> String {
    "en-US".to_string()
}

impl VoiceModelConfig {
    pub fn new(
        name: impl Into<String>,
        model_path: impl Into<PathBuf>,
        tokens_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            lang: default_lang(),
            model_path: model_path.into(),
            tokens_path: tokens_path.into(),
            lexicon_path: None,
            data_dir: None,
            dict_dir: None,
            speaker_id: 0,
            default: false,
        }
    }

    pub fn descriptor(&self) -> VoiceDescriptor {
        VoiceDescriptor {
            name: self.name.clone(),
            lang: self.lang.clone(),
            default: self.default,
        }
    }
}

/// Slider bounds and defaults for speech parameters
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub default_rate: f32,
    pub default_pitch: f32,
    pub min_rate: f32,
    pub max_rate: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Installed voice models, in selector order
    pub voices: Vec<VoiceModelConfig>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            default_rate: 1.0,
            default_pitch: 1.0,
            min_rate: 0.5,
            max_rate: 2.0,
            min_pitch: 0.5,
            max_pitch: 2.0,
            voices: Vec::new(),
        }
    }
}

/// Document ingestion settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Characters of extracted text copied into the input box
    pub preview_chars: usize,
    /// Appended to the preview when the text is longer
    pub truncation_marker: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            preview_chars: 300,
            truncation_marker: "... [truncated]".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub speech: SpeechConfig,
    pub ingest: IngestConfig,
    /// Whether to start the built-in audio speech host
    pub enable_audio_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            speech: SpeechConfig::default(),
            ingest: IngestConfig::default(),
            enable_audio_output: true,
        }
    }
}

impl AppConfig {
    /// Config file location: `$LECTERN_CONFIG`, else the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("lectern").join("config.toml"))
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(
            "Loaded config from {:?} ({} voice models)",
            path,
            config.speech.voices.len()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LecternError::ConfigError(e.to_string()))
    }

    /// Add a voice model
    pub fn with_voice(mut self, voice: VoiceModelConfig) -> Self {
        self.speech.voices.push(voice);
        self
    }

    /// Run without the built-in audio host
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let speech = &self.speech;

        if speech.min_rate <= 0.0 || speech.min_rate >= speech.max_rate {
            return Err(LecternError::ConfigError(format!(
                "Invalid rate range {}..{}",
                speech.min_rate, speech.max_rate
            )));
        }
        if speech.min_pitch < 0.0 || speech.min_pitch >= speech.max_pitch {
            return Err(LecternError::ConfigError(format!(
                "Invalid pitch range {}..{}",
                speech.min_pitch, speech.max_pitch
            )));
        }
        if !(speech.min_rate..=speech.max_rate).contains(&speech.default_rate) {
            return Err(LecternError::ConfigError(format!(
                "Default rate {} outside {}..{}",
                speech.default_rate, speech.min_rate, speech.max_rate
            )));
        }
        if !(speech.min_pitch..=speech.max_pitch).contains(&speech.default_pitch) {
            return Err(LecternError::ConfigError(format!(
                "Default pitch {} outside {}..{}",
                speech.default_pitch, speech.min_pitch, speech.max_pitch
            )));
        }

        let mut names = HashSet::new();
        for voice in &speech.voices {
            if !names.insert(voice.name.as_str()) {
                return Err(LecternError::ConfigError(format!(
                    "Duplicate voice name: {}",
                    voice.name
                )));
            }

            if self.enable_audio_output {
                if !voice.model_path.exists() {
                    return Err(LecternError::ConfigError(format!(
                        "Voice model not found: {:?}",
                        voice.model_path
                    )));
                }
                if !voice.tokens_path.exists() {
                    return Err(LecternError::ConfigError(format!(
                        "Voice tokens file not found: {:?}",
                        voice.tokens_path
                    )));
                }
            }
        }

        Ok(())
    }
}
