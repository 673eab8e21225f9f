#[cfg(feature = "audio-io")]
pub mod audio;
pub mod document;
pub mod ingest;
pub mod integration;
pub mod messages;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LecternError {
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Speech error: {0}")]
    SpeechError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for LecternError {
    fn from(e: std::io::Error) -> Self {
        LecternError::IOError(e.to_string())
    }
}

impl LecternError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The host will not grow a capability while we run
            LecternError::UnsupportedCapability(_) => false,
            // A different document may parse fine
            LecternError::ParseError(_) => true,
            LecternError::SpeechError(_) => true,
            LecternError::AudioDeviceError(_) => false,
            LecternError::AudioProcessingError(_) => true,
            LecternError::ConfigError(_) => false,
            LecternError::IOError(_) => true,
            LecternError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            LecternError::UnsupportedCapability(what) => {
                format!("{} is not supported on this system.", what)
            }
            LecternError::ParseError(_) => "Error reading PDF.".to_string(),
            LecternError::SpeechError(_) => {
                "Speech playback failed. Please try again.".to_string()
            }
            LecternError::AudioDeviceError(_) => {
                "Audio device error. Please check your speakers.".to_string()
            }
            LecternError::AudioProcessingError(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            LecternError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            LecternError::IOError(_) => "File system error occurred.".to_string(),
            LecternError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LecternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_capability_message_names_the_capability() {
        let err = LecternError::UnsupportedCapability("Speech synthesis".into());
        assert_eq!(
            err.user_message(),
            "Speech synthesis is not supported on this system."
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_parse_error_is_recoverable() {
        let err = LecternError::ParseError("bad xref".into());
        assert!(err.is_recoverable());
        assert_eq!(err.user_message(), "Error reading PDF.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: LecternError = io.into();
        assert!(matches!(err, LecternError::IOError(msg) if msg.contains("missing.pdf")));
    }
}
