//! Audio playback for the built-in speech host

pub mod output;
pub mod resampler;

pub use output::{AudioOutput, PlaybackBuffer};
pub use resampler::{resample_audio, AudioResampler};
