use crate::{LecternError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Mono samples waiting to be played. Shared between the synthesis worker,
/// the output stream callback, and whoever cancels playback.
#[derive(Debug, Clone, Default)]
pub struct PlaybackBuffer {
    samples: Arc<Mutex<VecDeque<f32>>>,
}

impl PlaybackBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, samples: &[f32]) {
        self.samples.lock().extend(samples.iter().copied());
    }

    /// Append `samples` only while `generation` is still current. The check
    /// and the push happen under the buffer lock, the same lock
    /// [`invalidate`](Self::invalidate) holds.
    pub fn push_if_current(&self, samples: &[f32], generation: u64, current: &AtomicU64) -> bool {
        let mut buf = self.samples.lock();
        if current.load(Ordering::Acquire) != generation {
            return false;
        }
        buf.extend(samples.iter().copied());
        true
    }

    /// Start a new generation and flush queued samples in one step.
    /// Returns the new generation.
    pub fn invalidate(&self, current: &AtomicU64) -> u64 {
        let mut buf = self.samples.lock();
        let next = current.fetch_add(1, Ordering::AcqRel) + 1;
        if !buf.is_empty() {
            debug!("Flushing {} queued samples", buf.len());
        }
        buf.clear();
        next
    }

    /// Drop everything not yet played
    pub fn clear(&self) {
        let mut buf = self.samples.lock();
        if !buf.is_empty() {
            debug!("Flushing {} queued samples", buf.len());
        }
        buf.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Fill an interleaved output frame slice, padding with silence
    fn fill(&self, data: &mut [f32], channels: usize) {
        let mut buf = self.samples.lock();
        for frame in data.chunks_mut(channels) {
            let sample = buf.pop_front().unwrap_or(0.0);
            frame.fill(sample);
        }
    }
}

pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioOutput {
    /// Create a new audio output with the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| LecternError::AudioDeviceError("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| {
                LecternError::AudioDeviceError(format!("Failed to get output config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Get the sample rate of the output device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    /// Start the output stream, playing whatever lands in `buffer`
    pub fn start(&mut self, buffer: PlaybackBuffer) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    buffer.fill(data, channels);
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                LecternError::AudioDeviceError(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            LecternError::AudioDeviceError(format!("Failed to start output stream: {}", e))
        })?;

        self.stream = Some(stream);
        info!("Started audio output stream");
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Stopped audio output stream");
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
