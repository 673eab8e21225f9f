//! Mono sample-rate conversion from the synthesizer rate to the device rate

use crate::{LecternError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

const CHUNK_FRAMES: usize = 1024;

pub struct AudioResampler {
    inner: SincFixedIn<f32>,
    ratio: f64,
}

impl AudioResampler {
    pub fn new(from_rate: u32, to_rate: u32) -> Result<Self> {
        if from_rate == 0 || to_rate == 0 {
            return Err(LecternError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let ratio = to_rate as f64 / from_rate as f64;
        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 128,
            window: WindowFunction::BlackmanHarris2,
        };

        let inner = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1).map_err(|e| {
            LecternError::AudioProcessingError(format!("Failed to create resampler: {}", e))
        })?;

        debug!("Created resampler: {} Hz -> {} Hz", from_rate, to_rate);
        Ok(Self { inner, ratio })
    }

    /// Resample a complete mono clip
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let mut output = Vec::with_capacity((input.len() as f64 * self.ratio) as usize + 1);

        for chunk in input.chunks(CHUNK_FRAMES) {
            // The last chunk is zero padded; keep only the share of output it produced
            let mut planar = vec![vec![0.0f32; CHUNK_FRAMES]];
            planar[0][..chunk.len()].copy_from_slice(chunk);

            let produced = self.inner.process(&planar, None).map_err(|e| {
                LecternError::AudioProcessingError(format!("Resampling failed: {}", e))
            })?;

            let keep = if chunk.len() < CHUNK_FRAMES {
                ((chunk.len() as f64) * self.ratio).ceil() as usize
            } else {
                produced[0].len()
            };
            output.extend_from_slice(&produced[0][..keep.min(produced[0].len())]);
        }

        Ok(output)
    }
}

/// Resample mono audio in one call; identity when the rates match
pub fn resample_audio(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }
    AudioResampler::new(from_rate, to_rate)?.process(input)
}
