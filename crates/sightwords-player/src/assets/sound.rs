//! Audio chunks produced by the speech collaborator
//!
//! A chunk is mono `f32` PCM at a fixed sample rate. Recorded clips are
//! decoded from WAV (or anything else rodio understands) and downmixed.

use std::io::Cursor;
use std::path::Path;

use rodio::{Decoder, Source};
use sightwords_common::{GameError, Result};

/// Sample rate of the reference voice
pub const VOICE_SAMPLE_RATE: u32 = 24_000;

/// One block of synthesized or recorded speech
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioChunk {
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self { sample_rate, samples }
    }

    /// Decode an encoded clip (WAV etc.) into a mono chunk
    pub fn from_encoded(bytes: Vec<u8>, path: &Path) -> Result<Self> {
        let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| GameError::AssetInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let channels = decoder.channels().max(1) as usize;
        let sample_rate = decoder.sample_rate();
        let interleaved: Vec<i16> = decoder.collect();

        let samples = interleaved
            .chunks(channels)
            .map(|frame| {
                let sum: f32 = frame.iter().map(|&s| s as f32 / 32768.0).sum();
                sum / frame.len() as f32
            })
            .collect();

        Ok(Self { sample_rate, samples })
    }

    /// Append another chunk. Chunks with a different rate are skipped.
    pub fn append(&mut self, other: &AudioChunk) -> bool {
        if other.sample_rate != self.sample_rate {
            tracing::debug!(
                "Not joining clips with different rates ({} vs {})",
                self.sample_rate,
                other.sample_rate
            );
            return false;
        }
        self.samples.extend_from_slice(&other.samples);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u32 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000 / self.sample_rate as u64) as u32
    }
}
