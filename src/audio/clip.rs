use crate::{InterviewError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// A finished recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    /// Interleaved samples in `[-1.0, 1.0]`
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Encode as a 16-bit PCM WAV file in memory
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| {
                InterviewError::AudioProcessingError(format!("Failed to create WAV writer: {}", e))
            })?;

            for &sample in &self.samples {
                let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer.write_sample(sample_i16).map_err(|e| {
                    InterviewError::AudioProcessingError(format!("Failed to write sample: {}", e))
                })?;
            }

            writer.finalize().map_err(|e| {
                InterviewError::AudioProcessingError(format!("Failed to finalize WAV: {}", e))
            })?;
        }

        Ok(cursor.into_inner())
    }

    /// Read a WAV file, normalizing samples to `[-1.0, 1.0]`
    pub fn open_wav<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = WavReader::open(path).map_err(|e| {
            InterviewError::AudioProcessingError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>(),
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<Vec<_>, _>>()
            }
        }
        .map_err(|e| {
            InterviewError::AudioProcessingError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(Self::new(samples, spec.sample_rate, spec.channels))
    }
}
