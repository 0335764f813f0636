use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, ToneError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub poll: PollConfig,
}

impl AppConfig {
    /// Checks every section, failing with [`ToneError::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        self.audio.validate()
    }
}

/// Configuration specific to the audio subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Output rate in Hz.
    pub sample_rate: u32,
    /// Peak output value written for a waveform sample of 1.0.
    pub amplitude: u16,
    /// Frames per callback buffer requested from the backend.
    pub buffer_frames: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            amplitude: 28_000,
            buffer_frames: 2048,
        }
    }
}

impl AudioConfig {
    /// Rejects a zero sample rate or buffer size and amplitudes above
    /// `i16::MAX`.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneError::invalid_config("sample rate must be positive"));
        }
        if i32::from(self.amplitude) > i32::from(i16::MAX) {
            return Err(ToneError::invalid_config(format!(
                "amplitude {} exceeds the 16-bit sample range",
                self.amplitude
            )));
        }
        if self.buffer_frames == 0 {
            return Err(ToneError::invalid_config("buffer size must be positive"));
        }
        Ok(())
    }
}

/// Pacing of the keyboard polling loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollConfig {
    /// Sleep inserted between iterations. Zero keeps the loop tight.
    pub interval_micros: u64,
}

impl PollConfig {
    /// Sleep between scans, or `None` for a tight loop.
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_micros > 0).then(|| Duration::from_micros(self.interval_micros))
    }
}
