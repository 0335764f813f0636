use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::{AudioConfig, Result, Synth, ToneError, Waveform, WaveformSlot};

/// Whether the backend is currently delivering callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Open, no callbacks delivered.
    Paused,
    /// Open, the backend is pulling samples from the synth.
    Playing,
}

impl EngineState {
    /// State after a play (`true`) or pause (`false`) request, or `None` when
    /// the request does not change anything.
    pub fn transition(self, play: bool) -> Option<EngineState> {
        match (self, play) {
            (EngineState::Paused, true) => Some(EngineState::Playing),
            (EngineState::Playing, false) => Some(EngineState::Paused),
            _ => None,
        }
    }
}

/// Owns the output stream and feeds it from a [`Synth`].
///
/// The stream is mono 16-bit at the configured rate. A constructed engine is
/// open and paused; dropping it closes the device.
pub struct ToneEngine {
    stream: cpal::Stream,
    waveform: WaveformSlot,
    state: EngineState,
    device_name: String,
}

impl ToneEngine {
    /// Opens the default output device.
    pub fn open(config: &AudioConfig) -> Result<Self> {
        config.validate()?;

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            let err = ToneError::AudioInit(format!("{} host has no output device", host.id().name()));
            tracing::error!(%err, "failed to initialise audio");
            err
        })?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let stream_config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(config.buffer_frames),
        };

        let waveform = WaveformSlot::new();
        let mut synth = Synth::new(config.sample_rate, config.amplitude, waveform.clone());

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| synth.render(data),
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .map_err(|err| {
                tracing::error!(%err, device = %device_name, "failed to open audio");
                ToneError::from(err)
            })?;

        // Some backends start streams as soon as they are built.
        stream.pause()?;

        tracing::info!(
            device = %device_name,
            sample_rate = config.sample_rate,
            buffer_frames = config.buffer_frames,
            "audio device opened"
        );

        Ok(Self {
            stream,
            waveform,
            state: EngineState::Paused,
            device_name,
        })
    }

    /// Installs the waveform used from the next callback onwards.
    pub fn set_waveform(&self, waveform: Waveform) {
        self.waveform.install(waveform);
    }

    /// Starts callback delivery. Does nothing when already playing.
    pub fn play(&mut self) -> Result<()> {
        self.request(true)
    }

    /// Stops callback delivery, possibly mid-buffer. Does nothing when
    /// already paused.
    pub fn pause(&mut self) -> Result<()> {
        self.request(false)
    }

    /// Current playback state; [`EngineState::Paused`] right after opening.
    pub fn state(&self) -> EngineState {
        self.state
    }

    fn request(&mut self, play: bool) -> Result<()> {
        let Some(next) = self.state.transition(play) else {
            return Ok(());
        };

        match next {
            EngineState::Playing => self.stream.play()?,
            EngineState::Paused => self.stream.pause()?,
        }
        tracing::debug!(state = ?next, "audio stream state changed");
        self.state = next;
        Ok(())
    }
}

impl Drop for ToneEngine {
    fn drop(&mut self) {
        tracing::debug!(device = %self.device_name, "closing audio device");
    }
}

impl std::fmt::Debug for ToneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneEngine")
            .field("device_name", &self.device_name)
            .field("state", &self.state)
            .finish()
    }
}

/// Names of the output devices on the default host.
pub fn list_output_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let names = host
        .output_devices()?
        .enumerate()
        .map(|(index, device)| {
            let name = device.name().unwrap_or_else(|_| "unknown".to_string());
            format!("{index}: {name}")
        })
        .collect();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_requests_leave_state_unchanged() {
        assert_eq!(EngineState::Paused.transition(false), None);
        assert_eq!(EngineState::Playing.transition(true), None);
    }

    #[test]
    fn toggles_between_playing_and_paused() {
        let playing = EngineState::Paused.transition(true);
        assert_eq!(playing, Some(EngineState::Playing));
        assert_eq!(
            EngineState::Playing.transition(false),
            Some(EngineState::Paused)
        );
    }

    #[test]
    fn open_rejects_invalid_config_before_touching_hardware() {
        let config = AudioConfig {
            buffer_frames: 0,
            ..AudioConfig::default()
        };
        assert!(matches!(
            ToneEngine::open(&config),
            Err(ToneError::InvalidConfig(_))
        ));
    }
}
