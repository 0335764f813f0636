//! Offline pitch detection used to check rendered output.

use std::fmt;

use realfft::{RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};

use crate::{AudioConfig, Result, SharedFrequency, Synth, ToneError, WaveformSlot};

/// Longest block [`probe_sine`] will render.
pub const MAX_PROBE_SECONDS: f64 = 120.0;

/// Sample count ceiling for [`probe_sine`], whatever the sample rate.
pub const MAX_PROBE_SAMPLES: usize = 1 << 23;

/// Outcome of analysing a rendered block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchReport {
    pub sample_rate: u32,
    /// Number of samples rendered and analysed.
    pub samples: usize,
    /// Largest absolute sample value.
    pub peak: i16,
    /// Strongest spectral component, or `None` for a silent block.
    pub dominant_hz: Option<f64>,
}

impl fmt::Display for PitchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dominant_hz {
            Some(hz) => write!(
                f,
                "{:.2} Hz over {} samples (peak {})",
                hz, self.samples, self.peak
            ),
            None => write!(f, "silence over {} samples", self.samples),
        }
    }
}

/// Finds the strongest frequency in `samples`.
///
/// Uses a Hann-windowed real FFT with parabolic interpolation around the
/// peak bin.
pub fn dominant_frequency(samples: &[i16], sample_rate: u32) -> Result<Option<f64>> {
    let len = samples.len();
    if len < 4 {
        return Err(ToneError::Analysis(format!(
            "need at least 4 samples, got {len}"
        )));
    }
    if samples.iter().all(|&s| s == 0) {
        return Ok(None);
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let plan = planner.plan_fft_forward(len);
    let mut input = plan.make_input_vec();
    let mut spectrum = plan.make_output_vec();

    for (index, (slot, &sample)) in input.iter_mut().zip(samples).enumerate() {
        *slot = f64::from(sample) * hann_value(index, len);
    }
    plan.process(&mut input, &mut spectrum)?;

    let magnitudes: Vec<f64> = spectrum.iter().map(|bin| bin.norm()).collect();
    let (peak, _) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .fold((1, f64::MIN), |best, (i, &m)| if m > best.1 { (i, m) } else { best });

    let offset = if peak + 1 < magnitudes.len() {
        let (a, b, c) = (magnitudes[peak - 1], magnitudes[peak], magnitudes[peak + 1]);
        let denom = a - 2.0 * b + c;
        if denom.abs() > f64::EPSILON {
            0.5 * (a - c) / denom
        } else {
            0.0
        }
    } else {
        0.0
    };

    let bin_hz = f64::from(sample_rate) / len as f64;
    Ok(Some((peak as f64 + offset) * bin_hz))
}

/// Renders `seconds` of a sine at `frequency_hz` through [`Synth`] and
/// measures it.
///
/// `seconds` must be finite, positive and at most [`MAX_PROBE_SECONDS`].
pub fn probe_sine(config: &AudioConfig, frequency_hz: f64, seconds: f64) -> Result<PitchReport> {
    config.validate()?;
    if !seconds.is_finite() || seconds <= 0.0 || seconds > MAX_PROBE_SECONDS {
        return Err(ToneError::invalid_config(format!(
            "probe duration must be within (0, {MAX_PROBE_SECONDS}] seconds, got {seconds}"
        )));
    }

    let slot = WaveformSlot::new();
    slot.install(crate::sine(SharedFrequency::new(frequency_hz)));
    let mut synth = Synth::new(config.sample_rate, config.amplitude, slot);

    let total = (seconds * f64::from(config.sample_rate)).round() as usize;
    if total > MAX_PROBE_SAMPLES {
        return Err(ToneError::invalid_config(format!(
            "probe of {total} samples exceeds the {MAX_PROBE_SAMPLES} sample limit"
        )));
    }
    let mut samples = vec![0_i16; total];
    for block in samples.chunks_mut(config.buffer_frames as usize) {
        synth.render(block);
    }

    let peak = samples
        .iter()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0)
        .min(i16::MAX as u16) as i16;

    Ok(PitchReport {
        sample_rate: config.sample_rate,
        samples: samples.len(),
        peak,
        dominant_hz: dominant_frequency(&samples, config.sample_rate)?,
    })
}

fn hann_value(index: usize, len: usize) -> f64 {
    0.5 - 0.5 * ((std::f64::consts::TAU * index as f64) / (len as f64 - 1.0)).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rendered_octave() {
        let report = probe_sine(&AudioConfig::default(), 880.0, 0.5).unwrap();
        let hz = report.dominant_hz.expect("tone should be detected");
        assert!((hz - 880.0).abs() < 2.0, "detected {hz}");
        assert!(report.peak > 27_000);
        assert_eq!(report.samples, 22_050);
    }

    #[test]
    fn silence_has_no_pitch() {
        let report = probe_sine(&AudioConfig::default(), 0.0, 0.1).unwrap();
        assert!(report.dominant_hz.is_none());
        assert_eq!(report.peak, 0);
        assert!(report.to_string().starts_with("silence"));
    }

    #[test]
    fn rejects_tiny_inputs() {
        assert!(dominant_frequency(&[1, 2], 44_100).is_err());
        assert!(probe_sine(&AudioConfig::default(), 440.0, 0.0).is_err());
    }

    #[test]
    fn rejects_unbounded_durations() {
        let config = AudioConfig::default();
        for seconds in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 1e9, MAX_PROBE_SECONDS + 1.0] {
            let result = probe_sine(&config, 440.0, seconds);
            assert!(
                matches!(result, Err(ToneError::InvalidConfig(_))),
                "{seconds} should be rejected"
            );
        }

        let fast = AudioConfig {
            sample_rate: u32::MAX,
            ..AudioConfig::default()
        };
        assert!(matches!(
            probe_sine(&fast, 440.0, 1.0),
            Err(ToneError::InvalidConfig(_))
        ));
    }
}
