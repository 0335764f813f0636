//! Device-independent sample generation driven from the audio callback.
//!
//! [`Synth`] owns the sample clock and renders blocks of signed 16-bit
//! samples from whatever [`Waveform`] is currently installed in its
//! [`WaveformSlot`]. The slot and the [`SharedFrequency`] cell are the only
//! state shared with the control thread, and both are lock-free so the
//! callback never blocks.

use std::{
    f64::consts::TAU,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use arc_swap::ArcSwapOption;

/// A function from elapsed seconds to an amplitude in `[-1, 1]`.
pub struct Waveform(Box<dyn Fn(f64) -> f64 + Send + Sync>);

impl Waveform {
    /// Wraps a closure of elapsed seconds.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Amplitude at `time` seconds.
    pub fn evaluate(&self, time: f64) -> f64 {
        (self.0)(time)
    }
}

impl fmt::Debug for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waveform").finish_non_exhaustive()
    }
}

/// Sine wave whose pitch follows `frequency` on every evaluation.
pub fn sine(frequency: SharedFrequency) -> Waveform {
    Waveform::new(move |time| (TAU * frequency.get() * time).sin())
}

/// Slot holding the installed waveform, shared between the engine handle and
/// the audio callback.
#[derive(Debug, Clone, Default)]
pub struct WaveformSlot {
    inner: Arc<ArcSwapOption<Waveform>>,
}

impl WaveformSlot {
    /// An empty slot; renders silence until a waveform is installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `waveform`; the next rendered block uses it.
    pub fn install(&self, waveform: Waveform) {
        self.inner.store(Some(Arc::new(waveform)));
    }
}

/// Process-wide frequency in Hz, written by the polling loop and read by the
/// audio thread.
///
/// Stored as the bit pattern of an `f64` with relaxed ordering. A reader may
/// observe a value one write behind, which is inaudible.
#[derive(Debug, Clone, Default)]
pub struct SharedFrequency {
    bits: Arc<AtomicU64>,
}

impl SharedFrequency {
    /// A cell holding `hz`, sanitised as by [`SharedFrequency::set`].
    pub fn new(hz: f64) -> Self {
        let frequency = Self::default();
        frequency.set(hz);
        frequency
    }

    /// Latest published frequency in Hz.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Stores `hz`; negative and NaN values are stored as silence.
    pub fn set(&self, hz: f64) {
        let hz = if hz.is_nan() { 0.0 } else { hz.max(0.0) };
        self.bits.store(hz.to_bits(), Ordering::Relaxed);
    }

    /// Stores 0, which renders as silence through [`sine`].
    pub fn silence(&self) {
        self.set(0.0);
    }
}

/// Renders samples for the output stream.
///
/// Elapsed time is an `f64` accumulated by repeated addition of
/// `1 / sample_rate` and never reset. Rounding drift stays far below one
/// sample period over sessions of many hours at typical rates.
#[derive(Debug)]
pub struct Synth {
    sample_rate: u32,
    amplitude: f64,
    time: f64,
    waveform: WaveformSlot,
}

impl Synth {
    /// A synth at `sample_rate` whose full-scale output is `amplitude`,
    /// reading its waveform from `waveform`.
    pub fn new(sample_rate: u32, amplitude: u16, waveform: WaveformSlot) -> Self {
        Self {
            sample_rate,
            amplitude: f64::from(amplitude),
            time: 0.0,
            waveform,
        }
    }

    /// Seconds of audio rendered so far.
    pub fn elapsed(&self) -> f64 {
        self.time
    }

    /// Fills `out` with the next `out.len()` samples.
    pub fn render(&mut self, out: &mut [i16]) {
        let time_step = 1.0 / f64::from(self.sample_rate);
        let waveform = self.waveform.inner.load();

        for sample in out.iter_mut() {
            self.time += time_step;
            *sample = match waveform.as_deref() {
                Some(waveform) => quantize(waveform.evaluate(self.time) * self.amplitude),
                None => 0,
            };
        }
    }
}

fn quantize(value: f64) -> i16 {
    if value.is_nan() {
        return 0;
    }
    value
        .round()
        .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_synth(sample_rate: u32, amplitude: u16, hz: f64) -> (Synth, SharedFrequency) {
        let frequency = SharedFrequency::new(hz);
        let slot = WaveformSlot::new();
        slot.install(sine(frequency.clone()));
        (Synth::new(sample_rate, amplitude, slot), frequency)
    }

    #[test]
    fn matches_reference_sample_for_a440() {
        let (mut synth, _frequency) = sine_synth(44_100, 28_000, 440.0);
        let mut block = [0_i16; 10];
        synth.render(&mut block);

        // The tenth sample lands on t = 10 / 44100.
        let t = 10.0 / 44_100.0;
        let expected = (28_000.0 * (TAU * 440.0 * t).sin()).round() as i32;
        assert!((i32::from(block[9]) - expected).abs() <= 1);
        assert!((synth.elapsed() - t).abs() < 1e-12);
    }

    #[test]
    fn time_is_continuous_across_blocks() {
        let (mut whole, _a) = sine_synth(8_000, 20_000, 330.0);
        let (mut split, _b) = sine_synth(8_000, 20_000, 330.0);

        let mut expected = [0_i16; 96];
        whole.render(&mut expected);

        let mut actual = Vec::new();
        for len in [7, 32, 1, 56] {
            let mut block = vec![0_i16; len];
            split.render(&mut block);
            actual.extend_from_slice(&block);
        }

        assert_eq!(actual.as_slice(), &expected[..]);
        assert_eq!(whole.elapsed(), split.elapsed());
    }

    #[test]
    fn silent_without_waveform() {
        let mut synth = Synth::new(44_100, 28_000, WaveformSlot::new());
        let mut block = [7_i16; 256];
        synth.render(&mut block);
        assert!(block.iter().all(|&s| s == 0));
        assert!(synth.elapsed() > 0.0);
    }

    #[test]
    fn silent_at_zero_frequency() {
        let (mut synth, frequency) = sine_synth(44_100, 28_000, 440.0);
        frequency.silence();
        let mut block = [1_i16; 2048];
        synth.render(&mut block);
        assert!(block.iter().all(|&s| s == 0));
    }

    #[test]
    fn frequency_changes_apply_to_next_sample() {
        let (mut synth, frequency) = sine_synth(44_100, 28_000, 0.0);
        let mut block = [0_i16; 4];
        synth.render(&mut block);
        assert_eq!(block, [0; 4]);

        frequency.set(440.0);
        synth.render(&mut block);
        assert!(block.iter().any(|&s| s != 0));
    }

    #[test]
    fn installed_waveform_replaces_previous_and_clips() {
        let slot = WaveformSlot::new();
        let mut synth = Synth::new(100, 30_000, slot.clone());

        slot.install(Waveform::new(|_| 0.5));
        slot.install(Waveform::new(|_| 2.0));
        let mut block = [0_i16; 3];
        synth.render(&mut block);
        assert_eq!(block, [i16::MAX; 3]);

        slot.install(Waveform::new(|_| -2.0));
        synth.render(&mut block);
        assert_eq!(block, [i16::MIN; 3]);

        slot.install(Waveform::new(|_| 0.25));
        synth.render(&mut block);
        assert_eq!(block, [7_500; 3]);
    }

    #[test]
    fn frequency_is_never_negative() {
        let frequency = SharedFrequency::new(-12.0);
        assert_eq!(frequency.get(), 0.0);
        frequency.set(f64::NAN);
        assert_eq!(frequency.get(), 0.0);
        frequency.set(880.0);
        assert_eq!(frequency.get(), 880.0);
    }
}
