//! Core library for the Keytone keyboard tone generator.
//!
//! The crate is split along the two halves of the program: the audio side
//! ([`audio`] opens the device, [`synth`] renders samples inside its callback)
//! and the input side ([`input`] queries held keys, [`keymap`] assigns them
//! pitches). [`driver`] joins the two in the polling loop.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod input;
pub mod keymap;
pub mod synth;

pub use analysis::{dominant_frequency, probe_sine, PitchReport};
pub use audio::{list_output_devices, EngineState, ToneEngine};
pub use config::{AppConfig, AudioConfig, PollConfig};
pub use error::{Result, ToneError};
pub use input::{DeviceQueryBackend, InputPoller, Key, KeySnapshot, KeyboardBackend};
pub use keymap::{bindings, semitone_frequency, KeyBinding, EXIT_KEY, NOTE_KEYS};
pub use synth::{sine, SharedFrequency, Synth, Waveform, WaveformSlot};
