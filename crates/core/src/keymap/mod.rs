use serde::{Deserialize, Serialize};

use crate::Key;

/// Pitch standard for semitone offset zero.
pub const REFERENCE_PITCH_HZ: f64 = 440.0;

pub const SEMITONES_PER_OCTAVE: u32 = 12;

/// Key that ends the session.
pub const EXIT_KEY: Key = Key::Escape;

/// Note keys in ascending pitch order; the index is the semitone offset.
pub const NOTE_KEYS: [Key; 16] = [
    Key::Z,
    Key::S,
    Key::X,
    Key::C,
    Key::F,
    Key::V,
    Key::G,
    Key::B,
    Key::N,
    Key::J,
    Key::M,
    Key::K,
    Key::Comma,
    Key::L,
    Key::Period,
    Key::Slash,
];

/// Frequency `offset` equal-tempered semitones above the reference pitch.
///
/// Computed as `2^(offset / 12)` so whole octaves land on exact powers of two.
pub fn semitone_frequency(offset: u32) -> f64 {
    REFERENCE_PITCH_HZ * 2f64.powf(f64::from(offset) / f64::from(SEMITONES_PER_OCTAVE))
}

/// One entry of the note table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub semitone: u32,
    pub frequency_hz: f64,
}

/// The full note table in scan order.
pub fn bindings() -> Vec<KeyBinding> {
    NOTE_KEYS
        .iter()
        .zip(0..)
        .map(|(&key, semitone)| KeyBinding {
            key,
            semitone,
            frequency_hz: semitone_frequency(semitone),
        })
        .collect()
}
