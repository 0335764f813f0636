//! Polling loop that turns held keys into the shared frequency.

use std::time::Duration;

use crate::{
    input::{InputPoller, KeySnapshot, KeyboardBackend},
    keymap::{semitone_frequency, EXIT_KEY, NOTE_KEYS},
    Key, SharedFrequency,
};

/// Frequency for the current key state, or 0 when no note key is held.
///
/// Every note key is checked in table order and each held key overwrites the
/// previous result, so the highest held key sets the pitch.
pub fn select_frequency(mut is_held: impl FnMut(Key) -> bool) -> f64 {
    let mut frequency = 0.0;
    for (&key, offset) in NOTE_KEYS.iter().zip(0..) {
        if is_held(key) {
            frequency = semitone_frequency(offset);
        }
    }
    frequency
}

/// Scans one snapshot of the note keys and publishes the result.
pub fn publish(snapshot: &KeySnapshot, frequency: &SharedFrequency) -> f64 {
    let hz = select_frequency(|key| snapshot.contains(key));
    frequency.set(hz);
    hz
}

/// Polls until the exit key is held and returns the number of scans.
///
/// Each iteration takes a single keyboard snapshot and answers both the exit
/// check and the note scan from it.
pub fn run_until_exit<B: KeyboardBackend>(
    input: &InputPoller<B>,
    frequency: &SharedFrequency,
    interval: Option<Duration>,
) -> u64 {
    let mut iterations = 0_u64;
    let mut last = frequency.get();

    loop {
        let snapshot = input.snapshot();
        if snapshot.contains(EXIT_KEY) {
            break;
        }

        let hz = publish(&snapshot, frequency);
        if hz != last {
            tracing::debug!(frequency_hz = hz, "pitch changed");
            last = hz;
        }
        iterations += 1;

        if let Some(interval) = interval {
            std::thread::sleep(interval);
        }
    }

    tracing::info!(iterations, "exit key pressed");
    iterations
}
