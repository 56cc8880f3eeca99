//! Pitch conversions.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{SampleRate, A4_FREQUENCY, A4_NOTE};

/// Highest note reachable after transposition.
pub const MAX_NOTE: f32 = 151.0;

#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    2.0f32.powf(semitones / 12.0)
}

/// Per-sample phase increment (cycles per sample) of a note.
///
/// `note` is a MIDI note number, fractional parts are detune.
#[inline]
pub fn note_to_increment(note: f32, sample_rate: &SampleRate) -> f32 {
    let note = note.clamp(0.0, MAX_NOTE);

    A4_FREQUENCY * semitones_to_ratio(note - A4_NOTE) * sample_rate.inv_sr
}

/// Per-sample phase increment of an absolute frequency in Hz.
#[inline]
pub fn frequency_to_increment(frequency: f32, sample_rate: &SampleRate) -> f32 {
    frequency * sample_rate.inv_sr
}
