//! Various "magic" conversion functions for DX7 and DX11 voice data.

// Based on MIT-licensed code (c) 2021 by Emilie Gillet (emilie.o.gillet@gmail.com)
// Conversion tables based on code (c) 2020 by Oleg Burdaev (dukesrg@gmail.com)

#![allow(clippy::excessive_precision)]

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::SampleRate;

/// Number of envelope stages of an operator.
pub const NUM_STAGES: usize = 4;

/// Transpose field value of an untransposed voice.
pub const TRANSPOSE_CENTER: i32 = 24;

const MAX_LEVEL_SIX_OP: f32 = 99.0;
const MAX_LEVEL_FOUR_OP: i32 = 15;

const RATE_FACTOR_SIX_OP: f32 = 0.01;
const RATE_FACTOR_FOUR_OP: f32 = 0.03;
const MAX_RATE_SIX_OP: i32 = 99;
const MAX_RATE_FOUR_OP: i32 = 31;

const FEEDBACK_SCALE: f32 = 1.0 / 128.0;

// (9.772 - 1) / 99
const FIXED_FREQUENCY_FINE_FACTOR: f32 = 0.08860606;

// Convert an output level from 0-99 to a gain.
#[inline]
pub fn output_level(level: u8) -> f32 {
    level as f32 / MAX_LEVEL_SIX_OP
}

// Attenuation of an output level, in 1/8 octave steps. The low end follows
// the hardware's non-linear curve.
//   0 = 127
//  19 =  81
//  20 =  79
//  99 =   0
#[inline]
pub fn level_attenuation(level: u8) -> f32 {
    match LUT_LEVEL_ATTENUATION.get(level as usize) {
        Some(attenuation) => *attenuation as f32,
        None => 99.0 - level as f32,
    }
}

// Convert an output level to the phase deviation (in cycles) produced by a
// full-scale modulator.
#[inline]
pub fn six_op_modulation_index(level: u8) -> f32 {
    core::f32::consts::PI * 2.0f32.powf(0.0625 * (33.0 - 2.0 * level_attenuation(level)))
}

#[inline]
pub fn four_op_modulation_index(level: u8) -> f32 {
    8.0 * core::f32::consts::PI * 2.0f32.powf(-0.125 * level_attenuation(level))
}

/// Feedback depth of a feedback level (0-7).
///
/// `exponent_offset` lowers the curve by whole octaves. Level 0 is the bottom
/// of the curve, not silence.
#[inline]
pub fn feedback_depth(feedback: u8, exponent_offset: i32) -> f32 {
    2.0f32.powi(feedback as i32 - exponent_offset) * FEEDBACK_SCALE
}

#[inline]
pub fn six_op_envelope_level(level: u8) -> f32 {
    level as f32 / MAX_LEVEL_SIX_OP
}

// Synthesize the four stage levels of a DX11 operator from its decay 1 level
// (0-15). The envelope shift raises the floor of every stage by halving the
// distance to full scale.
#[inline]
pub fn four_op_envelope_levels(decay_1_level: u8, shift: u8) -> [f32; NUM_STAGES] {
    let base = [
        1.0,
        decay_1_level as f32 / MAX_LEVEL_FOUR_OP as f32,
        0.0,
        0.0,
    ];
    let divider = (1u32 << shift) as f32;

    base.map(|level| 1.0 - (1.0 - level) / divider)
}

// Level deltas of the DX11 envelope. Only their sign matters.
#[inline]
pub fn four_op_level_deltas(decay_1_level: u8) -> [i32; NUM_STAGES] {
    let d1l = decay_1_level as i32;

    [MAX_LEVEL_FOUR_OP, d1l - MAX_LEVEL_FOUR_OP, -d1l, -MAX_LEVEL_FOUR_OP]
}

// Per-sample envelope increment of a DX7 rate (0-99), in full scale units.
#[inline]
pub fn six_op_envelope_increment(rate: u8, sample_rate: &SampleRate) -> f32 {
    envelope_increment(
        RATE_FACTOR_SIX_OP,
        MAX_RATE_SIX_OP + 1 - rate as i32,
        sample_rate,
    )
}

// Per-sample envelope increment of a DX11 rate (0-31). The curve is shifted by
// one step, except for a zero release rate.
#[inline]
pub fn four_op_envelope_increment(rate: u8, stage: usize, sample_rate: &SampleRate) -> f32 {
    let offset = if rate == 0 && stage == NUM_STAGES - 1 {
        0
    } else {
        1
    };

    envelope_increment(
        RATE_FACTOR_FOUR_OP,
        MAX_RATE_FOUR_OP + 1 - (rate as i32 + offset),
        sample_rate,
    )
}

#[inline]
fn envelope_increment(factor: f32, steps: i32, sample_rate: &SampleRate) -> f32 {
    if steps <= 0 {
        return 1.0;
    }

    f32::min(sample_rate.inv_sr / (factor * steps as f32), 1.0)
}

/// Give an increment the direction of a level delta. Flat stages don't move.
#[inline]
pub fn signed_increment(increment: f32, delta: i32) -> f32 {
    match delta.signum() {
        1 => increment,
        -1 => -increment,
        _ => 0.0,
    }
}

// Frequency ratio of a DX7 operator. Coarse 0 is half the note frequency,
// fine adds 1% steps.
#[inline]
pub fn six_op_frequency_ratio(coarse: u8, fine: u8) -> f32 {
    let coarse = if coarse == 0 { 0.5 } else { coarse as f32 };

    coarse * (1.0 + fine as f32 * 0.01)
}

// Frequency in Hz of a fixed DX7 operator.
#[inline]
pub fn six_op_fixed_frequency(coarse: u8, fine: u8) -> f32 {
    LUT_FIXED_FREQUENCY_RANGE[usize::min(coarse as usize, 3)]
        * (1.0 + fine as f32 * FIXED_FREQUENCY_FINE_FACTOR)
}

#[inline]
pub fn four_op_frequency_ratio(frequency: u8) -> f32 {
    LUT_FOUR_OP_RATIO[usize::min(frequency as usize, LUT_FOUR_OP_RATIO.len() - 1)]
}

// Frequency in Hz of a fixed DX11 operator. The upper bits of the frequency
// field select 16 Hz steps, fine adds 1 Hz steps, range shifts by octaves.
#[inline]
pub fn four_op_fixed_frequency(frequency: u8, fine: u8, range: u8) -> f32 {
    let steps = (((frequency & 0x3C) as u32) << 2)
        + fine as u32
        + if frequency < 4 { 8 } else { 0 };

    (steps << range) as f32
}

const LUT_LEVEL_ATTENUATION: [u8; 20] = [
    127, 122, 118, 114, 110, 107, 104, 102, 100, 98, 96, 94, 92, 90, 88, 86, 85, 84, 82, 81,
];

const LUT_FIXED_FREQUENCY_RANGE: [f32; 4] = [1.0, 10.0, 100.0, 1000.0];

const LUT_FOUR_OP_RATIO: [f32; 64] = [
    0.50, 0.71, 0.78, 0.87, 1.00, 1.41, 1.57, 1.73, //
    2.00, 2.82, 3.00, 3.14, 3.46, 4.00, 4.24, 4.71, //
    5.00, 5.19, 5.65, 6.00, 6.28, 6.92, 7.00, 7.07, //
    7.85, 8.00, 8.48, 8.65, 9.00, 9.42, 9.89, 10.00, //
    10.38, 10.99, 11.00, 11.30, 12.00, 12.11, 12.56, 12.72, //
    13.00, 13.84, 14.00, 14.10, 14.13, 15.00, 15.55, 15.57, //
    15.70, 16.96, 17.27, 17.30, 18.37, 18.84, 19.03, 19.78, //
    20.41, 20.76, 21.20, 21.98, 22.49, 23.55, 24.22, 25.95, //
];

