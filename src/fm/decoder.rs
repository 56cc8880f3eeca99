//! Voice decoder.
//!
//! Turns an unpacked voice record into a ready to render [`Voice`]: envelope
//! increments and levels, pitch, output level and modulation index of every
//! operator, plus the voice-wide algorithm and feedback settings. Decoding is
//! a pure function of the record and the sample rate.
//!
//! Records store their operators highest first (OP6 or OP4 at position 0).
//! The decoder reverses this, so the operator at storage position `i` lands
//! in slot `N - 1 - i`.

use super::algorithms::{algorithm, Algorithm, MAX_OPERATORS};
use super::dx_units::{
    feedback_depth, four_op_envelope_increment, four_op_envelope_levels, four_op_fixed_frequency,
    four_op_frequency_ratio, four_op_level_deltas, four_op_modulation_index, output_level,
    signed_increment, six_op_envelope_increment, six_op_envelope_level, six_op_fixed_frequency,
    six_op_frequency_ratio, six_op_modulation_index, NUM_STAGES, TRANSPOSE_CENTER,
};
use super::envelope::OperatorEnvelope;
use super::operator::{Frequency, Operator};
use super::patch::{FourOpOperator, FourOpPatch, Format, SixOpOperator, SixOpPatch, VoiceRecord};
use super::voice::{Voice, VoiceConfig};
use crate::numeric::Numeric;
use crate::utils::units::frequency_to_increment;
use crate::SampleRate;

/// Feedback curve offset of 4-operator voices, in octaves.
const FOUR_OP_FEEDBACK_OFFSET: i32 = 7;

/// Decode a record with the algorithm it selects.
pub fn decode<T: Numeric>(record: &VoiceRecord, sample_rate: &SampleRate) -> Voice<T> {
    let selector = match record {
        VoiceRecord::SixOp(patch) => patch.algorithm,
        VoiceRecord::FourOp(patch) => patch.algorithm,
    };

    log::debug!(
        "decoding {:?} voice '{}' with algorithm {}",
        record.format(),
        record.name_str(),
        selector as usize + 1
    );

    decode_with_algorithm(
        record,
        algorithm(record.format(), selector as usize),
        sample_rate,
    )
}

/// Decode a record, rendering it through an arbitrary algorithm.
///
/// Operators missing from either side are silent.
pub fn decode_with_algorithm<T: Numeric>(
    record: &VoiceRecord,
    algorithm: &'static Algorithm,
    sample_rate: &SampleRate,
) -> Voice<T> {
    match record {
        VoiceRecord::SixOp(patch) => decode_six_op(patch, algorithm, sample_rate),
        VoiceRecord::FourOp(patch) => decode_four_op(patch, algorithm, sample_rate),
    }
}

fn decode_six_op<T: Numeric>(
    patch: &SixOpPatch,
    algorithm: &'static Algorithm,
    sample_rate: &SampleRate,
) -> Voice<T> {
    let count = patch.op.len();
    let mut operators: [Operator<T>; MAX_OPERATORS] = core::array::from_fn(|_| Operator::new());

    for (i, op) in patch.op.iter().enumerate() {
        operators[count - 1 - i].init(
            six_op_frequency(op, sample_rate),
            six_op_envelope(op, sample_rate),
            output_level(op.level),
            six_op_modulation_index(op.level),
        );
    }

    let config = VoiceConfig {
        format: Format::SixOp,
        algorithm,
        feedback_depth: feedback_depth(patch.feedback, 0),
        transpose: patch.transpose as i32 - TRANSPOSE_CENTER,
        reset_phase: patch.reset_phase != 0,
        name: patch.name,
    };

    Voice::new(config, operators, *sample_rate)
}

fn six_op_frequency(op: &SixOpOperator, sample_rate: &SampleRate) -> Frequency {
    if op.is_fixed() {
        Frequency::Fixed(frequency_to_increment(
            six_op_fixed_frequency(op.coarse, op.fine),
            sample_rate,
        ))
    } else {
        Frequency::Ratio(six_op_frequency_ratio(op.coarse, op.fine))
    }
}

fn six_op_envelope<T: Numeric>(op: &SixOpOperator, sample_rate: &SampleRate) -> OperatorEnvelope<T> {
    let rate = &op.envelope.rate;
    let level = &op.envelope.level;
    let mut increments = [0.0; NUM_STAGES];

    for (i, increment) in increments.iter_mut().enumerate() {
        let previous = (i + NUM_STAGES - 1) % NUM_STAGES;
        let delta = level[i] as i32 - level[previous] as i32;

        *increment = signed_increment(six_op_envelope_increment(rate[i], sample_rate), delta);
    }

    let mut envelope = OperatorEnvelope::new();
    envelope.set(&increments, &(*level).map(six_op_envelope_level));
    envelope
}

fn decode_four_op<T: Numeric>(
    patch: &FourOpPatch,
    algorithm: &'static Algorithm,
    sample_rate: &SampleRate,
) -> Voice<T> {
    let count = patch.op.len();
    let mut operators: [Operator<T>; MAX_OPERATORS] = core::array::from_fn(|_| Operator::new());

    for (i, op) in patch.op.iter().enumerate() {
        let slot = count - 1 - i;

        // OP1, the last operator rendered, ignores the envelope shift.
        let shift = if slot != 0 { op.eg_shift } else { 0 };

        operators[slot].init(
            four_op_frequency(op, sample_rate),
            four_op_envelope(op, shift, sample_rate),
            output_level(op.level),
            four_op_modulation_index(op.level),
        );
    }

    let config = VoiceConfig {
        format: Format::FourOp,
        algorithm,
        feedback_depth: feedback_depth(patch.feedback, FOUR_OP_FEEDBACK_OFFSET),
        transpose: patch.transpose as i32 - TRANSPOSE_CENTER,
        reset_phase: false,
        name: patch.name,
    };

    Voice::new(config, operators, *sample_rate)
}

fn four_op_frequency(op: &FourOpOperator, sample_rate: &SampleRate) -> Frequency {
    if op.is_fixed() {
        Frequency::Fixed(frequency_to_increment(
            four_op_fixed_frequency(op.frequency, op.fine, op.fixed_range),
            sample_rate,
        ))
    } else {
        Frequency::Ratio(four_op_frequency_ratio(op.frequency))
    }
}

fn four_op_envelope<T: Numeric>(
    op: &FourOpOperator,
    shift: u8,
    sample_rate: &SampleRate,
) -> OperatorEnvelope<T> {
    let mut deltas = four_op_level_deltas(op.decay_1_level);
    let mut increments = [0.0; NUM_STAGES];

    for i in 0..NUM_STAGES {
        // Without a decay 1 segment, decay 2 holds as well.
        if i == 2 && increments[1] == 0.0 {
            deltas[i] = 0;
        }

        increments[i] = signed_increment(
            four_op_envelope_increment(op.rate[i], i, sample_rate),
            deltas[i],
        );
    }

    let mut envelope = OperatorEnvelope::new();
    envelope.set(
        &increments,
        &four_op_envelope_levels(op.decay_1_level, shift),
    );
    envelope
}
