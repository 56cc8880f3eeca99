//! Tests for voice record unpacking


use dxfm::fm::patch::*;

use voices::{FourOpOperatorData, FourOpVoice, SixOpOperatorData, SixOpVoice};

#[test]
fn sentinel_selects_the_format() {
    let six_op = SixOpVoice::new("BRASS 1").record();
    assert_eq!(six_op.format(), Format::SixOp);
    assert_eq!(six_op.name_str(), "BRASS 1");

    let four_op = FourOpVoice::new("DX11 BASS").record();
    assert_eq!(four_op.format(), Format::FourOp);
    assert_eq!(four_op.name_str(), "DX11 BASS");

    // An all-zero slot is a 4-operator voice.
    let empty = VoiceRecord::unpack(&[0; RECORD_SIZE]);
    assert_eq!(empty.format(), Format::FourOp);
    assert_eq!(empty.name_str(), "");
}

#[test]
fn six_op_operators_are_stored_highest_first() {
    let voice = SixOpVoice::new("ORDER")
        .algorithm(7)
        .feedback(5)
        .reset_phase(true)
        .transpose(-12)
        .operator(
            1,
            SixOpOperatorData {
                output_level: 99,
                coarse: 2,
                fine: 50,
                ..SixOpOperatorData::default()
            },
        )
        .operator(
            6,
            SixOpOperatorData {
                rates: [10, 20, 30, 40],
                levels: [99, 80, 60, 0],
                output_level: 42,
                fixed: true,
                coarse: 3,
                ..SixOpOperatorData::default()
            },
        );

    let VoiceRecord::SixOp(patch) = voice.record() else {
        panic!("expected a 6-operator voice");
    };

    assert_eq!(patch.algorithm, 6);
    assert_eq!(patch.feedback, 5);
    assert_eq!(patch.reset_phase, 1);
    assert_eq!(patch.transpose, 12);

    // OP6 at position 0.
    assert_eq!(patch.op[0].envelope.rate, [10, 20, 30, 40]);
    assert_eq!(patch.op[0].envelope.level, [99, 80, 60, 0]);
    assert_eq!(patch.op[0].level, 42);
    assert!(patch.op[0].is_fixed());
    assert_eq!(patch.op[0].coarse, 3);

    // OP1 at position 5.
    assert_eq!(patch.op[5].level, 99);
    assert!(!patch.op[5].is_fixed());
    assert_eq!(patch.op[5].coarse, 2);
    assert_eq!(patch.op[5].fine, 50);
}

#[test]
fn six_op_fields_are_clamped() {
    let mut data = SixOpVoice::new("CLAMP").data;

    data[0] = 0x7F; // OP6 rate 1
    data[14] = 120; // OP6 output level
    data[16] = 110; // OP6 fine
    data[12] = 0x78; // OP6 detune
    data[110] = 0xFF;
    data[117] = 100;

    let VoiceRecord::SixOp(patch) = VoiceRecord::unpack(&data) else {
        panic!("expected a 6-operator voice");
    };

    assert_eq!(patch.op[0].envelope.rate[0], 99);
    assert_eq!(patch.op[0].level, 99);
    assert_eq!(patch.op[0].fine, 99);
    assert_eq!(patch.op[0].detune, 14);
    assert_eq!(patch.algorithm, 31);
    assert_eq!(patch.transpose, 48);
}

#[test]
fn six_op_global_parameters() {
    let mut data = SixOpVoice::new("LFO").data;

    data[102..106].copy_from_slice(&[50, 60, 70, 80]);
    data[106..110].copy_from_slice(&[50, 50, 50, 50]);
    data[112] = 35;
    data[113] = 10;
    data[114] = 5;
    data[115] = 3;
    data[116] = 0x01 | (4 << 1) | (3 << 4);

    let VoiceRecord::SixOp(patch) = VoiceRecord::unpack(&data) else {
        panic!("expected a 6-operator voice");
    };

    assert_eq!(patch.pitch_envelope.rate, [50, 60, 70, 80]);
    assert_eq!(patch.pitch_envelope.level, [50; 4]);
    assert_eq!(patch.modulations.rate, 35);
    assert_eq!(patch.modulations.delay, 10);
    assert_eq!(patch.modulations.pitch_mod_depth, 5);
    assert_eq!(patch.modulations.amp_mod_depth, 3);
    assert_eq!(patch.modulations.reset_phase, 1);
    assert_eq!(patch.modulations.waveform, 4);
    assert_eq!(patch.modulations.pitch_mod_sensitivity, 3);
}

#[test]
fn four_op_operators_are_stored_highest_first() {
    let voice = FourOpVoice::new("STACK")
        .algorithm(3)
        .feedback(6)
        .operator(
            1,
            FourOpOperatorData {
                output_level: 90,
                frequency: 8,
                ..FourOpOperatorData::default()
            },
        )
        .operator(
            4,
            FourOpOperatorData {
                rates: [31, 20, 10, 5],
                decay_1_level: 9,
                output_level: 70,
                fixed: true,
                fixed_range: 2,
                fine: 7,
                eg_shift: 3,
                ..FourOpOperatorData::default()
            },
        );

    let VoiceRecord::FourOp(patch) = voice.record() else {
        panic!("expected a 4-operator voice");
    };

    assert_eq!(patch.algorithm, 2);
    assert_eq!(patch.feedback, 6);

    // OP4 at position 0.
    assert_eq!(patch.op[0].rate, [31, 20, 10, 5]);
    assert_eq!(patch.op[0].decay_1_level, 9);
    assert_eq!(patch.op[0].level, 70);
    assert!(patch.op[0].is_fixed());
    assert_eq!(patch.op[0].fixed_range, 2);
    assert_eq!(patch.op[0].fine, 7);
    assert_eq!(patch.op[0].eg_shift, 3);

    // OP1 at position 3.
    assert_eq!(patch.op[3].level, 90);
    assert_eq!(patch.op[3].frequency, 8);
    assert!(!patch.op[3].is_fixed());
    assert_eq!(patch.op[3].eg_shift, 0);
}

#[test]
fn four_op_fields_are_clamped() {
    let mut data = FourOpVoice::new("CLAMP").data;

    data[7] = 0x7F; // OP4 output level
    data[9] = 0x07; // OP4 detune
    data[46] = 0x7F;
    data[47] = 0x7F;

    let VoiceRecord::FourOp(patch) = VoiceRecord::unpack(&data) else {
        panic!("expected a 4-operator voice");
    };

    assert_eq!(patch.op[0].level, 99);
    assert_eq!(patch.op[0].detune, 6);
    assert_eq!(patch.transpose, 48);
    assert_eq!(patch.performance.pitch_bend_range, 12);
}

#[test]
fn four_op_performance_parameters() {
    let mut data = FourOpVoice::new("PERF").data;

    data[48] = 0x1F;
    data[49] = 40;
    data[50] = 99;
    data[81] = 5;
    data[82] = 12;
    data[83] = 34;
    data[67..70].copy_from_slice(&[99, 50, 20]);
    data[70..73].copy_from_slice(&[50, 60, 40]);

    let VoiceRecord::FourOp(patch) = VoiceRecord::unpack(&data) else {
        panic!("expected a 4-operator voice");
    };

    assert_eq!(patch.performance.portamento_mode, 1);
    assert_eq!(patch.performance.portamento, 1);
    assert_eq!(patch.performance.sustain, 1);
    assert_eq!(patch.performance.mono, 1);
    assert_eq!(patch.performance.chorus, 1);
    assert_eq!(patch.performance.portamento_time, 40);
    assert_eq!(patch.performance.reverb_rate, 5);
    assert_eq!(patch.controllers.foot_volume, 99);
    assert_eq!(patch.controllers.foot_pitch, 12);
    assert_eq!(patch.controllers.foot_amplitude, 34);
    assert_eq!(patch.pitch_envelope.rate, [99, 50, 20]);
    assert_eq!(patch.pitch_envelope.level, [50, 60, 40]);
}

#[test]
fn names_drop_padding_and_high_bits() {
    let mut data = SixOpVoice::new("PIANO").data;
    data[119] |= 0x80;

    let record = VoiceRecord::unpack(&data);
    assert_eq!(record.name()[1], b'I');
    assert_eq!(record.name_str(), "PIANO");

    assert_eq!(name_str(b"ABC\0\0\0\0\0\0\0"), "ABC");
    assert_eq!(name_str(b"  LEADING "), "  LEADING");
}

#[test]
fn format_operator_counts() {
    assert_eq!(Format::SixOp.num_operators(), 6);
    assert_eq!(Format::FourOp.num_operators(), 4);
}
