//! Tests for the floating point and fixed-point renderers


use dxfm::fm::decoder::decode;
use dxfm::fm::voice::Voice;
use dxfm::numeric::{Numeric, Q31};
use dxfm::SampleRate;

use voices::{SixOpOperatorData, SixOpVoice};

#[test]
fn q31_saturates() {
    assert_eq!(Q31::ONE.sat_add(Q31::ONE), Q31::ONE);
    assert_eq!(Q31::MINUS_ONE.sat_add(Q31::MINUS_ONE), Q31::MINUS_ONE);
    assert_eq!(Q31::MINUS_ONE.sat_mul(Q31::MINUS_ONE), Q31::ONE);
    assert_eq!(Q31::from_f32(2.0), Q31::ONE);
    assert_eq!(Q31::from_f32(-1.0), Q31::MINUS_ONE);
}

#[test]
fn q31_conversions() {
    assert_eq!(Q31::from_f32(0.5).to_f32(), 0.5);
    assert_eq!(Q31(100).half(), Q31(50));
    assert_eq!(Q31::from_f32(0.5).sat_mul(Q31::from_f32(0.5)), Q31::from_f32(0.25));
    assert!((Q31::index_to_f32(Q31::index_from_f32(13.1)) - 13.1).abs() < 1e-6);
}

#[test]
fn phases_wrap_to_one_cycle() {
    assert_eq!(<f32 as Numeric>::phase_from_f32(1.25), 0.25);
    assert_eq!(<f32 as Numeric>::phase_from_f32(-0.25), 0.75);
    assert_eq!(<f32 as Numeric>::phase_from_f32(1.0), 0.0);
    assert_eq!(<f32 as Numeric>::advance(0.75, 0.5), 0.25);

    assert_eq!(Q31::phase_from_f32(0.25), 1 << 30);
    assert_eq!(Q31::phase_from_f32(-0.25), 3 << 30);
    assert_eq!(Q31::phase_from_f32(1.0), 0);
    assert_eq!(Q31::advance(u32::MAX - 1, 3), 1);
    assert_eq!(Q31::phase_to_f32(1 << 31), 0.5);
}

#[test]
fn sine_table_points() {
    assert_eq!(<f32 as Numeric>::sine(0.0), 0.0);
    assert_eq!(<f32 as Numeric>::sine(0.25), 1.0);
    assert!(<f32 as Numeric>::sine(0.5).abs() < 1e-6);
    assert!((<f32 as Numeric>::sine(0.75) + 1.0).abs() < 1e-6);

    // Phases outside one cycle are reduced first.
    assert_eq!(<f32 as Numeric>::sine(1.25), 1.0);
    assert_eq!(<f32 as Numeric>::sine(-0.75), 1.0);

    assert_eq!(Q31::sine(0), Q31(0));
    assert_eq!(Q31::sine(1 << 30), Q31::ONE);
    assert!(Q31::sine(3 << 30).to_f32() < -0.99999);
}

#[test]
fn sine_interpolation_agrees() {
    for i in 0..4096u32 {
        let phase = i as f32 / 4096.0 + 0.0001;
        let float = <f32 as Numeric>::sine(phase);
        let fixed = Q31::sine(Q31::phase_from_f32(phase)).to_f32();

        assert!((float - (phase * std::f32::consts::TAU).sin()).abs() < 1e-4);
        assert!((float - fixed).abs() < 1e-5);
    }
}

#[test]
fn modulation_offsets_the_phase() {
    assert!((<f32 as Numeric>::modulate(0.1, 0.5, 0.5) - 0.35).abs() < 1e-7);

    let index = Q31::index_from_f32(0.5);
    assert_eq!(Q31::modulate(0, Q31::from_f32(0.5), index), 1 << 30);
    assert_eq!(Q31::modulate(0, Q31::from_f32(-0.5), index), 3 << 30);
    assert_eq!(Q31::modulate(1 << 31, Q31::from_f32(0.5), index), 3 << 30);
}

fn render<T: Numeric>(record: &SixOpVoice, length: usize) -> Vec<f32> {
    let mut voice: Voice<T> = decode(&record.record(), &SampleRate::new(48000.0));
    let mut out = vec![T::ZERO; length];

    voice.note_on();
    voice.render(60.0, &mut out);

    out.iter().map(|sample| sample.to_f32()).collect()
}

#[test]
fn fixed_point_renders_a_sine() {
    let record = SixOpVoice::new("SINE")
        .algorithm(32)
        .operator(1, SixOpOperatorData::steady(99));

    let float = render::<f32>(&record, 4800);
    let fixed = render::<Q31>(&record, 4800);

    for (a, b) in float.iter().zip(fixed.iter()) {
        assert!((a - b).abs() < 2e-3);
    }
}

#[test]
fn fixed_point_renders_fm() {
    let record = SixOpVoice::new("FM")
        .algorithm(1)
        .operator(1, SixOpOperatorData::steady(99))
        .operator(2, SixOpOperatorData::steady(70));

    let float = render::<f32>(&record, 480);
    let fixed = render::<Q31>(&record, 480);

    for (a, b) in float.iter().zip(fixed.iter()) {
        assert!((a - b).abs() < 1e-2);
    }
}

#[test]
fn fixed_point_stays_in_range() {
    let samples = render::<Q31>(&voices::electric_piano(), 4800);

    assert!(samples.iter().all(|sample| (-1.0..=1.0).contains(sample)));
    assert!(samples.iter().any(|sample| *sample != 0.0));
}
