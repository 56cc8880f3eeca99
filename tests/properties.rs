//! Property-based tests for decoding and rendering.
//!
//! Random voice records and envelope settings must never produce values
//! outside their nominal ranges.

use proptest::prelude::*;

use dxfm::fm::decoder::decode;
use dxfm::fm::envelope::OperatorEnvelope;
use dxfm::fm::patch::{Format, VoiceRecord, RECORD_SIZE};
use dxfm::fm::voice::Voice;
use dxfm::numeric::{Numeric, Q31};
use dxfm::SampleRate;

fn record_bytes() -> impl Strategy<Value = [u8; RECORD_SIZE]> {
    prop::collection::vec(any::<u8>(), RECORD_SIZE).prop_map(|bytes| {
        let mut data = [0; RECORD_SIZE];
        data.copy_from_slice(&bytes);
        data
    })
}

#[derive(Debug, Clone, Copy)]
enum Event {
    NoteOn,
    NoteOff,
    Render(usize),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::NoteOn),
        Just(Event::NoteOff),
        (1usize..200).prop_map(Event::Render),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Phases stay within one cycle, whatever the input.
    #[test]
    fn phases_stay_in_one_cycle(
        cycles in -1000.0f32..1000.0f32,
        increment in 0.0f32..0.5f32,
    ) {
        let phase = <f32 as Numeric>::phase_from_f32(cycles);
        prop_assert!((0.0..1.0).contains(&phase), "phase {} from {}", phase, cycles);

        let advanced = <f32 as Numeric>::advance(phase, increment);
        prop_assert!((0.0..1.0).contains(&advanced));

        let fixed = Q31::phase_to_f32(Q31::phase_from_f32(cycles));
        prop_assert!((0.0..1.0).contains(&fixed));
    }

    /// Envelope values never leave the range spanned by the stage levels.
    #[test]
    fn envelope_stays_within_levels(
        increments in prop::array::uniform4(-1.0f32..=1.0f32),
        levels in prop::array::uniform4(0.0f32..=1.0f32),
        events in prop::collection::vec(event(), 1..20),
    ) {
        let mut envelope: OperatorEnvelope = OperatorEnvelope::new();
        envelope.set(&increments, &levels);

        let low = levels.iter().copied().fold(f32::INFINITY, f32::min);
        let high = levels.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        for event in events {
            match event {
                Event::NoteOn => envelope.note_on(),
                Event::NoteOff => envelope.note_off(),
                Event::Render(count) => {
                    for _ in 0..count {
                        let value = envelope.render();
                        prop_assert!(
                            value >= low && value <= high,
                            "value {} outside {}..={}", value, low, high
                        );
                    }
                }
            }
        }
    }

    /// Decoding any record twice gives the same voice, in the format its
    /// sentinel byte selects.
    #[test]
    fn decoding_is_deterministic(data in record_bytes()) {
        let sample_rate = SampleRate::new(48000.0);
        let record = VoiceRecord::unpack(&data);

        let expected = if data[118] != 0 { Format::SixOp } else { Format::FourOp };
        prop_assert_eq!(record.format(), expected);

        let a: Voice = decode(&record, &sample_rate);
        let b: Voice = decode(&record, &sample_rate);
        prop_assert_eq!(a, b);
    }

    /// Any record renders finite samples bounded by the carrier count.
    #[test]
    fn rendering_is_bounded(
        data in record_bytes(),
        note in 0u8..128,
        release_after in 0usize..512,
    ) {
        let sample_rate = SampleRate::new(48000.0);
        let record = VoiceRecord::unpack(&data);
        let mut voice: Voice = decode(&record, &sample_rate);
        let mut out = [0.0; 512];

        voice.note_on();
        voice.render(note as f32, &mut out[..release_after]);
        voice.note_off();
        voice.render(note as f32, &mut out[release_after..]);

        let limit = voice.config().operator_count() as f32;
        for sample in out.iter() {
            prop_assert!(sample.is_finite());
            prop_assert!(sample.abs() <= limit + 1e-3, "sample {} above {}", sample, limit);
        }
    }

    /// The fixed-point renderer accepts any record.
    #[test]
    fn fixed_point_rendering_is_total(data in record_bytes(), note in 0u8..128) {
        let sample_rate = SampleRate::new(48000.0);
        let record = VoiceRecord::unpack(&data);
        let mut voice: Voice<Q31> = decode(&record, &sample_rate);
        let mut out = [Q31::default(); 256];

        voice.note_on();
        voice.render(note as f32, &mut out);

        prop_assert!(out.iter().all(|sample| (-1.0..=1.0).contains(&sample.to_f32())));
    }
}
