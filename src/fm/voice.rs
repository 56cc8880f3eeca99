//! FM voice.
//!
//! Holds the decoded state of one voice and renders it sample by sample.
//! Operators are evaluated from the highest slot down to slot 0, so a
//! modulator's output is always fresh when the operators below it read it.

use super::algorithms::{Algorithm, MAX_OPERATORS};
use super::feedback::FeedbackPath;
use super::operator::Operator;
use super::patch::{name_str, Format, NAME_LENGTH};
use crate::numeric::Numeric;
use crate::utils::units::note_to_increment;
use crate::SampleRate;

/// Voice-wide settings produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    pub format: Format,
    pub algorithm: &'static Algorithm,
    pub feedback_depth: f32,

    /// Offset in semitones added to the played note.
    pub transpose: i32,

    /// Reset operator phases on note on.
    pub reset_phase: bool,

    pub name: [u8; NAME_LENGTH],
}

impl VoiceConfig {
    #[inline]
    pub fn operator_count(&self) -> usize {
        self.format.num_operators()
    }

    /// Slot whose output feeds the feedback loop.
    #[inline]
    pub fn feedback_source(&self) -> Option<usize> {
        self.algorithm
            .feedback()
            .map(|feedback_loop| feedback_loop.source)
    }

    pub fn name_str(&self) -> &str {
        name_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Voice<T: Numeric = f32> {
    config: VoiceConfig,
    sample_rate: SampleRate,

    operators: [Operator<T>; MAX_OPERATORS],
    feedback: Option<FeedbackPath<T>>,
}

impl<T: Numeric> Voice<T> {
    /// Assemble a voice from decoded operators, indexed by slot.
    pub fn new(
        config: VoiceConfig,
        operators: [Operator<T>; MAX_OPERATORS],
        sample_rate: SampleRate,
    ) -> Self {
        let feedback = config
            .algorithm
            .feedback()
            .map(|feedback_loop| FeedbackPath::new(feedback_loop, config.feedback_depth));

        Self {
            config,
            sample_rate,
            operators,
            feedback,
        }
    }

    pub fn note_on(&mut self) {
        let count = self.config.operator_count();
        let reset_phase = self.config.reset_phase;

        for operator in self.operators[..count].iter_mut() {
            operator.note_on(reset_phase);
        }
    }

    pub fn note_off(&mut self) {
        let count = self.config.operator_count();

        for operator in self.operators[..count].iter_mut() {
            operator.note_off();
        }
    }

    /// Override the decoded feedback depth.
    pub fn set_feedback_depth(&mut self, depth: f32) {
        self.config.feedback_depth = depth;

        if let Some(feedback) = &mut self.feedback {
            feedback.set_depth(depth);
        }
    }

    /// Recompute the phase increments for a note (MIDI note number, fractional
    /// part is detune). The voice transposition is applied here.
    pub fn set_note(&mut self, note: f32) {
        let count = self.config.operator_count();
        let base_increment =
            note_to_increment(note + self.config.transpose as f32, &self.sample_rate);

        for operator in self.operators[..count].iter_mut() {
            operator.set_base_increment(base_increment);
        }
    }

    /// Render a block at a fixed note.
    pub fn render(&mut self, note: f32, out: &mut [T]) {
        self.set_note(note);

        for sample in out.iter_mut() {
            *sample = self.render_sample();
        }
    }

    /// Render one output sample.
    #[inline]
    pub fn render_sample(&mut self) -> T {
        let algorithm = self.config.algorithm;
        let mut mix = T::ZERO;

        for slot in (0..self.config.operator_count()).rev() {
            let route = algorithm.route(slot);
            let mut phase = self.operators[slot].phase();

            match &self.feedback {
                Some(feedback) if feedback.receiver() == slot => {
                    phase = feedback.modulate(phase);
                }
                _ => {
                    for source in route.modulators() {
                        let modulator = &self.operators[*source];
                        phase = T::modulate(phase, modulator.output(), modulator.modulation_index());
                    }
                }
            }

            let operator = &mut self.operators[slot];
            let output = operator.render(phase);

            if route.is_carrier() {
                mix = mix.sat_add(output.sat_mul(operator.output_level()));
            }

            if let Some(feedback) = &mut self.feedback {
                if feedback.source() == slot {
                    feedback.push(output);
                }
            }
        }

        mix
    }

    #[inline]
    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    #[inline]
    pub fn sample_rate(&self) -> &SampleRate {
        &self.sample_rate
    }

    /// Active operators, indexed by slot.
    #[inline]
    pub fn operators(&self) -> &[Operator<T>] {
        &self.operators[..self.config.operator_count()]
    }

    #[inline]
    pub fn feedback(&self) -> Option<&FeedbackPath<T>> {
        self.feedback.as_ref()
    }
}
