//! FM Operator.

use super::envelope::OperatorEnvelope;
use crate::numeric::Numeric;

/// Pitch of an operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frequency {
    /// Multiple of the note frequency.
    Ratio(f32),

    /// Absolute phase increment in cycles per sample, independent of the note.
    Fixed(f32),
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Ratio(1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operator<T: Numeric = f32> {
    phase: T::Phase,
    increment: T::Phase,
    frequency: Frequency,

    envelope: OperatorEnvelope<T>,
    output_level: T,
    modulation_index: T::Index,

    output: T,
}

impl<T: Numeric> Operator<T> {
    pub fn new() -> Self {
        Self {
            phase: T::Phase::default(),
            increment: T::Phase::default(),
            frequency: Frequency::default(),

            envelope: OperatorEnvelope::new(),
            output_level: T::ZERO,
            modulation_index: T::Index::default(),

            output: T::ZERO,
        }
    }

    /// Configure the static parameters of the operator and reset its phase.
    pub fn init(
        &mut self,
        frequency: Frequency,
        envelope: OperatorEnvelope<T>,
        output_level: f32,
        modulation_index: f32,
    ) {
        self.frequency = frequency;
        self.envelope = envelope;
        self.output_level = T::from_f32(output_level);
        self.modulation_index = T::index_from_f32(modulation_index);

        self.phase = T::Phase::default();
        self.output = T::ZERO;

        if let Frequency::Fixed(increment) = frequency {
            self.increment = T::phase_from_f32(increment);
        }
    }

    /// Update the phase increment from the increment of the note.
    #[inline]
    pub fn set_base_increment(&mut self, base_increment: f32) {
        self.increment = match self.frequency {
            Frequency::Ratio(ratio) => T::phase_from_f32(ratio * base_increment),
            Frequency::Fixed(increment) => T::phase_from_f32(increment),
        };
    }

    #[inline]
    pub fn note_on(&mut self, reset_phase: bool) {
        if reset_phase {
            self.phase = T::Phase::default();
        }
        self.output = T::ZERO;
        self.envelope.note_on();
    }

    #[inline]
    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    /// Render one sample from a modulated phase, then advance the phase and
    /// the envelope.
    #[inline]
    pub fn render(&mut self, modulated_phase: T::Phase) -> T {
        self.output = T::sine(modulated_phase).sat_mul(self.envelope.value());
        self.phase = T::advance(self.phase, self.increment);
        self.envelope.render();

        self.output
    }

    #[inline]
    pub fn phase(&self) -> T::Phase {
        self.phase
    }

    #[inline]
    pub fn increment(&self) -> T::Phase {
        self.increment
    }

    #[inline]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[inline]
    pub fn envelope(&self) -> &OperatorEnvelope<T> {
        &self.envelope
    }

    #[inline]
    pub fn output_level(&self) -> T {
        self.output_level
    }

    #[inline]
    pub fn modulation_index(&self) -> T::Index {
        self.modulation_index
    }

    /// Output of the last rendered sample.
    #[inline]
    pub fn output(&self) -> T {
        self.output
    }
}

impl<T: Numeric> Default for Operator<T> {
    fn default() -> Self {
        Self::new()
    }
}
