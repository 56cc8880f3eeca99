//! Four-stage operator envelope.
//!
//! Each stage moves the value linearly towards its target level with a
//! precomputed per-sample increment, then clamps to the target. Stages 0 and 1
//! advance automatically when their target is reached. Stage 2 is the sustain
//! stage and stage 3 the release stage, neither advances on its own: the
//! release stage is only entered through [`OperatorEnvelope::note_off`].
//!
//! A stage with a zero increment holds its value until a note event forces a
//! transition.

use crate::fm::dx_units::NUM_STAGES;
use crate::numeric::Numeric;

/// Last stage entered automatically.
const SUSTAIN_STAGE: usize = NUM_STAGES - 2;

/// Stage entered on note off.
pub const RELEASE_STAGE: usize = NUM_STAGES - 1;

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorEnvelope<T: Numeric = f32> {
    stage: usize,
    value: T,

    increment: [T; NUM_STAGES],
    level: [T; NUM_STAGES],
}

impl<T: Numeric> OperatorEnvelope<T> {
    pub fn new() -> Self {
        Self {
            stage: RELEASE_STAGE,
            value: T::ZERO,

            increment: [T::ZERO; NUM_STAGES],
            level: [T::ZERO; NUM_STAGES],
        }
    }

    /// Load the per-sample increments and target levels, in full scale units.
    ///
    /// The envelope restarts from the release level, as on a note on.
    pub fn set(&mut self, increment: &[f32; NUM_STAGES], level: &[f32; NUM_STAGES]) {
        self.increment = (*increment).map(T::from_f32);
        self.level = (*level).map(T::from_f32);
        self.stage = 0;
        self.value = self.level[RELEASE_STAGE];
    }

    /// Restart from the release level.
    #[inline]
    pub fn note_on(&mut self) {
        self.stage = 0;
        self.value = self.level[RELEASE_STAGE];
    }

    #[inline]
    pub fn note_off(&mut self) {
        self.stage = RELEASE_STAGE;
    }

    /// Advance by one sample and return the new value.
    #[inline]
    pub fn render(&mut self) -> T {
        let increment = self.increment[self.stage];
        let target = self.level[self.stage];

        self.value = self.value.sat_add(increment);

        let reached = (increment > T::ZERO && self.value >= target)
            || (increment < T::ZERO && self.value <= target);

        if reached {
            self.value = target;
            if self.stage < SUSTAIN_STAGE {
                self.stage += 1;
            }
        }

        self.value
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub fn stage(&self) -> usize {
        self.stage
    }

    #[inline]
    pub fn increment(&self, stage: usize) -> T {
        self.increment[stage]
    }

    #[inline]
    pub fn level(&self, stage: usize) -> T {
        self.level[stage]
    }

    #[inline]
    pub fn target(&self) -> T {
        self.level[self.stage]
    }
}

impl<T: Numeric> Default for OperatorEnvelope<T> {
    fn default() -> Self {
        Self::new()
    }
}
