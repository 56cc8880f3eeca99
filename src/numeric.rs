//! Numeric representation of the renderer.
//!
//! Envelope, operator and mixing code is written once against [`Numeric`].
//! `f32` gives the floating point engine, [`Q31`] the fixed-point one. Levels and
//! samples saturate in fixed point; only phases wrap.
//!
//! Three kinds of values are involved:
//! - samples, levels and envelope values: `Self`, nominal range -1.0..1.0.
//! - phases and phase increments: [`Numeric::Phase`], one cycle per wrap.
//! - modulation indices and feedback depth: [`Numeric::Index`], which may exceed
//!   unity since a modulator can deviate the phase by several cycles.

use core::fmt::Debug;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::resources::{lut_sine, lut_sine_q31, LUT_SINE_BITS, LUT_SINE_SIZE};
use crate::utils::interpolate_wrap;

pub trait Numeric:
    Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static
{
    type Phase: Copy + Default + PartialEq + Debug + Send + Sync + 'static;
    type Index: Copy + Default + PartialEq + Debug + Send + Sync + 'static;

    const ZERO: Self;

    fn from_f32(value: f32) -> Self;
    fn to_f32(self) -> f32;

    fn sat_add(self, rhs: Self) -> Self;
    fn sat_mul(self, rhs: Self) -> Self;
    fn half(self) -> Self;

    fn index_from_f32(value: f32) -> Self::Index;
    fn index_to_f32(index: Self::Index) -> f32;

    /// Phase of a value in cycles, reduced to one cycle.
    fn phase_from_f32(cycles: f32) -> Self::Phase;

    /// Phase in cycles, always in 0.0..1.0.
    fn phase_to_f32(phase: Self::Phase) -> f32;

    /// Advance a phase accumulator, wrapping at one cycle.
    fn advance(phase: Self::Phase, increment: Self::Phase) -> Self::Phase;

    /// Offset a phase by `amount * index` cycles.
    fn modulate(phase: Self::Phase, amount: Self, index: Self::Index) -> Self::Phase;

    fn sine(phase: Self::Phase) -> Self;
}

#[inline]
fn wrap(cycles: f32) -> f32 {
    let wrapped = cycles - cycles.floor();

    // Tiny negative values round up to a full cycle.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

impl Numeric for f32 {
    type Phase = f32;
    type Index = f32;

    const ZERO: Self = 0.0;

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn sat_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn sat_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline]
    fn half(self) -> Self {
        self * 0.5
    }

    #[inline]
    fn index_from_f32(value: f32) -> Self::Index {
        value
    }

    #[inline]
    fn index_to_f32(index: Self::Index) -> f32 {
        index
    }

    #[inline]
    fn phase_from_f32(cycles: f32) -> Self::Phase {
        wrap(cycles)
    }

    #[inline]
    fn phase_to_f32(phase: Self::Phase) -> f32 {
        phase
    }

    #[inline]
    fn advance(phase: Self::Phase, increment: Self::Phase) -> Self::Phase {
        wrap(phase + increment)
    }

    #[inline]
    fn modulate(phase: Self::Phase, amount: Self, index: Self::Index) -> Self::Phase {
        phase + amount * index
    }

    #[inline]
    fn sine(phase: Self::Phase) -> Self {
        interpolate_wrap(lut_sine(), phase, LUT_SINE_SIZE)
    }
}

/// Signed fixed-point value with 31 fractional bits, range -1.0..1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Q31(pub i32);

/// Fractional bits of a Q31 modulation index (range -32.0..32.0).
pub const Q31_INDEX_BITS: u32 = 26;

const Q31_SCALE: f32 = 2147483648.0;
const Q31_INDEX_SCALE: f32 = (1u32 << Q31_INDEX_BITS) as f32;
const PHASE_SCALE: f64 = 4294967296.0;

impl Q31 {
    pub const ONE: Q31 = Q31(i32::MAX);
    pub const MINUS_ONE: Q31 = Q31(i32::MIN);
}

impl Numeric for Q31 {
    type Phase = u32;
    type Index = i32;

    const ZERO: Self = Q31(0);

    #[inline]
    fn from_f32(value: f32) -> Self {
        // Float to int casts saturate.
        Q31((value * Q31_SCALE) as i32)
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self.0 as f32 / Q31_SCALE
    }

    #[inline]
    fn sat_add(self, rhs: Self) -> Self {
        Q31(self.0.saturating_add(rhs.0))
    }

    #[inline]
    fn sat_mul(self, rhs: Self) -> Self {
        let product = (self.0 as i64 * rhs.0 as i64) >> 31;
        Q31(product.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    #[inline]
    fn half(self) -> Self {
        Q31(self.0 >> 1)
    }

    #[inline]
    fn index_from_f32(value: f32) -> Self::Index {
        (value * Q31_INDEX_SCALE) as i32
    }

    #[inline]
    fn index_to_f32(index: Self::Index) -> f32 {
        index as f32 / Q31_INDEX_SCALE
    }

    #[inline]
    fn phase_from_f32(cycles: f32) -> Self::Phase {
        (wrap(cycles) as f64 * PHASE_SCALE) as u32
    }

    #[inline]
    fn phase_to_f32(phase: Self::Phase) -> f32 {
        // 24 bits keep the result exactly representable and below 1.0.
        (phase >> 8) as f32 / (1u32 << 24) as f32
    }

    #[inline]
    fn advance(phase: Self::Phase, increment: Self::Phase) -> Self::Phase {
        phase.wrapping_add(increment)
    }

    #[inline]
    fn modulate(phase: Self::Phase, amount: Self, index: Self::Index) -> Self::Phase {
        // Q31 * Q26 = Q57, a cycle spans 2^32.
        let offset = (amount.0 as i64 * index as i64) >> (31 + Q31_INDEX_BITS - 32);
        phase.wrapping_add(offset as u32)
    }

    #[inline]
    fn sine(phase: Self::Phase) -> Self {
        let table = lut_sine_q31();
        let integral = (phase >> (32 - LUT_SINE_BITS)) as usize;
        let fractional = ((phase << LUT_SINE_BITS) >> 1) as i64;
        let a = table[integral] as i64;
        let b = table[integral + 1] as i64;

        Q31((a + (((b - a) * fractional) >> 31)) as i32)
    }
}
