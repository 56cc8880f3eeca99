//! Lookup tables.
//!
//! Tables are computed on first use and shared for the lifetime of the program.

#[allow(unused_imports)]
use num_traits::float::Float;
use spin::Once;

pub const LUT_SINE_BITS: u32 = 10;
pub const LUT_SINE_SIZE: usize = 1 << LUT_SINE_BITS;

/// One sine cycle plus a guard point for interpolation.
pub type SineTable<T> = [T; LUT_SINE_SIZE + 1];

static LUT_SINE: Once<SineTable<f32>> = Once::new();
static LUT_SINE_Q31: Once<SineTable<i32>> = Once::new();

#[inline]
fn sine_at(index: usize) -> f64 {
    (index as f64 / LUT_SINE_SIZE as f64 * core::f64::consts::TAU).sin()
}

/// Sine table in floating point, range -1.0..1.0.
#[inline]
pub fn lut_sine() -> &'static SineTable<f32> {
    LUT_SINE.call_once(|| core::array::from_fn(|i| sine_at(i) as f32))
}

/// Sine table in Q31, saturated at the positive peak.
#[inline]
pub fn lut_sine_q31() -> &'static SineTable<i32> {
    LUT_SINE_Q31.call_once(|| core::array::from_fn(|i| (sine_at(i) * 2147483648.0) as i32))
}
