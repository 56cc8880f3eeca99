//! Utility functions.

pub mod units;

#[allow(unused_imports)]
use num_traits::float::Float;

/// Linear table lookup of a cyclic function.
///
/// `table` holds one period in `size` points plus a guard point. Any phase,
/// including negative ones, is reduced to one period first.
#[inline]
pub fn interpolate_wrap(table: &[f32], mut index: f32, size: usize) -> f32 {
    index -= index.floor();
    index *= size as f32;
    let index_integral = usize::min(index as usize, size - 1);
    let index_fractional = index - (index_integral as f32);
    let a = table[index_integral];
    let b = table[index_integral + 1];

    a + (b - a) * index_fractional
}
