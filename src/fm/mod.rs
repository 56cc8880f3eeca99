//! Modules for the 6-operator and 4-operator FM voices.

pub mod algorithms;
pub mod decoder;
pub mod dx_units;
pub mod envelope;
pub mod feedback;
pub mod operator;
pub mod patch;
pub mod voice;
