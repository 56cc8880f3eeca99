//! Engine configuration.

use crate::{SampleRate, DEFAULT_SAMPLE_RATE};

/// Settings applied when an engine is created or re-initialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,

    /// Bank selected by `initialize()`.
    pub bank: usize,

    /// Voice selected by `initialize()`.
    pub voice: usize,
}

impl EngineConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_bank(mut self, bank: usize) -> Self {
        self.bank = bank;
        self
    }

    pub fn with_voice(mut self, voice: usize) -> Self {
        self.voice = voice;
        self
    }

    #[inline]
    pub fn sample_rate(&self) -> SampleRate {
        SampleRate::new(self.sample_rate)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bank: 0,
            voice: 0,
        }
    }
}
