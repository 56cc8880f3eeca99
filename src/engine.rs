//! FM engine.
//!
//! Owns the voice store, the current selection and the decoded voice. Control
//! calls (`select_voice`, `note_on`, `note_off`) and `render` are meant to be
//! called from the same execution context. A selection change decodes the
//! new voice completely before it replaces the current one.

use alloc::boxed::Box;

use crate::bank::VoiceStore;
use crate::config::EngineConfig;
use crate::fm::decoder::decode;
use crate::fm::patch::{VoiceRecord, RECORD_SIZE};
use crate::fm::voice::Voice;
use crate::numeric::Numeric;
use crate::{Result, SampleRate};

#[derive(Debug, Clone)]
pub struct FmEngine<T: Numeric = f32> {
    config: EngineConfig,
    sample_rate: SampleRate,
    store: Box<dyn VoiceStore>,

    selection: Option<(usize, usize)>,
    voice: Voice<T>,
}

impl<T: Numeric> FmEngine<T> {
    /// Create an engine playing a silent voice until `initialize()` is called.
    pub fn new(config: EngineConfig, store: impl VoiceStore + 'static) -> Self {
        let sample_rate = config.sample_rate();

        Self {
            config,
            sample_rate,
            store: Box::new(store),

            selection: None,
            voice: silent_voice(&sample_rate),
        }
    }

    /// Select the configured bank and voice.
    ///
    /// If the configured selection is not in the store, a silent voice is
    /// loaded instead.
    pub fn initialize(&mut self) {
        self.sample_rate = self.config.sample_rate();
        self.selection = None;

        let (bank, voice) = (self.config.bank, self.config.voice);

        if let Err(error) = self.select_voice(bank, voice) {
            log::warn!("initial voice {bank}:{voice} not loaded: {error}");
            self.voice = silent_voice(&self.sample_rate);
        }
    }

    /// Render a block of samples at a note (MIDI note number) and detune in
    /// cents.
    pub fn render(&mut self, note: u8, fine_cents: f32, out: &mut [T]) {
        self.voice.render(note as f32 + fine_cents * 0.01, out);
    }

    pub fn note_on(&mut self) {
        self.voice.note_on();
    }

    pub fn note_off(&mut self) {
        self.voice.note_off();
    }

    /// Decode and switch to a voice of the store. Selecting the current voice
    /// again keeps its state.
    pub fn select_voice(&mut self, bank: usize, voice: usize) -> Result<()> {
        if self.selection == Some((bank, voice)) {
            return Ok(());
        }

        let record = self.store.voice(bank, voice)?;

        log::debug!("selecting voice {bank}:{voice}");

        self.voice = decode(&record, &self.sample_rate);
        self.selection = Some((bank, voice));

        Ok(())
    }

    /// Current bank and voice, `None` while a silent voice is loaded.
    #[inline]
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    #[inline]
    pub fn voice(&self) -> &Voice<T> {
        &self.voice
    }

    #[inline]
    pub fn store(&self) -> &dyn VoiceStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn silent_voice<T: Numeric>(sample_rate: &SampleRate) -> Voice<T> {
    decode(&VoiceRecord::unpack(&[0; RECORD_SIZE]), sample_rate)
}
