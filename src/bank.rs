//! Voice banks.
//!
//! A bank holds 32 voice slots of 128 bytes. It is loaded either from raw slot
//! data or from a 32 voice bulk dump:
//!
//! ```text
//! F0 43 0n ff 20 00 <4096 bytes of voice data> cs F7
//! ```
//!
//! with `n` the MIDI channel, `ff` the format (`09` for DX7 voices, `04` for
//! DX11 voices) and `cs` the checksum of the voice data.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use dyn_clone::DynClone;

use crate::fm::patch::{name_str, Format, VoiceRecord, NAME_LENGTH, RECORD_SIZE};
use crate::{Error, Result};

/// Voice slots in a bank.
pub const VOICES_PER_BANK: usize = 32;

/// Size of the voice data of a bank.
pub const BANK_SIZE: usize = VOICES_PER_BANK * RECORD_SIZE;

/// Size of a 32 voice bulk dump.
pub const BULK_DUMP_SIZE: usize = BANK_SIZE + 8;

/// Number of banks in a default store.
pub const BANK_COUNT: usize = 4;

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;
const MANUFACTURER_ID: u8 = 0x43;
const DUMP_FORMAT_SIX_OP: u8 = 0x09;
const DUMP_FORMAT_FOUR_OP: u8 = 0x04;
const DUMP_SIZE_MSB: u8 = 0x20;
const DUMP_SIZE_LSB: u8 = 0x00;
const DUMP_HEADER_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceBank {
    data: Box<[u8; BANK_SIZE]>,
}

impl VoiceBank {
    /// Bank with all slots zeroed. Such slots decode to silent voices.
    pub fn empty() -> Self {
        Self {
            data: Box::new([0; BANK_SIZE]),
        }
    }

    /// Load raw voice data or a bulk dump.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match data.len() {
            BANK_SIZE => {
                let mut bank = Self::empty();
                bank.data.copy_from_slice(data);
                Ok(bank)
            }
            BULK_DUMP_SIZE => Self::from_bulk_dump(data),
            actual => Err(Error::InvalidBankSize {
                expected: BANK_SIZE,
                actual,
            }),
        }
    }

    fn from_bulk_dump(data: &[u8]) -> Result<Self> {
        let header = &data[..DUMP_HEADER_SIZE];

        if header[0] != SYSEX_START
            || header[1] != MANUFACTURER_ID
            || (header[2] & 0xF0) != 0
            || header[4] != DUMP_SIZE_MSB
            || header[5] != DUMP_SIZE_LSB
            || data[BULK_DUMP_SIZE - 1] != SYSEX_END
        {
            return Err(Error::InvalidSysex);
        }

        if header[3] != DUMP_FORMAT_SIX_OP && header[3] != DUMP_FORMAT_FOUR_OP {
            return Err(Error::UnsupportedDumpFormat(header[3]));
        }

        let payload = &data[DUMP_HEADER_SIZE..DUMP_HEADER_SIZE + BANK_SIZE];
        let expected = checksum(payload);
        let actual = data[DUMP_HEADER_SIZE + BANK_SIZE];

        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        log::debug!("loaded bulk dump, format 0x{:02x}", header[3]);

        Self::from_bytes(payload)
    }

    /// Encode the bank as a bulk dump on a MIDI channel (0-15).
    pub fn to_bulk_dump(&self, format: Format, channel: u8) -> Vec<u8> {
        let format = match format {
            Format::SixOp => DUMP_FORMAT_SIX_OP,
            Format::FourOp => DUMP_FORMAT_FOUR_OP,
        };

        let mut dump = vec![
            SYSEX_START,
            MANUFACTURER_ID,
            channel & 0x0F,
            format,
            DUMP_SIZE_MSB,
            DUMP_SIZE_LSB,
        ];
        dump.extend_from_slice(self.data.as_slice());
        dump.push(checksum(self.data.as_slice()));
        dump.push(SYSEX_END);

        dump
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Raw data of a slot.
    pub fn record(&self, index: usize) -> Result<&[u8; RECORD_SIZE]> {
        self.data
            .chunks_exact(RECORD_SIZE)
            .nth(index)
            .and_then(|chunk| chunk.try_into().ok())
            .ok_or(Error::VoiceOutOfRange {
                index,
                count: VOICES_PER_BANK,
            })
    }

    pub fn set_record(&mut self, index: usize, record: &[u8; RECORD_SIZE]) -> Result<()> {
        let chunk = self
            .data
            .chunks_exact_mut(RECORD_SIZE)
            .nth(index)
            .ok_or(Error::VoiceOutOfRange {
                index,
                count: VOICES_PER_BANK,
            })?;
        chunk.copy_from_slice(record);

        Ok(())
    }

    /// Unpacked voice of a slot.
    pub fn voice(&self, index: usize) -> Result<VoiceRecord> {
        self.record(index).map(VoiceRecord::unpack)
    }

    pub fn voice_name(&self, index: usize) -> Result<VoiceName> {
        self.voice(index).map(|voice| VoiceName(*voice.name()))
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::empty()
    }
}

/// Name of a voice, 10 ASCII characters padded with spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceName(pub [u8; NAME_LENGTH]);

impl VoiceName {
    pub fn as_str(&self) -> &str {
        name_str(&self.0)
    }
}

impl core::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 7-bit two's complement of the sum of a bulk dump payload.
pub fn checksum(payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte));

    sum.wrapping_neg() & 0x7F
}

/// Read-only source of voice banks.
pub trait VoiceStore: DynClone + core::fmt::Debug + Send {
    fn bank_count(&self) -> usize;

    fn bank(&self, index: usize) -> Option<&VoiceBank>;

    /// Unpacked voice at a bank and slot.
    fn voice(&self, bank: usize, voice: usize) -> Result<VoiceRecord> {
        self.bank(bank)
            .ok_or(Error::BankOutOfRange {
                index: bank,
                count: self.bank_count(),
            })?
            .voice(voice)
    }
}

dyn_clone::clone_trait_object!(VoiceStore);

/// Banks held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceBanks {
    banks: Vec<VoiceBank>,
}

impl VoiceBanks {
    pub fn new(banks: Vec<VoiceBank>) -> Self {
        Self { banks }
    }

    /// Replace a bank.
    pub fn load(&mut self, index: usize, bank: VoiceBank) -> Result<()> {
        let count = self.banks.len();
        let slot = self
            .banks
            .get_mut(index)
            .ok_or(Error::BankOutOfRange { index, count })?;
        *slot = bank;

        log::debug!("loaded bank {index}");

        Ok(())
    }

    pub fn push(&mut self, bank: VoiceBank) -> usize {
        self.banks.push(bank);
        self.banks.len() - 1
    }
}

impl Default for VoiceBanks {
    fn default() -> Self {
        Self::new(vec![VoiceBank::empty(); BANK_COUNT])
    }
}

impl VoiceStore for VoiceBanks {
    #[inline]
    fn bank_count(&self) -> usize {
        self.banks.len()
    }

    #[inline]
    fn bank(&self, index: usize) -> Option<&VoiceBank> {
        self.banks.get(index)
    }
}
