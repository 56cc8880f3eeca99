//! Errors raised at the storage and selection boundary.
//!
//! Decoding and rendering are infallible. Everything that can go wrong happens
//! before a voice record reaches the decoder.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raw bank data does not have the size of a bank or a bulk dump.
    #[error("invalid bank size: expected {expected} bytes, got {actual}")]
    InvalidBankSize { expected: usize, actual: usize },

    /// Bulk dump header or terminator is malformed.
    #[error("malformed bulk dump")]
    InvalidSysex,

    /// Bulk dump format byte is not a 32 voice bank.
    #[error("unsupported bulk dump format 0x{0:02x}")]
    UnsupportedDumpFormat(u8),

    /// Bulk dump checksum does not match its payload.
    #[error("bulk dump checksum mismatch: expected 0x{expected:02x}, got 0x{actual:02x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// Bank index outside the voice store.
    #[error("bank {index} out of range (store holds {count} banks)")]
    BankOutOfRange { index: usize, count: usize },

    /// Voice index outside a bank.
    #[error("voice {index} out of range (bank holds {count} voices)")]
    VoiceOutOfRange { index: usize, count: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
