//! Errors surfaced by the transaction codec and sighash engines.

use std::io::Error as IOError;
use thiserror::Error;
use tx_codec_core::SerError;

/// Errors produced while decoding, encoding, or mutating a [`Transaction`](crate::types::Transaction).
#[derive(Debug, Error)]
pub enum TxError {
    /// Bubbled up from the underlying `Read`/`Write`, generally meaning the
    /// input ran out of bytes before a primitive finished reading.
    #[error(transparent)]
    Io(#[from] IOError),

    /// Bubbled up from the byte-codec primitives (non-minimal varint, EOF).
    #[error(transparent)]
    Ser(#[from] SerError),

    /// The witness marker+flag (`0x00 0x01`) was present but every input's
    /// witness decoded empty. The extension was redundant and should not
    /// have been written.
    #[error("superfluous witness data: marker+flag present but no input carries a witness")]
    SuperfluousWitnessData,

    /// Strict decoding found bytes left over after the locktime.
    #[error("unexpected trailing data: {0} byte(s) left after decoding")]
    UnexpectedTrailingData(usize),

    /// A `prev_hash` was not exactly 32 bytes.
    #[error("prev_hash must be exactly 32 bytes, got {0}")]
    InvalidPrevHashLength(usize),
}

/// Result alias for transaction codec/sighash operations.
pub type TxResult<T> = Result<T, TxError>;
