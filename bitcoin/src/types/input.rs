//! The transaction input: an outpoint, its unlocking script, sequence
//! number, and (SegWit) witness stack.

use std::io::{Read, Write};
use tx_codec_core::ByteFormat;

use crate::error::TxError;

/// Default `nSequence` value: final, no relative locktime semantics.
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// A transaction input: a reference to a previous output (`prev_hash` +
/// `prev_index`), the scriptSig authorizing the spend, a sequence number,
/// and a witness stack used only when the enclosing transaction is
/// serialized in its witness-extended form.
///
/// `witness` is always present on every input, even for transactions with
/// no witness data at all — the transaction "has witnesses" iff at least
/// one input's `witness` is non-empty (see [`Transaction::has_witness`](crate::types::Transaction::has_witness)).
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Input {
    /// The referenced transaction's id, in internal (little-endian) byte
    /// order.
    pub prev_hash: [u8; 32],
    /// The index of the output being spent within the referenced
    /// transaction.
    pub prev_index: u32,
    /// The scriptSig. Empty for native SegWit inputs.
    pub script: Vec<u8>,
    /// The `nSequence` field.
    pub sequence: u32,
    /// The witness stack for this input. Empty means "no witness".
    pub witness: Vec<Vec<u8>>,
}

impl Input {
    /// Builds a new input with the given outpoint, default sequence
    /// ([`DEFAULT_SEQUENCE`]), an empty scriptSig, and no witness.
    pub fn new(prev_hash: [u8; 32], prev_index: u32) -> Self {
        Self {
            prev_hash,
            prev_index,
            script: Vec::new(),
            sequence: DEFAULT_SEQUENCE,
            witness: Vec::new(),
        }
    }

    /// `true` iff `prev_hash` is all zero bytes. Used by
    /// [`Transaction::is_coinbase`](crate::types::Transaction::is_coinbase); does not check
    /// `prev_index`.
    pub fn is_null_prevout(&self) -> bool {
        self.prev_hash == [0u8; 32]
    }
}

impl ByteFormat for Input {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        32 + 4 + tx_codec_core::ser::encoding_length(self.script.len()) + self.script.len() + 4
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self, Self::Error> {
        let prev_hash_vec = Self::read_slice(reader, 32)?;
        let mut prev_hash = [0u8; 32];
        prev_hash.copy_from_slice(&prev_hash_vec);
        let prev_index = Self::read_u32_le(reader)?;
        let script = Self::read_varslice(reader)?;
        let sequence = Self::read_u32_le(reader)?;
        Ok(Self {
            prev_hash,
            prev_index,
            script,
            sequence,
            witness: Vec::new(),
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, Self::Error> {
        let mut len = Self::write_slice(writer, &self.prev_hash)?;
        len += Self::write_u32_le(writer, self.prev_index)?;
        len += Self::write_varslice(writer, &self.script)?;
        len += Self::write_u32_le(writer, self.sequence)?;
        Ok(len)
    }
}
