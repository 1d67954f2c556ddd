//! The transaction output: a locking script and a value.

use std::io::{Read, Write};
use tx_codec_core::ByteFormat;

use crate::error::TxError;

/// The blanked-output value: the all-ones 8-byte placeholder substituted
/// for a SIGHASH_SINGLE output before the index being signed.
pub const BLANKED_VALUE: [u8; 8] = [0xFF; 8];

/// An output's value. The decoder only ever produces [`Value::Amount`]; the
/// [`Value::RawBytes`] variant exists solely so the legacy SIGHASH_SINGLE
/// preimage builder can represent the all-ones blanked-output sentinel,
/// which is not a meaningful satoshi amount.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Value {
    /// An amount in satoshis.
    Amount(u64),
    /// A pre-encoded 8-byte value, written to the wire verbatim.
    RawBytes([u8; 8]),
}

impl Value {
    fn to_le_bytes(self) -> [u8; 8] {
        match self {
            Value::Amount(v) => v.to_le_bytes(),
            Value::RawBytes(b) => b,
        }
    }
}

/// A transaction output: a locking script (`scriptPubKey`) and a value.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// The scriptPubKey locking this output.
    pub script: Vec<u8>,
    /// The output's value.
    pub value: Value,
}

impl Output {
    /// Builds a new output carrying a satoshi amount.
    pub fn new(value: u64, script: Vec<u8>) -> Self {
        Self {
            script,
            value: Value::Amount(value),
        }
    }

    /// The SIGHASH_SINGLE blanked output: empty script, all-ones value
    /// placeholder.
    pub fn blanked() -> Self {
        Self {
            script: Vec::new(),
            value: Value::RawBytes(BLANKED_VALUE),
        }
    }
}

impl ByteFormat for Output {
    type Error = TxError;

    fn serialized_length(&self) -> usize {
        8 + tx_codec_core::ser::encoding_length(self.script.len()) + self.script.len()
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self, Self::Error> {
        let value = Self::read_u64_le(reader)?;
        let script = Self::read_varslice(reader)?;
        Ok(Self {
            script,
            value: Value::Amount(value),
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, Self::Error> {
        let mut len = Self::write_slice(writer, &self.value.to_le_bytes())?;
        len += Self::write_varslice(writer, &self.script)?;
        Ok(len)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_round_trips_an_output() {
        let hex = "ffffffffffffffff00";
        let output = Output::read_from(&mut hex::decode(hex).unwrap().as_slice()).unwrap();
        assert_eq!(output.value, Value::Amount(0xffff_ffff_ffff_ffff));
        assert!(output.script.is_empty());
        assert_eq!(output.serialized_length(), hex.len() / 2);

        let mut buf = Vec::new();
        output.write_to(&mut buf).unwrap();
        assert_eq!(hex::encode(buf), hex);
    }

    #[test]
    fn blanked_output_serializes_to_all_ones() {
        let blanked = Output::blanked();
        let mut buf = Vec::new();
        blanked.write_to(&mut buf).unwrap();
        assert_eq!(hex::encode(buf), "ffffffffffffffff00");
    }
}
