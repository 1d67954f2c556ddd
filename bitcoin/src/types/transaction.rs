//! The transaction value: version, inputs, outputs, and locktime, plus its
//! canonical binary codec and size accounting.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use tx_codec_core::ser::{
    encoding_length, read_compact_int, read_i32_le, read_u32_le, read_vector, write_compact_int,
    write_i32_le, write_u32_le, write_u8, write_vector,
};
use tx_codec_core::{hash256, ByteFormat};

use crate::consts::{ADVANCED_TRANSACTION_FLAG, ADVANCED_TRANSACTION_MARKER};
use crate::error::{TxError, TxResult};
use crate::types::{Input, Output};

/// A Bitcoin transaction: a version, an ordered list of inputs and outputs,
/// and a locktime.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    /// The transaction version.
    pub version: i32,
    /// The spent outpoints and their unlocking data.
    pub inputs: Vec<Input>,
    /// The created outputs.
    pub outputs: Vec<Output>,
    /// The locktime.
    pub locktime: u32,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locktime: 0,
        }
    }
}

impl Transaction {
    /// Builds the empty transaction (`version=1`, `locktime=0`, no inputs or
    /// outputs).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an input spending `prev_hash:prev_index`, returning its
    /// index. `sequence` defaults to [`DEFAULT_SEQUENCE`](crate::types::DEFAULT_SEQUENCE); `script`
    /// defaults to empty.
    pub fn add_input(
        &mut self,
        prev_hash: [u8; 32],
        prev_index: u32,
        sequence: Option<u32>,
        script: Option<Vec<u8>>,
    ) -> usize {
        let mut input = Input::new(prev_hash, prev_index);
        if let Some(sequence) = sequence {
            input.sequence = sequence;
        }
        if let Some(script) = script {
            input.script = script;
        }
        self.inputs.push(input);
        self.inputs.len() - 1
    }

    /// Appends an output paying `value` satoshis to `script`, returning its
    /// index.
    pub fn add_output(&mut self, script: Vec<u8>, value: u64) -> usize {
        self.outputs.push(Output::new(value, script));
        self.outputs.len() - 1
    }

    /// Replaces the scriptSig of the input at `index`.
    pub fn set_script(&mut self, index: usize, script: Vec<u8>) {
        self.inputs[index].script = script;
    }

    /// Replaces the witness stack of the input at `index`.
    pub fn set_witness(&mut self, index: usize, witness: Vec<Vec<u8>>) {
        self.inputs[index].witness = witness;
    }

    /// `true` iff at least one input carries a non-empty witness.
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|input| !input.witness.is_empty())
    }

    /// `true` iff this transaction has exactly one input and that input's
    /// `prev_hash` is 32 zero bytes. Does not check `prev_index`.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].is_null_prevout()
    }

    /// The exact serialized length under `allow_witness`, without encoding.
    pub fn byte_length(&self, allow_witness: bool) -> usize {
        let has_witness = allow_witness && self.has_witness();

        let mut len = if has_witness { 10 } else { 8 };
        len += encoding_length(self.inputs.len());
        len += encoding_length(self.outputs.len());

        for input in &self.inputs {
            len += 40 + encoding_length(input.script.len()) + input.script.len();
        }
        for output in &self.outputs {
            len += 8 + encoding_length(output.script.len()) + output.script.len();
        }

        if has_witness {
            for input in &self.inputs {
                len += encoding_length(input.witness.len());
                for item in &input.witness {
                    len += encoding_length(item.len()) + item.len();
                }
            }
        }
        len
    }

    /// `byte_length(false)`: size without the witness extension.
    pub fn base_size(&self) -> usize {
        self.byte_length(false)
    }

    /// `byte_length(true)`: size including any witness data.
    pub fn total_size(&self) -> usize {
        self.byte_length(true)
    }

    /// `3 * base_size() + total_size()`.
    pub fn weight(&self) -> usize {
        self.base_size() * 3 + self.total_size()
    }

    /// `ceil(weight() / 4)`.
    pub fn vsize(&self) -> usize {
        (self.weight() + 3) / 4
    }

    /// Serializes `self` into `writer`, returning the number of bytes
    /// written. The witness extension is written iff `allow_witness` and at
    /// least one input carries a witness.
    pub fn consensus_encode_into<W: Write>(
        &self,
        writer: &mut W,
        allow_witness: bool,
    ) -> TxResult<usize> {
        let has_witness = allow_witness && self.has_witness();

        let mut written = write_i32_le(writer, self.version)?;
        if has_witness {
            written += write_u8(writer, ADVANCED_TRANSACTION_MARKER)?;
            written += write_u8(writer, ADVANCED_TRANSACTION_FLAG)?;
        }

        written += write_compact_int(writer, self.inputs.len() as u64)?;
        for input in &self.inputs {
            written += input.write_to(writer)?;
        }

        written += write_compact_int(writer, self.outputs.len() as u64)?;
        for output in &self.outputs {
            written += output.write_to(writer)?;
        }

        if has_witness {
            for input in &self.inputs {
                written += write_vector(writer, &input.witness)?;
            }
        }

        written += write_u32_le(writer, self.locktime)?;
        Ok(written)
    }

    /// Serializes `self`, pre-allocating the exact output size.
    pub fn consensus_encode(&self, allow_witness: bool) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_length(allow_witness));
        self.consensus_encode_into(&mut buf, allow_witness)
            .expect("writing to a Vec<u8> never fails");
        buf
    }

    /// Parses a transaction out of `bytes`. When `no_strict` is `false`,
    /// trailing bytes after the locktime are an error.
    pub fn consensus_decode(bytes: &[u8], no_strict: bool) -> TxResult<Self> {
        let mut cursor = Cursor::new(bytes);
        let version = read_i32_le(&mut cursor)?;

        let pos_before_marker = cursor.position();
        let mut marker = [0u8; 2];
        let read = cursor.read(&mut marker)?;
        let has_witness = if read == 2 && marker == [ADVANCED_TRANSACTION_MARKER, ADVANCED_TRANSACTION_FLAG]
        {
            true
        } else {
            cursor
                .seek(SeekFrom::Start(pos_before_marker))
                .expect("rewind within an in-memory buffer cannot fail");
            false
        };

        let vin_len = read_compact_int(&mut cursor)?;
        let mut inputs = Vec::with_capacity(vin_len as usize);
        for _ in 0..vin_len {
            inputs.push(Input::read_from(&mut cursor)?);
        }

        let vout_len = read_compact_int(&mut cursor)?;
        let mut outputs = Vec::with_capacity(vout_len as usize);
        for _ in 0..vout_len {
            outputs.push(Output::read_from(&mut cursor)?);
        }

        if has_witness {
            let mut any_witness = false;
            for input in inputs.iter_mut() {
                let witness = read_vector(&mut cursor)?;
                if !witness.is_empty() {
                    any_witness = true;
                }
                input.witness = witness;
            }
            if !any_witness {
                return Err(TxError::SuperfluousWitnessData);
            }
        }

        let locktime = read_u32_le(&mut cursor)?;

        if !no_strict {
            let remaining = bytes.len() as u64 - cursor.position();
            if remaining > 0 {
                return Err(TxError::UnexpectedTrailingData(remaining as usize));
            }
        }

        Ok(Self {
            version,
            inputs,
            outputs,
            locktime,
        })
    }

    /// The raw internal double-SHA256 of the non-witness serialization, in
    /// internal (little-endian) byte order.
    pub fn hash(&self) -> [u8; 32] {
        hash256(&self.consensus_encode(false))
    }

    /// [`Self::hash`], byte-reversed and hex-encoded — the conventional
    /// big-endian display form of a txid.
    pub fn id(&self) -> String {
        let mut digest = self.hash();
        digest.reverse();
        hex::encode(digest)
    }

    /// Alias for [`Self::id`], always excluding witness data, matching the
    /// conventional `txid` terminology.
    pub fn txid(&self) -> String {
        self.id()
    }

    /// The witness-inclusive analogue of [`Self::id`]: double-SHA256 of the
    /// witness-extended serialization, reversed and hex-encoded. Equal to
    /// [`Self::txid`] when the transaction carries no witness data.
    pub fn wtxid(&self) -> String {
        let mut digest = hash256(&self.consensus_encode(true));
        digest.reverse();
        hex::encode(digest)
    }

    /// Decodes a hex-encoded transaction in strict mode.
    pub fn deserialize_hex(s: &str) -> TxResult<Self> {
        let bytes = hex::decode(s).map_err(tx_codec_core::SerError::from)?;
        Self::consensus_decode(&bytes, false)
    }

    /// Hex-encodes the witness-extended serialization.
    pub fn serialize_hex(&self) -> String {
        hex::encode(self.consensus_encode(true))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_transaction_matches_known_encoding() {
        let tx = Transaction::new();
        let encoded = tx.consensus_encode(true);
        assert_eq!(hex::encode(&encoded), "01000000000000000000");
        assert_eq!(tx.base_size(), 10);
        assert_eq!(tx.total_size(), 10);
        assert_eq!(tx.weight(), 40);
        assert_eq!(tx.vsize(), 10);
    }

    #[test]
    fn it_round_trips_a_legacy_transaction() {
        let mut tx = Transaction::new();
        tx.add_input([0x11; 32], 0, None, None);
        tx.add_output(vec![0x51], 5000);
        let encoded = tx.consensus_encode(true);

        let decoded = Transaction::consensus_decode(&encoded, false).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.consensus_encode(true), encoded);
        assert_eq!(tx.base_size(), tx.total_size());
    }

    #[test]
    fn it_decodes_a_real_mainnet_legacy_transaction() {
        // A historical mainnet transaction, used here purely as a
        // realistic (non-synthetic) decode/re-encode/txid fixture.
        let tx_hex = "0100000001813f79011acb80925dfe69b3def355fe914bd1d96a3f5f71bf8303c6a989c7d1000000006b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278afeffffff02a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac99c39800000000001976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac19430600";
        let tx_bytes = hex::decode(tx_hex).unwrap();

        let tx = Transaction::consensus_decode(&tx_bytes, false).unwrap();
        assert_eq!(tx.base_size(), tx_bytes.len());
        assert_eq!(tx.consensus_encode(true), tx_bytes);

        // The raw (non-reversed) internal hash256, as commonly recorded
        // alongside this fixture.
        let mut raw_hash = hex::decode(
            "03ee4f7a4e68f802303bc659f8f817964b4b74fe046facc3ae1be4679d622c45",
        )
        .unwrap();
        assert_eq!(tx.hash().to_vec(), raw_hash);
        raw_hash.reverse();
        assert_eq!(tx.id(), hex::encode(raw_hash));
    }

    #[test]
    fn it_round_trips_a_witness_transaction() {
        let mut tx = Transaction::new();
        tx.add_input([0x22; 32], 1, None, None);
        tx.add_output(vec![0x51], 9000);
        tx.set_witness(0, vec![vec![0xde, 0xad], vec![0xbe, 0xef]]);

        let encoded = tx.consensus_encode(true);
        assert_eq!(encoded[4], ADVANCED_TRANSACTION_MARKER);
        assert_eq!(encoded[5], ADVANCED_TRANSACTION_FLAG);

        let decoded = Transaction::consensus_decode(&encoded, false).unwrap();
        assert_eq!(decoded, tx);
        assert!(decoded.has_witness());
        assert!(decoded.total_size() > decoded.base_size());

        // without the witness extension, both serialize identically
        let no_witness = Transaction::consensus_decode(&tx.consensus_encode(false), false).unwrap();
        assert!(!no_witness.has_witness());

        // a witness-carrying tx has a distinct txid and wtxid
        assert_ne!(tx.txid(), tx.wtxid());
        assert_eq!(no_witness.txid(), no_witness.wtxid());
    }

    #[test]
    fn it_round_trips_through_hex() {
        let mut tx = Transaction::new();
        tx.add_input([0x44; 32], 0, None, None);
        tx.add_output(vec![0x51], 1234);

        let hex = tx.serialize_hex();
        let decoded = Transaction::deserialize_hex(&hex).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn superfluous_witness_data_is_rejected() {
        let mut tx = Transaction::new();
        tx.add_input([0x33; 32], 0, None, None);
        tx.add_output(vec![0x51], 1);
        let mut encoded = tx.consensus_encode(false);
        // splice in a marker+flag and an empty witness vector by hand
        let mut with_marker = encoded[..4].to_vec();
        with_marker.push(ADVANCED_TRANSACTION_MARKER);
        with_marker.push(ADVANCED_TRANSACTION_FLAG);
        with_marker.extend_from_slice(&encoded[4..encoded.len() - 4]);
        with_marker.push(0x00); // empty witness vector for the single input
        with_marker.extend_from_slice(&encoded[encoded.len() - 4..]);
        encoded = with_marker;

        match Transaction::consensus_decode(&encoded, false) {
            Err(TxError::SuperfluousWitnessData) => {}
            other => panic!("expected SuperfluousWitnessData, got {:?}", other),
        }
    }

    #[test]
    fn trailing_data_is_rejected_unless_no_strict() {
        let tx = Transaction::new();
        let mut encoded = tx.consensus_encode(true);
        encoded.push(0xff);

        assert!(matches!(
            Transaction::consensus_decode(&encoded, false),
            Err(TxError::UnexpectedTrailingData(1))
        ));
        assert!(Transaction::consensus_decode(&encoded, true).is_ok());
    }

    #[test]
    fn coinbase_predicate_matches_sole_null_prevout_input() {
        let mut tx = Transaction::new();
        tx.add_input([0u8; 32], 0xFFFF_FFFF, None, None);
        assert!(tx.is_coinbase());
        tx.add_input([0x01; 32], 0, None, None);
        assert!(!tx.is_coinbase());
    }

    #[test]
    fn id_is_the_reversed_hex_hash() {
        let tx = Transaction::new();
        let mut expected = hash256(&tx.consensus_encode(false));
        expected.reverse();
        assert_eq!(tx.id(), hex::encode(expected));
    }
}
