//! The BIP143 witness-v0 signature-hash construction.

use tx_codec_core::ser::{encoding_length, write_i32_le, write_u32_le, write_u64_le, write_varslice};
use tx_codec_core::{hash256, ByteFormat};

use crate::consts::{is_anyonecanpay, sighash_mode, SIGHASH_NONE, SIGHASH_SINGLE};
use crate::types::Transaction;

const ZERO_DIGEST: [u8; 32] = [0u8; 32];

fn hash_prevouts(tx: &Transaction) -> [u8; 32] {
    let mut buf = Vec::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        buf.extend_from_slice(&input.prev_hash);
        buf.extend_from_slice(&input.prev_index.to_le_bytes());
    }
    hash256(&buf)
}

fn hash_sequence(tx: &Transaction) -> [u8; 32] {
    let mut buf = Vec::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }
    hash256(&buf)
}

fn hash_all_outputs(tx: &Transaction) -> [u8; 32] {
    let mut buf = Vec::new();
    for output in &tx.outputs {
        output.write_to(&mut buf).expect("writing to a Vec<u8> never fails");
    }
    hash256(&buf)
}

fn hash_single_output(tx: &Transaction, in_index: usize) -> [u8; 32] {
    let mut buf = Vec::new();
    tx.outputs[in_index]
        .write_to(&mut buf)
        .expect("writing to a Vec<u8> never fails");
    hash256(&buf)
}

/// Computes the BIP143 witness-v0 sighash preimage digest for the input at
/// `in_index`, which spends an output worth `value` satoshis locked by
/// `prev_script`, under `hash_type`.
pub fn sign_hash_witness_v0(
    tx: &Transaction,
    in_index: u32,
    prev_script: &[u8],
    value: u64,
    hash_type: u32,
) -> [u8; 32] {
    let in_index = in_index as usize;
    let mode = sighash_mode(hash_type);
    let anyonecanpay = is_anyonecanpay(hash_type);

    let hash_prevouts = if anyonecanpay {
        ZERO_DIGEST
    } else {
        hash_prevouts(tx)
    };

    let hash_sequence = if anyonecanpay || mode == SIGHASH_SINGLE || mode == SIGHASH_NONE {
        ZERO_DIGEST
    } else {
        hash_sequence(tx)
    };

    let hash_outputs = if mode != SIGHASH_SINGLE && mode != SIGHASH_NONE {
        hash_all_outputs(tx)
    } else if mode == SIGHASH_SINGLE && in_index < tx.outputs.len() {
        hash_single_output(tx, in_index)
    } else {
        ZERO_DIGEST
    };

    let input = &tx.inputs[in_index];
    let mut buf = Vec::with_capacity(156 + encoding_length(prev_script.len()) + prev_script.len());

    write_i32_le(&mut buf, tx.version).expect("writing to a Vec<u8> never fails");
    buf.extend_from_slice(&hash_prevouts);
    buf.extend_from_slice(&hash_sequence);
    buf.extend_from_slice(&input.prev_hash);
    write_u32_le(&mut buf, input.prev_index).expect("writing to a Vec<u8> never fails");
    write_varslice(&mut buf, prev_script).expect("writing to a Vec<u8> never fails");
    write_u64_le(&mut buf, value).expect("writing to a Vec<u8> never fails");
    write_u32_le(&mut buf, input.sequence).expect("writing to a Vec<u8> never fails");
    buf.extend_from_slice(&hash_outputs);
    write_u32_le(&mut buf, tx.locktime).expect("writing to a Vec<u8> never fails");
    write_u32_le(&mut buf, hash_type).expect("writing to a Vec<u8> never fails");

    hash256(&buf)
}
