//! The legacy (pre-SegWit) signature-hash construction.

use tx_codec_core::hash256;

use crate::consts::{is_anyonecanpay, sighash_mode, SIGHASH_NONE, SIGHASH_SINGLE, ONE};
use crate::script::strip_code_separators;
use crate::types::{Output, Transaction};

/// Computes the legacy sighash preimage digest for the input at `in_index`,
/// committing to `prev_script` (the spent output's scriptPubKey) under
/// `hash_type`.
///
/// Returns the [`ONE`] sentinel, rather than erroring, when `in_index` is
/// out of range for `tx.inputs`, or when `hash_type`'s mode is SINGLE and
/// `in_index` is out of range for `tx.outputs` — a long-standing Bitcoin
/// quirk that downstream validators must also reproduce.
pub fn sign_hash_legacy(tx: &Transaction, in_index: u32, prev_script: &[u8], hash_type: u32) -> [u8; 32] {
    let in_index = in_index as usize;
    if in_index >= tx.inputs.len() {
        return ONE;
    }

    let our_script = strip_code_separators(prev_script);
    let mut clone = tx.clone();

    match sighash_mode(hash_type) {
        SIGHASH_NONE => {
            clone.outputs.clear();
            zero_other_sequences(&mut clone, in_index);
        }
        SIGHASH_SINGLE => {
            if in_index >= clone.outputs.len() {
                return ONE;
            }
            clone.outputs.truncate(in_index + 1);
            for output in clone.outputs.iter_mut().take(in_index) {
                *output = Output::blanked();
            }
            zero_other_sequences(&mut clone, in_index);
        }
        _ => {}
    }

    if is_anyonecanpay(hash_type) {
        let mut signing_input = clone.inputs[in_index].clone();
        signing_input.script = our_script;
        clone.inputs = vec![signing_input];
    } else {
        for input in clone.inputs.iter_mut() {
            input.script = Vec::new();
        }
        clone.inputs[in_index].script = our_script;
    }

    let mut buf = Vec::with_capacity(clone.byte_length(false) + 4);
    clone
        .consensus_encode_into(&mut buf, false)
        .expect("writing to a Vec<u8> never fails");
    buf.extend_from_slice(&hash_type.to_le_bytes());
    hash256(&buf)
}

fn zero_other_sequences(tx: &mut Transaction, in_index: usize) {
    for (i, input) in tx.inputs.iter_mut().enumerate() {
        if i != in_index {
            input.sequence = 0;
        }
    }
}
