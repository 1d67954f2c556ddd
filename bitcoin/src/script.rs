//! Script is treated as an opaque byte string everywhere in this crate
//! except for one narrow case: the legacy sighash preimage must strip
//! `OP_CODESEPARATOR` (`0xab`) out of the previous output's `scriptPubKey`
//! before committing to it. Rather than round-tripping through a full
//! decompile/recompile of the script (tokenizing every opcode and push),
//! we walk the byte stream once, skip over push-data payloads so we never
//! mistake a pushed data byte for the opcode, and drop any `0xab` opcode
//! byte we see outside of one. Behavior is identical to decompile-filter-
//! recompile; this crate has no general script tokenizer to reuse.

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;
const OP_CODESEPARATOR: u8 = 0xab;

/// Returns `script` with every `OP_CODESEPARATOR` opcode removed. Push-data
/// payloads are skipped wholesale so a `0xab` data byte inside a push is
/// never mistaken for the opcode.
pub fn strip_code_separators(script: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(script.len());
    let mut i = 0;
    while i < script.len() {
        let opcode = script[i];
        let push_len = match opcode {
            0x01..=0x4b => Some(1 + opcode as usize),
            OP_PUSHDATA1 => script.get(i + 1).map(|&n| 2 + n as usize),
            OP_PUSHDATA2 => {
                if i + 3 <= script.len() {
                    let n = u16::from_le_bytes([script[i + 1], script[i + 2]]) as usize;
                    Some(3 + n)
                } else {
                    None
                }
            }
            OP_PUSHDATA4 => {
                if i + 5 <= script.len() {
                    let n = u32::from_le_bytes([
                        script[i + 1],
                        script[i + 2],
                        script[i + 3],
                        script[i + 4],
                    ]) as usize;
                    Some(5 + n)
                } else {
                    None
                }
            }
            _ => None,
        };

        match push_len {
            Some(len) => {
                let end = (i + len).min(script.len());
                out.extend_from_slice(&script[i..end]);
                i = end;
            }
            None => {
                if opcode != OP_CODESEPARATOR {
                    out.push(opcode);
                }
                i += 1;
            }
        }
    }
    out
}
