//! Protocol constants and sentinels used by the codec and sighash engines.

/// Marks the start of the BIP144 witness extension, immediately after the
/// version field.
pub const ADVANCED_TRANSACTION_MARKER: u8 = 0x00;
/// Follows [`ADVANCED_TRANSACTION_MARKER`] to confirm the witness extension.
pub const ADVANCED_TRANSACTION_FLAG: u8 = 0x01;

/// Sign every input and every output.
pub const SIGHASH_ALL: u32 = 0x01;
/// Sign every input and no outputs.
pub const SIGHASH_NONE: u32 = 0x02;
/// Sign every input and exactly one output (the one at the signed input's index).
pub const SIGHASH_SINGLE: u32 = 0x03;
/// Modifier: sign only the input being signed, not the rest of the input set.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// The legacy-sighash error sentinel: `01` followed by 31 zero bytes.
/// Returned in place of raising an error when the input index (or, for
/// SIGHASH_SINGLE, the output index) is out of range — a long-standing
/// Bitcoin quirk that downstream validators must also reproduce.
pub const ONE: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 0x01;
    one
};

/// Extracts the sighash base mode (`SIGHASH_ALL`/`NONE`/`SINGLE`) from a
/// `hash_type`, ignoring the ANYONECANPAY flag and any higher bits.
pub fn sighash_mode(hash_type: u32) -> u32 {
    hash_type & 0x1f
}

/// `true` iff the ANYONECANPAY flag is set on `hash_type`.
pub fn is_anyonecanpay(hash_type: u32) -> bool {
    hash_type & SIGHASH_ANYONECANPAY == SIGHASH_ANYONECANPAY
}
