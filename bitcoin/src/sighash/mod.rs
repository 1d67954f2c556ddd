//! Signature-preimage construction: the two algorithms that produce the
//! 32-byte message a signer commits to for a given input.

mod legacy;
mod witness_v0;

pub use legacy::sign_hash_legacy;
pub use witness_v0::sign_hash_witness_v0;
