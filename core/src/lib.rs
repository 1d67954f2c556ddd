//! Byte-codec primitives shared by UTXO-style transaction codecs: a
//! `std::io`-based (de)serialization trait, Bitcoin-style compact-size
//! varints, and the `hash256` (double SHA-256) digest.
//!
//! Nothing here is Bitcoin-specific beyond the varint and hash256 framing;
//! it exists because no external crate exposes exactly this combination.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod hash256;
pub mod ser;

pub use hash256::{hash256, Hash256Writer};
pub use ser::{ByteFormat, SerError, SerResult};
