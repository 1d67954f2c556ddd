//! A Bitcoin transaction codec and legacy/BIP143 signature-preimage engine:
//! the in-memory transaction model, its canonical binary (de)serialization
//! in legacy and segregated-witness form, and the two sighash constructions
//! a signer uses to commit to an input.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod consts;
pub mod error;
pub mod script;
pub mod sighash;
pub mod types;

pub use error::{TxError, TxResult};
pub use sighash::{sign_hash_legacy, sign_hash_witness_v0};
pub use types::{Input, Output, Transaction, Value};
