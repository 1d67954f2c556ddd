//! `hash256`: Bitcoin's double SHA-256, plus a streaming `Write` sink that
//! accumulates a `hash256` digest incrementally instead of requiring the
//! whole preimage in memory up front.

use sha2::{Digest, Sha256};
use std::io::{Result as IOResult, Write};

/// Computes `SHA-256(SHA-256(bytes))`.
pub fn hash256(bytes: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(bytes);
    let second = Sha256::digest(first);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&second);
    digest
}

/// A `Write` sink that feeds everything written to it into a single SHA-256
/// instance, then applies the second SHA-256 pass on `finish`. Lets callers
/// build a `hash256` digest by writing a preimage incrementally rather than
/// buffering it in a `Vec` first.
#[derive(Default)]
pub struct Hash256Writer {
    inner: Sha256,
}

impl Write for Hash256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl Hash256Writer {
    /// Consumes the writer, producing the `hash256` digest of everything
    /// written to it.
    pub fn finish(self) -> [u8; 32] {
        let first = self.inner.finalize();
        let second = Sha256::digest(first);
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&second);
        digest
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_matches_known_hash256_vectors() {
        // hash256("") = SHA256(SHA256(""))
        let expected =
            hex::decode("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456")
                .unwrap();
        assert_eq!(hash256(&[]).to_vec(), expected);
    }

    #[test]
    fn writer_matches_one_shot() {
        let data = b"riemann was here";
        let mut w = Hash256Writer::default();
        w.write_all(&data[..8]).unwrap();
        w.write_all(&data[8..]).unwrap();
        assert_eq!(w.finish(), hash256(data));
    }
}
