//! A `std::io`-based (de)serialization trait, plus Bitcoin-style compact-size
//! varint helpers. `ByteFormat` mirrors the read/write conventions used
//! throughout this workspace: every wire primitive advances the `Read`/`Write`
//! cursor it is handed and reports how many bytes it touched.

use std::io::{Error as IOError, Read, Write};
use thiserror::Error;

/// Errors from the byte-codec primitives.
#[derive(Debug, Error)]
pub enum SerError {
    /// A compact-size varint was not encoded using its minimal width.
    #[error("non-minimal varint encoding")]
    NonMinimalVarInt,

    /// Fewer bytes remained in the input than the primitive required.
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        /// Bytes the read required.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// Bubbled up from the underlying `Read`/`Write`.
    #[error(transparent)]
    Io(#[from] IOError),

    /// `deserialize_hex` was given invalid hex.
    #[error(transparent)]
    FromHex(#[from] hex::FromHexError),
}

/// Result alias for the byte-codec primitives.
pub type SerResult<T> = Result<T, SerError>;

/// Returns the number of bytes a compact-size varint encoding of `number`
/// occupies: 1 for `0..=0xfc`, 3 for `0xfd..=0xffff`, 5 for
/// `0x1_0000..=0xffff_ffff`, 9 otherwise.
pub fn prefix_byte_len(number: u64) -> usize {
    match number {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

fn first_byte_for_width(width: usize) -> Option<u8> {
    match width {
        3 => Some(0xfd),
        5 => Some(0xfe),
        9 => Some(0xff),
        _ => None,
    }
}

fn width_for_first_byte(first: u8) -> usize {
    match first {
        0..=0xfc => 1,
        0xfd => 3,
        0xfe => 5,
        0xff => 9,
    }
}

/// Writes `number` as a Bitcoin compact-size varint, using the minimal width.
pub fn write_compact_int<W: Write>(writer: &mut W, number: u64) -> SerResult<usize> {
    let width = prefix_byte_len(number);
    Ok(match first_byte_for_width(width) {
        None => writer.write(&[number as u8])?,
        Some(prefix) => {
            let mut written = writer.write(&[prefix])?;
            written += writer.write(&number.to_le_bytes()[..width - 1])?;
            written
        }
    })
}

/// Reads a Bitcoin compact-size varint, rejecting non-minimal encodings.
pub fn read_compact_int<R: Read>(reader: &mut R) -> SerResult<u64> {
    let mut first = [0u8; 1];
    reader
        .read_exact(&mut first)
        .map_err(|_| SerError::UnexpectedEof {
            needed: 1,
            available: 0,
        })?;
    let width = width_for_first_byte(first[0]);

    let number = if width == 1 {
        first[0] as u64
    } else {
        let mut buf = [0u8; 8];
        reader
            .read_exact(&mut buf[..width - 1])
            .map_err(|_| SerError::UnexpectedEof {
                needed: width - 1,
                available: 0,
            })?;
        u64::from_le_bytes(buf)
    };

    if prefix_byte_len(number) != width {
        return Err(SerError::NonMinimalVarInt);
    }
    Ok(number)
}

/// Reads a fixed-width unsigned byte.
pub fn read_u8<R: Read>(reader: &mut R) -> SerResult<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf).map_err(|_| SerError::UnexpectedEof {
        needed: 1,
        available: 0,
    })?;
    Ok(buf[0])
}

/// Reads a little-endian `u32`.
pub fn read_u32_le<R: Read>(reader: &mut R) -> SerResult<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|_| SerError::UnexpectedEof {
        needed: 4,
        available: 0,
    })?;
    Ok(u32::from_le_bytes(buf))
}

/// Reads a little-endian `i32`.
pub fn read_i32_le<R: Read>(reader: &mut R) -> SerResult<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|_| SerError::UnexpectedEof {
        needed: 4,
        available: 0,
    })?;
    Ok(i32::from_le_bytes(buf))
}

/// Reads a little-endian `u64`.
pub fn read_u64_le<R: Read>(reader: &mut R) -> SerResult<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf).map_err(|_| SerError::UnexpectedEof {
        needed: 8,
        available: 0,
    })?;
    Ok(u64::from_le_bytes(buf))
}

/// Reads `n` raw bytes.
pub fn read_slice<R: Read>(reader: &mut R, n: usize) -> SerResult<Vec<u8>> {
    let mut buf = vec![0u8; n];
    reader.read_exact(&mut buf).map_err(|_| SerError::UnexpectedEof {
        needed: n,
        available: 0,
    })?;
    Ok(buf)
}

/// Reads a varint-length-prefixed byte string.
pub fn read_varslice<R: Read>(reader: &mut R) -> SerResult<Vec<u8>> {
    let len = read_compact_int(reader)?;
    read_slice(reader, len as usize)
}

/// Reads a varint count followed by that many varslices.
pub fn read_vector<R: Read>(reader: &mut R) -> SerResult<Vec<Vec<u8>>> {
    let count = read_compact_int(reader)?;
    (0..count).map(|_| read_varslice(reader)).collect()
}

/// Writes a single raw byte.
pub fn write_u8<W: Write>(writer: &mut W, byte: u8) -> SerResult<usize> {
    Ok(writer.write(&[byte])?)
}

/// Writes a raw byte slice verbatim.
pub fn write_slice<W: Write>(writer: &mut W, bytes: &[u8]) -> SerResult<usize> {
    Ok(writer.write(bytes)?)
}

/// Writes a little-endian `u32`.
pub fn write_u32_le<W: Write>(writer: &mut W, number: u32) -> SerResult<usize> {
    Ok(writer.write(&number.to_le_bytes())?)
}

/// Writes a little-endian `i32`.
pub fn write_i32_le<W: Write>(writer: &mut W, number: i32) -> SerResult<usize> {
    Ok(writer.write(&number.to_le_bytes())?)
}

/// Writes a little-endian `u64`.
pub fn write_u64_le<W: Write>(writer: &mut W, number: u64) -> SerResult<usize> {
    Ok(writer.write(&number.to_le_bytes())?)
}

/// Writes a varint length prefix followed by `bytes`.
pub fn write_varslice<W: Write>(writer: &mut W, bytes: &[u8]) -> SerResult<usize> {
    let mut written = write_compact_int(writer, bytes.len() as u64)?;
    written += write_slice(writer, bytes)?;
    Ok(written)
}

/// Writes a varint count followed by each item as a varslice.
pub fn write_vector<W: Write>(writer: &mut W, items: &[Vec<u8>]) -> SerResult<usize> {
    let mut written = write_compact_int(writer, items.len() as u64)?;
    for item in items {
        written += write_varslice(writer, item)?;
    }
    Ok(written)
}

/// Binary (de)serialization over `std::io::{Read, Write}`. Every primitive
/// advances the cursor it is given by exactly as many bytes as it reports
/// having read or written.
pub trait ByteFormat {
    /// The error type surfaced by (de)serialization.
    type Error: From<SerError> + From<IOError> + std::error::Error;

    /// The exact byte length `write_to` will produce for this value.
    fn serialized_length(&self) -> usize;

    /// Deserializes `Self` from `reader`.
    fn read_from<R: Read>(reader: &mut R) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Serializes `self` to `writer`, returning the number of bytes written.
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, Self::Error>;

    /// Reads a fixed-width unsigned byte.
    fn read_u8<R: Read>(reader: &mut R) -> Result<u8, Self::Error> {
        read_u8(reader).map_err(Into::into)
    }

    /// Reads a little-endian `u32`.
    fn read_u32_le<R: Read>(reader: &mut R) -> Result<u32, Self::Error> {
        read_u32_le(reader).map_err(Into::into)
    }

    /// Reads a little-endian `i32`.
    fn read_i32_le<R: Read>(reader: &mut R) -> Result<i32, Self::Error> {
        read_i32_le(reader).map_err(Into::into)
    }

    /// Reads a little-endian `u64`.
    fn read_u64_le<R: Read>(reader: &mut R) -> Result<u64, Self::Error> {
        read_u64_le(reader).map_err(Into::into)
    }

    /// Reads `n` raw bytes.
    fn read_slice<R: Read>(reader: &mut R, n: usize) -> Result<Vec<u8>, Self::Error> {
        read_slice(reader, n).map_err(Into::into)
    }

    /// Reads a compact-size varint.
    fn read_compact_int<R: Read>(reader: &mut R) -> Result<u64, Self::Error> {
        read_compact_int(reader).map_err(Into::into)
    }

    /// Reads a varint-length-prefixed byte string.
    fn read_varslice<R: Read>(reader: &mut R) -> Result<Vec<u8>, Self::Error> {
        read_varslice(reader).map_err(Into::into)
    }

    /// Reads a varint count followed by that many varslices.
    fn read_vector<R: Read>(reader: &mut R) -> Result<Vec<Vec<u8>>, Self::Error> {
        read_vector(reader).map_err(Into::into)
    }

    /// Writes a single raw byte.
    fn write_u8<W: Write>(writer: &mut W, byte: u8) -> Result<usize, Self::Error> {
        write_u8(writer, byte).map_err(Into::into)
    }

    /// Writes a raw byte slice verbatim.
    fn write_slice<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<usize, Self::Error> {
        write_slice(writer, bytes).map_err(Into::into)
    }

    /// Writes a little-endian `u32`.
    fn write_u32_le<W: Write>(writer: &mut W, number: u32) -> Result<usize, Self::Error> {
        write_u32_le(writer, number).map_err(Into::into)
    }

    /// Writes a little-endian `i32`.
    fn write_i32_le<W: Write>(writer: &mut W, number: i32) -> Result<usize, Self::Error> {
        write_i32_le(writer, number).map_err(Into::into)
    }

    /// Writes a little-endian `u64`.
    fn write_u64_le<W: Write>(writer: &mut W, number: u64) -> Result<usize, Self::Error> {
        write_u64_le(writer, number).map_err(Into::into)
    }

    /// Writes a compact-size varint.
    fn write_compact_int<W: Write>(writer: &mut W, number: u64) -> Result<usize, Self::Error> {
        write_compact_int(writer, number).map_err(Into::into)
    }

    /// Writes a varint length prefix followed by `bytes`.
    fn write_varslice<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<usize, Self::Error> {
        write_varslice(writer, bytes).map_err(Into::into)
    }

    /// Writes a varint count followed by each item as a varslice.
    fn write_vector<W: Write>(writer: &mut W, items: &[Vec<u8>]) -> Result<usize, Self::Error> {
        write_vector(writer, items).map_err(Into::into)
    }

    /// Decodes a hex string and deserializes `Self` from it.
    fn deserialize_hex(s: &str) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let bytes = hex::decode(s).map_err(SerError::from)?;
        Self::read_from(&mut bytes.as_slice())
    }

    /// Serializes `self` and hex-encodes the result.
    fn serialize_hex(&self) -> Result<String, Self::Error> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(hex::encode(buf))
    }
}

/// The byte length of a varint encoding the given count, for use when
/// pre-sizing buffers before allocating.
pub fn encoding_length(count: usize) -> usize {
    prefix_byte_len(count as u64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_matches_byte_len_and_prefix() {
        let cases = [
            (1u64, 1usize, None),
            (0xff, 3, Some(0xfd)),
            (0xffff_ffff, 5, Some(0xfe)),
            (0xffff_ffff_ffff_ffff, 9, Some(0xff)),
        ];
        for (number, width, prefix) in cases.iter() {
            assert_eq!(prefix_byte_len(*number), *width);
            assert_eq!(first_byte_for_width(*width), *prefix);
        }
    }

    #[test]
    fn it_round_trips_compact_ints() {
        let cases = [0u64, 1, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, u64::MAX];
        for number in cases.iter() {
            let mut buf = Vec::new();
            write_compact_int(&mut buf, *number).unwrap();
            assert_eq!(buf.len(), prefix_byte_len(*number));
            let decoded = read_compact_int(&mut buf.as_slice()).unwrap();
            assert_eq!(decoded, *number);
        }
    }

    #[test]
    fn it_rejects_non_minimal_varints() {
        // 0xfd followed by 0x00 0x00 encodes the value 0, which should have
        // used the 1-byte form.
        let buf = [0xfdu8, 0x00, 0x00];
        match read_compact_int(&mut buf.as_ref()) {
            Err(SerError::NonMinimalVarInt) => {}
            other => panic!("expected NonMinimalVarInt, got {:?}", other),
        }
    }
}
