//! Seekable byte/bit cursor over an in-memory buffer.
//!
//! All three format decoders read through [`BinaryCursor`]. Byte-level reads
//! interpret multi-byte values in the active [`Endianness`] and must start on
//! a byte boundary. Bit-level reads consume the current byte most significant
//! bit first and advance to the next byte once all 8 bits are used.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::Encoding;

use crate::error::{DecodeError, Result};

/// Byte order applied to multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Byte/bit reader over a borrowed buffer.
///
/// Holds the byte offset, a pending bit offset (0–7, non-zero only while a
/// byte is partially consumed) and the current endianness. One cursor is
/// created per decode call.
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    position: usize,
    bit_offset: u8,
    endianness: Endianness,
    encoding: &'static Encoding,
}

macro_rules! read_ordered {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $width:expr, $read:ident) => {
        $(#[$doc])*
        pub fn $name(&mut self) -> Result<$ty> {
            let bytes = self.take($width)?;
            Ok(match self.endianness {
                Endianness::Little => LittleEndian::$read(bytes),
                Endianness::Big => BigEndian::$read(bytes),
            })
        }
    };
}

impl<'a> BinaryCursor<'a> {
    /// Create a little-endian cursor at offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            bit_offset: 0,
            endianness: Endianness::Little,
            encoding: encoding_rs::WINDOWS_1252,
        }
    }

    /// Create a cursor with the given byte order.
    pub fn with_endianness(data: &'a [u8], endianness: Endianness) -> Self {
        let mut cursor = Self::new(data);
        cursor.endianness = endianness;
        cursor
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bits already consumed from the byte at [`position`](Self::position).
    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Whether the byte offset has reached the buffer length.
    pub fn is_end_of_file(&self) -> bool {
        self.position >= self.data.len()
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Change the byte order of subsequent multi-byte reads.
    ///
    /// Does not move the cursor.
    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Text encoding used by [`read_string`](Self::read_string).
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }

    // ---------------------------------------------------------------
    // Positioning
    // ---------------------------------------------------------------

    /// Move the byte cursor `count` bytes forward, dropping any pending bits.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let target = self
            .position
            .checked_add(count)
            .ok_or_else(|| self.out_of_bounds(count))?;
        self.seek(target)
    }

    /// Move the byte cursor to an absolute offset, dropping any pending bits.
    ///
    /// Seeking to exactly the buffer length is allowed (end of file).
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(DecodeError::OutOfBounds {
                offset: position,
                requested: 0,
                length: self.data.len(),
            });
        }
        self.position = position;
        self.bit_offset = 0;
        Ok(())
    }

    /// Read the byte at an absolute offset without moving the cursor.
    pub fn peek_u8_at(&self, position: usize) -> Result<u8> {
        self.data
            .get(position)
            .copied()
            .ok_or(DecodeError::OutOfBounds {
                offset: position,
                requested: 1,
                length: self.data.len(),
            })
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn out_of_bounds(&self, requested: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            offset: self.position,
            requested,
            length: self.data.len(),
        }
    }

    /// Consume `count` bytes; requires a byte-aligned cursor.
    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.bit_offset != 0 {
            return Err(DecodeError::Misaligned {
                offset: self.position,
                bit_offset: self.bit_offset,
            });
        }
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(count))?;
        let data: &'a [u8] = self.data;
        let bytes = &data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    // ---------------------------------------------------------------
    // Byte-level reads
    // ---------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    read_ordered!(read_u16, u16, 2, read_u16);
    read_ordered!(read_i16, i16, 2, read_i16);
    read_ordered!(read_u32, u32, 4, read_u32);
    read_ordered!(read_i32, i32, 4, read_i32);
    read_ordered!(read_u64, u64, 8, read_u64);
    read_ordered!(read_i64, i64, 8, read_i64);
    read_ordered!(read_f32, f32, 4, read_f32);
    read_ordered!(read_f64, f64, 8, read_f64);

    /// Read one byte as a character (Latin-1 mapping).
    pub fn read_char(&mut self) -> Result<char> {
        Ok(self.read_u8()? as char)
    }

    /// Read `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    /// Read `count` bytes and decode them as text.
    ///
    /// NUL bytes are kept, so the result always represents exactly `count`
    /// source bytes; see [`strip_nul`] for callers that want them removed.
    pub fn read_string(&mut self, count: usize) -> Result<String> {
        let bytes = self.take(count)?;
        let (decoded, _) = self.encoding.decode_without_bom_handling(bytes);
        Ok(decoded.into_owned())
    }

    // ---------------------------------------------------------------
    // Bit-level reads
    // ---------------------------------------------------------------

    /// Read one bit, most significant bit of the current byte first.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.position)
            .copied()
            .ok_or_else(|| self.out_of_bounds(1))?;
        let bit = (byte >> (7 - self.bit_offset)) & 1 == 1;
        self.bit_offset += 1;
        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.position += 1;
        }
        Ok(bit)
    }

    /// Read `count` bits (at most 32) into the low bits of the result.
    ///
    /// The first bit read becomes the most significant bit of the value.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        if count > 32 {
            return Err(DecodeError::InvalidFormat(format!(
                "Cannot read {} bits into a 32-bit value",
                count
            )));
        }
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }
}

/// Remove every NUL byte from decoded fixed-width text.
pub fn strip_nul(text: &str) -> String {
    text.chars().filter(|c| *c != '\0').collect()
}
