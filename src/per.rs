//! PER (Packed Encoding Rules) encoding/decoding
//!
//! Implementation of Aligned PER (APER) as used by the NRPPA positioning
//! protocol. Based on ITU-T X.691.

use bitvec::prelude::*;
use bytes::Bytes;
use thiserror::Error;

/// PER codec errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerError {
    #[error("Buffer underflow: need {needed} bits, have {available}")]
    BufferUnderflow { needed: usize, available: usize },
    #[error("Invalid constraint: value {value} not in range {min}..={max}")]
    ConstraintViolation { value: i64, min: i64, max: i64 },
    #[error("Invalid choice index: {index} (max {max})")]
    InvalidChoiceIndex { index: usize, max: usize },
    #[error("Invalid length: {length}")]
    InvalidLength { length: usize },
    #[error("Unknown IE id: {id}")]
    UnknownIeId { id: u32 },
    #[error("Missing mandatory IE: id={id}")]
    MissingMandatoryIe { id: u32 },
    #[error("Decode error: {0}")]
    DecodeError(String),
}

pub type PerResult<T> = Result<T, PerError>;

/// Constraint definition for constrained integers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub min: i64,
    pub max: i64,
    pub extensible: bool,
}

impl Constraint {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max, extensible: false }
    }

    pub const fn extensible(min: i64, max: i64) -> Self {
        Self { min, max, extensible: true }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of distinct values in the root range
    pub fn range(&self) -> u64 {
        if self.max >= self.min {
            (self.max - self.min) as u64 + 1
        } else {
            0
        }
    }

    /// Bits needed to encode an offset into the root range
    pub fn bits_needed(&self) -> usize {
        let range = self.range();
        if range <= 1 {
            0
        } else {
            64 - (range - 1).leading_zeros() as usize
        }
    }
}

fn octets_for(value: u64) -> usize {
    if value == 0 {
        1
    } else {
        (64 - value.leading_zeros() as usize + 7) / 8
    }
}

/// APER (Aligned PER) Encoder
pub struct AperEncoder {
    buffer: BitVec<u8, Msb0>,
}

impl AperEncoder {
    pub fn new() -> Self {
        Self { buffer: BitVec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self { buffer: BitVec::with_capacity(bits) }
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buffer.into_vec())
    }

    /// Get current bit position
    pub fn bit_position(&self) -> usize {
        self.buffer.len()
    }

    /// Align to octet boundary
    pub fn align(&mut self) {
        let remainder = self.buffer.len() % 8;
        if remainder != 0 {
            for _ in 0..(8 - remainder) {
                self.buffer.push(false);
            }
        }
    }

    /// Write a single bit
    pub fn write_bit(&mut self, bit: bool) {
        self.buffer.push(bit);
    }

    /// Write multiple bits from a value (MSB first)
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        for i in (0..num_bits).rev() {
            self.buffer.push((value >> i) & 1 == 1);
        }
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_bits(*byte as u64, 8);
        }
    }

    /// Encode constrained whole number (X.691 Section 12.2)
    pub fn encode_constrained_whole_number(
        &mut self,
        value: i64,
        constraint: &Constraint,
    ) -> PerResult<()> {
        if !constraint.contains(value) {
            return Err(PerError::ConstraintViolation {
                value,
                min: constraint.min,
                max: constraint.max,
            });
        }

        let range = constraint.range();
        let offset = (value - constraint.min) as u64;

        if range == 1 {
            // Single-valued range: no bits on the wire
            return Ok(());
        }

        if range <= 255 {
            // Non-negative-binary-integer in minimum bits, unaligned
            self.write_bits(offset, constraint.bits_needed());
        } else if range == 256 {
            self.align();
            self.write_bits(offset, 8);
        } else if range <= 65536 {
            self.align();
            self.write_bits(offset, 16);
        } else {
            // Indefinite-length case (12.2.6): octet count, then aligned offset
            let max_octets = octets_for(range - 1);
            let n = octets_for(offset);
            self.encode_constrained_whole_number(
                n as i64,
                &Constraint::new(1, max_octets as i64),
            )?;
            self.align();
            self.write_bits(offset, n * 8);
        }

        Ok(())
    }

    /// Encode a constrained integer honoring the extension marker.
    ///
    /// Values inside the root range get a 0 escape bit followed by the
    /// constrained encoding; values outside it get a 1 escape bit followed
    /// by the unconstrained length-prefixed encoding.
    pub fn encode_constrained_integer(
        &mut self,
        value: i64,
        constraint: &Constraint,
    ) -> PerResult<()> {
        if !constraint.extensible {
            return self.encode_constrained_whole_number(value, constraint);
        }
        let in_root = constraint.contains(value);
        self.write_bit(!in_root);
        if in_root {
            self.encode_constrained_whole_number(value, constraint)
        } else {
            self.encode_unconstrained_whole_number(value)
        }
    }

    /// Encode unconstrained whole number (X.691 Section 12.2.6)
    pub fn encode_unconstrained_whole_number(&mut self, value: i64) -> PerResult<()> {
        let bytes = if value >= 0 {
            let mut v = value as u64;
            let mut buf = Vec::new();
            if v == 0 {
                buf.push(0);
            } else {
                while v > 0 {
                    buf.push((v & 0xFF) as u8);
                    v >>= 8;
                }
                buf.reverse();
                // Leading zero keeps the sign bit clear
                if buf[0] & 0x80 != 0 {
                    buf.insert(0, 0);
                }
            }
            buf
        } else {
            let mut v = value;
            let mut buf = Vec::new();
            loop {
                buf.push((v & 0xFF) as u8);
                v >>= 8;
                if v == -1 && (buf.last().unwrap() & 0x80 != 0) {
                    break;
                }
                if v == 0 && (buf.last().unwrap() & 0x80 == 0) {
                    break;
                }
            }
            buf.reverse();
            buf
        };

        self.encode_length_determinant(bytes.len())?;
        self.write_bytes(&bytes);
        Ok(())
    }

    /// Encode length determinant (X.691 Section 11.9), with 16K
    /// fragmentation for lengths above 16383.
    pub fn encode_length_determinant(&mut self, length: usize) -> PerResult<()> {
        self.align();
        let mut remaining = length;
        while remaining >= 16384 {
            let chunks = std::cmp::min(remaining / 16384, 4);
            self.write_bits(0xC0 | chunks as u64, 8);
            remaining -= chunks * 16384;
        }
        if remaining <= 127 {
            // Short form: 0xxxxxxx
            self.write_bits(remaining as u64, 8);
        } else {
            // Long form: 10xxxxxx xxxxxxxx
            self.write_bits(0x8000 | remaining as u64, 16);
        }
        Ok(())
    }

    /// Encode constrained length determinant
    pub fn encode_constrained_length(
        &mut self,
        length: usize,
        min: usize,
        max: usize,
    ) -> PerResult<()> {
        let constraint = Constraint::new(min as i64, max as i64);
        self.encode_constrained_whole_number(length as i64, &constraint)
    }

    /// Encode ENUMERATED (X.691 Section 14)
    ///
    /// Extension values encode their index relative to the root count as
    /// a normally small non-negative number, mirroring the CHOICE codec.
    pub fn encode_enumerated(&mut self, value: i64, constraint: &Constraint) -> PerResult<()> {
        if constraint.extensible {
            let in_root = constraint.contains(value);
            self.write_bit(!in_root);
            if in_root {
                self.encode_constrained_whole_number(value, constraint)?;
            } else {
                if value <= constraint.max {
                    return Err(PerError::ConstraintViolation {
                        value,
                        min: constraint.min,
                        max: constraint.max,
                    });
                }
                self.encode_normally_small_non_negative((value - constraint.max - 1) as u64)?;
            }
        } else {
            self.encode_constrained_whole_number(value, constraint)?;
        }
        Ok(())
    }

    /// Encode normally small non-negative whole number (X.691 Section 11.6)
    pub fn encode_normally_small_non_negative(&mut self, value: u64) -> PerResult<()> {
        if value <= 63 {
            self.write_bit(false);
            self.write_bits(value, 6);
        } else {
            self.write_bit(true);
            self.encode_unconstrained_whole_number(value as i64)?;
        }
        Ok(())
    }

    /// Encode CHOICE index (X.691 Section 23)
    pub fn encode_choice_index(
        &mut self,
        index: usize,
        num_alternatives: usize,
        extensible: bool,
    ) -> PerResult<()> {
        if extensible {
            let in_root = index < num_alternatives;
            self.write_bit(!in_root);
            if in_root {
                let constraint = Constraint::new(0, (num_alternatives - 1) as i64);
                self.encode_constrained_whole_number(index as i64, &constraint)?;
            } else {
                self.encode_normally_small_non_negative((index - num_alternatives) as u64)?;
            }
        } else {
            if index >= num_alternatives {
                return Err(PerError::InvalidChoiceIndex {
                    index,
                    max: num_alternatives - 1,
                });
            }
            let constraint = Constraint::new(0, (num_alternatives - 1) as i64);
            self.encode_constrained_whole_number(index as i64, &constraint)?;
        }
        Ok(())
    }

    /// Encode the preamble of an extensible SEQUENCE: the extension bit
    /// followed by one presence bit per OPTIONAL/DEFAULT field, in
    /// declaration order.
    pub fn encode_sequence_preamble(&mut self, ext: bool, optionals: &[bool]) {
        self.write_bit(ext);
        for &present in optionals {
            self.write_bit(present);
        }
    }

    /// Encode an open-type value: the payload is produced against a fresh
    /// encoder, octet-aligned, and wrapped in a length-prefixed envelope.
    pub fn encode_open_type<F>(&mut self, f: F) -> PerResult<()>
    where
        F: FnOnce(&mut AperEncoder) -> PerResult<()>,
    {
        let mut inner = AperEncoder::new();
        f(&mut inner)?;
        inner.align();
        let payload = inner.into_bytes();
        self.encode_length_determinant(payload.len())?;
        self.write_bytes(&payload);
        Ok(())
    }

    /// Encode a SEQUENCE OF with SIZE(min..max): constrained count, then
    /// each element via the supplied element codec.
    pub fn encode_seq_of<T, F>(
        &mut self,
        items: &[T],
        min_size: usize,
        max_size: usize,
        mut f: F,
    ) -> PerResult<()>
    where
        F: FnMut(&mut AperEncoder, &T) -> PerResult<()>,
    {
        self.encode_constrained_length(items.len(), min_size, max_size)?;
        for item in items {
            f(self, item)?;
        }
        Ok(())
    }

    /// Encode OCTET STRING (X.691 Section 17)
    pub fn encode_octet_string(
        &mut self,
        data: &[u8],
        min_len: Option<usize>,
        max_len: Option<usize>,
    ) -> PerResult<()> {
        let len = data.len();

        match (min_len, max_len) {
            (Some(min), Some(max)) if min == max => {
                // Fixed size: no length on the wire
                if len != min {
                    return Err(PerError::InvalidLength { length: len });
                }
                if min > 2 {
                    self.align();
                }
                self.write_bytes(data);
            }
            (Some(min), Some(max)) => {
                self.encode_constrained_length(len, min, max)?;
                if max > 2 {
                    self.align();
                }
                self.write_bytes(data);
            }
            _ => {
                self.encode_length_determinant(len)?;
                self.write_bytes(data);
            }
        }
        Ok(())
    }

    /// Encode BIT STRING (X.691 Section 16)
    pub fn encode_bit_string(
        &mut self,
        bits: &BitSlice<u8, Msb0>,
        min_len: Option<usize>,
        max_len: Option<usize>,
    ) -> PerResult<()> {
        let len = bits.len();

        match (min_len, max_len) {
            (Some(min), Some(max)) if min == max => {
                if len != min {
                    return Err(PerError::InvalidLength { length: len });
                }
                if min > 16 {
                    self.align();
                }
                for bit in bits {
                    self.write_bit(*bit);
                }
            }
            (Some(min), Some(max)) => {
                self.encode_constrained_length(len, min, max)?;
                if max > 16 {
                    self.align();
                }
                for bit in bits {
                    self.write_bit(*bit);
                }
            }
            _ => {
                self.encode_length_determinant(len)?;
                for bit in bits {
                    self.write_bit(*bit);
                }
            }
        }
        Ok(())
    }
}

impl Default for AperEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// APER (Aligned PER) Decoder
pub struct AperDecoder<'a> {
    data: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> AperDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: BitSlice::from_slice(data),
            position: 0,
        }
    }

    /// Get current bit position
    pub fn bit_position(&self) -> usize {
        self.position
    }

    /// Get remaining bits
    pub fn remaining_bits(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Align to octet boundary
    pub fn align(&mut self) {
        let remainder = self.position % 8;
        if remainder != 0 {
            self.position += 8 - remainder;
        }
    }

    /// Read a single bit
    pub fn read_bit(&mut self) -> PerResult<bool> {
        if self.position >= self.data.len() {
            return Err(PerError::BufferUnderflow { needed: 1, available: 0 });
        }
        let bit = self.data[self.position];
        self.position += 1;
        Ok(bit)
    }

    /// Read multiple bits as a value (MSB first)
    pub fn read_bits(&mut self, num_bits: usize) -> PerResult<u64> {
        if self.position + num_bits > self.data.len() {
            return Err(PerError::BufferUnderflow {
                needed: num_bits,
                available: self.data.len() - self.position,
            });
        }

        let mut value: u64 = 0;
        for _ in 0..num_bits {
            value = (value << 1) | (self.data[self.position] as u64);
            self.position += 1;
        }
        Ok(value)
    }

    /// Read raw bytes
    pub fn read_bytes(&mut self, num_bytes: usize) -> PerResult<Vec<u8>> {
        if self.remaining_bits() / 8 < num_bytes {
            return Err(PerError::BufferUnderflow {
                needed: num_bytes.saturating_mul(8),
                available: self.remaining_bits(),
            });
        }
        let mut bytes = Vec::with_capacity(num_bytes);
        for _ in 0..num_bytes {
            bytes.push(self.read_bits(8)? as u8);
        }
        Ok(bytes)
    }

    /// Decode constrained whole number (X.691 Section 12.2)
    ///
    /// On-wire values above the declared maximum are a decode error,
    /// never clamped.
    pub fn decode_constrained_whole_number(&mut self, constraint: &Constraint) -> PerResult<i64> {
        let range = constraint.range();

        if range == 1 {
            return Ok(constraint.min);
        }

        let offset = if range <= 255 {
            self.read_bits(constraint.bits_needed())?
        } else if range == 256 {
            self.align();
            self.read_bits(8)?
        } else if range <= 65536 {
            self.align();
            self.read_bits(16)?
        } else {
            let max_octets = octets_for(range - 1);
            let n = self
                .decode_constrained_whole_number(&Constraint::new(1, max_octets as i64))?
                as usize;
            self.align();
            self.read_bits(n * 8)?
        };

        let value = constraint.min + offset as i64;
        if value > constraint.max {
            return Err(PerError::ConstraintViolation {
                value,
                min: constraint.min,
                max: constraint.max,
            });
        }
        Ok(value)
    }

    /// Decode a constrained integer honoring the extension marker.
    pub fn decode_constrained_integer(&mut self, constraint: &Constraint) -> PerResult<i64> {
        if !constraint.extensible {
            return self.decode_constrained_whole_number(constraint);
        }
        let escaped = self.read_bit()?;
        if escaped {
            self.decode_unconstrained_whole_number()
        } else {
            self.decode_constrained_whole_number(constraint)
        }
    }

    /// Decode unconstrained whole number (X.691 Section 12.2.6)
    pub fn decode_unconstrained_whole_number(&mut self) -> PerResult<i64> {
        let len = self.decode_length_determinant()?;
        if len > 8 {
            return Err(PerError::InvalidLength { length: len });
        }
        let bytes = self.read_bytes(len)?;

        if bytes.is_empty() {
            return Ok(0);
        }

        let negative = bytes[0] & 0x80 != 0;
        let mut value: i64 = if negative { -1 } else { 0 };
        for byte in bytes {
            value = (value << 8) | (byte as i64);
        }
        Ok(value)
    }

    /// Decode length determinant (X.691 Section 11.9)
    pub fn decode_length_determinant(&mut self) -> PerResult<usize> {
        self.align();
        let mut total = 0usize;
        loop {
            let first = self.read_bits(8)? as u8;
            if first & 0x80 == 0 {
                // Short form
                return Ok(total + first as usize);
            }
            if first & 0x40 == 0 {
                // Long form
                let second = self.read_bits(8)? as u8;
                return Ok(total + ((((first & 0x3F) as usize) << 8) | (second as usize)));
            }
            // Fragment header: 11xxxxxx
            let chunks = (first & 0x3F) as usize;
            if chunks == 0 || chunks > 4 {
                return Err(PerError::InvalidLength { length: chunks * 16384 });
            }
            total += chunks * 16384;
        }
    }

    /// Decode constrained length determinant
    pub fn decode_constrained_length(&mut self, min: usize, max: usize) -> PerResult<usize> {
        let constraint = Constraint::new(min as i64, max as i64);
        self.decode_constrained_whole_number(&constraint)
            .map(|v| v as usize)
    }

    /// Decode ENUMERATED (X.691 Section 14)
    pub fn decode_enumerated(&mut self, constraint: &Constraint) -> PerResult<i64> {
        if constraint.extensible {
            let extended = self.read_bit()?;
            if !extended {
                self.decode_constrained_whole_number(constraint)
            } else {
                let ext_index = self.decode_normally_small_non_negative()?;
                Ok(constraint.max + 1 + ext_index as i64)
            }
        } else {
            self.decode_constrained_whole_number(constraint)
        }
    }

    /// Decode normally small non-negative whole number (X.691 Section 11.6)
    pub fn decode_normally_small_non_negative(&mut self) -> PerResult<u64> {
        let large = self.read_bit()?;
        if !large {
            self.read_bits(6)
        } else {
            self.decode_unconstrained_whole_number().map(|v| v as u64)
        }
    }

    /// Decode CHOICE index (X.691 Section 23)
    pub fn decode_choice_index(
        &mut self,
        num_alternatives: usize,
        extensible: bool,
    ) -> PerResult<usize> {
        if extensible {
            let extended = self.read_bit()?;
            if !extended {
                let constraint = Constraint::new(0, (num_alternatives - 1) as i64);
                self.decode_constrained_whole_number(&constraint)
                    .map(|v| v as usize)
            } else {
                let ext_index = self.decode_normally_small_non_negative()?;
                Ok(num_alternatives + ext_index as usize)
            }
        } else {
            let constraint = Constraint::new(0, (num_alternatives - 1) as i64);
            self.decode_constrained_whole_number(&constraint)
                .map(|v| v as usize)
        }
    }

    /// Decode the preamble of an extensible SEQUENCE: the extension bit
    /// and one presence bit per OPTIONAL/DEFAULT field.
    pub fn decode_sequence_preamble(&mut self, num_optionals: usize) -> PerResult<(bool, Vec<bool>)> {
        let ext = self.read_bit()?;
        let mut optionals = Vec::with_capacity(num_optionals);
        for _ in 0..num_optionals {
            optionals.push(self.read_bit()?);
        }
        Ok((ext, optionals))
    }

    /// Decode an open-type envelope, returning the aligned payload bytes
    /// for a sub-decoder.
    pub fn decode_open_type_bytes(&mut self) -> PerResult<Vec<u8>> {
        let len = self.decode_length_determinant()?;
        self.read_bytes(len)
    }

    /// Decode a SEQUENCE OF with SIZE(min..max)
    pub fn decode_seq_of<T, F>(
        &mut self,
        min_size: usize,
        max_size: usize,
        mut f: F,
    ) -> PerResult<Vec<T>>
    where
        F: FnMut(&mut AperDecoder<'a>) -> PerResult<T>,
    {
        let count = self.decode_constrained_length(min_size, max_size)?;
        let mut items = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            items.push(f(self)?);
        }
        Ok(items)
    }

    /// Decode OCTET STRING (X.691 Section 17)
    pub fn decode_octet_string(
        &mut self,
        min_len: Option<usize>,
        max_len: Option<usize>,
    ) -> PerResult<Vec<u8>> {
        let len = match (min_len, max_len) {
            (Some(min), Some(max)) if min == max => {
                if min > 2 {
                    self.align();
                }
                min
            }
            (Some(min), Some(max)) => {
                let len = self.decode_constrained_length(min, max)?;
                if max > 2 {
                    self.align();
                }
                len
            }
            _ => self.decode_length_determinant()?,
        };

        self.read_bytes(len)
    }

    /// Decode BIT STRING (X.691 Section 16)
    pub fn decode_bit_string(
        &mut self,
        min_len: Option<usize>,
        max_len: Option<usize>,
    ) -> PerResult<BitVec<u8, Msb0>> {
        let len = match (min_len, max_len) {
            (Some(min), Some(max)) if min == max => {
                if min > 16 {
                    self.align();
                }
                min
            }
            (Some(min), Some(max)) => {
                let len = self.decode_constrained_length(min, max)?;
                if max > 16 {
                    self.align();
                }
                len
            }
            _ => self.decode_length_determinant()?,
        };

        if len > self.remaining_bits() {
            return Err(PerError::BufferUnderflow {
                needed: len,
                available: self.remaining_bits(),
            });
        }
        let mut bits = BitVec::with_capacity(len);
        for _ in 0..len {
            bits.push(self.read_bit()?);
        }
        Ok(bits)
    }
}

/// Trait for types that can be encoded with APER
pub trait AperEncode {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()>;
}

/// Trait for types that can be decoded with APER
pub trait AperDecode: Sized {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_bits_needed() {
        assert_eq!(Constraint::new(0, 0).bits_needed(), 0);
        assert_eq!(Constraint::new(0, 1).bits_needed(), 1);
        assert_eq!(Constraint::new(0, 2).bits_needed(), 2);
        assert_eq!(Constraint::new(0, 3).bits_needed(), 2);
        assert_eq!(Constraint::new(0, 7).bits_needed(), 3);
        assert_eq!(Constraint::new(0, 255).bits_needed(), 8);
        assert_eq!(Constraint::new(1, 65536).bits_needed(), 16);
    }

    #[test]
    fn test_encode_decode_constrained() {
        let constraint = Constraint::new(0, 2);

        for value in 0..=2 {
            let mut encoder = AperEncoder::new();
            encoder.encode_constrained_whole_number(value, &constraint).unwrap();
            encoder.align();

            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            let decoded = decoder.decode_constrained_whole_number(&constraint).unwrap();

            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_encode_decode_large_range() {
        // PointA-sized range: 0..3279165 needs the indefinite-length form
        let constraint = Constraint::new(0, 3279165);
        for value in [0, 1, 255, 256, 65535, 65536, 3279165] {
            let mut encoder = AperEncoder::new();
            encoder.encode_constrained_whole_number(value, &constraint).unwrap();
            encoder.align();

            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            let decoded = decoder.decode_constrained_whole_number(&constraint).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_decode_rejects_above_max() {
        // 3-bit field for 0..4; raw 7 on the wire must not decode
        let constraint = Constraint::new(0, 4);
        let mut encoder = AperEncoder::new();
        encoder.write_bits(7, 3);
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let err = decoder.decode_constrained_whole_number(&constraint).unwrap_err();
        assert!(matches!(err, PerError::ConstraintViolation { value: 7, .. }));
    }

    #[test]
    fn test_extensible_integer_escape() {
        let constraint = Constraint::extensible(0, 15);

        // In-root value: escape bit clear
        let mut encoder = AperEncoder::new();
        encoder.encode_constrained_integer(7, &constraint).unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(decoder.decode_constrained_integer(&constraint).unwrap(), 7);

        // Out-of-root value: escape bit set, unconstrained body
        let mut encoder = AperEncoder::new();
        encoder.encode_constrained_integer(1000, &constraint).unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        assert_eq!(decoder.decode_constrained_integer(&constraint).unwrap(), 1000);
    }

    #[test]
    fn test_encode_decode_length() {
        for len in [0, 1, 127, 128, 255, 1000, 16383, 16384, 20000, 100000] {
            let mut encoder = AperEncoder::new();
            encoder.encode_length_determinant(len).unwrap();

            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            let decoded = decoder.decode_length_determinant().unwrap();

            assert_eq!(len, decoded);
        }
    }

    #[test]
    fn test_enumerated_extension_roundtrip() {
        // Root 0..3, extension values 4 and 5
        let constraint = Constraint::extensible(0, 3);
        for value in [0, 3, 4, 5] {
            let mut encoder = AperEncoder::new();
            encoder.encode_enumerated(value, &constraint).unwrap();
            encoder.align();
            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            assert_eq!(decoder.decode_enumerated(&constraint).unwrap(), value);
        }
    }

    #[test]
    fn test_sequence_preamble_roundtrip() {
        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(false, &[true, false, true]);
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let (ext, optionals) = decoder.decode_sequence_preamble(3).unwrap();
        assert!(!ext);
        assert_eq!(optionals, vec![true, false, true]);
    }

    #[test]
    fn test_open_type_envelope() {
        let mut encoder = AperEncoder::new();
        encoder
            .encode_open_type(|inner| {
                inner.encode_constrained_whole_number(42, &Constraint::new(0, 255))
            })
            .unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = AperDecoder::new(&bytes);
        let payload = decoder.decode_open_type_bytes().unwrap();
        let mut inner = AperDecoder::new(&payload);
        assert_eq!(
            inner.decode_constrained_whole_number(&Constraint::new(0, 255)).unwrap(),
            42
        );
    }

    #[test]
    fn test_seq_of_roundtrip() {
        let items: Vec<i64> = vec![1, 2, 3, 4];
        let mut encoder = AperEncoder::new();
        encoder
            .encode_seq_of(&items, 1, 16, |enc, item| {
                enc.encode_constrained_whole_number(*item, &Constraint::new(0, 15))
            })
            .unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();

        let mut decoder = AperDecoder::new(&bytes);
        let decoded = decoder
            .decode_seq_of(1, 16, |dec| {
                dec.decode_constrained_whole_number(&Constraint::new(0, 15))
            })
            .unwrap();
        assert_eq!(items, decoded);
    }

    #[test]
    fn test_encode_decode_bit_string() {
        let mut bits: BitVec<u8, Msb0> = BitVec::new();
        for i in 0..10 {
            bits.push(i % 3 == 0);
        }

        let mut encoder = AperEncoder::new();
        encoder.encode_bit_string(&bits, Some(1), Some(16)).unwrap();
        encoder.align();

        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let decoded = decoder.decode_bit_string(Some(1), Some(16)).unwrap();

        assert_eq!(bits, decoded);
    }

    #[test]
    fn test_encode_decode_octet_string() {
        let data = vec![0x01, 0x02, 0x03, 0x04];

        let mut encoder = AperEncoder::new();
        encoder.encode_octet_string(&data, None, None).unwrap();

        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let decoded = decoder.decode_octet_string(None, None).unwrap();

        assert_eq!(data, decoded);
    }
}
