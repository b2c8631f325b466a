use crate::error::{DemuxError, Result};

/// A saved read position inside a [`BitReader`].
///
/// Cursors are plain values. They are captured with [`BitReader::cursor`] and
/// handed back to [`BitReader::restore`] to continue reading where an earlier
/// pass stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cursor {
    /// Index of the byte holding the next bit.
    pub byte_offset: usize,
    /// Bit index within that byte, 0 being the most significant.
    pub bit_offset: u8,
}

impl Cursor {
    /// Absolute position in bits from the start of the data.
    pub fn bit_position(&self) -> usize {
        self.byte_offset * 8 + self.bit_offset as usize
    }
}

/// A bit-level reader over RBSP data.
///
/// Implements the H.264/H.265/H.266 style read operations:
/// - Reading individual bits and flags
/// - Reading multiple bits as numbers, u(n)
/// - Reading exponential Golomb codes, ue(v) and se(v)
/// - Saving and restoring the read position
///
/// Example:
/// ```
/// use esdemux::utils::BitReader;
///
/// let data = [0b10110011];
/// let mut reader = BitReader::new(&data);
///
/// assert_eq!(reader.read_bit().unwrap(), true);
/// let mark = reader.cursor();
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011);
/// reader.restore(mark).unwrap();
/// assert_eq!(reader.read_bits(3).unwrap(), 0b011);
/// ```
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_offset: usize,
    bit_offset: u8,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    /// The data this reader walks over.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Reads a single bit. Returns true for 1, false for 0.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.byte_offset >= self.data.len() {
            return Err(DemuxError::Parser("reached end of data".into()));
        }

        let bit = (self.data[self.byte_offset] >> (7 - self.bit_offset)) & 1;
        self.bit_offset += 1;

        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.byte_offset += 1;
        }

        Ok(bit == 1)
    }

    /// Reads n bits as a big-endian number, u(n).
    ///
    /// Fails if n > 32 or the data runs out. Reading zero bits yields 0.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if n > 32 {
            return Err(DemuxError::Parser(format!(
                "cannot read {} bits into a 32 bit value",
                n
            )));
        }
        if (n as usize) > self.available_bits() {
            return Err(DemuxError::Parser(format!(
                "requested {} bits with {} left",
                n,
                self.available_bits()
            )));
        }

        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value as u32)
    }

    /// Reads an unsigned exponential Golomb code, ue(v).
    ///
    /// M leading zeros, a 1, then M info bits: value = 2^M + info - 1.
    pub fn read_golomb(&mut self) -> Result<u32> {
        let mut leading_zeros = 0u32;
        while !self.read_bit()? {
            leading_zeros += 1;
            if leading_zeros > 31 {
                return Err(DemuxError::Parser("invalid exp-golomb code".into()));
            }
        }

        if leading_zeros == 0 {
            return Ok(0);
        }

        let info = self.read_bits(leading_zeros)? as u64;
        Ok(((1u64 << leading_zeros) + info - 1) as u32)
    }

    /// Reads a signed exponential Golomb code, se(v).
    ///
    /// Odd codes map to positive values, even codes to negative ones.
    pub fn read_signed_golomb(&mut self) -> Result<i32> {
        let k = self.read_golomb()? as i64;
        let magnitude = (k + 1) >> 1;
        let value = if k & 1 == 1 { magnitude } else { -magnitude };
        Ok(value as i32)
    }

    /// Skips n bits.
    pub fn skip_bits(&mut self, n: u32) -> Result<()> {
        if (n as usize) > self.available_bits() {
            return Err(DemuxError::Parser(format!(
                "cannot skip {} bits with {} left",
                n,
                self.available_bits()
            )));
        }
        let target = self.cursor().bit_position() + n as usize;
        self.byte_offset = target / 8;
        self.bit_offset = (target % 8) as u8;
        Ok(())
    }

    /// Moves to the next byte boundary unless already aligned.
    pub fn align_byte(&mut self) {
        if self.bit_offset != 0 {
            self.bit_offset = 0;
            self.byte_offset += 1;
        }
    }

    /// Whether the next read starts on a byte boundary.
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_offset == 0
    }

    /// Number of bits left to read.
    pub fn available_bits(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.cursor().bit_position())
    }

    /// Snapshot of the current read position.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            byte_offset: self.byte_offset,
            bit_offset: self.bit_offset,
        }
    }

    /// Continues reading from a position captured earlier with [`cursor`](Self::cursor).
    ///
    /// The cursor may come from a different reader over the same bytes.
    pub fn restore(&mut self, cursor: Cursor) -> Result<()> {
        if cursor.bit_offset > 7 || cursor.bit_position() > self.data.len() * 8 {
            return Err(DemuxError::Parser(format!(
                "cursor {}:{} lies outside {} bytes of data",
                cursor.byte_offset,
                cursor.bit_offset,
                self.data.len()
            )));
        }
        self.byte_offset = cursor.byte_offset;
        self.bit_offset = cursor.bit_offset;
        Ok(())
    }
}
