//! Buffered byte and bit reader over a byte source
//!
//! [`BitReader`] pulls input from any [`Read`] in fixed chunks of
//! [`IN_BUFF_SIZE`] bytes and hands it out either a byte at a time or a few
//! bits at a time. Bits are delivered least-significant first.

use crate::common::{LzError, Result, IN_BUFF_SIZE};
use std::io::{ErrorKind, Read};

/// Largest bit count accepted by [`BitReader::read_bits`]
pub const MAX_BITS_PER_READ: u32 = 24;

/// Outcome of pulling one byte from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Next input byte
    Byte(u8),
    /// Source exhausted and no buffered bytes remain
    EndOfInput,
}

/// Buffered reader supplying bytes and LSB-first bit fields
#[derive(Debug)]
pub struct BitReader<R: Read> {
    reader: R,
    /// Input chunk buffer
    in_buff: [u8; IN_BUFF_SIZE],
    /// Current position in input buffer
    in_pos: usize,
    /// Number of bytes available in input buffer
    in_bytes: usize,
    /// Bit register, valid bits in the low end
    bit_buff: u32,
    /// Number of valid bits in bit register
    extra_bits: u32,
    /// Bytes handed out so far
    consumed: u64,
    /// Source returned end of input
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    /// Create a new reader over `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            in_buff: [0; IN_BUFF_SIZE],
            in_pos: 0,
            in_bytes: 0,
            bit_buff: 0,
            extra_bits: 0,
            consumed: 0,
            exhausted: false,
        }
    }

    /// Load the next chunk from the source. Returns false once the source is exhausted.
    fn refill(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }

        self.in_pos = 0;
        self.in_bytes = loop {
            match self.reader.read(&mut self.in_buff) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if self.in_bytes == 0 {
            self.exhausted = true;
            return Ok(false);
        }
        Ok(true)
    }

    /// Pull the first chunk from the source without handing out any bytes
    ///
    /// Lets a caller find out whether the source is readable at all before
    /// it commits to producing output. Does nothing once input is buffered.
    pub fn prime(&mut self) -> Result<()> {
        if self.in_pos >= self.in_bytes {
            self.refill()?;
        }
        Ok(())
    }

    /// Fetch the next byte, reporting exhaustion as [`Fetch::EndOfInput`]
    ///
    /// Byte reads come straight from the chunk buffer and do not touch the
    /// bit register.
    pub fn next_byte(&mut self) -> Result<Fetch> {
        if self.in_pos >= self.in_bytes && !self.refill()? {
            return Ok(Fetch::EndOfInput);
        }

        let byte = self.in_buff[self.in_pos];
        self.in_pos += 1;
        self.consumed += 1;
        Ok(Fetch::Byte(byte))
    }

    /// Read the next byte, failing with [`LzError::UnexpectedEof`] at end of input
    pub fn read_byte(&mut self) -> Result<u8> {
        match self.next_byte()? {
            Fetch::Byte(byte) => Ok(byte),
            Fetch::EndOfInput => Err(LzError::UnexpectedEof),
        }
    }

    /// Read the next `n_bits` bits, least-significant bit first
    ///
    /// Whole bytes are shifted into the register above the bits already
    /// held until at least `n_bits` are available. At most 7 bits remain
    /// buffered after the call.
    pub fn read_bits(&mut self, n_bits: u32) -> Result<u32> {
        if n_bits > MAX_BITS_PER_READ {
            return Err(LzError::InvalidBitCount(n_bits));
        }
        if n_bits == 0 {
            return Ok(0);
        }

        while self.extra_bits < n_bits {
            match self.next_byte()? {
                Fetch::Byte(byte) => {
                    self.bit_buff |= (byte as u32) << self.extra_bits;
                    self.extra_bits += 8;
                }
                Fetch::EndOfInput => return Err(LzError::UnexpectedEof),
            }
        }

        let value = self.bit_buff & ((1u32 << n_bits) - 1);
        self.bit_buff >>= n_bits;
        self.extra_bits -= n_bits;
        Ok(value)
    }

    /// Drop the partial byte held in the bit register, returning how many bits were discarded
    pub fn align_to_byte(&mut self) -> u32 {
        let dropped = self.extra_bits;
        self.bit_buff = 0;
        self.extra_bits = 0;
        dropped
    }

    /// Number of valid bits held in the bit register
    pub fn buffered_bits(&self) -> u32 {
        self.extra_bits
    }

    /// Current byte offset into the input
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Consume the reader, returning the underlying source
    ///
    /// Bytes already pulled into the chunk buffer are not returned to the source.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
