//! Control-byte / token-pair decoding
//!
//! Each control byte announces eight tokens, least-significant bit first:
//! a set bit is one literal byte, a clear bit is a two-byte match
//! `(p0, p1)` addressing the window at `p0 | (p1 & 0xF0) << 4` for
//! `(p1 & 0x0F) + 3` bytes. The format has no length field; running out of
//! input, even in the middle of a token, is the end of the stream.

use super::{FormatVariant, Window, OUT_BUFF_SIZE};
use crate::bitstream::{BitReader, Fetch};
use crate::common::{DecodeStats, LzError, Result, MAX_MATCH_LENGTH, MIN_MATCH_LENGTH};
use crate::sink::ByteSink;
use log::debug;
use std::io::Read;

/// Decoder for SZDD/KWAJ token streams and their passthrough modes
///
/// One instance owns its window; reuse it for consecutive streams, or create
/// one per stream when decoding concurrently.
#[derive(Debug, Clone)]
pub struct LzDecoder {
    variant: FormatVariant,
    window: Window,
    stats: DecodeStats,
}

impl LzDecoder {
    /// Create a decoder for `variant`
    pub fn new(variant: FormatVariant) -> Self {
        Self {
            variant,
            window: Window::new(variant.initial_offset()),
            stats: DecodeStats::default(),
        }
    }

    /// The variant this decoder was built for
    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Statistics of the most recent run
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Decode `source` into `sink`
    ///
    /// Returns `Ok(false)` without writing anything when the sink refuses
    /// writes, the variant is unsupported or the first read from `source`
    /// fails. A stream that ends part-way through a token is complete, not
    /// corrupt, and returns `Ok(true)`. Later I/O errors from the source or
    /// sink are propagated.
    pub fn decompress<R, S>(&mut self, source: R, sink: &mut S) -> Result<bool>
    where
        R: Read,
        S: ByteSink + ?Sized,
    {
        if !sink.accepts_writes() {
            debug!("{:?}: sink does not accept writes", self.variant);
            return Ok(false);
        }
        if !self.variant.is_supported() {
            debug!("{:?}: variant is not supported", self.variant);
            return Ok(false);
        }

        let mut input = BitReader::new(source);
        match input.prime() {
            Ok(()) => {}
            Err(LzError::Io(e)) => {
                debug!("{:?}: source is not readable: {}", self.variant, e);
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        self.window.reset(self.variant.initial_offset());
        self.stats = DecodeStats::default();

        if self.variant.is_passthrough() {
            self.passthrough(&mut input, sink)?;
        } else {
            self.expand(&mut input, sink)?;
        }
        sink.flush()?;

        debug!(
            "{:?}: {} -> {} bytes ({} literals, {} matches)",
            self.variant,
            input.bytes_consumed(),
            self.stats.bytes_written,
            self.stats.literal_count,
            self.stats.match_count
        );
        Ok(true)
    }

    /// Copy input to output, applying the variant's XOR mask
    fn passthrough<R, S>(&mut self, input: &mut BitReader<R>, sink: &mut S) -> Result<()>
    where
        R: Read,
        S: ByteSink + ?Sized,
    {
        let mask = self.variant.xor_mask();
        let mut staged = Vec::with_capacity(OUT_BUFF_SIZE);

        while let Fetch::Byte(byte) = input.next_byte()? {
            staged.push(byte ^ mask);
            if staged.len() >= OUT_BUFF_SIZE {
                sink.write_all(&staged)?;
                staged.clear();
            }
        }

        self.stats.bytes_written = input.bytes_consumed() as usize;
        if !staged.is_empty() {
            sink.write_all(&staged)?;
        }
        Ok(())
    }

    /// Main token loop
    fn expand<R, S>(&mut self, input: &mut BitReader<R>, sink: &mut S) -> Result<()>
    where
        R: Read,
        S: ByteSink + ?Sized,
    {
        let mut staged = Vec::with_capacity(OUT_BUFF_SIZE + 8 * MAX_MATCH_LENGTH);

        'stream: loop {
            let control = match input.next_byte()? {
                Fetch::Byte(byte) => byte,
                Fetch::EndOfInput => break,
            };

            for bit in 0..8 {
                if control & (1 << bit) != 0 {
                    let Fetch::Byte(literal) = input.next_byte()? else {
                        break 'stream;
                    };
                    self.window.push(literal);
                    staged.push(literal);
                    self.stats.record_literal();
                } else {
                    let Fetch::Byte(p0) = input.next_byte()? else {
                        break 'stream;
                    };
                    let Fetch::Byte(p1) = input.next_byte()? else {
                        break 'stream;
                    };

                    let position = p0 as usize | ((p1 as usize & 0xF0) << 4);
                    let length = (p1 & 0x0F) as usize + MIN_MATCH_LENGTH;
                    self.window.copy_match(position, length, &mut staged);
                    self.stats.record_match(length);
                }
            }

            if staged.len() >= OUT_BUFF_SIZE {
                sink.write_all(&staged)?;
                staged.clear();
            }
        }

        if !staged.is_empty() {
            sink.write_all(&staged)?;
        }
        Ok(())
    }
}
