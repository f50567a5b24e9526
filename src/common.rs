//! Common types and constants for the legacy decoders
//!
//! This module defines the error type, statistics and buffer constants shared
//! by the SZDD/KWAJ window decoder and the MS-ZIP block decoder.

use crate::lz::FormatVariant;
use thiserror::Error;

/// Error type for decoding operations
#[derive(Debug, Error)]
pub enum LzError {
    /// MS-ZIP block did not start with the "CK" signature
    #[error("Invalid MS-ZIP block signature: expected 0x4B43, found {found:#06X}")]
    BadBlockSignature {
        /// The two bytes found at the start of the block, little-endian
        found: u16,
    },

    /// Unexpected end of input
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// Bit read request larger than the bit register supports
    #[error("Invalid bit count: {0} (expected at most 24)")]
    InvalidBitCount(u32),

    /// Container header is missing, truncated or malformed
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// KWAJ compression method outside the known set
    #[error("Unsupported KWAJ compression method: {0}")]
    UnsupportedMethod(u16),

    /// Format variant that cannot be decoded
    #[error("Unsupported format variant: {0:?}")]
    UnsupportedVariant(FormatVariant),

    /// Output sink refused writes
    #[error("Output sink does not accept writes")]
    SinkNotWritable,

    /// Inflate engine failure
    #[error("Inflate error: {0}")]
    Inflate(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, LzError>;

/// Size of the buffered input chunk pulled from a byte source
pub const IN_BUFF_SIZE: usize = 0x800;

/// Size of the SZDD/KWAJ circular dictionary window
pub const WINDOW_SIZE: usize = 0x1000;

/// Mask applied to window offsets
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Byte the window is filled with before decoding starts
pub const WINDOW_FILL: u8 = b' ';

/// Smallest match length of the token format
pub const MIN_MATCH_LENGTH: usize = 3;

/// Largest match length of the token format (4-bit field + 3)
pub const MAX_MATCH_LENGTH: usize = 0x0F + MIN_MATCH_LENGTH;

/// MS-ZIP block signature ("CK" read as little-endian u16)
pub const MSZIP_SIGNATURE: u16 = 0x4B43;

/// Largest decompressed size of a single MS-ZIP block
pub const MSZIP_MAX_BLOCK: usize = 0x8000;

/// Statistics for a decode run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Number of literal tokens decoded
    pub literal_count: usize,
    /// Number of match tokens decoded
    pub match_count: usize,
    /// Total bytes written to the sink
    pub bytes_written: usize,
    /// Longest match replayed
    pub longest_match: usize,
}

impl DecodeStats {
    pub(crate) fn record_literal(&mut self) {
        self.literal_count += 1;
        self.bytes_written += 1;
    }

    pub(crate) fn record_match(&mut self, length: usize) {
        self.match_count += 1;
        self.bytes_written += length;
        self.longest_match = self.longest_match.max(length);
    }
}
