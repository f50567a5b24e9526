//! lzexpand - decoders for legacy Microsoft compressed streams
//!
//! This crate provides pure Rust decoders for the compression formats used by
//! MS-DOS and early Windows setup tools: the SZDD and KWAJ containers written
//! by COMPRESS.EXE, the QBasic 4.5 installer variant, and the MS-ZIP chained
//! deflate blocks found inside CAB folders.
//!
//! # Features
//!
//! - SZDD / QBasic / KWAJ window decoder with all seven format variants
//! - Container header detection (SZDD, QBasic, KWAJ with optional fields)
//! - MS-ZIP block decoder carrying dictionary history between blocks
//! - Buffered LSB-first bit reader for bit-packed formats
//! - Streaming API via `Read` sources and `Write` sinks
//!
//! # Example - SZDD / KWAJ
//!
//! ```no_run
//! use lzexpand::{expand_file_bytes, FormatVariant, LzDecoder};
//!
//! // Decode a whole SZDD or KWAJ file, header included
//! let data = std::fs::read("SETUP.EX_")?;
//! let (container, decompressed) = expand_file_bytes(&data)?;
//! println!("{} -> {} bytes", container.name(), decompressed.len());
//!
//! // Or drive the decoder directly over a bare stream
//! let mut decoder = LzDecoder::new(FormatVariant::Standard);
//! let mut output = Vec::new();
//! decoder.decompress(&data[14..], &mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - MS-ZIP
//!
//! ```no_run
//! use lzexpand::MsZipDecoder;
//!
//! // Blocks come from the enclosing CAB folder, one CFDATA payload each
//! let blocks: Vec<Vec<u8>> = Vec::new();
//! let mut decoder = MsZipDecoder::new();
//! let mut output = Vec::new();
//! for block in &blocks {
//!     decoder.decode_block(&block[..], &mut output)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod bitstream;
pub mod common;
pub mod error;
pub mod lz;
pub mod mszip;
pub mod sink;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use bitstream::{BitReader, Fetch};
pub use common::{
    DecodeStats, LzError, Result, MSZIP_MAX_BLOCK, MSZIP_SIGNATURE, WINDOW_SIZE,
};
pub use lz::{Container, FormatVariant, LzDecoder};
pub use mszip::{InflateEngine, MinizInflater, MsZipDecoder};
pub use sink::{ByteSink, WriteSink};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;
#[cfg(feature = "async")]
pub use async_convenience::*;

// Convenience functions

/// Decode a bare SZDD/KWAJ stream (no container header)
///
/// # Arguments
/// * `data` - The compressed stream
/// * `variant` - Format variant the stream was written with
///
/// # Returns
/// A vector containing the decompressed data
pub fn expand_bytes(data: &[u8], variant: FormatVariant) -> Result<Vec<u8>> {
    lz::expand_bytes(data, variant)
}

/// Decode a complete SZDD, QBasic or KWAJ file
///
/// # Arguments
/// * `data` - The file contents, header included
///
/// # Returns
/// The parsed container header and the decompressed data
pub fn expand_file_bytes(data: &[u8]) -> Result<(Container, Vec<u8>)> {
    lz::expand_file_bytes(data)
}

/// Decode consecutive MS-ZIP blocks
///
/// # Arguments
/// * `blocks` - Framed blocks in order, each starting with "CK"
///
/// # Returns
/// The concatenated output of every block
pub fn mszip_decode_blocks<'a, I>(blocks: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    mszip::decode_blocks(blocks)
}
