//! SZDD / KWAJ window decoder
//!
//! This module decodes the LZSS-style streams written by Microsoft's
//! COMPRESS.EXE (SZDD and KWAJ containers) and the QBasic 4.5 installer,
//! plus the stored and XOR-obscured KWAJ passthrough methods.
//!
//! The dictionary window stays inside the decoder:
//!
//! ```compile_fail
//! use lzexpand::lz::Window;
//! ```

mod decoder;
pub mod header;
mod variant;
mod window;

pub use decoder::LzDecoder;
pub use header::Container;
pub use variant::FormatVariant;
pub(crate) use window::Window;

use crate::common::{LzError, Result};
use log::warn;
use std::io::Cursor;

/// Output staging size before bytes are written to the sink
pub const OUT_BUFF_SIZE: usize = 0x2000;

/// Convenience function to decode a bare stream (no container header) in memory
pub fn expand_bytes(data: &[u8], variant: FormatVariant) -> Result<Vec<u8>> {
    let mut decoder = LzDecoder::new(variant);
    let mut output = Vec::new();
    if !decoder.decompress(Cursor::new(data), &mut output)? {
        return Err(LzError::UnsupportedVariant(variant));
    }
    Ok(output)
}

/// Decode a complete SZDD, QBasic or KWAJ file held in memory
///
/// Returns the parsed header alongside the decoded body. A body shorter
/// than the declared size is logged, not rejected.
pub fn expand_file_bytes(data: &[u8]) -> Result<(Container, Vec<u8>)> {
    let container = Container::detect(data)?;
    let body = data.get(container.data_offset()..).unwrap_or_default();
    let output = expand_bytes(body, container.variant())?;

    if let Some(expected) = container.uncompressed_size() {
        if expected as usize != output.len() {
            warn!(
                "{} header declares {} bytes, decoded {}",
                container.name(),
                expected,
                output.len()
            );
        }
    }

    Ok((container, output))
}
