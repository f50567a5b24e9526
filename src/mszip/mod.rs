//! MS-ZIP chained deflate decoder
//!
//! MS-ZIP is the deflate flavour used inside CAB folders: each block is
//! "CK" plus an independent raw deflate stream, at most 32 KiB of output,
//! whose matches may reference the previous block's output. Block
//! boundaries come from the surrounding container.

mod decoder;
pub mod inflate;

pub use decoder::MsZipDecoder;
pub use inflate::{InflateEngine, MinizInflater};

use crate::common::{LzError, Result};

/// Convenience function to decode consecutive framed blocks in memory
pub fn decode_blocks<'a, I>(blocks: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut decoder = MsZipDecoder::new();
    let mut output = Vec::new();
    for block in blocks {
        if !decoder.decode_block(block, &mut output)? {
            return Err(LzError::SinkNotWritable);
        }
    }
    Ok(output)
}
