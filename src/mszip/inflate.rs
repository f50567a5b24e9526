//! Raw deflate engine used by the MS-ZIP decoder
//!
//! [`InflateEngine`] is the seam between block framing and the deflate
//! decoder itself. [`MinizInflater`] drives `miniz_oxide`'s core decoder
//! over a non-wrapping output buffer whose front holds the dictionary, so
//! back-references may reach into it.

use crate::common::{LzError, Result, MSZIP_MAX_BLOCK};
use miniz_oxide::inflate::core::inflate_flags::TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF;
use miniz_oxide::inflate::core::{decompress, DecompressorOxide};
use miniz_oxide::inflate::TINFLStatus;

/// A raw (headerless) deflate decoder that accepts a preset dictionary
pub trait InflateEngine {
    /// Decode one complete deflate stream, seeding the window with `dictionary`
    ///
    /// Returns only the bytes produced by `input`, never the dictionary.
    fn inflate(&mut self, input: &[u8], dictionary: Option<&[u8]>) -> Result<Vec<u8>>;
}

/// [`InflateEngine`] backed by `miniz_oxide`
#[derive(Default)]
pub struct MinizInflater {
    state: Box<DecompressorOxide>,
}

impl MinizInflater {
    /// Create a new engine
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MinizInflater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinizInflater").finish_non_exhaustive()
    }
}

impl InflateEngine for MinizInflater {
    fn inflate(&mut self, input: &[u8], dictionary: Option<&[u8]>) -> Result<Vec<u8>> {
        let dictionary = dictionary.unwrap_or_default();
        *self.state = DecompressorOxide::new();

        let mut out = Vec::with_capacity(dictionary.len() + MSZIP_MAX_BLOCK);
        out.extend_from_slice(dictionary);
        out.resize(dictionary.len() + MSZIP_MAX_BLOCK, 0);

        let mut in_pos = 0;
        let mut out_pos = dictionary.len();
        loop {
            let (status, consumed, produced) = decompress(
                &mut self.state,
                &input[in_pos..],
                &mut out,
                out_pos,
                TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF,
            );
            in_pos += consumed;
            out_pos += produced;

            match status {
                TINFLStatus::Done => break,
                TINFLStatus::HasMoreOutput => {
                    let grown = out.len() + MSZIP_MAX_BLOCK;
                    out.resize(grown, 0);
                }
                TINFLStatus::NeedsMoreInput | TINFLStatus::FailedCannotMakeProgress => {
                    return Err(LzError::UnexpectedEof);
                }
                other => {
                    return Err(LzError::Inflate(format!(
                        "{other:?} after {in_pos} input bytes"
                    )));
                }
            }
        }

        out.truncate(out_pos);
        Ok(out.split_off(dictionary.len()))
    }
}
