//! Chained MS-ZIP block decoding
//!
//! Every MS-ZIP block is a "CK" signature followed by a complete raw
//! deflate stream. Back-references may reach into the previous block's
//! output, so the decoder keeps that output as the dictionary for the next
//! block. Only the immediately preceding block is kept.

use super::inflate::{InflateEngine, MinizInflater};
use crate::common::{LzError, Result, MSZIP_SIGNATURE};
use crate::sink::ByteSink;
use log::{debug, trace};
use std::io::Read;

/// Decoder for a sequence of MS-ZIP blocks sharing dictionary history
#[derive(Debug)]
pub struct MsZipDecoder<E: InflateEngine = MinizInflater> {
    engine: E,
    /// Output of the last decoded block
    history: Option<Vec<u8>>,
    blocks_decoded: usize,
}

impl MsZipDecoder<MinizInflater> {
    /// Create a decoder using the built-in inflate engine
    pub fn new() -> Self {
        Self::with_engine(MinizInflater::new())
    }
}

impl Default for MsZipDecoder<MinizInflater> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: InflateEngine> MsZipDecoder<E> {
    /// Create a decoder around a custom inflate engine
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            history: None,
            blocks_decoded: 0,
        }
    }

    /// Decode one framed block from `source` into `sink`
    ///
    /// `source` must yield exactly one block. A missing "CK" signature is
    /// fatal; a sink that refuses writes or a source that cannot be read
    /// at all gives `Ok(false)`. On success the
    /// block's output replaces the stored history.
    pub fn decode_block<R, S>(&mut self, mut source: R, sink: &mut S) -> Result<bool>
    where
        R: Read,
        S: ByteSink + ?Sized,
    {
        let mut signature = Vec::with_capacity(2);
        if let Err(e) = (&mut source).take(2).read_to_end(&mut signature) {
            debug!("MS-ZIP block {}: source is not readable: {}", self.blocks_decoded, e);
            return Ok(false);
        }
        signature.resize(2, 0);
        let found = u16::from_le_bytes([signature[0], signature[1]]);
        if found != MSZIP_SIGNATURE {
            return Err(LzError::BadBlockSignature { found });
        }

        if !sink.accepts_writes() {
            return Ok(false);
        }

        let mut compressed = Vec::new();
        source.read_to_end(&mut compressed)?;

        let output = self.engine.inflate(&compressed, self.history.as_deref())?;
        sink.write_all(&output)?;
        sink.flush()?;

        trace!(
            "MS-ZIP block {}: {} -> {} bytes (dictionary {} bytes)",
            self.blocks_decoded,
            compressed.len() + 2,
            output.len(),
            self.history.as_ref().map_or(0, Vec::len)
        );

        self.history = Some(output);
        self.blocks_decoded += 1;
        Ok(true)
    }

    /// Output of the most recently decoded block
    pub fn history(&self) -> Option<&[u8]> {
        self.history.as_deref()
    }

    /// Number of blocks decoded since creation or the last reset
    pub fn blocks_decoded(&self) -> usize {
        self.blocks_decoded
    }

    /// Forget the history, e.g. at the start of a new CAB folder
    pub fn reset(&mut self) {
        self.history = None;
        self.blocks_decoded = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::WriteSink;
    use miniz_oxide::deflate::compress_to_vec;
    use std::io::Cursor;

    /// Fixed-Huffman block: match length 3 at distance 3, end of block
    const COPY_LAST_THREE: [u8; 5] = [b'C', b'K', 0x03, 0x22, 0x00];

    fn block(data: &[u8]) -> Vec<u8> {
        let mut framed = b"CK".to_vec();
        framed.extend_from_slice(&compress_to_vec(data, 6));
        framed
    }

    #[test]
    fn test_single_block() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        let ok = decoder
            .decode_block(Cursor::new(block(b"hello mszip")), &mut out)
            .unwrap();
        assert!(ok);
        assert_eq!(out, b"hello mszip");
        assert_eq!(decoder.history(), Some(&b"hello mszip"[..]));
        assert_eq!(decoder.blocks_decoded(), 1);
    }

    #[test]
    fn test_second_block_uses_history() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        decoder
            .decode_block(Cursor::new(block(b"abcxyz")), &mut out)
            .unwrap();
        decoder
            .decode_block(Cursor::new(COPY_LAST_THREE), &mut out)
            .unwrap();
        assert_eq!(out, b"abcxyzxyz");
    }

    #[test]
    fn test_history_is_replaced_not_accumulated() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        decoder
            .decode_block(Cursor::new(block(b"first block")), &mut out)
            .unwrap();
        decoder
            .decode_block(Cursor::new(block(b"second")), &mut out)
            .unwrap();
        assert_eq!(decoder.history(), Some(&b"second"[..]));
    }

    #[test]
    fn test_back_reference_without_history_fails() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        let result = decoder.decode_block(Cursor::new(COPY_LAST_THREE), &mut out);
        assert!(matches!(result, Err(LzError::Inflate(_))));
        assert!(decoder.history().is_none());
    }

    #[test]
    fn test_bad_signature_is_fatal() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        let mut data = block(b"payload");
        data[0] = b'X';
        assert!(matches!(
            decoder.decode_block(Cursor::new(data), &mut out),
            Err(LzError::BadBlockSignature { found: 0x4B58 })
        ));
        assert!(matches!(
            decoder.decode_block(Cursor::new(b"C"), &mut out),
            Err(LzError::BadBlockSignature { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_read_only_sink() {
        let mut decoder = MsZipDecoder::new();
        let mut sink = WriteSink::read_only(Vec::new());
        let ok = decoder
            .decode_block(Cursor::new(block(b"data")), &mut sink)
            .unwrap();
        assert!(!ok);
        assert!(decoder.history().is_none());
    }

    #[test]
    fn test_empty_payload_is_truncation() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        assert!(matches!(
            decoder.decode_block(Cursor::new(b"CK"), &mut out),
            Err(LzError::UnexpectedEof)
        ));
    }

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "source is locked",
            ))
        }
    }

    #[test]
    fn test_unreadable_source_is_refused() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        decoder
            .decode_block(Cursor::new(block(b"kept")), &mut out)
            .unwrap();

        assert!(!decoder.decode_block(Unreadable, &mut out).unwrap());
        assert_eq!(out, b"kept");
        assert_eq!(decoder.history(), Some(&b"kept"[..]));
        assert_eq!(decoder.blocks_decoded(), 1);
    }

    #[test]
    fn test_reset_drops_history() {
        let mut decoder = MsZipDecoder::new();
        let mut out = Vec::new();
        decoder
            .decode_block(Cursor::new(block(b"abc")), &mut out)
            .unwrap();
        decoder.reset();
        assert!(decoder.history().is_none());
        assert_eq!(decoder.blocks_decoded(), 0);
    }
}
