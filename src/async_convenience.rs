//! Async convenience functions
//!
//! The decoders are synchronous state machines. These helpers read input
//! with tokio and run the decode on a blocking task so callers inside an
//! async runtime do not stall their executor.

#[cfg(feature = "async")]
pub mod functions {
    use crate::{Container, DecodeStats, FormatVariant, LzError, Result};
    use std::path::Path;
    use tokio::io::{AsyncRead, AsyncReadExt};

    /// Run a decode on tokio's blocking pool
    async fn run_blocking<T, F>(job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| LzError::Io(std::io::Error::other(e)))?
    }

    /// Decode a bare SZDD/KWAJ stream from an async reader
    pub async fn expand_async<R: AsyncRead + Unpin>(
        mut reader: R,
        variant: FormatVariant,
    ) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        run_blocking(move || crate::lz::expand_bytes(&data, variant)).await
    }

    /// Decode a bare SZDD/KWAJ stream from bytes
    pub async fn expand_bytes_async(data: &[u8], variant: FormatVariant) -> Result<Vec<u8>> {
        use std::io::Cursor;
        expand_async(Cursor::new(data), variant).await
    }

    /// Read and decode an SZDD, QBasic or KWAJ file
    pub async fn expand_file_async<P: AsRef<Path>>(path: P) -> Result<(Container, Vec<u8>)> {
        let data = tokio::fs::read(path).await?;
        run_blocking(move || crate::lz::expand_file_bytes(&data)).await
    }

    /// Decode consecutive MS-ZIP blocks
    pub async fn mszip_decode_blocks_async(blocks: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        run_blocking(move || crate::mszip::decode_blocks(blocks.iter().map(Vec::as_slice))).await
    }

    /// Decode an SZDD, QBasic or KWAJ file and write the result to `output_path`
    pub async fn decompress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
    ) -> Result<DecodeStats> {
        let data = tokio::fs::read(input_path).await?;
        let (output, stats) = run_blocking(move || {
            let container = Container::detect(&data)?;
            let body = data.get(container.data_offset()..).unwrap_or_default();
            let mut decoder = crate::LzDecoder::new(container.variant());
            let mut output = Vec::new();
            if !decoder.decompress(body, &mut output)? {
                return Err(LzError::UnsupportedVariant(container.variant()));
            }
            Ok((output, decoder.stats().clone()))
        })
        .await?;

        tokio::fs::write(output_path, &output).await?;
        Ok(stats)
    }
}

#[cfg(feature = "async")]
pub use functions::*;
