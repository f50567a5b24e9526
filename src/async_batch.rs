//! Async batch processing module
//!
//! This module decodes many container files concurrently. Every file gets
//! its own decoder, so no window or history is shared between sessions.

#[cfg(feature = "async")]
/// Concurrent file decoding with a configurable concurrency limit
pub mod processor {
    use crate::async_convenience::expand_file_async;
    use crate::{Container, LzError, Result};
    use futures::stream::{self, StreamExt, TryStreamExt};
    use std::path::{Path, PathBuf};

    /// Decoded file: source path, parsed header and decompressed contents
    pub type ExpandedFile = (PathBuf, Container, Vec<u8>);

    /// Concurrent file decoder
    #[derive(Debug, Clone)]
    pub struct AsyncBatchProcessor {
        concurrency_limit: usize,
    }

    impl AsyncBatchProcessor {
        /// Create a new batch processor with one task per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Current concurrency limit
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Decode every file, failing on the first error
        ///
        /// Results arrive in completion order, not input order.
        pub async fn expand_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
        ) -> Result<Vec<ExpandedFile>> {
            stream::iter(files.into_iter().map(|path| async move {
                let path = path.as_ref().to_path_buf();
                let (container, data) = expand_file_async(&path).await?;
                Ok::<_, LzError>((path, container, data))
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await
        }

        /// Decode every file, reporting each outcome separately
        ///
        /// Results are returned in input order.
        pub async fn expand_files_each<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
        ) -> Vec<(PathBuf, Result<(Container, Vec<u8>)>)> {
            stream::iter(files.into_iter().map(|path| async move {
                let path = path.as_ref().to_path_buf();
                let result = expand_file_async(&path).await;
                (path, result)
            }))
            .buffered(self.concurrency_limit)
            .collect()
            .await
        }
    }

    impl Default for AsyncBatchProcessor {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use processor::AsyncBatchProcessor;
