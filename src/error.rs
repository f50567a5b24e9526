//! Error handling for decoding operations
//!
//! This module re-exports the error types used throughout the crate.
//! Fatal conditions (bad MS-ZIP signature, bit reads past the end of input)
//! surface as [`LzError`]; recoverable ones are reported by the decoders as
//! `Ok(false)`.

pub use crate::common::LzError;
pub use crate::common::Result;
