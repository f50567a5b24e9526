//! Format variants of the SZDD/KWAJ window decoder

use crate::common::WINDOW_SIZE;

/// Selects how [`LzDecoder`](super::LzDecoder) treats its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVariant {
    /// SZDD / KWAJ method 2 token stream, window offset 4096 - 16
    Standard,
    /// QBasic 4.5 installer token stream, window offset 4096 - 18
    QBasicInstaller,
    /// Stored bytes, copied unchanged (KWAJ method 0)
    PassthroughRaw,
    /// Stored bytes XORed with 0xFF (KWAJ method 1)
    PassthroughXor,
    /// Stored bytes with the QBasic window offset
    PassthroughQBasicOffset,
    /// LZ + Huffman (KWAJ method 3), not decodable
    UnsupportedLZH,
    /// MS-ZIP embedded in KWAJ (method 4), not decodable here
    UnsupportedEmbeddedMSZIP,
}

impl FormatVariant {
    /// Every variant, in declaration order
    pub const ALL: [FormatVariant; 7] = [
        FormatVariant::Standard,
        FormatVariant::QBasicInstaller,
        FormatVariant::PassthroughRaw,
        FormatVariant::PassthroughXor,
        FormatVariant::PassthroughQBasicOffset,
        FormatVariant::UnsupportedLZH,
        FormatVariant::UnsupportedEmbeddedMSZIP,
    ];

    /// Window offset the first decoded byte is written to
    pub fn initial_offset(&self) -> usize {
        match self {
            FormatVariant::QBasicInstaller | FormatVariant::PassthroughQBasicOffset => {
                WINDOW_SIZE - 18
            }
            FormatVariant::Standard
            | FormatVariant::PassthroughRaw
            | FormatVariant::PassthroughXor
            | FormatVariant::UnsupportedLZH
            | FormatVariant::UnsupportedEmbeddedMSZIP => WINDOW_SIZE - 16,
        }
    }

    /// Whether the decoder can handle this variant
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            FormatVariant::UnsupportedLZH | FormatVariant::UnsupportedEmbeddedMSZIP
        )
    }

    /// Whether the input is copied without token decoding
    pub fn is_passthrough(&self) -> bool {
        matches!(
            self,
            FormatVariant::PassthroughRaw
                | FormatVariant::PassthroughXor
                | FormatVariant::PassthroughQBasicOffset
        )
    }

    /// Byte every passthrough input byte is XORed with
    pub fn xor_mask(&self) -> u8 {
        match self {
            FormatVariant::PassthroughXor => 0xFF,
            _ => 0x00,
        }
    }
}
