//! SZDD, QBasic installer and KWAJ container headers
//!
//! All three wrap a body decoded by [`LzDecoder`](super::LzDecoder). The
//! header decides the [`FormatVariant`] and where the body starts.

use super::FormatVariant;
use crate::common::{LzError, Result};
use log::warn;

/// SZDD magic ("SZDD" 88 F0 27 33)
pub const SZDD_SIGNATURE: [u8; 8] = [0x53, 0x5A, 0x44, 0x44, 0x88, 0xF0, 0x27, 0x33];

/// QBasic 4.5 installer magic ("SZ " 88 F0 27 33 D1)
pub const QBASIC_SIGNATURE: [u8; 8] = [0x53, 0x5A, 0x20, 0x88, 0xF0, 0x27, 0x33, 0xD1];

/// KWAJ magic ("KWAJ" 88 F0 27 D1)
pub const KWAJ_SIGNATURE: [u8; 8] = [0x4B, 0x57, 0x41, 0x4A, 0x88, 0xF0, 0x27, 0xD1];

/// Length of an SZDD header
pub const SZDD_HEADER_SIZE: usize = 14;

/// Length of a QBasic installer header
pub const QBASIC_HEADER_SIZE: usize = 12;

/// Length of the fixed part of a KWAJ header
pub const KWAJ_HEADER_SIZE: usize = 14;

/// KWAJ optional header field flags
pub mod kwaj_flags {
    /// u32 uncompressed length
    pub const HAS_LENGTH: u16 = 0x0001;
    /// u16 of unknown meaning
    pub const HAS_UNKNOWN: u16 = 0x0002;
    /// u16 length followed by that many bytes
    pub const HAS_EXTRA: u16 = 0x0004;
    /// NUL-terminated file name, at most 8 characters
    pub const HAS_FILE_NAME: u16 = 0x0008;
    /// NUL-terminated extension, at most 3 characters
    pub const HAS_EXTENSION: u16 = 0x0010;
    /// u16 length followed by that many bytes of text
    pub const HAS_EXTRA_TEXT: u16 = 0x0020;
}

/// SZDD header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SzddHeader {
    /// Compression mode byte, 'A' for the only known mode
    pub compression_mode: u8,
    /// Last character of the original file name, replaced by '_' on disk
    pub missing_char: u8,
    /// Uncompressed size
    pub uncompressed_size: u32,
}

/// QBasic installer header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QBasicHeader {
    /// Uncompressed size
    pub uncompressed_size: u32,
}

/// KWAJ header including optional fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KwajHeader {
    /// Raw compression method
    pub method: u16,
    /// Decoder variant for `method`
    pub variant: FormatVariant,
    /// Offset of the compressed body from the start of the file
    pub data_offset: u16,
    /// Optional field flags
    pub flags: u16,
    /// Uncompressed size, when present
    pub uncompressed_size: Option<u32>,
    /// Field of unknown meaning
    pub unknown: Option<u16>,
    /// Extra header bytes
    pub extra: Option<Vec<u8>>,
    /// Original file name
    pub file_name: Option<String>,
    /// Original file extension
    pub extension: Option<String>,
    /// Extra text bytes
    pub extra_text: Option<Vec<u8>>,
}

/// A recognised container header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// SZDD (COMPRESS.EXE / EXPAND.EXE)
    Szdd(SzddHeader),
    /// QBasic 4.5 installer
    QBasic(QBasicHeader),
    /// KWAJ (COMPRESS.EXE -Z)
    Kwaj(KwajHeader),
}

impl Container {
    /// Recognise and parse the header at the start of `data`
    pub fn detect(data: &[u8]) -> Result<Self> {
        if data.starts_with(&SZDD_SIGNATURE) {
            parse_szdd(data).map(Container::Szdd)
        } else if data.starts_with(&QBASIC_SIGNATURE) {
            parse_qbasic(data).map(Container::QBasic)
        } else if data.starts_with(&KWAJ_SIGNATURE) {
            parse_kwaj(data).map(Container::Kwaj)
        } else {
            Err(LzError::InvalidHeader(
                "unrecognised container signature".to_string(),
            ))
        }
    }

    /// Short name of the container format
    pub fn name(&self) -> &'static str {
        match self {
            Container::Szdd(_) => "SZDD",
            Container::QBasic(_) => "QBasic",
            Container::Kwaj(_) => "KWAJ",
        }
    }

    /// Decoder variant for the body
    pub fn variant(&self) -> FormatVariant {
        match self {
            Container::Szdd(_) => FormatVariant::Standard,
            Container::QBasic(_) => FormatVariant::QBasicInstaller,
            Container::Kwaj(header) => header.variant,
        }
    }

    /// Offset of the body from the start of the file
    pub fn data_offset(&self) -> usize {
        match self {
            Container::Szdd(_) => SZDD_HEADER_SIZE,
            Container::QBasic(_) => QBASIC_HEADER_SIZE,
            Container::Kwaj(header) => header.data_offset as usize,
        }
    }

    /// Uncompressed size declared by the header
    pub fn uncompressed_size(&self) -> Option<u32> {
        match self {
            Container::Szdd(header) => Some(header.uncompressed_size),
            Container::QBasic(header) => Some(header.uncompressed_size),
            Container::Kwaj(header) => header.uncompressed_size,
        }
    }
}

/// Map a KWAJ compression method to a decoder variant
pub fn kwaj_method_variant(method: u16) -> Result<FormatVariant> {
    match method {
        0 => Ok(FormatVariant::PassthroughRaw),
        1 => Ok(FormatVariant::PassthroughXor),
        2 => Ok(FormatVariant::Standard),
        3 => Ok(FormatVariant::UnsupportedLZH),
        4 => Ok(FormatVariant::UnsupportedEmbeddedMSZIP),
        _ => Err(LzError::UnsupportedMethod(method)),
    }
}

/// Little-endian field reader over a header slice
struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a [u8], pos: usize, what: &'static str) -> Self {
        Self { data, pos, what }
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos + len;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| LzError::InvalidHeader(format!("truncated {} header", self.what)))?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// NUL-terminated string occupying at most `max` bytes including the NUL
    fn c_string(&mut self, max: usize) -> Result<String> {
        let window = &self.data[self.pos.min(self.data.len())..];
        let window = &window[..window.len().min(max)];
        let len = window.iter().position(|&b| b == 0).ok_or_else(|| {
            LzError::InvalidHeader(format!("unterminated name in {} header", self.what))
        })?;
        let text = String::from_utf8_lossy(&window[..len]).into_owned();
        self.pos += len + 1;
        Ok(text)
    }
}

fn parse_szdd(data: &[u8]) -> Result<SzddHeader> {
    let mut fields = FieldReader::new(data, SZDD_SIGNATURE.len(), "SZDD");
    let compression_mode = fields.u8()?;
    let missing_char = fields.u8()?;
    let uncompressed_size = fields.u32()?;

    if compression_mode != b'A' {
        warn!("SZDD compression mode {compression_mode:#04X} is not 'A'");
    }

    Ok(SzddHeader {
        compression_mode,
        missing_char,
        uncompressed_size,
    })
}

fn parse_qbasic(data: &[u8]) -> Result<QBasicHeader> {
    let mut fields = FieldReader::new(data, QBASIC_SIGNATURE.len(), "QBasic");
    Ok(QBasicHeader {
        uncompressed_size: fields.u32()?,
    })
}

fn parse_kwaj(data: &[u8]) -> Result<KwajHeader> {
    use kwaj_flags::*;

    let mut fields = FieldReader::new(data, KWAJ_SIGNATURE.len(), "KWAJ");
    let method = fields.u16()?;
    let variant = kwaj_method_variant(method)?;
    let data_offset = fields.u16()?;
    let flags = fields.u16()?;

    let mut header = KwajHeader {
        method,
        variant,
        data_offset,
        flags,
        uncompressed_size: None,
        unknown: None,
        extra: None,
        file_name: None,
        extension: None,
        extra_text: None,
    };

    if flags & HAS_LENGTH != 0 {
        header.uncompressed_size = Some(fields.u32()?);
    }
    if flags & HAS_UNKNOWN != 0 {
        header.unknown = Some(fields.u16()?);
    }
    if flags & HAS_EXTRA != 0 {
        let len = fields.u16()? as usize;
        header.extra = Some(fields.bytes(len)?.to_vec());
    }
    if flags & HAS_FILE_NAME != 0 {
        header.file_name = Some(fields.c_string(9)?);
    }
    if flags & HAS_EXTENSION != 0 {
        header.extension = Some(fields.c_string(4)?);
    }
    if flags & HAS_EXTRA_TEXT != 0 {
        let len = fields.u16()? as usize;
        header.extra_text = Some(fields.bytes(len)?.to_vec());
    }

    if (data_offset as usize) < fields.pos || data_offset as usize > data.len() {
        return Err(LzError::InvalidHeader(format!(
            "KWAJ data offset {} outside {}..={}",
            data_offset,
            fields.pos,
            data.len()
        )));
    }

    Ok(header)
}
