//! Shared fixtures for the integration tests
//!
//! Builds SZDD token streams and MS-ZIP blocks so the decoders can be
//! checked without binary reference files.

#![allow(dead_code)]

use lzexpand::lz::header::{KWAJ_SIGNATURE, QBASIC_SIGNATURE, SZDD_SIGNATURE};

const WINDOW_SIZE: usize = 4096;
const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Token stream of nothing but literals
pub fn encode_literals(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 8 + 1);
    for group in data.chunks(8) {
        out.push(0xFF);
        out.extend_from_slice(group);
    }
    out
}

/// Greedy token encoder mirroring the decoder's window
///
/// Searches `search` positions behind the write offset (the space-filled
/// region included) for the longest match of 3 to 18 bytes.
pub fn encode_greedy(data: &[u8], initial_offset: usize, search: usize) -> Vec<u8> {
    let mut window = vec![b' '; WINDOW_SIZE];
    let mut pos = initial_offset & WINDOW_MASK;
    let mut out = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let control_at = out.len();
        out.push(0);
        let mut control = 0u8;

        for bit in 0..8 {
            if i >= data.len() {
                break;
            }

            let (best_src, best_len) = longest_match(&window, pos, data, i, search);
            if best_len >= 3 {
                out.push((best_src & 0xFF) as u8);
                out.push((((best_src >> 4) & 0xF0) | (best_len - 3)) as u8);
                for k in 0..best_len {
                    window[pos] = data[i + k];
                    pos = (pos + 1) & WINDOW_MASK;
                }
                i += best_len;
            } else {
                control |= 1 << bit;
                out.push(data[i]);
                window[pos] = data[i];
                pos = (pos + 1) & WINDOW_MASK;
                i += 1;
            }
        }
        out[control_at] = control;
    }
    out
}

fn longest_match(
    window: &[u8],
    pos: usize,
    data: &[u8],
    i: usize,
    search: usize,
) -> (usize, usize) {
    let max_len = (data.len() - i).min(18);
    let mut best = (0, 0);

    for back in 1..=search.min(WINDOW_SIZE - 1) {
        let src = pos.wrapping_sub(back) & WINDOW_MASK;
        let mut len = 0;
        while len < max_len {
            // Bytes written earlier in this same match are read back
            let ahead = (src + len).wrapping_sub(pos) & WINDOW_MASK;
            let byte = if ahead < len {
                data[i + ahead]
            } else {
                window[(src + len) & WINDOW_MASK]
            };
            if byte != data[i + len] {
                break;
            }
            len += 1;
        }
        if len > best.1 {
            best = (src, len);
            if len == max_len {
                break;
            }
        }
    }
    best
}

/// SZDD file wrapping `body`
pub fn szdd_file(body: &[u8], uncompressed_size: u32) -> Vec<u8> {
    let mut file = SZDD_SIGNATURE.to_vec();
    file.push(b'A');
    file.push(b'_');
    file.extend_from_slice(&uncompressed_size.to_le_bytes());
    file.extend_from_slice(body);
    file
}

/// QBasic installer file wrapping `body`
pub fn qbasic_file(body: &[u8], uncompressed_size: u32) -> Vec<u8> {
    let mut file = QBASIC_SIGNATURE.to_vec();
    file.extend_from_slice(&uncompressed_size.to_le_bytes());
    file.extend_from_slice(body);
    file
}

/// KWAJ file with no optional fields wrapping `body`
pub fn kwaj_file(method: u16, body: &[u8]) -> Vec<u8> {
    let mut file = KWAJ_SIGNATURE.to_vec();
    file.extend_from_slice(&method.to_le_bytes());
    file.extend_from_slice(&14u16.to_le_bytes());
    file.extend_from_slice(&0u16.to_le_bytes());
    file.extend_from_slice(body);
    file
}

/// MS-ZIP block holding `data` compressed by miniz_oxide
pub fn mszip_block(data: &[u8]) -> Vec<u8> {
    let mut block = b"CK".to_vec();
    block.extend_from_slice(&miniz_oxide::deflate::compress_to_vec(data, 6));
    block
}

const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
const DIST_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const DIST_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Writer for a single final fixed-Huffman deflate block
///
/// Lets tests emit back-references that reach into the previous MS-ZIP
/// block, which no ordinary compressor will produce.
pub struct FixedBlockWriter {
    out: Vec<u8>,
    bit_buff: u32,
    bit_count: u32,
}

impl FixedBlockWriter {
    /// Start a block: "CK", BFINAL = 1, BTYPE = 01
    pub fn new() -> Self {
        let mut writer = Self {
            out: b"CK".to_vec(),
            bit_buff: 0,
            bit_count: 0,
        };
        writer.bits(1, 1);
        writer.bits(1, 2);
        writer
    }

    fn bits(&mut self, value: u32, count: u32) {
        self.bit_buff |= value << self.bit_count;
        self.bit_count += count;
        while self.bit_count >= 8 {
            self.out.push(self.bit_buff as u8);
            self.bit_buff >>= 8;
            self.bit_count -= 8;
        }
    }

    /// Huffman codes go out most-significant bit first
    fn code(&mut self, code: u32, len: u32) {
        let reversed = code.reverse_bits() >> (32 - len);
        self.bits(reversed, len);
    }

    fn symbol(&mut self, sym: u16) {
        match sym {
            0..=143 => self.code(0x30 + sym as u32, 8),
            144..=255 => self.code(0x190 + (sym as u32 - 144), 9),
            256..=279 => self.code(sym as u32 - 256, 7),
            _ => self.code(0xC0 + (sym as u32 - 280), 8),
        }
    }

    /// Emit one literal byte
    pub fn literal(&mut self, byte: u8) -> &mut Self {
        self.symbol(byte as u16);
        self
    }

    /// Emit a match of `length` (3..=258) bytes at `distance` (1..=32768)
    pub fn copy(&mut self, length: u16, distance: u16) -> &mut Self {
        let li = LENGTH_BASE.iter().rposition(|&b| b <= length).unwrap_or(0);
        self.symbol(257 + li as u16);
        self.bits((length - LENGTH_BASE[li]) as u32, LENGTH_EXTRA[li] as u32);

        let di = DIST_BASE.iter().rposition(|&b| b <= distance).unwrap_or(0);
        self.code(di as u32, 5);
        self.bits((distance - DIST_BASE[di]) as u32, DIST_EXTRA[di] as u32);
        self
    }

    /// End-of-block symbol and padding
    pub fn finish(&mut self) -> Vec<u8> {
        self.symbol(256);
        if self.bit_count > 0 {
            self.out.push(self.bit_buff as u8);
        }
        std::mem::take(&mut self.out)
    }
}

/// Source whose every read fails
pub struct UnreadableSource;

impl std::io::Read for UnreadableSource {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "source is locked",
        ))
    }
}
