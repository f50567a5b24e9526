//! Circular dictionary window for the token decoder

use crate::common::{WINDOW_FILL, WINDOW_MASK, WINDOW_SIZE};

/// Fixed 4096-byte circular dictionary, pre-filled with spaces
#[derive(Debug, Clone)]
pub struct Window {
    buff: Box<[u8; WINDOW_SIZE]>,
    /// Next write offset, always masked
    pos: usize,
}

impl Window {
    /// Create a space-filled window with the write offset at `offset`
    pub fn new(offset: usize) -> Self {
        Self {
            buff: Box::new([WINDOW_FILL; WINDOW_SIZE]),
            pos: offset & WINDOW_MASK,
        }
    }

    /// Refill with spaces and move the write offset to `offset`
    pub fn reset(&mut self, offset: usize) {
        self.buff.fill(WINDOW_FILL);
        self.pos = offset & WINDOW_MASK;
    }

    /// Current write offset
    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte stored at `index` (wrapped)
    #[cfg(test)]
    pub fn get(&self, index: usize) -> u8 {
        self.buff[index & WINDOW_MASK]
    }

    /// Store `byte` at the write offset and advance it
    pub fn push(&mut self, byte: u8) {
        self.buff[self.pos] = byte;
        self.pos = (self.pos + 1) & WINDOW_MASK;
    }

    /// Replay `length` bytes starting at absolute `source`, appending each to `out`
    ///
    /// Source and write offsets advance independently and both wrap, so a
    /// source that runs into the bytes being written repeats them.
    pub fn copy_match(&mut self, source: usize, length: usize, out: &mut Vec<u8>) {
        let mut src = source & WINDOW_MASK;
        for _ in 0..length {
            let byte = self.buff[src];
            self.push(byte);
            out.push(byte);
            src = (src + 1) & WINDOW_MASK;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_is_spaces() {
        let window = Window::new(4080);
        assert_eq!(window.position(), 4080);
        assert!((0..WINDOW_SIZE).all(|i| window.get(i) == b' '));
    }

    #[test]
    fn test_push_wraps() {
        let mut window = Window::new(WINDOW_SIZE - 1);
        window.push(b'x');
        window.push(b'y');
        assert_eq!(window.get(WINDOW_SIZE - 1), b'x');
        assert_eq!(window.get(0), b'y');
        assert_eq!(window.position(), 1);
    }

    #[test]
    fn test_overlapping_match_repeats() {
        let mut window = Window::new(100);
        window.push(b'A');
        window.push(b'B');

        let mut out = Vec::new();
        window.copy_match(100, 5, &mut out);
        assert_eq!(out, b"ABABA");
        assert_eq!(window.position(), 107);
    }

    #[test]
    fn test_match_source_wraps_independently() {
        let mut window = Window::new(10);
        let mut out = Vec::new();
        // Source starts two bytes before the end, all spaces
        window.copy_match(WINDOW_SIZE - 2, 4, &mut out);
        assert_eq!(out, b"    ");
        assert_eq!(window.position(), 14);
    }

    #[test]
    fn test_reset() {
        let mut window = Window::new(0);
        window.push(b'z');
        window.reset(4078);
        assert_eq!(window.get(0), b' ');
        assert_eq!(window.position(), 4078);
    }
}
