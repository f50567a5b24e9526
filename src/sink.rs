//! Output sinks for the decoders
//!
//! Decoders write through [`ByteSink`], a [`Write`] that can also report
//! whether it currently accepts writes. The decoders check this before
//! producing any output and never close the sink, only write and flush it.

use std::fs::File;
use std::io::{BufWriter, Cursor, Sink, Write};

/// A [`Write`] that reports whether it accepts writes
pub trait ByteSink: Write {
    /// Whether the sink currently accepts writes
    fn accepts_writes(&self) -> bool;
}

impl ByteSink for Vec<u8> {
    fn accepts_writes(&self) -> bool {
        true
    }
}

impl ByteSink for Sink {
    fn accepts_writes(&self) -> bool {
        true
    }
}

impl ByteSink for File {
    fn accepts_writes(&self) -> bool {
        true
    }
}

impl ByteSink for Cursor<Vec<u8>> {
    fn accepts_writes(&self) -> bool {
        true
    }
}

impl ByteSink for Cursor<&mut [u8]> {
    fn accepts_writes(&self) -> bool {
        (self.position() as usize) < self.get_ref().len()
    }
}

impl<W: ByteSink> ByteSink for BufWriter<W> {
    fn accepts_writes(&self) -> bool {
        self.get_ref().accepts_writes()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn accepts_writes(&self) -> bool {
        (**self).accepts_writes()
    }
}

/// Wraps any [`Write`] with an explicit writable flag
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    inner: W,
    writable: bool,
}

impl<W: Write> WriteSink<W> {
    /// Create a writable sink
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            writable: true,
        }
    }

    /// Create a sink that refuses writes
    pub fn read_only(inner: W) -> Self {
        Self {
            inner,
            writable: false,
        }
    }

    /// Change whether the sink accepts writes
    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    /// Get a reference to the wrapped writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the sink, returning the wrapped writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for WriteSink<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.writable {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "sink is read-only",
            ));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> ByteSink for WriteSink<W> {
    fn accepts_writes(&self) -> bool {
        self.writable
    }
}
