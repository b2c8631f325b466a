use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::error::Result;

/// A blocking, sequential supplier of stream bytes.
pub trait ByteSource {
    /// Reads up to `max_bytes`. An empty result means the source is exhausted.
    fn read(&mut self, max_bytes: usize) -> Result<Bytes>;

    /// Whether every byte has been handed out.
    fn at_end(&self) -> bool;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, max_bytes: usize) -> Result<Bytes> {
        (**self).read(max_bytes)
    }

    fn at_end(&self) -> bool {
        (**self).at_end()
    }
}

/// Adapts any [`std::io::Read`] (files, pipes, cursors) into a [`ByteSource`].
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    /// Wraps a reader.
    pub fn new(inner: R) -> Self {
        Self { inner, eof: false }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read(&mut self, max_bytes: usize) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(max_bytes);
        let mut filled = 0;

        while filled < max_bytes && !self.eof {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => self.eof = true,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        buf.truncate(filled);
        Ok(buf.freeze())
    }

    fn at_end(&self) -> bool {
        self.eof
    }
}

/// An in-memory [`ByteSource`]. Reads are zero-copy slices of the backing buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    /// Creates a source over `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl ByteSource for MemorySource {
    fn read(&mut self, max_bytes: usize) -> Result<Bytes> {
        let n = max_bytes.min(self.data.len());
        Ok(self.data.split_to(n))
    }

    fn at_end(&self) -> bool {
        self.data.is_empty()
    }
}
