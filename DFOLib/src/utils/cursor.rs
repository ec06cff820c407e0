//! Bounds-checked little-endian reader over a byte slice
//!
//! Every read either returns the full value and advances, or fails with
//! [`Error::TruncatedData`] and leaves the position where it was.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Sequential reader over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let span = self.peek_bytes(len)?;
        self.pos += len;
        Ok(span)
    }

    /// Borrow the next `len` bytes without advancing.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if fewer than `len` bytes remain.
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        Ok(&self.data[self.pos..self.pos + len])
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read a null-terminated string, consuming the terminator.
    ///
    /// Invalid UTF-8 is replaced lossily.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if no terminator is found before the
    /// end of the buffer.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = &self.data[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.truncated(rest.len() + 1))?;
        let text = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.pos += end + 1;
        Ok(text)
    }

    /// Read a string prefixed by its `u32` byte length.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if the prefix or the body is cut off.
    /// The position is unchanged on failure.
    pub fn read_prefixed_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        match self.read_bytes(len) {
            Ok(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Err(err) => {
                self.pos = start;
                Err(err)
            }
        }
    }

    /// Advance `len` bytes.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Jump to an absolute position. `pos == len` (end of buffer) is allowed.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `pos` is past the end.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::OutOfRange {
                what: "seek position",
                index: pos as u64,
                limit: self.data.len() as u64,
            });
        }
        self.pos = pos;
        Ok(())
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::TruncatedData {
            offset: self.pos as u64,
            needed: needed as u64,
            available: self.remaining() as u64,
        }
    }
}
