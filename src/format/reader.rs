//! Low-level little-endian reading utilities for zip record parsing.

use crate::{Error, Result};

/// A bounds-checked cursor over an in-memory archive.
///
/// Every read reports truncation as [`Error::ArchiveCorrupt`] carrying the
/// offset where the missing bytes were expected, so callers can propagate
/// with `?` without losing position information.
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    /// Creates a reader positioned at `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Returns the current absolute offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reads exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| Error::corrupt(self.pos as u64, format!("truncated {what}")))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads an unsigned 16-bit little-endian integer.
    pub fn read_u16(&mut self, what: &str) -> Result<u16> {
        let bytes = self.read_bytes(2, what)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads an unsigned 32-bit little-endian integer.
    pub fn read_u32(&mut self, what: &str) -> Result<u32> {
        let bytes = self.read_bytes(4, what)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a record signature and checks it against `expected`.
    pub fn expect_signature(&mut self, expected: u32, what: &str) -> Result<()> {
        let start = self.pos;
        let found = self.read_u32(what)?;
        if found != expected {
            return Err(Error::corrupt(
                start as u64,
                format!("bad {what} signature {found:#010x}"),
            ));
        }
        Ok(())
    }
}

/// Reads a little-endian u32 at `pos` without bounds errors, for signature probing.
pub fn peek_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
